//! Optional lookups at the page boundary.
//! A `None` here means the behavior that
//! needed the element stays inert.

use wasm_bindgen::JsCast;
use web_sys::{
  Document,
  Element,
  Window
};

pub fn window() -> Option<Window> {
  web_sys::window()
}

pub fn document() -> Option<Document> {
  window().and_then(|window| {
    window.document()
  })
}

pub fn by_id<T: JsCast>(
  document: &Document,
  id: &str
) -> Option<T> {
  document
    .get_element_by_id(id)
    .and_then(|element| {
      element.dyn_into::<T>().ok()
    })
}

pub fn query<T: JsCast>(
  document: &Document,
  selector: &str
) -> Option<T> {
  document
    .query_selector(selector)
    .ok()
    .flatten()
    .and_then(|element| {
      element.dyn_into::<T>().ok()
    })
}

fn collect<T: JsCast>(
  list: Option<web_sys::NodeList>
) -> Vec<T> {
  let Some(list) = list else {
    return vec![];
  };
  (0..list.length())
    .filter_map(|index| list.get(index))
    .filter_map(|node| {
      node.dyn_into::<T>().ok()
    })
    .collect()
}

pub fn query_all<T: JsCast>(
  document: &Document,
  selector: &str
) -> Vec<T> {
  collect(
    document
      .query_selector_all(selector)
      .ok()
  )
}

pub fn query_all_in<T: JsCast>(
  root: &Element,
  selector: &str
) -> Vec<T> {
  collect(
    root.query_selector_all(selector).ok()
  )
}

pub fn set_class(
  element: &Element,
  class: &str,
  present: bool
) {
  let list = element.class_list();
  let _ = if present {
    list.add_1(class)
  } else {
    list.remove_1(class)
  };
}

pub fn has_class(
  element: &Element,
  class: &str
) -> bool {
  element.class_list().contains(class)
}
