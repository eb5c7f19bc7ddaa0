use std::rc::Rc;

use gloo::events::EventListener;
use gtd_core::{
  BehaviorConfig,
  DrawerLayout,
  DrawerSurface
};
use wasm_bindgen::JsCast;
use web_sys::{
  Document,
  Element,
  HtmlElement,
  Window
};

use crate::dom;

const HAMBURGER_ICON: &str = "<svg \
  xmlns=\"http://www.w3.org/2000/svg\" \
  class=\"h-5 w-5\" fill=\"none\" \
  viewBox=\"0 0 24 24\" \
  stroke=\"currentColor\"><path \
  stroke-linecap=\"round\" \
  stroke-linejoin=\"round\" \
  stroke-width=\"2\" d=\"M4 6h16M4 \
  12h16M4 18h16\" /></svg>";

pub struct DomSidebar {
  window:     Window,
  sidebar:    Element,
  open_class: String
}

impl DrawerSurface for DomSidebar {
  fn is_expanded(&self) -> bool {
    dom::has_class(
      &self.sidebar,
      &self.open_class
    )
  }

  fn set_expanded(&self, expanded: bool) {
    dom::set_class(
      &self.sidebar,
      &self.open_class,
      expanded
    );
  }

  fn viewport_width(&self) -> f64 {
    self
      .window
      .inner_width()
      .ok()
      .and_then(|width| width.as_f64())
      .unwrap_or(f64::INFINITY)
  }
}

/// The page the drawer is built into.
struct DomLayout<'a> {
  window:   &'a Window,
  document: &'a Document,
  cfg:      &'a BehaviorConfig
}

impl DrawerLayout for DomLayout<'_> {
  type Control = Element;
  type Sidebar = DomSidebar;

  fn find_sidebar(&self) -> Option<DomSidebar> {
    let Some(sidebar) = dom::query::<Element>(
      self.document,
      &self.cfg.sidebar_selector
    ) else {
      tracing::debug!(
        selector = %self.cfg.sidebar_selector,
        "no sidebar element"
      );
      return None;
    };
    Some(DomSidebar {
      window: self.window.clone(),
      sidebar,
      open_class: self.cfg.open_class.clone()
    })
  }

  fn mark_drawer(&self, sidebar: &DomSidebar) {
    dom::set_class(
      &sidebar.sidebar,
      &self.cfg.drawer_class,
      true
    );
  }

  fn create_toggle(&self) -> Option<Element> {
    let button = self
      .document
      .create_element("button")
      .ok()?
      .dyn_into::<HtmlElement>()
      .ok()?;
    button.set_class_name(&self.cfg.toggle_class);
    button.set_inner_html(HAMBURGER_ICON);
    button.set_id(&self.cfg.toggle_id);
    let _ = button
      .set_attribute("type", "button");
    let _ = button.set_attribute(
      "aria-label",
      "Toggle navigation"
    );
    Some(button.into())
  }

  fn insert_toggle_first(
    &self,
    toggle: &Element
  ) -> bool {
    let Some(header) = dom::query::<Element>(
      self.document,
      &self.cfg.header_selector
    ) else {
      return false;
    };
    let first = header.first_child();
    header
      .insert_before(toggle, first.as_ref())
      .is_ok()
  }

  fn create_overlay(&self) -> Option<Element> {
    let overlay = self
      .document
      .create_element("div")
      .ok()?;
    overlay
      .set_class_name(&self.cfg.overlay_class);
    Some(overlay)
  }

  fn insert_overlay_after(
    &self,
    sidebar: &DomSidebar,
    overlay: &Element
  ) -> bool {
    let Some(parent) =
      sidebar.sidebar.parent_node()
    else {
      return false;
    };
    let next = sidebar.sidebar.next_sibling();
    parent
      .insert_before(overlay, next.as_ref())
      .is_ok()
  }

  fn nav_links(
    &self,
    sidebar: &DomSidebar
  ) -> Vec<Element> {
    dom::query_all_in(&sidebar.sidebar, "a")
  }

  fn on_click(
    &self,
    target: &Element,
    handler: Box<dyn Fn()>
  ) {
    EventListener::new(
      target,
      "click",
      move |_| handler()
    )
    .forget();
  }
}

/// Turns the sidebar into a drawer. With no
/// sidebar in the page nothing is created or
/// registered.
#[tracing::instrument(skip_all)]
pub fn install(
  window: &Window,
  document: &Document,
  cfg: &BehaviorConfig
) -> Option<Rc<DomSidebar>> {
  let layout = DomLayout {
    window,
    document,
    cfg
  };
  let drawer = cfg.drawer();
  let sidebar = drawer.install(&layout)?;

  tracing::info!(
    breakpoint = drawer.breakpoint(),
    "sidebar drawer ready"
  );
  Some(sidebar)
}
