use gloo::events::EventListener;
use gtd_core::{
  BehaviorConfig,
  CurrentLocation,
  NavLink,
  NavMatcher,
  highlight
};
use web_sys::{
  Document,
  Element,
  Window
};

use crate::dom;

struct DomNavLink<'a> {
  element:      Element,
  active_class: &'a str
}

impl NavLink for DomNavLink<'_> {
  fn href(&self) -> Option<String> {
    self.element.get_attribute("href")
  }

  fn set_active(&self, active: bool) {
    dom::set_class(
      &self.element,
      self.active_class,
      active
    );
  }
}

fn current_location(
  window: &Window
) -> Option<CurrentLocation> {
  let location = window.location();
  let path = location.pathname().ok()?;
  let search =
    location.search().unwrap_or_default();
  Some(CurrentLocation::from_parts(
    &path, &search
  ))
}

/// Marks the menu link for the current
/// location.
pub fn run(
  window: &Window,
  document: &Document,
  matcher: &NavMatcher,
  cfg: &BehaviorConfig
) -> Option<usize> {
  let location = current_location(window)?;
  let links: Vec<DomNavLink<'_>> =
    dom::query_all::<Element>(
      document,
      &cfg.menu_link_selector
    )
    .into_iter()
    .map(|element| DomNavLink {
      element,
      active_class: &cfg.active_class
    })
    .collect();

  highlight(matcher, &location, &links)
}

/// Highlights once, and again after swaps
/// and history moves when configured to.
#[tracing::instrument(skip_all)]
pub fn install(
  window: &Window,
  document: &Document,
  cfg: &BehaviorConfig
) {
  let matcher = cfg.nav_matcher();
  let active =
    run(window, document, &matcher, cfg);
  tracing::info!(
    ?active,
    "navigation highlighted"
  );

  if !cfg.rehighlight_on_swap {
    return;
  }

  let rerun = {
    let window = window.clone();
    let document = document.clone();
    let cfg = cfg.clone();
    move |_: &web_sys::Event| {
      run(&window, &document, &matcher, &cfg);
    }
  };

  if let Some(body) = document.body() {
    EventListener::new(
      &body,
      cfg.swap_event.clone(),
      rerun.clone()
    )
    .forget();
  }
  EventListener::new(window, "popstate", rerun)
    .forget();
}
