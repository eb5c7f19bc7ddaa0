use std::rc::Rc;

use tracing::debug;

pub const DEFAULT_BREAKPOINT: f64 = 768.0;

#[derive(
  Debug, Clone, Copy, PartialEq,
)]
pub enum DrawerEvent {
  ToggleClicked,
  OverlayClicked,
  NavLinkClicked { viewport_width: f64 }
}

/// The sidebar element the drawer acts on.
/// Reads always reflect the live page.
pub trait DrawerSurface {
  fn is_expanded(&self) -> bool;
  fn set_expanded(&self, expanded: bool);
  fn viewport_width(&self) -> f64;
}

/// Page structure the drawer is built into.
/// `Control` is any clickable element the
/// setup creates or finds.
pub trait DrawerLayout {
  type Sidebar: DrawerSurface + 'static;
  type Control;

  fn find_sidebar(&self) -> Option<Self::Sidebar>;
  fn mark_drawer(&self, sidebar: &Self::Sidebar);
  fn create_toggle(&self) -> Option<Self::Control>;
  /// Inserts before the header container's
  /// first child. `false` when there is no
  /// header container.
  fn insert_toggle_first(
    &self,
    toggle: &Self::Control
  ) -> bool;
  fn create_overlay(&self) -> Option<Self::Control>;
  /// Inserts as the sidebar's next sibling.
  fn insert_overlay_after(
    &self,
    sidebar: &Self::Sidebar,
    overlay: &Self::Control
  ) -> bool;
  fn nav_links(
    &self,
    sidebar: &Self::Sidebar
  ) -> Vec<Self::Control>;
  fn on_click(
    &self,
    target: &Self::Control,
    handler: Box<dyn Fn()>
  );
}

#[derive(
  Debug, Clone, Copy, PartialEq,
)]
pub struct Drawer {
  breakpoint: f64
}

impl Default for Drawer {
  fn default() -> Self {
    Self::new(DEFAULT_BREAKPOINT)
  }
}

impl Drawer {
  pub fn new(breakpoint: f64) -> Self {
    Self {
      breakpoint
    }
  }

  pub fn breakpoint(&self) -> f64 {
    self.breakpoint
  }

  pub fn is_narrow(
    &self,
    viewport_width: f64
  ) -> bool {
    viewport_width < self.breakpoint
  }

  pub fn next(
    &self,
    expanded: bool,
    event: DrawerEvent
  ) -> bool {
    match event {
      | DrawerEvent::ToggleClicked => {
        !expanded
      }
      | DrawerEvent::OverlayClicked => {
        false
      }
      | DrawerEvent::NavLinkClicked {
        viewport_width
      } => {
        if self.is_narrow(viewport_width) {
          false
        } else {
          expanded
        }
      }
    }
  }

  /// Applies `event` to the live marker.
  /// The surface is written only when the
  /// state actually changes.
  pub fn dispatch<S>(
    &self,
    surface: &S,
    event: DrawerEvent
  ) -> bool
  where
    S: DrawerSurface + ?Sized
  {
    let before = surface.is_expanded();
    let after = self.next(before, event);
    if after != before {
      surface.set_expanded(after);
    }
    debug!(
      ?event,
      before, after, "drawer event"
    );
    after
  }

  /// Link clicks carry the width read at
  /// click time, never a cached value.
  pub fn nav_link_clicked<S>(
    &self,
    surface: &S
  ) -> bool
  where
    S: DrawerSurface + ?Sized
  {
    self.dispatch(
      surface,
      DrawerEvent::NavLinkClicked {
        viewport_width: surface
          .viewport_width()
      }
    )
  }
}

impl Drawer {
  /// Marks the sidebar, inserts the toggle
  /// and the overlay, and wires every click.
  /// Without a sidebar nothing is created or
  /// registered.
  pub fn install<L: DrawerLayout>(
    self,
    layout: &L
  ) -> Option<Rc<L::Sidebar>> {
    let Some(sidebar) = layout.find_sidebar()
    else {
      debug!("no sidebar; drawer inert");
      return None;
    };
    let sidebar = Rc::new(sidebar);
    layout.mark_drawer(&sidebar);

    let wire = |target: &L::Control,
                event: DrawerEvent| {
      let sidebar = sidebar.clone();
      layout.on_click(
        target,
        Box::new(move || {
          self.dispatch(sidebar.as_ref(), event);
        })
      );
    };

    if let Some(toggle) = layout.create_toggle()
    {
      if !layout.insert_toggle_first(&toggle) {
        debug!(
          "no header container for drawer \
           toggle"
        );
      }
      wire(&toggle, DrawerEvent::ToggleClicked);
    }

    if let Some(overlay) =
      layout.create_overlay()
      && layout
        .insert_overlay_after(&sidebar, &overlay)
    {
      wire(
        &overlay,
        DrawerEvent::OverlayClicked
      );
    }

    for link in layout.nav_links(&sidebar) {
      let sidebar = sidebar.clone();
      layout.on_click(
        &link,
        Box::new(move || {
          self.nav_link_clicked(
            sidebar.as_ref()
          );
        })
      );
    }

    Some(sidebar)
  }
}

#[cfg(test)]
mod tests {
  use std::cell::{
    Cell,
    RefCell
  };

  use super::*;

  struct FakeSidebar {
    expanded: Cell<bool>,
    width:    Cell<f64>,
    writes:   Cell<u32>
  }

  impl FakeSidebar {
    fn new(width: f64) -> Self {
      Self {
        expanded: Cell::new(false),
        width:    Cell::new(width),
        writes:   Cell::new(0)
      }
    }
  }

  impl DrawerSurface for FakeSidebar {
    fn is_expanded(&self) -> bool {
      self.expanded.get()
    }

    fn set_expanded(&self, expanded: bool) {
      self.writes.set(self.writes.get() + 1);
      self.expanded.set(expanded);
    }

    fn viewport_width(&self) -> f64 {
      self.width.get()
    }
  }

  #[test]
  fn toggle_twice_restores_collapsed() {
    let drawer = Drawer::default();
    let sidebar = FakeSidebar::new(500.0);

    assert!(drawer.dispatch(
      &sidebar,
      DrawerEvent::ToggleClicked
    ));
    assert!(!drawer.dispatch(
      &sidebar,
      DrawerEvent::ToggleClicked
    ));
    assert!(!sidebar.is_expanded());
  }

  #[test]
  fn overlay_only_ever_closes() {
    let drawer = Drawer::default();
    assert!(
      !drawer.next(
        true,
        DrawerEvent::OverlayClicked
      )
    );
    assert!(
      !drawer.next(
        false,
        DrawerEvent::OverlayClicked
      )
    );

    let sidebar = FakeSidebar::new(500.0);
    drawer.dispatch(
      &sidebar,
      DrawerEvent::OverlayClicked
    );
    assert_eq!(sidebar.writes.get(), 0);
  }

  #[test]
  fn nav_click_closes_only_below_breakpoint()
   {
    let drawer = Drawer::default();

    let narrow = FakeSidebar::new(500.0);
    narrow.expanded.set(true);
    assert!(!drawer.nav_link_clicked(&narrow));
    assert!(!narrow.is_expanded());

    let wide = FakeSidebar::new(1024.0);
    wide.expanded.set(true);
    assert!(drawer.nav_link_clicked(&wide));
    assert!(wide.is_expanded());
    assert_eq!(wide.writes.get(), 0);
  }

  #[test]
  fn breakpoint_is_exclusive_and_read_at_click()
   {
    let drawer = Drawer::default();
    let sidebar = FakeSidebar::new(768.0);
    sidebar.expanded.set(true);
    assert!(drawer.nav_link_clicked(&sidebar));

    sidebar.width.set(767.0);
    assert!(!drawer.nav_link_clicked(&sidebar));
  }

  struct FakeLayout {
    sidebar:   RefCell<Option<FakeSidebar>>,
    header:    bool,
    links:     Vec<&'static str>,
    ops:       RefCell<Vec<String>>,
    listeners: RefCell<
      Vec<(String, Box<dyn Fn()>)>
    >
  }

  impl FakeLayout {
    fn new(sidebar: Option<FakeSidebar>) -> Self {
      Self {
        sidebar:   RefCell::new(sidebar),
        header:    true,
        links:     vec!["/tasks", "/projects"],
        ops:       RefCell::new(vec![]),
        listeners: RefCell::new(vec![])
      }
    }

    fn log(&self, op: String) {
      self.ops.borrow_mut().push(op);
    }

    fn click(&self, target: &str) {
      let listeners = self.listeners.borrow();
      let (_, handler) = listeners
        .iter()
        .find(|(name, _)| name == target)
        .expect("listener registered");
      handler();
    }
  }

  impl DrawerLayout for FakeLayout {
    type Control = String;
    type Sidebar = FakeSidebar;

    fn find_sidebar(&self) -> Option<FakeSidebar> {
      self.sidebar.borrow_mut().take()
    }

    fn mark_drawer(&self, _: &FakeSidebar) {
      self.log("mark sidebar".to_string());
    }

    fn create_toggle(&self) -> Option<String> {
      self.log("create toggle".to_string());
      Some("toggle".to_string())
    }

    fn insert_toggle_first(
      &self,
      toggle: &String
    ) -> bool {
      if self.header {
        self.log(format!(
          "header.prepend {toggle}"
        ));
      }
      self.header
    }

    fn create_overlay(&self) -> Option<String> {
      self.log("create overlay".to_string());
      Some("overlay".to_string())
    }

    fn insert_overlay_after(
      &self,
      _: &FakeSidebar,
      overlay: &String
    ) -> bool {
      self.log(format!(
        "sidebar.after {overlay}"
      ));
      true
    }

    fn nav_links(
      &self,
      _: &FakeSidebar
    ) -> Vec<String> {
      self
        .links
        .iter()
        .map(|href| href.to_string())
        .collect()
    }

    fn on_click(
      &self,
      target: &String,
      handler: Box<dyn Fn()>
    ) {
      self
        .listeners
        .borrow_mut()
        .push((target.clone(), handler));
    }
  }

  #[test]
  fn install_inserts_toggle_first_and_overlay_after_sidebar()
   {
    let layout = FakeLayout::new(Some(
      FakeSidebar::new(500.0)
    ));
    let sidebar = Drawer::default()
      .install(&layout)
      .expect("sidebar present");

    assert_eq!(
      *layout.ops.borrow(),
      vec![
        "mark sidebar",
        "create toggle",
        "header.prepend toggle",
        "create overlay",
        "sidebar.after overlay"
      ]
    );
    let wired: Vec<String> = layout
      .listeners
      .borrow()
      .iter()
      .map(|(name, _)| name.clone())
      .collect();
    assert_eq!(
      wired,
      vec![
        "toggle", "overlay", "/tasks",
        "/projects"
      ]
    );

    layout.click("toggle");
    assert!(sidebar.is_expanded());
    layout.click("overlay");
    assert!(!sidebar.is_expanded());

    layout.click("toggle");
    sidebar.width.set(1024.0);
    layout.click("/projects");
    assert!(sidebar.is_expanded());
    sidebar.width.set(500.0);
    layout.click("/tasks");
    assert!(!sidebar.is_expanded());
  }

  #[test]
  fn install_without_sidebar_is_inert() {
    let layout = FakeLayout::new(None);
    assert!(
      Drawer::default()
        .install(&layout)
        .is_none()
    );
    assert!(layout.ops.borrow().is_empty());
    assert!(
      layout.listeners.borrow().is_empty()
    );
  }

  #[test]
  fn toggle_is_wired_even_without_header() {
    let mut layout = FakeLayout::new(Some(
      FakeSidebar::new(500.0)
    ));
    layout.header = false;
    let sidebar = Drawer::default()
      .install(&layout)
      .expect("sidebar present");

    assert!(
      !layout
        .ops
        .borrow()
        .iter()
        .any(|op| op.starts_with("header"))
    );
    layout.click("toggle");
    assert!(sidebar.is_expanded());
  }
}
