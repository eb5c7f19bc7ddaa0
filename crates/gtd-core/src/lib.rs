//! Page behaviors for the GTD web client:
//! the quick-capture overlay, the sidebar
//! drawer and the active navigation link.
//!
//! Nothing here touches a browser. Each
//! behavior talks to the page through a
//! small surface trait, and delayed work goes
//! through a [`schedule::Scheduler`], so the
//! whole layer runs under plain `cargo test`.

pub mod capture;
pub mod config;
pub mod drawer;
pub mod keys;
pub mod nav;
pub mod schedule;

pub use capture::{
  CaptureController,
  CaptureModal,
  CapturePage,
  CaptureSurface,
  ModalEvent,
  ModalState,
  SwapDetail
};
pub use config::BehaviorConfig;
pub use drawer::{
  Drawer,
  DrawerEvent,
  DrawerLayout,
  DrawerSurface
};
pub use keys::{
  KeyChord,
  KeyPress,
  Modifier
};
pub use nav::{
  CurrentLocation,
  NavLink,
  NavMatcher,
  highlight,
  link_matches
};
pub use schedule::{
  Scheduler,
  VirtualClock
};
