//! Quick-capture overlay lifecycle.
//!
//! [`CaptureModal`] is the pure transition
//! function. [`CaptureController`] binds it
//! to a [`CaptureSurface`] and a
//! [`Scheduler`] for the delayed focus calls.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{
  debug,
  trace
};

use crate::keys::{
  KeyChord,
  KeyPress
};
use crate::schedule::Scheduler;

pub const DEFAULT_FOCUS_DELAY_MS: u32 =
  100;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum ModalState {
  Closed,
  Opening,
  Open,
  Closing
}

#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub enum ModalEvent {
  Hotkey,
  Escape,
  SubmitHotkey,
  Shown,
  Closed,
  FragmentSwapped {
    target_id:  Option<String>,
    successful: Option<bool>
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum Command {
  ShowModal,
  CloseModal,
  FocusTitle,
  ClearResult,
  ResetForm,
  SubmitForm
}

#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub enum Effect {
  Now(Command),
  After {
    delay_ms: u32,
    commands: Vec<Command>
  }
}

#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub struct CaptureSettings {
  pub result_id:             String,
  pub focus_delay_ms:        u32,
  pub reset_only_on_success: bool,
  pub open_chord:            KeyChord,
  pub submit_chord:          KeyChord
}

#[derive(Debug, Clone)]
pub struct CaptureModal {
  state:    ModalState,
  settings: CaptureSettings
}

impl CaptureModal {
  pub fn new(
    settings: CaptureSettings
  ) -> Self {
    Self {
      state: ModalState::Closed,
      settings
    }
  }

  pub fn state(&self) -> ModalState {
    self.state
  }

  /// Maps a key press onto a modal event.
  pub fn classify_key(
    &self,
    press: &KeyPress
  ) -> Option<ModalEvent> {
    if self
      .settings
      .open_chord
      .matches(press)
    {
      Some(ModalEvent::Hotkey)
    } else if self
      .settings
      .submit_chord
      .matches(press)
    {
      Some(ModalEvent::SubmitHotkey)
    } else if press.is_escape() {
      Some(ModalEvent::Escape)
    } else {
      None
    }
  }

  /// Reconciles with the element's native
  /// open flag, which may change without
  /// any event reaching this machine.
  /// `showModal` is synchronous, so a closed
  /// flag while opening means it failed.
  pub fn sync(&mut self, native_open: bool) {
    let next = match (self.state, native_open)
    {
      | (ModalState::Closed, true) => {
        ModalState::Open
      }
      | (
        ModalState::Opening
        | ModalState::Open
        | ModalState::Closing,
        false
      ) => ModalState::Closed,
      | (state, _) => state
    };
    if next != self.state {
      trace!(
        from = ?self.state,
        to = ?next,
        "modal state synced"
      );
      self.state = next;
    }
  }

  pub fn handle(
    &mut self,
    event: &ModalEvent
  ) -> Vec<Effect> {
    let from = self.state;
    let delay = self.settings.focus_delay_ms;

    let effects = match (from, event) {
      | (
        ModalState::Closed
        | ModalState::Closing,
        ModalEvent::Hotkey
      ) => {
        self.state = ModalState::Opening;
        vec![
          Effect::Now(Command::ShowModal),
          Effect::After {
            delay_ms: delay,
            commands: vec![
              Command::FocusTitle,
            ]
          },
        ]
      }
      | (
        ModalState::Opening | ModalState::Open,
        ModalEvent::Hotkey
      ) => vec![Effect::After {
        delay_ms: delay,
        commands: vec![Command::FocusTitle]
      }],
      | (
        ModalState::Opening | ModalState::Open,
        ModalEvent::Escape
      ) => {
        self.state = ModalState::Closing;
        vec![Effect::Now(Command::CloseModal)]
      }
      | (_, ModalEvent::Escape) => vec![],
      | (ModalState::Open, ModalEvent::SubmitHotkey) => {
        vec![Effect::Now(Command::SubmitForm)]
      }
      | (_, ModalEvent::SubmitHotkey) => {
        vec![]
      }
      | (_, ModalEvent::Shown) => {
        self.state = ModalState::Open;
        vec![Effect::Now(Command::FocusTitle)]
      }
      | (_, ModalEvent::Closed) => {
        self.state = ModalState::Closed;
        vec![Effect::Now(
          Command::ClearResult
        )]
      }
      | (
        _,
        ModalEvent::FragmentSwapped {
          target_id,
          successful
        }
      ) => {
        if self.is_result_swap(
          target_id.as_deref(),
          *successful
        ) {
          vec![Effect::After {
            delay_ms: delay,
            commands: vec![
              Command::ResetForm,
              Command::FocusTitle,
            ]
          }]
        } else {
          vec![]
        }
      }
    };

    debug!(
      ?event,
      ?from,
      to = ?self.state,
      effects = effects.len(),
      "capture modal event"
    );
    effects
  }

  fn is_result_swap(
    &self,
    target_id: Option<&str>,
    successful: Option<bool>
  ) -> bool {
    if target_id
      != Some(self.settings.result_id.as_str())
    {
      return false;
    }
    !(self.settings.reset_only_on_success
      && successful == Some(false))
  }
}

/// Field of the completion payload holding
/// the swapped element.
pub const SWAP_TARGET_FIELD: &str = "target";
/// Field of the completion payload holding
/// the request outcome.
pub const SWAP_SUCCESS_FIELD: &str =
  "successful";

/// The payload a transport completion event
/// carries.
pub trait SwapDetail {
  /// The `id` of the element stored under
  /// `field`, if that field is an element.
  fn element_id(
    &self,
    field: &str
  ) -> Option<String>;
  fn flag(&self, field: &str) -> Option<bool>;
}

impl ModalEvent {
  /// Reads the swap target and outcome. An
  /// element without an id counts as no
  /// target.
  pub fn from_swap<D>(
    detail: Option<&D>
  ) -> Self
  where
    D: SwapDetail + ?Sized
  {
    let target_id = detail
      .and_then(|detail| {
        detail.element_id(SWAP_TARGET_FIELD)
      })
      .filter(|id| !id.is_empty());
    let successful = detail.and_then(|detail| {
      detail.flag(SWAP_SUCCESS_FIELD)
    });

    Self::FragmentSwapped {
      target_id,
      successful
    }
  }
}

/// The overlay, its form and its result
/// region as rendered in the page.
pub trait CaptureSurface {
  fn show_modal(&self);
  fn close_modal(&self);
  fn is_open(&self) -> bool;
  fn focus_title(&self);
  fn clear_result(&self);
  fn reset_form(&self);
  fn submit_form(&self);
}

fn run_command<S>(
  surface: &S,
  command: Command
) where
  S: CaptureSurface + ?Sized
{
  trace!(?command, "running capture command");
  match command {
    | Command::ShowModal => {
      surface.show_modal()
    }
    | Command::CloseModal => {
      surface.close_modal()
    }
    | Command::FocusTitle => {
      surface.focus_title()
    }
    | Command::ClearResult => {
      surface.clear_result()
    }
    | Command::ResetForm => {
      surface.reset_form()
    }
    | Command::SubmitForm => {
      surface.submit_form()
    }
  }
}

pub struct CaptureController<S, T> {
  modal:     RefCell<CaptureModal>,
  surface:   Rc<S>,
  scheduler: T
}

impl<S, T> CaptureController<S, T>
where
  S: CaptureSurface + 'static,
  T: Scheduler
{
  pub fn new(
    settings: CaptureSettings,
    surface: Rc<S>,
    scheduler: T
  ) -> Self {
    Self {
      modal: RefCell::new(CaptureModal::new(
        settings
      )),
      surface,
      scheduler
    }
  }

  pub fn state(&self) -> ModalState {
    self.modal.borrow().state()
  }

  /// Handles a key press. Returns whether
  /// the press was consumed, in which case
  /// the browser default should be
  /// suppressed.
  pub fn on_key(
    &self,
    press: &KeyPress
  ) -> bool {
    let event =
      self.modal.borrow().classify_key(press);
    match event {
      | Some(ModalEvent::Escape) => {
        self.dispatch(&ModalEvent::Escape);
        false
      }
      | Some(ModalEvent::SubmitHotkey) => {
        !self
          .dispatch(&ModalEvent::SubmitHotkey)
          .is_empty()
      }
      | Some(event) => {
        self.dispatch(&event);
        true
      }
      | None => false
    }
  }

  pub fn dispatch(
    &self,
    event: &ModalEvent
  ) -> Vec<Effect> {
    let effects = {
      let mut modal = self.modal.borrow_mut();
      modal.sync(self.surface.is_open());
      modal.handle(event)
    };

    for effect in &effects {
      match effect {
        | Effect::Now(command) => {
          run_command(
            self.surface.as_ref(),
            *command
          );
        }
        | Effect::After {
          delay_ms,
          commands
        } => {
          let surface = self.surface.clone();
          let commands = commands.clone();
          self.scheduler.schedule(
            *delay_ms,
            Box::new(move || {
              for command in commands {
                run_command(
                  surface.as_ref(),
                  command
                );
              }
            })
          );
        }
      }
    }

    effects
  }
}

/// Page wiring for the capture overlay.
/// Handlers live for the rest of the page.
pub trait CapturePage {
  type Surface: CaptureSurface + 'static;

  /// `None` when the dialog is missing.
  fn find_surface(&self) -> Option<Self::Surface>;
  /// The handler returns whether to suppress
  /// the browser default.
  fn on_key(
    &self,
    handler: Box<dyn Fn(&KeyPress) -> bool>
  );
  fn on_shown(&self, handler: Box<dyn Fn()>);
  fn on_closed(&self, handler: Box<dyn Fn()>);
  fn on_swap(
    &self,
    handler: Box<dyn Fn(ModalEvent)>
  );
}

/// Wires the overlay into `page`. Returns
/// `None` and registers nothing when the
/// dialog is missing.
pub fn install<P, T>(
  page: &P,
  settings: CaptureSettings,
  scheduler: T
) -> Option<Rc<CaptureController<P::Surface, T>>>
where
  P: CapturePage,
  T: Scheduler + 'static
{
  let Some(surface) = page.find_surface()
  else {
    debug!("capture dialog missing; capture inert");
    return None;
  };

  let controller = Rc::new(
    CaptureController::new(
      settings,
      Rc::new(surface),
      scheduler
    )
  );

  let ctl = controller.clone();
  page.on_key(Box::new(move |press: &KeyPress| {
    ctl.on_key(press)
  }));
  let ctl = controller.clone();
  page.on_shown(Box::new(move || {
    ctl.dispatch(&ModalEvent::Shown);
  }));
  let ctl = controller.clone();
  page.on_closed(Box::new(move || {
    ctl.dispatch(&ModalEvent::Closed);
  }));
  let ctl = controller.clone();
  page.on_swap(Box::new(move |event: ModalEvent| {
    ctl.dispatch(&event);
  }));

  Some(controller)
}
