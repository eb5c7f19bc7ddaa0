use std::rc::Rc;

use gloo::events::{
  EventListener,
  EventListenerOptions
};
use gtd_core::capture::{
  self as core_capture,
  CaptureController,
  CapturePage,
  SwapDetail
};
use gtd_core::{
  BehaviorConfig,
  CaptureSurface,
  KeyPress,
  ModalEvent
};
use js_sys::Reflect;
use wasm_bindgen::prelude::Closure;
use wasm_bindgen::{
  JsCast,
  JsValue
};
use web_sys::{
  CustomEvent,
  Document,
  Element,
  Event,
  HtmlDialogElement,
  HtmlElement,
  HtmlFormElement,
  KeyboardEvent,
  MutationObserver,
  MutationObserverInit
};

use crate::dom;
use crate::scheduler::BrowserScheduler;

pub type Controller = CaptureController<
  DomCapture,
  BrowserScheduler
>;

/// The capture dialog as found in the page.
/// Form, title and result are looked up on
/// every use since swaps may replace them.
pub struct DomCapture {
  document:       Document,
  dialog:         HtmlDialogElement,
  form_id:        String,
  result_id:      String,
  submit_id:      String,
  title_selector: String
}

impl DomCapture {
  fn form(&self) -> Option<HtmlFormElement> {
    dom::by_id(&self.document, &self.form_id)
  }
}

impl CaptureSurface for DomCapture {
  fn show_modal(&self) {
    if let Err(err) = self.dialog.show_modal()
    {
      tracing::debug!(
        error = ?err,
        "showModal rejected"
      );
    }
  }

  fn close_modal(&self) {
    self.dialog.close();
  }

  fn is_open(&self) -> bool {
    self.dialog.open()
  }

  fn focus_title(&self) {
    if let Some(title) =
      dom::query::<HtmlElement>(
        &self.document,
        &self.title_selector
      )
    {
      let _ = title.focus();
    }
  }

  fn clear_result(&self) {
    if let Some(result) =
      dom::by_id::<Element>(
        &self.document,
        &self.result_id
      )
    {
      result.set_inner_html("");
    }
  }

  fn reset_form(&self) {
    if let Some(form) = self.form() {
      form.reset();
    }
  }

  fn submit_form(&self) {
    match dom::by_id::<HtmlElement>(
      &self.document,
      &self.submit_id
    ) {
      | Some(button) => button.click(),
      | None => {
        tracing::trace!(
          submit_id = %self.submit_id,
          "no submit button"
        )
      }
    }
  }
}

fn key_press(
  event: &KeyboardEvent
) -> KeyPress {
  KeyPress {
    key:   event.key(),
    code:  event.code(),
    alt:   event.alt_key(),
    ctrl:  event.ctrl_key(),
    meta:  event.meta_key(),
    shift: event.shift_key()
  }
}

/// `event.detail` of a transport completion
/// event.
struct JsDetail(JsValue);

impl JsDetail {
  fn field(&self, name: &str) -> Option<JsValue> {
    Reflect::get(&self.0, &name.into()).ok()
  }
}

impl SwapDetail for JsDetail {
  fn element_id(
    &self,
    field: &str
  ) -> Option<String> {
    self
      .field(field)?
      .dyn_into::<Element>()
      .ok()
      .map(|target| target.id())
  }

  fn flag(&self, field: &str) -> Option<bool> {
    self.field(field)?.as_bool()
  }
}

fn swap_event(event: &Event) -> ModalEvent {
  let detail = event
    .dyn_ref::<CustomEvent>()
    .map(|event| JsDetail(event.detail()));
  ModalEvent::from_swap(detail.as_ref())
}

/// The document the overlay lives in.
struct DomCapturePage<'a> {
  document: &'a Document,
  cfg:      &'a BehaviorConfig
}

impl DomCapturePage<'_> {
  fn dialog(&self) -> Option<HtmlDialogElement> {
    dom::by_id(self.document, &self.cfg.modal_id)
  }
}

impl CapturePage for DomCapturePage<'_> {
  type Surface = DomCapture;

  fn find_surface(&self) -> Option<DomCapture> {
    let dialog = self.dialog()?;
    Some(DomCapture {
      document: self.document.clone(),
      dialog,
      form_id: self.cfg.form_id.clone(),
      result_id: self.cfg.result_id.clone(),
      submit_id: self.cfg.submit_id.clone(),
      title_selector: self.cfg.title_selector()
    })
  }

  fn on_key(
    &self,
    handler: Box<dyn Fn(&KeyPress) -> bool>
  ) {
    EventListener::new_with_options(
      self.document,
      "keydown",
      EventListenerOptions::enable_prevent_default(),
      move |event| {
        let Some(event) =
          event.dyn_ref::<KeyboardEvent>()
        else {
          return;
        };
        if handler(&key_press(event)) {
          event.prevent_default();
        }
      }
    )
    .forget();
  }

  /// Fires whenever the dialog gains its
  /// `open` attribute, including opens from
  /// inline `showModal()` calls.
  fn on_shown(&self, handler: Box<dyn Fn()>) {
    let Some(dialog) = self.dialog() else {
      return;
    };
    let watched = dialog.clone();
    let callback = Closure::<
      dyn FnMut(js_sys::Array, MutationObserver)
    >::new(
      move |_records: js_sys::Array,
            _observer: MutationObserver| {
        if watched.open() {
          handler();
        }
      }
    );

    let Ok(observer) = MutationObserver::new(
      callback.as_ref().unchecked_ref()
    ) else {
      tracing::warn!(
        "MutationObserver unavailable; \
         external opens will not focus"
      );
      return;
    };

    let init = MutationObserverInit::new();
    init.set_attributes(true);
    init.set_attribute_filter(
      &js_sys::Array::of1(&"open".into())
    );
    if observer
      .observe_with_options(&dialog, &init)
      .is_ok()
    {
      callback.forget();
    }
  }

  fn on_closed(&self, handler: Box<dyn Fn()>) {
    let Some(dialog) = self.dialog() else {
      return;
    };
    EventListener::new(&dialog, "close", move |_| {
      handler()
    })
    .forget();
  }

  fn on_swap(
    &self,
    handler: Box<dyn Fn(ModalEvent)>
  ) {
    let Some(body) = self.document.body() else {
      tracing::debug!(
        "no body; post-submit reset disabled"
      );
      return;
    };
    EventListener::new(
      &body,
      self.cfg.swap_event.clone(),
      move |event| handler(swap_event(event))
    )
    .forget();
  }
}

/// Wires the capture overlay. Returns `None`
/// and registers nothing when the dialog is
/// missing.
#[tracing::instrument(skip_all)]
pub fn install(
  document: &Document,
  cfg: &BehaviorConfig
) -> Option<Rc<Controller>> {
  let settings = match cfg.capture_settings()
  {
    | Ok(settings) => settings,
    | Err(error) => {
      tracing::warn!(
        error = %format!("{error:#}"),
        "capture settings invalid"
      );
      return None;
    }
  };

  let page = DomCapturePage {
    document,
    cfg
  };
  let controller = core_capture::install(
    &page,
    settings,
    BrowserScheduler
  )?;

  tracing::info!(
    hotkey = %cfg.capture_hotkey,
    "quick capture ready"
  );
  Some(controller)
}
