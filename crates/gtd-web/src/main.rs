mod capture;
mod config;
mod dom;
mod drawer;
mod nav;
mod scheduler;

use gloo::events::EventListener;

fn boot() {
  let (Some(window), Some(document)) =
    (dom::window(), dom::document())
  else {
    tracing::warn!(
      "no window/document; page behaviors \
       disabled"
    );
    return;
  };

  let cfg = config::load(&document);

  let capture =
    capture::install(&document, &cfg);
  let drawer =
    drawer::install(&window, &document, &cfg);
  nav::install(&window, &document, &cfg);

  tracing::info!(
    capture = capture.is_some(),
    drawer = drawer.is_some(),
    "GTD page behaviors initialized"
  );
}

fn main() {
  console_error_panic_hook::set_once();
  wasm_tracing::set_as_global_default();

  let Some(document) = dom::document() else {
    return;
  };

  if document.ready_state() == "loading" {
    EventListener::once(
      &document,
      "DOMContentLoaded",
      |_| boot()
    )
    .forget();
  } else {
    boot();
  }
}
