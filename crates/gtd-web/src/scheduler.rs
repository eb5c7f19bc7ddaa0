use gloo::timers::callback::Timeout;
use gtd_core::Scheduler;

/// Browser timers via `setTimeout`. Timers
/// are forgotten so they outlive the call.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
  fn schedule(
    &self,
    delay_ms: u32,
    task: Box<dyn FnOnce()>
  ) {
    Timeout::new(delay_ms, task).forget();
  }
}
