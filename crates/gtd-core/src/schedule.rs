use std::cell::{
  Cell,
  RefCell
};

/// Runs a task once after a delay. There
/// is no cancellation: once scheduled, the
/// task fires.
pub trait Scheduler {
  fn schedule(
    &self,
    delay_ms: u32,
    task: Box<dyn FnOnce()>
  );
}

struct Queued {
  due_ms: u64,
  seq:    u64,
  task:   Box<dyn FnOnce()>
}

/// Deterministic scheduler driven by
/// explicit calls to [`VirtualClock::advance`].
#[derive(Default)]
pub struct VirtualClock {
  now_ms: Cell<u64>,
  seq:    Cell<u64>,
  queue:  RefCell<Vec<Queued>>
}

impl VirtualClock {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn now(&self) -> u64 {
    self.now_ms.get()
  }

  pub fn pending(&self) -> usize {
    self.queue.borrow().len()
  }

  /// Moves time forward by `ms`, running
  /// every task that falls due, including
  /// ones queued by tasks run here.
  pub fn advance(&self, ms: u64) {
    let target =
      self.now_ms.get().saturating_add(ms);

    while let Some(next) =
      self.take_next_due(target)
    {
      self.now_ms.set(next.due_ms);
      tracing::trace!(
        at_ms = next.due_ms,
        "running virtual timer"
      );
      (next.task)();
    }

    self.now_ms.set(target);
  }

  fn take_next_due(
    &self,
    target: u64
  ) -> Option<Queued> {
    let mut queue = self.queue.borrow_mut();
    let index = queue
      .iter()
      .enumerate()
      .filter(|(_, q)| q.due_ms <= target)
      .min_by_key(|(_, q)| {
        (q.due_ms, q.seq)
      })
      .map(|(index, _)| index)?;
    Some(queue.remove(index))
  }
}

impl Scheduler for VirtualClock {
  fn schedule(
    &self,
    delay_ms: u32,
    task: Box<dyn FnOnce()>
  ) {
    let seq = self.seq.get();
    self.seq.set(seq + 1);
    self.queue.borrow_mut().push(Queued {
      due_ms: self.now_ms.get()
        + u64::from(delay_ms),
      seq,
      task
    });
  }
}

impl<T: Scheduler + ?Sized> Scheduler
  for std::rc::Rc<T>
{
  fn schedule(
    &self,
    delay_ms: u32,
    task: Box<dyn FnOnce()>
  ) {
    (**self).schedule(delay_ms, task);
  }
}

#[cfg(test)]
mod tests {
  use std::rc::Rc;

  use super::*;

  #[test]
  fn runs_due_tasks_in_order() {
    let clock = Rc::new(VirtualClock::new());
    let log =
      Rc::new(RefCell::new(Vec::new()));

    for (delay, label) in
      [(100, "b"), (50, "a"), (100, "c")]
    {
      let log = log.clone();
      clock.schedule(
        delay,
        Box::new(move || {
          log.borrow_mut().push(label)
        })
      );
    }

    clock.advance(99);
    assert_eq!(*log.borrow(), vec!["a"]);
    assert_eq!(clock.pending(), 2);

    clock.advance(1);
    assert_eq!(
      *log.borrow(),
      vec!["a", "b", "c"]
    );
    assert_eq!(clock.now(), 100);
    assert_eq!(clock.pending(), 0);
  }

  #[test]
  fn tasks_scheduled_while_advancing_can_fire()
   {
    let clock = Rc::new(VirtualClock::new());
    let fired = Rc::new(Cell::new(false));

    let inner_clock = clock.clone();
    let inner_fired = fired.clone();
    clock.schedule(
      10,
      Box::new(move || {
        inner_clock.schedule(
          10,
          Box::new(move || {
            inner_fired.set(true)
          })
        );
      })
    );

    clock.advance(15);
    assert!(!fired.get());
    clock.advance(5);
    assert!(fired.get());
  }
}
