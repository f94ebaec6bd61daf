//! The rendering flush boundary, modeled as an explicit FIFO task queue.
//!
//! Deferred work (`update_config` patches, teardown) is scheduled with
//! [`schedule`] and applied when the host runner calls [`flush`] — the
//! checkpoint after which queued reactive mutations are visible. Tasks run
//! strictly in schedule order; a task scheduled while a flush is draining
//! runs within the same flush, after everything queued before it.

use std::cell::RefCell;
use std::collections::VecDeque;

thread_local! {
    static QUEUE: RefCell<VecDeque<Box<dyn FnOnce()>>> = const { RefCell::new(VecDeque::new()) };
}

/// Enqueues `task` for the next flush boundary.
pub fn schedule(task: impl FnOnce() + 'static) {
    QUEUE.with(|q| q.borrow_mut().push_back(Box::new(task)));
}

/// Drains the queue to empty, FIFO. Returns the number of tasks run.
pub fn flush() -> usize {
    let mut ran = 0;
    loop {
        let task = QUEUE.with(|q| q.borrow_mut().pop_front());
        match task {
            Some(task) => {
                task();
                ran += 1;
            }
            None => break,
        }
    }
    ran
}

/// Number of tasks currently waiting for the next flush.
pub fn pending() -> usize {
    QUEUE.with(|q| q.borrow().len())
}
