//! Manually pumped FIFO dispatcher.

use hubproxy_core::{Dispatcher, Work, dispatcher};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

/// A dispatcher that queues work until its owner pumps it.
///
/// This is the shape of a UI message loop: any thread may post, and the
/// owning thread runs the queued work in post order by calling
/// [`run_pending`](Self::run_pending).
#[derive(Default)]
pub struct QueueDispatcher {
    queue: Mutex<VecDeque<Work>>,
}

impl QueueDispatcher {
    /// Create an empty dispatcher.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Number of work items waiting to run.
    pub fn pending(&self) -> usize {
        self.lock().len()
    }

    /// Run one queued work item. Returns `false` if the queue was empty.
    pub fn run_one(self: &Arc<Self>) -> bool {
        let _current = dispatcher::enter(self.clone());
        self.run_next()
    }

    /// Run queued work until the queue is empty, returning how many items ran.
    ///
    /// Work posted while pumping runs in the same call. The dispatcher is the
    /// thread's current dispatcher for the duration.
    pub fn run_pending(self: &Arc<Self>) -> usize {
        let _current = dispatcher::enter(self.clone());
        let mut ran = 0;
        while self.run_next() {
            ran += 1;
        }
        ran
    }

    fn run_next(&self) -> bool {
        // The lock must be released before the work runs; work may post again.
        let next = self.lock().pop_front();
        match next {
            Some(work) => {
                work();
                true
            }
            None => false,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Work>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Dispatcher for QueueDispatcher {
    fn post(&self, work: Work) {
        self.lock().push_back(work);
    }
}
