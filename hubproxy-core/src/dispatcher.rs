//! # Execution Contexts (Dispatcher)
//!
//! A [`Dispatcher`] is a place where callback invocations can be queued to run
//! later, typically on one specific thread. Proxies created without a
//! dispatcher invoke callbacks on whatever thread delivers the event.
//!
//! A thread can advertise a dispatcher as its *current* one with [`enter`].
//! Factories that offer to "capture the current context" read it back with
//! [`current`].

use std::cell::{Cell, RefCell};
use std::sync::Arc;

/// A unit of work posted to a dispatcher.
pub type Work = Box<dyn FnOnce() + Send + 'static>;

/// An execution context that runs posted work.
///
/// Implementations must run work items in the order they were posted and
/// must not block the posting thread until the work completes.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid Dispatcher",
    label = "missing `Dispatcher` implementation",
    note = "Dispatchers must implement `post` and be `Send + Sync`."
)]
pub trait Dispatcher: Send + Sync + 'static {
    /// Queue `work` to run on this context. Fire-and-forget.
    fn post(&self, work: Work);
}

impl<D: Dispatcher + ?Sized> Dispatcher for Arc<D> {
    fn post(&self, work: Work) {
        (**self).post(work)
    }
}

impl<D: Dispatcher + ?Sized> Dispatcher for Box<D> {
    fn post(&self, work: Work) {
        (**self).post(work)
    }
}

thread_local! {
    static CURRENT: RefCell<Vec<(u64, Arc<dyn Dispatcher>)>> = const { RefCell::new(Vec::new()) };
    static NEXT_ENTRY: Cell<u64> = const { Cell::new(0) };
}

/// Returns the dispatcher most recently entered on this thread, if any.
pub fn current() -> Option<Arc<dyn Dispatcher>> {
    CURRENT.with(|stack| stack.borrow().last().map(|(_, d)| d.clone()))
}

/// Make `dispatcher` the current one for this thread until the guard drops.
///
/// Guards nest: dropping the innermost guard restores the previous dispatcher.
/// A guard dropped out of order removes only its own entry, so the most
/// recently entered live dispatcher stays current.
pub fn enter(dispatcher: Arc<dyn Dispatcher>) -> CurrentGuard {
    let entry = NEXT_ENTRY.with(|next| {
        let entry = next.get();
        next.set(entry.wrapping_add(1));
        entry
    });
    CURRENT.with(|stack| stack.borrow_mut().push((entry, dispatcher)));
    CurrentGuard {
        entry,
        _not_send: std::marker::PhantomData,
    }
}

/// Restores the previous current dispatcher when dropped.
#[must_use = "the dispatcher is only current while the guard is alive"]
pub struct CurrentGuard {
    entry: u64,
    _not_send: std::marker::PhantomData<*const ()>,
}

impl Drop for CurrentGuard {
    fn drop(&mut self) {
        CURRENT.with(|stack| {
            let mut stack = stack.borrow_mut();
            if let Some(pos) = stack.iter().rposition(|(entry, _)| *entry == self.entry) {
                stack.remove(pos);
            }
        });
    }
}
