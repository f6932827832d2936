//! Tokio-backed FIFO dispatcher.

use hubproxy_core::{Dispatcher, Work};
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;

/// A dispatcher whose work runs on a single tokio task.
///
/// Work is forwarded through an unbounded channel, so posting never blocks
/// and items run in post order. A panicking item ends only that item; the
/// worker moves on to the next one. The worker task ends once every handle
/// to the dispatcher has been dropped and the queue has drained.
pub struct TokioDispatcher {
    tx: UnboundedSender<Work>,
}

impl TokioDispatcher {
    /// Spawn the worker task on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime.
    pub fn spawn() -> (Arc<Self>, JoinHandle<()>) {
        Self::spawn_on(&tokio::runtime::Handle::current())
    }

    /// Spawn the worker task on `handle`.
    pub fn spawn_on(handle: &tokio::runtime::Handle) -> (Arc<Self>, JoinHandle<()>) {
        let (tx, mut rx) = unbounded_channel::<Work>();
        let worker = handle.spawn(async move {
            while let Some(work) = rx.recv().await {
                if let Err(payload) = catch_unwind(AssertUnwindSafe(work)) {
                    report_panic(payload.as_ref());
                }
            }
        });
        (Arc::new(Self { tx }), worker)
    }

    /// Queue `work`, handing it back if the worker task is no longer running.
    ///
    /// The worker stops early only when it was aborted or its runtime shut
    /// down.
    pub fn try_post(&self, work: Work) -> Result<(), Work> {
        self.tx.send(work).map_err(|rejected| rejected.0)
    }

    /// Returns `true` once the worker task has stopped receiving work.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl Dispatcher for TokioDispatcher {
    fn post(&self, work: Work) {
        if self.try_post(work).is_err() {
            #[cfg(feature = "tracing")]
            tracing::error!("tokio dispatcher worker has stopped, posted work dropped");
        }
    }
}

#[cfg_attr(not(any(feature = "tracing", test)), allow(dead_code))]
fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}

#[cfg(feature = "tracing")]
fn report_panic(payload: &(dyn Any + Send)) {
    tracing::error!(panic = panic_message(payload), "posted work panicked");
}

#[cfg(not(feature = "tracing"))]
fn report_panic(_payload: &(dyn Any + Send)) {}
