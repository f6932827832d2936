//! Tracing instrumentation for posted work.

use hubproxy_core::{Dispatcher, Work};

/// A dispatcher wrapper that runs each posted work item inside a span.
///
/// With the `tracing` feature disabled this is a plain pass-through.
pub struct TracingDispatcher<D> {
    inner: D,
    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    name: &'static str,
}

impl<D> TracingDispatcher<D> {
    /// Wrap `inner`, labelling its spans with `name`.
    pub const fn new(inner: D, name: &'static str) -> Self {
        Self { inner, name }
    }

    /// The wrapped dispatcher.
    pub fn inner(&self) -> &D {
        &self.inner
    }
}

impl<D: Dispatcher> Dispatcher for TracingDispatcher<D> {
    #[cfg(feature = "tracing")]
    fn post(&self, work: Work) {
        let span = tracing::trace_span!("posted_work", dispatcher = %self.name);
        tracing::trace!(dispatcher = %self.name, "work posted");
        self.inner.post(Box::new(move || {
            let _entered = span.enter();
            work();
        }));
    }

    #[cfg(not(feature = "tracing"))]
    fn post(&self, work: Work) {
        self.inner.post(work);
    }
}
