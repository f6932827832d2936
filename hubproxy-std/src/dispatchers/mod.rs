//! Standard dispatcher implementations.
//!
//! - [`QueueDispatcher`] - FIFO queue pumped by its owner
//! - [`TokioDispatcher`] - FIFO queue drained by a tokio task (`tokio` feature)
//! - [`TracingDispatcher`] - span instrumentation around any dispatcher

pub mod queue;
#[cfg(feature = "tokio")]
pub mod tokio;
pub mod tracing;

pub use queue::QueueDispatcher;
#[cfg(feature = "tokio")]
pub use self::tokio::TokioDispatcher;
pub use self::tracing::TracingDispatcher;
