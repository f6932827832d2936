//! # hubproxy-std
//!
//! Standard implementations for dynamic hub proxies.
//!
//! This crate provides:
//! - **Dispatchers**: [`QueueDispatcher`], [`TracingDispatcher`] and, with the
//!   `tokio` feature, [`TokioDispatcher`]
//! - **Testing**: in-memory hubs, connections and dispatchers in [`testing`]
//!
//! [`QueueDispatcher`]: dispatchers::QueueDispatcher
//! [`TracingDispatcher`]: dispatchers::TracingDispatcher
//! [`TokioDispatcher`]: dispatchers::TokioDispatcher

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core contracts
pub use hubproxy_core;

// Modules
pub mod dispatchers;
pub mod testing;
