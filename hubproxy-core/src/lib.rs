//! # hubproxy-core
//!
//! Core contracts for dynamic hub proxies.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! transports that want to plug into `hubproxy` without pulling in the
//! standard dispatchers.
//!
//! # Contracts
//!
//! - [`Hub`] / [`Subscription`] / [`HubConnection`] - the remote endpoint,
//!   provided by a transport
//! - [`Dispatcher`] - an execution context callbacks can be posted to
//! - [`Callback`] / [`Handler`] - typed event callbacks and their erased form
//! - [`ScopedDisposer`] - a run-at-most-once cleanup action
//!
//! # Error Types
//!
//! - [`BoxError`] - Boxed dynamic error
//! - [`DeliveryError`] - Faults raised while delivering an event

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod callback;
pub mod dispatcher;
mod disposer;
mod error;
mod hub;
mod token;

// Re-exports
pub use callback::{Callback, Handler, Signature};
pub use dispatcher::{CurrentGuard, Dispatcher, Work};
pub use disposer::ScopedDisposer;
pub use error::{BoxError, DeliveryError};
pub use hub::{
    DynHub, DynHubError, HandlerId, Hub, HubConnection, ReceivedHandler, Subscription,
};
pub use token::{Token, convert_token};
