//! Error types for hub proxies.
//!
//! - [`DeliveryError`] - Faults raised while delivering one event occurrence
//! - [`BoxError`] - Boxed dynamic error, used where hub types are erased
//!
//! Remote call faults are not wrapped here: a [`Hub`](crate::Hub) reports them
//! through its own associated `Error` type and the proxy returns them unchanged.

use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while delivering an event to a subscribed callback.
///
/// A delivery error aborts only the occurrence it was raised for; the
/// subscription stays attached.
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// The event carried fewer tokens than the callback declares parameters.
    #[error("callback expects {expected} arguments but the event carried {received}")]
    Arity {
        /// Number of parameters the callback declares.
        expected: usize,
        /// Number of tokens the event carried.
        received: usize,
    },

    /// A token could not be converted to the declared parameter type.
    #[error("argument {index} cannot be converted to `{expected}`")]
    Conversion {
        /// Zero-based position of the offending token.
        index: usize,
        /// Name of the declared parameter type.
        expected: &'static str,
        /// The underlying deserialization failure.
        #[source]
        source: serde_json::Error,
    },

    /// The dispatcher the proxy was bound to has been dropped by its owner.
    #[error("dispatcher has been dropped")]
    DispatcherGone,
}
