//! # Hub Contracts
//!
//! The remote side of a proxy is a [`Hub`]: an endpoint exposing named
//! procedures and named events. Hubs are provided by a transport and are
//! treated as black boxes; this module only fixes the shape of the calls.
//!
//! - [`Hub::invoke`] runs a remote procedure and yields its result.
//! - [`Hub::subscribe`] returns the [`Subscription`] for an event name. Each
//!   occurrence of the event is delivered to every attached
//!   [`ReceivedHandler`] as an ordered list of tokens.
//! - [`HubConnection::create_hub`] opens a hub by name on an existing connection.
//!
//! # Static vs Dynamic Dispatch
//!
//! [`Hub`] uses native `async fn` for zero-cost static dispatch. When a hub
//! must be stored behind a trait object, use [`DynHub`]; `Box<dyn DynHub<..>>`
//! implements [`Hub`] again.

use crate::error::{BoxError, DeliveryError};
use crate::token::Token;
use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;

/// Identifies one handler attached to a [`Subscription`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(pub u64);

/// A handler receiving the tokens of one event occurrence.
///
/// The returned result belongs to the delivering side: a failed delivery
/// aborts only that occurrence.
pub type ReceivedHandler = Arc<dyn Fn(&[Token]) -> Result<(), DeliveryError> + Send + Sync>;

/// The live subscription to one remote event.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid Subscription",
    label = "missing `Subscription` implementation",
    note = "Subscriptions must implement `attach` and `detach`."
)]
pub trait Subscription: Send + Sync + 'static {
    /// Attach a handler to the "received" notification.
    fn attach(&self, handler: ReceivedHandler) -> HandlerId;

    /// Detach a previously attached handler.
    ///
    /// Returns `false` if `id` was not attached.
    fn detach(&self, id: HandlerId) -> bool;
}

/// A remote endpoint exposing named procedures and named events.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid Hub",
    label = "missing `Hub` implementation",
    note = "Hubs must implement `invoke` and `subscribe`."
)]
pub trait Hub: Send + Sync + 'static {
    /// The fault raised by a failed remote call.
    type Error: std::error::Error + Send + Sync + 'static;

    /// The subscription handle returned by [`subscribe`](Self::subscribe).
    type Subscription: Subscription;

    /// Invoke the remote procedure `method` with `args`.
    fn invoke(
        &self,
        method: &str,
        args: Vec<Token>,
    ) -> impl Future<Output = Result<Token, Self::Error>> + Send;

    /// Subscribe to the remote event `event`.
    fn subscribe(&self, event: &str) -> Self::Subscription;
}

/// A connection that can open hubs by name.
pub trait HubConnection {
    /// The hub type this connection produces.
    type Hub: Hub;

    /// Open the hub called `name`.
    fn create_hub(&self, name: &str) -> Self::Hub;
}

/// Dynamic object-safe version of [`Hub`].
pub trait DynHub: Send + Sync + 'static {
    /// Invoke the remote procedure `method` with `args` (dynamic dispatch version).
    fn invoke_dyn<'a>(
        &'a self,
        method: &'a str,
        args: Vec<Token>,
    ) -> BoxFuture<'a, Result<Token, BoxError>>;

    /// Subscribe to the remote event `event` (dynamic dispatch version).
    fn subscribe_dyn(&self, event: &str) -> Box<dyn Subscription>;
}

// Blanket implementation: Any type implementing Hub implements DynHub automatically.
impl<T: Hub> DynHub for T {
    fn invoke_dyn<'a>(
        &'a self,
        method: &'a str,
        args: Vec<Token>,
    ) -> BoxFuture<'a, Result<Token, BoxError>> {
        Box::pin(async move {
            self.invoke(method, args)
                .await
                .map_err(|e| Box::new(e) as BoxError)
        })
    }

    fn subscribe_dyn(&self, event: &str) -> Box<dyn Subscription> {
        Box::new(self.subscribe(event))
    }
}

impl<S: Subscription + ?Sized> Subscription for Box<S> {
    fn attach(&self, handler: ReceivedHandler) -> HandlerId {
        (**self).attach(handler)
    }

    fn detach(&self, id: HandlerId) -> bool {
        (**self).detach(id)
    }
}

impl<S: Subscription + ?Sized> Subscription for Arc<S> {
    fn attach(&self, handler: ReceivedHandler) -> HandlerId {
        (**self).attach(handler)
    }

    fn detach(&self, id: HandlerId) -> bool {
        (**self).detach(id)
    }
}

/// Error carried by `Box<dyn DynHub>` when used as a [`Hub`].
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct DynHubError(#[from] pub BoxError);

// Allow Box<dyn DynHub> to be used where Hub is expected.
impl Hub for Box<dyn DynHub> {
    type Error = DynHubError;
    type Subscription = Box<dyn Subscription>;

    async fn invoke(&self, method: &str, args: Vec<Token>) -> Result<Token, Self::Error> {
        (**self).invoke_dyn(method, args).await.map_err(DynHubError)
    }

    fn subscribe(&self, event: &str) -> Self::Subscription {
        (**self).subscribe_dyn(event)
    }
}
