//! # Dynamic Hub Proxy
//!
//! [`DynamicHubProxy`] makes a [`Hub`] look like an object whose members are
//! resolved by name at runtime:
//!
//! - **Calling** a member invokes the remote procedure of that name.
//! - **Assigning** a callback to a member subscribes it to the remote event of
//!   that name. Assigning anything else unsubscribes.
//!
//! Each member name has at most one active subscription. Assigning a new
//! callback detaches the previous one before the new one is attached, so an
//! event is never delivered to both.
//!
//! # Delivery
//!
//! Incoming tokens are paired with the callback's parameters by position and
//! converted to the declared types on the delivering thread. Without a
//! dispatcher the callback then runs right there; with one, the invocation is
//! posted to it and the delivering thread moves on. Conversion and arity
//! faults abort only the occurrence they were raised for and are returned to
//! whoever delivered it.
//!
//! # Example
//!
//! ```rust
//! use hubproxy::DynamicHubProxy;
//! use hubproxy::testing::MockHub;
//! use serde_json::json;
//!
//! let hub = MockHub::new();
//! let mut proxy = DynamicHubProxy::new(hub.clone());
//!
//! proxy.on("messageReceived", |user: String, text: String| {
//!     println!("{user}: {text}");
//! });
//! hub.emit("messageReceived", &[json!("alice"), json!("hello")]);
//!
//! proxy.off("messageReceived");
//! ```

use crate::member::{Member, MemberValue};
use hubproxy_core::{
    Callback, DeliveryError, Dispatcher, Handler, Hub, ReceivedHandler, ScopedDisposer,
    Subscription, Token, dispatcher,
};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Weak};

/// A proxy resolving calls and event subscriptions on a [`Hub`] by name.
///
/// Registration (`set`, `on`, `off`, `close`) takes `&mut self`, so it is
/// serialized by the borrow checker. Dropping the proxy detaches every
/// callback it attached.
pub struct DynamicHubProxy<H: Hub> {
    hub: H,
    dispatcher: Option<Weak<dyn Dispatcher>>,
    subscriptions: HashMap<String, ScopedDisposer>,
}

impl<H: Hub> DynamicHubProxy<H> {
    /// Create a proxy that runs callbacks on the delivering thread.
    pub fn new(hub: H) -> Self {
        Self {
            hub,
            dispatcher: None,
            subscriptions: HashMap::new(),
        }
    }

    /// Create a proxy that posts callbacks to `dispatcher`.
    ///
    /// The proxy only keeps a weak reference; the caller stays the owner.
    pub fn with_dispatcher(hub: H, dispatcher: Arc<dyn Dispatcher>) -> Self {
        Self {
            hub,
            dispatcher: Some(Arc::downgrade(&dispatcher)),
            subscriptions: HashMap::new(),
        }
    }

    /// Start building a proxy.
    pub fn builder(hub: H) -> DynamicHubProxyBuilder<H> {
        DynamicHubProxyBuilder::new(hub)
    }

    /// The hub this proxy delegates to.
    pub fn hub(&self) -> &H {
        &self.hub
    }

    /// Returns `true` if callbacks are posted to a dispatcher.
    pub fn has_dispatcher(&self) -> bool {
        self.dispatcher.is_some()
    }

    /// Access the member called `name`.
    pub fn member<'a>(&'a mut self, name: &'a str) -> Member<'a, H> {
        Member::new(self, name)
    }

    /// Invoke the remote procedure `method` with `args`.
    ///
    /// Arguments are passed through untouched and the hub's result or fault is
    /// returned unchanged. Every call reaches the hub exactly once.
    pub fn call<'a>(
        &'a self,
        method: &'a str,
        args: Vec<Token>,
    ) -> impl Future<Output = Result<Token, H::Error>> + Send + 'a {
        self.hub.invoke(method, args)
    }

    /// Assign `value` to the member `name`.
    ///
    /// Any callback currently assigned to `name` is detached first. If `value`
    /// is a callback it is then subscribed to the event `name`; any other value
    /// leaves the member unsubscribed. Assigning a non-callback to a member
    /// without a subscription does nothing.
    pub fn set(&mut self, name: &str, value: impl Into<MemberValue>) {
        if let Some(mut previous) = self.subscriptions.remove(name) {
            previous.release();
            #[cfg(feature = "tracing")]
            tracing::debug!(event = %name, "detached previous callback");
        }

        let MemberValue::Callback(handler) = value.into() else {
            return;
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(event = %name, signature = %handler.signature(), "subscribing callback");

        let subscription = self.hub.subscribe(name);
        let id = subscription.attach(bridge(handler, self.dispatcher.clone()));
        let disposer = ScopedDisposer::new(move || {
            subscription.detach(id);
        });
        self.subscriptions.insert(name.to_string(), disposer);
    }

    /// Subscribe `callback` to the event `name`, replacing any previous callback.
    pub fn on<F, Args>(&mut self, name: &str, callback: F)
    where
        F: Callback<Args>,
        Args: Send + 'static,
    {
        self.set(name, Handler::new(callback));
    }

    /// Unsubscribe the callback assigned to `name`.
    ///
    /// Returns `false` if there was none.
    pub fn off(&mut self, name: &str) -> bool {
        let subscribed = self.is_subscribed(name);
        self.set(name, MemberValue::Null);
        subscribed
    }

    /// Detach every callback this proxy attached.
    pub fn close(&mut self) {
        #[cfg(feature = "tracing")]
        tracing::debug!(count = self.subscriptions.len(), "closing hub proxy");

        for (_, mut disposer) in self.subscriptions.drain() {
            disposer.release();
        }
    }

    /// Returns `true` if a callback is assigned to `name`.
    pub fn is_subscribed(&self, name: &str) -> bool {
        self.subscriptions.contains_key(name)
    }

    /// Names of every member with an assigned callback, in no particular order.
    pub fn subscriptions(&self) -> impl Iterator<Item = &str> {
        self.subscriptions.keys().map(String::as_str)
    }
}

impl<H: Hub> Drop for DynamicHubProxy<H> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<H: Hub + fmt::Debug> fmt::Debug for DynamicHubProxy<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicHubProxy")
            .field("hub", &self.hub)
            .field("has_dispatcher", &self.has_dispatcher())
            .field("subscriptions", &self.subscriptions.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Build the handler attached to a subscription for `handler`.
fn bridge(handler: Handler, dispatcher: Option<Weak<dyn Dispatcher>>) -> ReceivedHandler {
    Arc::new(move |tokens: &[Token]| -> Result<(), DeliveryError> {
        let invocation = handler.bind(tokens)?;
        match &dispatcher {
            None => invocation(),
            Some(dispatcher) => dispatcher
                .upgrade()
                .ok_or(DeliveryError::DispatcherGone)?
                .post(invocation),
        }
        Ok(())
    })
}

/// Builder for [`DynamicHubProxy`].
pub struct DynamicHubProxyBuilder<H: Hub> {
    hub: H,
    dispatcher: Option<Arc<dyn Dispatcher>>,
    capture_current: bool,
}

impl<H: Hub> DynamicHubProxyBuilder<H> {
    /// Create a builder for a proxy over `hub`.
    pub fn new(hub: H) -> Self {
        Self {
            hub,
            dispatcher: None,
            capture_current: false,
        }
    }

    /// Post callbacks to `dispatcher`. Takes precedence over [`capture_current`](Self::capture_current).
    pub fn dispatcher(mut self, dispatcher: Arc<dyn Dispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    /// Post callbacks to the thread's current dispatcher at build time, if any.
    pub fn capture_current(mut self, capture: bool) -> Self {
        self.capture_current = capture;
        self
    }

    /// Build the proxy.
    pub fn build(self) -> DynamicHubProxy<H> {
        let dispatcher = match self.dispatcher {
            Some(dispatcher) => Some(dispatcher),
            None if self.capture_current => dispatcher::current(),
            None => None,
        };
        match dispatcher {
            Some(dispatcher) => DynamicHubProxy::with_dispatcher(self.hub, dispatcher),
            None => DynamicHubProxy::new(self.hub),
        }
    }
}
