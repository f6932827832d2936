//! # hubproxy - Dynamic Member Access over Remote Hubs
//!
//! `hubproxy` wraps a remote hub (an endpoint with named procedures and named
//! events) in a proxy whose members are resolved by name at runtime. Calling a
//! member invokes the remote procedure; assigning a typed callback to a member
//! subscribes it to the remote event of the same name.
//!
//! The transport is not part of this crate. Anything implementing
//! [`Hub`] (and optionally [`HubConnection`]) can be proxied.
//!
//! ## Quick Start
//!
//! ```rust
//! use hubproxy::prelude::*;
//! use hubproxy::testing::MockConnection;
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let connection = MockConnection::new();
//! let mut chat = connection.create_dynamic_hub_proxy("chat", false);
//!
//! // proxy.messageReceived = |user, text| ...
//! chat.on("messageReceived", |user: String, text: String| {
//!     println!("{user}: {text}");
//! });
//!
//! // proxy.send("alice", "hi")
//! chat.call("send", vec![json!("alice"), json!("hi")]).await?;
//!
//! // proxy.messageReceived = null
//! chat.off("messageReceived");
//! # Ok(())
//! # }
//! ```
//!
//! ## Callback threads
//!
//! By default callbacks run on whichever thread delivers the event. Pass a
//! [`Dispatcher`] to post them somewhere else instead, for example a
//! [`QueueDispatcher`](dispatchers::QueueDispatcher) pumped by a UI loop.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod factory;
mod member;
mod proxy;

pub use factory::HubConnectionExt;
pub use member::{Member, MemberValue};
pub use proxy::{DynamicHubProxy, DynamicHubProxyBuilder};

pub use hubproxy_core::{
    // Error types
    BoxError,
    // Callbacks
    Callback,
    CurrentGuard,
    DeliveryError,
    // Dispatchers
    Dispatcher,
    // Hub contracts
    DynHub,
    DynHubError,
    HandlerId,
    Handler,
    Hub,
    HubConnection,
    ReceivedHandler,
    ScopedDisposer,
    Signature,
    Subscription,
    Token,
    Work,
    convert_token,
};

/// Current-dispatcher support.
pub mod dispatcher {
    pub use hubproxy_core::dispatcher::{current, enter};
}

/// Standard dispatcher implementations.
pub mod dispatchers {
    #![allow(clippy::wildcard_imports)]
    pub use hubproxy_std::dispatchers::*;
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use hubproxy_std::testing::*;
}

/// Prelude module - common imports for hubproxy.
///
/// # Usage
///
/// ```rust
/// use hubproxy::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        DeliveryError, Dispatcher, DynamicHubProxy, Handler, Hub, HubConnection,
        HubConnectionExt, MemberValue, Token,
    };
}
