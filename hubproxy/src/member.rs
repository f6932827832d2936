//! Values and handles for dynamic member access.

use crate::proxy::DynamicHubProxy;
use hubproxy_core::{Handler, Hub, Token};
use std::future::Future;

/// A value assigned to a proxy member.
///
/// Only [`MemberValue::Callback`] subscribes; assigning anything else removes
/// the current subscription of that member, if any.
#[derive(Debug, Clone)]
pub enum MemberValue {
    /// Subscribe this callback to the event of the same name.
    Callback(Handler),
    /// A plain value. Not callable, so it unsubscribes.
    Value(Token),
    /// No value. Unsubscribes.
    Null,
}

impl MemberValue {
    /// Returns `true` if this value subscribes a callback.
    pub fn is_callback(&self) -> bool {
        matches!(self, MemberValue::Callback(_))
    }
}

impl From<Handler> for MemberValue {
    fn from(handler: Handler) -> Self {
        MemberValue::Callback(handler)
    }
}

impl From<Option<Handler>> for MemberValue {
    fn from(handler: Option<Handler>) -> Self {
        handler.map_or(MemberValue::Null, MemberValue::Callback)
    }
}

impl From<Token> for MemberValue {
    fn from(value: Token) -> Self {
        MemberValue::Value(value)
    }
}

impl From<()> for MemberValue {
    fn from(_: ()) -> Self {
        MemberValue::Null
    }
}

/// A named member of a [`DynamicHubProxy`].
///
/// Obtained from [`DynamicHubProxy::member`]; calling it invokes the remote
/// procedure of that name and assigning to it manages the event subscription
/// of that name.
pub struct Member<'a, H: Hub> {
    proxy: &'a mut DynamicHubProxy<H>,
    name: &'a str,
}

impl<'a, H: Hub> Member<'a, H> {
    pub(crate) fn new(proxy: &'a mut DynamicHubProxy<H>, name: &'a str) -> Self {
        Self { proxy, name }
    }

    /// The member name.
    pub fn name(&self) -> &str {
        self.name
    }

    /// Invoke the remote procedure named after this member.
    pub fn call(&self, args: Vec<Token>) -> impl Future<Output = Result<Token, H::Error>> + Send + '_ {
        self.proxy.call(self.name, args)
    }

    /// Assign `value` to this member.
    pub fn set(self, value: impl Into<MemberValue>) {
        self.proxy.set(self.name, value);
    }

    /// Returns `true` if a callback is currently assigned to this member.
    pub fn is_subscribed(&self) -> bool {
        self.proxy.is_subscribed(self.name)
    }
}
