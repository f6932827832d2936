//! Testing utilities for hub proxies.
//!
//! This module provides in-memory stand-ins for the transport side so that
//! proxies can be exercised without a network.
//!
//! # Features
//!
//! - [`MockHub`]: A hub that records invocations and lets tests fire events
//! - [`MockSubscription`]: The per-event subscription handed out by [`MockHub`]
//! - [`MockConnection`]: A connection that opens [`MockHub`]s by name
//! - [`RecordingDispatcher`]: A dispatcher that records posts and runs them on demand

use hubproxy_core::{
    DeliveryError, Dispatcher, HandlerId, Hub, HubConnection, ReceivedHandler, Subscription,
    Token, Work,
};
use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU64, AtomicUsize, Ordering},
    },
};
use thiserror::Error;

// ============================================================================
// Mock Subscription
// ============================================================================

/// The subscription to one event of a [`MockHub`].
///
/// Clones share the same handler list.
#[derive(Clone, Default)]
pub struct MockSubscription {
    handlers: Arc<Mutex<Vec<(HandlerId, ReceivedHandler)>>>,
    next_id: Arc<AtomicU64>,
}

impl MockSubscription {
    /// Deliver one event occurrence to every attached handler, in attach order.
    ///
    /// Returns each handler's result.
    pub fn emit(&self, tokens: &[Token]) -> Vec<Result<(), DeliveryError>> {
        // Snapshot so handlers may attach or detach while being called.
        let handlers: Vec<ReceivedHandler> = self
            .handlers
            .lock()
            .unwrap()
            .iter()
            .map(|(_, h)| h.clone())
            .collect();
        handlers.iter().map(|h| h(tokens)).collect()
    }

    /// Number of attached handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.lock().unwrap().len()
    }
}

impl Subscription for MockSubscription {
    fn attach(&self, handler: ReceivedHandler) -> HandlerId {
        let id = HandlerId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.handlers.lock().unwrap().push((id, handler));
        id
    }

    fn detach(&self, id: HandlerId) -> bool {
        let mut handlers = self.handlers.lock().unwrap();
        let before = handlers.len();
        handlers.retain(|(attached, _)| *attached != id);
        handlers.len() != before
    }
}

// ============================================================================
// Mock Hub
// ============================================================================

/// Fault returned by [`MockHub`] for methods programmed to fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("remote call `{method}` failed: {message}")]
pub struct MockHubError {
    /// The invoked method.
    pub method: String,
    /// The programmed failure message.
    pub message: String,
}

#[derive(Default)]
struct MockHubState {
    calls: Mutex<Vec<(String, Vec<Token>)>>,
    responses: Mutex<HashMap<String, Result<Token, String>>>,
    subscriptions: Mutex<HashMap<String, MockSubscription>>,
    subscribe_calls: AtomicUsize,
}

/// An in-memory hub.
///
/// Invocations are recorded and answered from programmed responses
/// (`Token::Null` when nothing was programmed). Subscribing to the same event
/// twice returns the same [`MockSubscription`]. Clones share state.
///
/// # Example
///
/// ```rust
/// use hubproxy_std::testing::MockHub;
/// use serde_json::json;
///
/// let hub = MockHub::new();
/// hub.respond("add", json!(3));
/// assert_eq!(hub.calls().len(), 0);
/// ```
#[derive(Clone, Default)]
pub struct MockHub {
    state: Arc<MockHubState>,
}

impl MockHub {
    /// Create a hub with no programmed responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer calls to `method` with `result`.
    pub fn respond(&self, method: impl Into<String>, result: Token) {
        self.state
            .responses
            .lock()
            .unwrap()
            .insert(method.into(), Ok(result));
    }

    /// Fail calls to `method` with `message`.
    pub fn fail(&self, method: impl Into<String>, message: impl Into<String>) {
        self.state
            .responses
            .lock()
            .unwrap()
            .insert(method.into(), Err(message.into()));
    }

    /// Every invocation received so far, in order.
    pub fn calls(&self) -> Vec<(String, Vec<Token>)> {
        self.state.calls.lock().unwrap().clone()
    }

    /// Number of times [`Hub::subscribe`] was called.
    pub fn subscribe_calls(&self) -> usize {
        self.state.subscribe_calls.load(Ordering::SeqCst)
    }

    /// Fire `event` with `tokens`, returning each attached handler's result.
    ///
    /// Firing an event nobody subscribed to returns an empty list.
    pub fn emit(&self, event: &str, tokens: &[Token]) -> Vec<Result<(), DeliveryError>> {
        let subscription = self.state.subscriptions.lock().unwrap().get(event).cloned();
        match subscription {
            Some(subscription) => subscription.emit(tokens),
            None => Vec::new(),
        }
    }

    /// Number of handlers currently attached to `event`.
    pub fn handler_count(&self, event: &str) -> usize {
        self.state
            .subscriptions
            .lock()
            .unwrap()
            .get(event)
            .map_or(0, MockSubscription::handler_count)
    }
}

impl Hub for MockHub {
    type Error = MockHubError;
    type Subscription = MockSubscription;

    async fn invoke(&self, method: &str, args: Vec<Token>) -> Result<Token, Self::Error> {
        self.state
            .calls
            .lock()
            .unwrap()
            .push((method.to_string(), args));

        let response = self.state.responses.lock().unwrap().get(method).cloned();
        match response {
            Some(Ok(result)) => Ok(result),
            Some(Err(message)) => Err(MockHubError {
                method: method.to_string(),
                message,
            }),
            None => Ok(Token::Null),
        }
    }

    fn subscribe(&self, event: &str) -> Self::Subscription {
        self.state.subscribe_calls.fetch_add(1, Ordering::SeqCst);
        self.state
            .subscriptions
            .lock()
            .unwrap()
            .entry(event.to_string())
            .or_default()
            .clone()
    }
}

// ============================================================================
// Mock Connection
// ============================================================================

/// A connection that hands out one [`MockHub`] per hub name.
#[derive(Clone, Default)]
pub struct MockConnection {
    hubs: Arc<Mutex<HashMap<String, MockHub>>>,
}

impl MockConnection {
    /// Create a connection with no hubs opened yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// The hub opened under `name`, if any.
    pub fn hub(&self, name: &str) -> Option<MockHub> {
        self.hubs.lock().unwrap().get(name).cloned()
    }
}

impl HubConnection for MockConnection {
    type Hub = MockHub;

    fn create_hub(&self, name: &str) -> Self::Hub {
        self.hubs
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_default()
            .clone()
    }
}

// ============================================================================
// Recording Dispatcher
// ============================================================================

/// A dispatcher that counts posts and holds the work until [`run_all`](Self::run_all).
///
/// Unlike [`QueueDispatcher`](crate::dispatchers::QueueDispatcher) it does not
/// become the current dispatcher while running work.
#[derive(Default)]
pub struct RecordingDispatcher {
    posted: AtomicUsize,
    queue: Mutex<Vec<Work>>,
}

impl RecordingDispatcher {
    /// Create a new recording dispatcher.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Total number of work items ever posted.
    pub fn posted(&self) -> usize {
        self.posted.load(Ordering::SeqCst)
    }

    /// Run every held work item in post order, returning how many ran.
    pub fn run_all(&self) -> usize {
        let work: Vec<Work> = std::mem::take(&mut *self.queue.lock().unwrap());
        let ran = work.len();
        for w in work {
            w();
        }
        ran
    }
}

impl Dispatcher for RecordingDispatcher {
    fn post(&self, work: Work) {
        self.posted.fetch_add(1, Ordering::SeqCst);
        self.queue.lock().unwrap().push(work);
    }
}
