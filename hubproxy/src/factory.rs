//! Creating proxies straight from a connection.

use crate::proxy::DynamicHubProxy;
use hubproxy_core::{Dispatcher, HubConnection};
use std::sync::Arc;

/// Extension methods creating a [`DynamicHubProxy`] from a [`HubConnection`].
pub trait HubConnectionExt: HubConnection {
    /// Open `hub_name` and wrap it in a dynamic proxy.
    ///
    /// With `capture_current` set, callbacks are posted to the calling thread's
    /// current dispatcher (see [`hubproxy_core::dispatcher::current`]). If the
    /// thread has none, callbacks run on the delivering thread.
    fn create_dynamic_hub_proxy(
        &self,
        hub_name: &str,
        capture_current: bool,
    ) -> DynamicHubProxy<Self::Hub> {
        DynamicHubProxy::builder(self.create_hub(hub_name))
            .capture_current(capture_current)
            .build()
    }

    /// Open `hub_name` and wrap it in a dynamic proxy posting callbacks to
    /// `dispatcher`, or running them on the delivering thread when `None`.
    fn create_dynamic_hub_proxy_with(
        &self,
        hub_name: &str,
        dispatcher: Option<Arc<dyn Dispatcher>>,
    ) -> DynamicHubProxy<Self::Hub> {
        let hub = self.create_hub(hub_name);
        match dispatcher {
            Some(dispatcher) => DynamicHubProxy::with_dispatcher(hub, dispatcher),
            None => DynamicHubProxy::new(hub),
        }
    }
}

impl<C: HubConnection + ?Sized> HubConnectionExt for C {}
