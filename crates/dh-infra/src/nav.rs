//! In-memory navigator for headless hosts and tests.
//!
//! A UI shell provides its own `NavigatorPort`; this adapter records every
//! navigation instead so the flow can be driven without a UI.

use async_trait::async_trait;
use dh_app::ports::NavigatorPort;
use dh_core::flow::FlowPayload;
use dh_core::steps::Route;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Default)]
pub struct RecordingNavigator {
    history: Mutex<Vec<(Route, FlowPayload)>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes navigated to, oldest first.
    pub async fn routes(&self) -> Vec<Route> {
        self.history
            .lock()
            .await
            .iter()
            .map(|(route, _)| *route)
            .collect()
    }

    /// The most recent navigation, if any.
    pub async fn last(&self) -> Option<(Route, FlowPayload)> {
        self.history.lock().await.last().cloned()
    }

    /// Drain the recorded history.
    pub async fn take(&self) -> Vec<(Route, FlowPayload)> {
        std::mem::take(&mut *self.history.lock().await)
    }
}

#[async_trait]
impl NavigatorPort for RecordingNavigator {
    async fn navigate(&self, route: Route, payload: FlowPayload) {
        debug!(route = route.path(), "navigation recorded");
        self.history.lock().await.push((route, payload));
    }
}
