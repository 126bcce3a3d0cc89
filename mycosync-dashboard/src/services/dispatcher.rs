use std::sync::Arc;

use mycosync_api::models::{ControlCommand, SettingsUpdate};
use tokio::sync::mpsc::UnboundedSender;

use crate::events::DashboardEvent;
use crate::services::client_service::ControllerApi;

/// Starts remote requests without waiting for them. Completions come back
/// later as events, so a slow request never blocks the loop and requests may
/// overlap.
pub trait RequestDispatcher: Send {
    fn fetch(&self, seq: u64);

    fn control(&self, command: ControlCommand);

    fn settings(&self, update: SettingsUpdate);
}

#[derive(Clone)]
pub struct TokioDispatcher {
    api: Arc<dyn ControllerApi>,
    events: UnboundedSender<DashboardEvent>,
}

impl TokioDispatcher {
    pub fn new(api: Arc<dyn ControllerApi>, events: UnboundedSender<DashboardEvent>) -> Self {
        Self { api, events }
    }
}

impl RequestDispatcher for TokioDispatcher {
    fn fetch(&self, seq: u64) {
        let api = Arc::clone(&self.api);
        let events = self.events.clone();

        tokio::spawn(async move {
            let result = api.fetch_snapshot().await;
            let _ = events.send(DashboardEvent::FetchCompleted { seq, result });
        });
    }

    fn control(&self, command: ControlCommand) {
        let api = Arc::clone(&self.api);
        let events = self.events.clone();

        tokio::spawn(async move {
            let result = api.send_control(&command).await;
            let _ = events.send(DashboardEvent::ControlCompleted { command, result });
        });
    }

    fn settings(&self, update: SettingsUpdate) {
        let api = Arc::clone(&self.api);
        let events = self.events.clone();

        tokio::spawn(async move {
            let result = api.update_settings(&update).await;
            let _ = events.send(DashboardEvent::SettingsCompleted { update, result });
        });
    }
}
