#![allow(dead_code)]

use std::sync::Arc;

use mycosync_dashboard::configs::{Controller, Dashboard};
use mycosync_dashboard::services::{ControllerApi, HttpControllerClient};
use mycosync_mock::{MockState, Readings};

pub const OPTIMAL: Readings = Readings {
    temperature: 24.0,
    moisture: 65.0,
    ph: 6.8,
};

pub struct MockController {
    pub state: MockState,
    pub base_url: String,
}

impl MockController {
    pub async fn start(readings: Readings) -> Self {
        let state = MockState::new();
        state.set_readings(Some(readings)).await;
        let base_url = mycosync_mock::spawn(state.clone()).await.unwrap();

        Self { state, base_url }
    }

    pub fn controller(&self) -> Controller {
        Controller {
            base_url: self.base_url.clone(),
            request_timeout_ms: 2_000,
            ..Default::default()
        }
    }

    pub fn client(&self) -> HttpControllerClient {
        HttpControllerClient::new(&self.controller()).unwrap()
    }

    pub fn api(&self) -> Arc<dyn ControllerApi> {
        Arc::new(self.client())
    }
}

/// Short timers so a whole session fits in a test.
pub fn fast_dashboard() -> Dashboard {
    Dashboard {
        refresh_interval_ms: 100,
        uptime_interval_ms: 50,
        alert_capacity: 10,
        alert_ttl_ms: 30_000,
        alert_fade_ms: 1_000,
    }
}
