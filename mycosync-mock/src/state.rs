use std::sync::Arc;
use std::time::Instant;

use axum::http::StatusCode;
use mycosync_api::models::{
    ActuatorStatus, ControlCommand, Snapshot, Thresholds, WifiInfo,
};
use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::simulate::{jitter, simulated_moisture, simulated_ph, simulated_temperature};

/// Fixed sensor values, replacing the simulated day cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Readings {
    pub temperature: f64,
    pub moisture: f64,
    pub ph: f64,
}

#[derive(Debug)]
struct MockController {
    started: Instant,
    thresholds: Thresholds,
    status: ActuatorStatus,
    wifi: WifiInfo,
    readings: Option<Readings>,
    failure: Option<StatusCode>,
    commands: Vec<ControlCommand>,
    data_requests: u64,
}

/// Shared state of the simulated controller.
#[derive(Debug, Clone)]
pub struct MockState {
    inner: Arc<Mutex<MockController>>,
}

impl MockState {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockController {
                started: Instant::now(),
                thresholds: Thresholds {
                    temp_min: Some(22.0),
                    temp_max: Some(26.0),
                    moisture_min: Some(60.0),
                    moisture_max: Some(70.0),
                    ph_min: Some(6.5),
                    ph_max: Some(7.0),
                },
                status: ActuatorStatus::default(),
                wifi: WifiInfo {
                    rssi: Some(-55),
                    ip: Some("192.168.4.1".to_string()),
                },
                readings: None,
                failure: None,
                commands: Vec::new(),
                data_requests: 0,
            })),
        }
    }

    /// Pins the readings served by `/api/data`.
    pub fn with_readings(self, readings: Readings) -> Self {
        if let Ok(mut controller) = self.inner.try_lock() {
            controller.readings = Some(readings);
        }
        self
    }

    pub async fn set_readings(&self, readings: Option<Readings>) {
        self.inner.lock().await.readings = readings;
    }

    /// Makes every endpoint answer with `status` until cleared.
    pub async fn set_failure(&self, status: Option<StatusCode>) {
        self.inner.lock().await.failure = status;
    }

    pub async fn failure(&self) -> Option<StatusCode> {
        self.inner.lock().await.failure
    }

    pub async fn commands(&self) -> Vec<ControlCommand> {
        self.inner.lock().await.commands.clone()
    }

    pub async fn data_requests(&self) -> u64 {
        self.inner.lock().await.data_requests
    }

    pub async fn status(&self) -> ActuatorStatus {
        self.inner.lock().await.status.clone()
    }

    pub async fn thresholds(&self) -> Thresholds {
        self.inner.lock().await.thresholds.clone()
    }

    pub async fn snapshot(&self) -> Snapshot {
        let mut controller = self.inner.lock().await;
        controller.data_requests += 1;

        let readings = controller.readings.unwrap_or_else(simulated_readings);

        Snapshot {
            timestamp: Some(controller.started.elapsed().as_millis() as u64),
            temperature: Some(readings.temperature),
            moisture: Some(readings.moisture),
            ph: Some(readings.ph),
            thresholds: Some(controller.thresholds.clone()),
            status: Some(controller.status.clone()),
            wifi: Some(controller.wifi.clone()),
        }
    }

    pub async fn apply_command(&self, command: &ControlCommand) {
        let mut controller = self.inner.lock().await;

        if let Some(mode) = command.mode {
            controller.status.mode = mode;
            tracing::info!("System mode: {mode}");
        }
        if let Some(fan) = command.fan {
            controller.status.fan = fan;
            tracing::info!("Fan {fan}");
        }
        if let Some(heater) = command.heater {
            controller.status.heater = heater;
            tracing::info!("Heater {heater}");
        }
        if let Some(humidifier) = command.humidifier {
            controller.status.humidifier = humidifier;
            tracing::info!("Humidifier {humidifier}");
        }

        controller.commands.push(command.clone());
    }

    pub async fn apply_thresholds(&self, update: &Thresholds) {
        let mut controller = self.inner.lock().await;
        let thresholds = &mut controller.thresholds;

        let pairs = [
            (&mut thresholds.temp_min, update.temp_min),
            (&mut thresholds.temp_max, update.temp_max),
            (&mut thresholds.moisture_min, update.moisture_min),
            (&mut thresholds.moisture_max, update.moisture_max),
            (&mut thresholds.ph_min, update.ph_min),
            (&mut thresholds.ph_max, update.ph_max),
        ];

        for (slot, value) in pairs {
            if value.is_some() {
                *slot = value;
            }
        }
    }
}

impl Default for MockState {
    fn default() -> Self {
        Self::new()
    }
}

fn simulated_readings() -> Readings {
    let now = OffsetDateTime::now_utc();
    let day_fraction = f64::from(now.hour()) / 24.0
        + f64::from(now.minute()) / 1_440.0
        + f64::from(now.second()) / 86_400.0;

    Readings {
        temperature: jitter(simulated_temperature(day_fraction), 0.2),
        moisture: simulated_moisture(day_fraction),
        ph: jitter(simulated_ph(day_fraction), 0.02),
    }
}
