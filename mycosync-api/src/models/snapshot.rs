use serde::{Deserialize, Serialize};

use super::{Mode, SwitchState, lenient};

/// Optimal temperature range in Celsius when the controller reports none.
pub const DEFAULT_TEMPERATURE_RANGE: Range = Range::new(22.0, 26.0);
/// Optimal substrate moisture range in percent when the controller reports none.
pub const DEFAULT_MOISTURE_RANGE: Range = Range::new(60.0, 70.0);
/// Optimal pH range when the controller reports none.
pub const DEFAULT_PH_RANGE: Range = Range::new(6.5, 7.0);

/// Reading used when the controller omits the temperature.
pub const DEFAULT_TEMPERATURE: f64 = 0.0;
/// Reading used when the controller omits the moisture.
pub const DEFAULT_MOISTURE: f64 = 0.0;
/// Reading used when the controller omits the pH.
pub const DEFAULT_PH: f64 = 7.0;

/// Inclusive bounds of the optimal band of a metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

/// One polled reading of every sensor and actuator value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    /// Controller uptime in milliseconds at sampling time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
    /// Substrate temperature in Celsius
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Substrate moisture in percent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moisture: Option<f64>,
    /// Substrate pH
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ph: Option<f64>,
    /// Optimal bands configured on the controller
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<Thresholds>,
    /// Actuator and mode state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ActuatorStatus>,
    /// Controller network link
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wifi: Option<WifiInfo>,
}

/// Accessors fall back only when a value is absent. An explicit `0` reading or
/// bound is kept as reported, so `ph: 0` classifies as too low instead of
/// reading as the neutral default.
impl Snapshot {
    pub fn temperature(&self) -> f64 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    pub fn moisture(&self) -> f64 {
        self.moisture.unwrap_or(DEFAULT_MOISTURE)
    }

    pub fn ph(&self) -> f64 {
        self.ph.unwrap_or(DEFAULT_PH)
    }

    pub fn temperature_range(&self) -> Range {
        self.thresholds
            .as_ref()
            .map_or(DEFAULT_TEMPERATURE_RANGE, Thresholds::temperature_range)
    }

    pub fn moisture_range(&self) -> Range {
        self.thresholds
            .as_ref()
            .map_or(DEFAULT_MOISTURE_RANGE, Thresholds::moisture_range)
    }

    pub fn ph_range(&self) -> Range {
        self.thresholds
            .as_ref()
            .map_or(DEFAULT_PH_RANGE, Thresholds::ph_range)
    }

    pub fn status(&self) -> ActuatorStatus {
        self.status.clone().unwrap_or_default()
    }
}

/// Optimal bands; every bound falls back to its documented default on its own.
/// Only a missing bound falls back; an explicit `0` is a real limit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moisture_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moisture_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ph_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ph_max: Option<f64>,
}

impl Thresholds {
    pub fn temperature_range(&self) -> Range {
        Range::new(
            self.temp_min.unwrap_or(DEFAULT_TEMPERATURE_RANGE.min),
            self.temp_max.unwrap_or(DEFAULT_TEMPERATURE_RANGE.max),
        )
    }

    pub fn moisture_range(&self) -> Range {
        Range::new(
            self.moisture_min.unwrap_or(DEFAULT_MOISTURE_RANGE.min),
            self.moisture_max.unwrap_or(DEFAULT_MOISTURE_RANGE.max),
        )
    }

    pub fn ph_range(&self) -> Range {
        Range::new(
            self.ph_min.unwrap_or(DEFAULT_PH_RANGE.min),
            self.ph_max.unwrap_or(DEFAULT_PH_RANGE.max),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActuatorStatus {
    /// Ventilation fan relay
    #[serde(deserialize_with = "lenient::or_default")]
    pub fan: SwitchState,
    /// Heater relay
    #[serde(deserialize_with = "lenient::or_default")]
    pub heater: SwitchState,
    /// Humidifier relay
    #[serde(deserialize_with = "lenient::or_default")]
    pub humidifier: SwitchState,
    /// Control mode
    #[serde(deserialize_with = "lenient::or_default")]
    pub mode: Mode,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WifiInfo {
    /// Received signal strength in dBm
    #[serde(
        deserialize_with = "lenient::rssi",
        skip_serializing_if = "Option::is_none"
    )]
    pub rssi: Option<i32>,
    /// Address assigned to the controller
    #[serde(
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub ip: Option<String>,
}
