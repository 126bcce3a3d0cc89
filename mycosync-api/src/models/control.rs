use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwitchState {
    #[serde(rename = "ON")]
    On,
    #[default]
    #[serde(rename = "OFF")]
    Off,
}

impl SwitchState {
    pub fn toggled(self) -> Self {
        match self {
            SwitchState::On => SwitchState::Off,
            SwitchState::Off => SwitchState::On,
        }
    }
}

impl fmt::Display for SwitchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwitchState::On => write!(f, "ON"),
            SwitchState::Off => write!(f, "OFF"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Controller drives the actuators from its own thresholds
    #[default]
    #[serde(rename = "AUTO")]
    Auto,
    /// Actuators only change on explicit commands
    #[serde(rename = "MANUAL")]
    Manual,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Auto => write!(f, "AUTO"),
            Mode::Manual => write!(f, "MANUAL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Actuator {
    Fan,
    Heater,
    Humidifier,
}

impl Actuator {
    pub const ALL: [Actuator; 3] = [Actuator::Fan, Actuator::Heater, Actuator::Humidifier];

    pub fn name(self) -> &'static str {
        match self {
            Actuator::Fan => "fan",
            Actuator::Heater => "heater",
            Actuator::Humidifier => "humidifier",
        }
    }
}

/// Sparse command object; only the keys that are set go over the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlCommand {
    /// Requested control mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    /// Requested fan relay state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fan: Option<SwitchState>,
    /// Requested heater relay state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heater: Option<SwitchState>,
    /// Requested humidifier relay state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidifier: Option<SwitchState>,
}

impl ControlCommand {
    pub fn mode(mode: Mode) -> Self {
        Self {
            mode: Some(mode),
            ..Default::default()
        }
    }

    pub fn switch(actuator: Actuator, state: SwitchState) -> Self {
        let mut command = Self::default();
        match actuator {
            Actuator::Fan => command.fan = Some(state),
            Actuator::Heater => command.heater = Some(state),
            Actuator::Humidifier => command.humidifier = Some(state),
        }
        command
    }
}

impl fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandResponse {
    /// Whether the controller accepted the request
    pub success: bool,
    /// Operation result message
    pub message: String,
}
