use std::str::FromStr;

use mycosync_api::models::{
    Actuator, CommandResponse, ControlCommand, Mode, SettingsUpdate, Snapshot,
};

use crate::errors::ClientError;
use crate::services::alert_log::AlertId;

/// Everything the controller reacts to. The runtime feeds these through a
/// single channel so state is only ever touched from the event loop.
#[derive(Debug)]
pub enum DashboardEvent {
    Timer(TimerEvent),
    Action(UiAction),
    FetchCompleted {
        seq: u64,
        result: Result<Snapshot, ClientError>,
    },
    ControlCompleted {
        command: ControlCommand,
        result: Result<CommandResponse, ClientError>,
    },
    SettingsCompleted {
        update: SettingsUpdate,
        result: Result<CommandResponse, ClientError>,
    },
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    RefreshTick,
    UptimeTick,
    AlertFade(AlertId),
    AlertRemove(AlertId),
}

/// User-facing controls of the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    SelectMode(Mode),
    Toggle(Actuator),
    Refresh,
    UpdateSettings(SettingsUpdate),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseActionError {
    #[error("Unknown action: {0}")]
    Unknown(String),

    #[error("Unknown threshold: {0}")]
    UnknownThreshold(String),

    #[error("Invalid threshold value: {0}")]
    InvalidValue(String),

    #[error("Usage: set <threshold> <value>")]
    MissingArgument,
}

impl FromStr for UiAction {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let action = words.next().unwrap_or_default().to_ascii_lowercase();

        match action.as_str() {
            "auto" => Ok(UiAction::SelectMode(Mode::Auto)),
            "manual" => Ok(UiAction::SelectMode(Mode::Manual)),
            "fan" => Ok(UiAction::Toggle(Actuator::Fan)),
            "heater" => Ok(UiAction::Toggle(Actuator::Heater)),
            "humidifier" => Ok(UiAction::Toggle(Actuator::Humidifier)),
            "refresh" | "r" => Ok(UiAction::Refresh),
            "set" => {
                let (Some(key), Some(value)) = (words.next(), words.next()) else {
                    return Err(ParseActionError::MissingArgument);
                };
                let value = value
                    .parse::<f64>()
                    .map_err(|_| ParseActionError::InvalidValue(value.to_string()))?;

                let mut update = SettingsUpdate::default();
                let slot = match key {
                    "temp_min" => &mut update.thresholds.temp_min,
                    "temp_max" => &mut update.thresholds.temp_max,
                    "moisture_min" => &mut update.thresholds.moisture_min,
                    "moisture_max" => &mut update.thresholds.moisture_max,
                    "ph_min" => &mut update.thresholds.ph_min,
                    "ph_max" => &mut update.thresholds.ph_max,
                    other => return Err(ParseActionError::UnknownThreshold(other.to_string())),
                };
                *slot = Some(value);

                Ok(UiAction::UpdateSettings(update))
            }
            _ => Err(ParseActionError::Unknown(s.trim().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_buttons() {
        assert_eq!("auto".parse(), Ok(UiAction::SelectMode(Mode::Auto)));
        assert_eq!(" MANUAL ".parse(), Ok(UiAction::SelectMode(Mode::Manual)));
        assert_eq!("fan".parse(), Ok(UiAction::Toggle(Actuator::Fan)));
        assert_eq!("humidifier".parse(), Ok(UiAction::Toggle(Actuator::Humidifier)));
        assert_eq!("r".parse(), Ok(UiAction::Refresh));
    }

    #[test]
    fn test_parse_settings() {
        let action: UiAction = "set moisture_min 55".parse().unwrap();
        let UiAction::UpdateSettings(update) = action else {
            panic!("expected a settings update");
        };

        assert_eq!(update.thresholds.moisture_min, Some(55.0));
        assert_eq!(update.thresholds.moisture_max, None);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "pump".parse::<UiAction>(),
            Err(ParseActionError::Unknown("pump".to_string()))
        );
        assert_eq!("set".parse::<UiAction>(), Err(ParseActionError::MissingArgument));
        assert_eq!(
            "set co2_max 900".parse::<UiAction>(),
            Err(ParseActionError::UnknownThreshold("co2_max".to_string()))
        );
        assert_eq!(
            "set ph_max high".parse::<UiAction>(),
            Err(ParseActionError::InvalidValue("high".to_string()))
        );
    }
}
