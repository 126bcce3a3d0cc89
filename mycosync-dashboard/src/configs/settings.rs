use std::env;
use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Controller {
    pub base_url: String,
    pub data_path: String,
    pub control_path: String,
    pub settings_path: String,
    pub request_timeout_ms: u64,
}

impl Controller {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self {
            base_url: "http://192.168.4.1".to_string(),
            data_path: mycosync_api::DATA_PATH.to_string(),
            control_path: mycosync_api::CONTROL_PATH.to_string(),
            settings_path: mycosync_api::SETTINGS_PATH.to_string(),
            request_timeout_ms: 8_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Dashboard {
    pub refresh_interval_ms: u64,
    pub uptime_interval_ms: u64,
    pub alert_capacity: usize,
    pub alert_ttl_ms: u64,
    pub alert_fade_ms: u64,
}

impl Dashboard {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn uptime_interval(&self) -> Duration {
        Duration::from_millis(self.uptime_interval_ms)
    }

    pub fn alert_ttl(&self) -> Duration {
        Duration::from_millis(self.alert_ttl_ms)
    }

    pub fn alert_fade(&self) -> Duration {
        Duration::from_millis(self.alert_fade_ms)
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self {
            refresh_interval_ms: 5_000,
            uptime_interval_ms: 1_000,
            alert_capacity: 10,
            alert_ttl_ms: 30_000,
            alert_fade_ms: 1_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub logger: Logger,
    pub controller: Controller,
    pub dashboard: Dashboard,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or("development".into());
        let configs = Self::project_root()
            .map_err(|e| ConfigError::Message(e.to_string()))?
            .join("configs");

        let builder = Config::builder()
            .add_source(File::from(configs.join("default")))
            .add_source(File::from(configs.join(&run_mode)).required(false))
            .add_source(Environment::default().separator("__"));

        let settings: Settings = builder.build()?.try_deserialize()?;

        settings.validate()?;

        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.dashboard.refresh_interval_ms == 0 || self.dashboard.uptime_interval_ms == 0 {
            return Err(ConfigError::Message("Timer intervals must be positive".into()));
        }

        if self.dashboard.alert_capacity == 0 {
            return Err(ConfigError::Message("Alert capacity must be positive".into()));
        }

        Ok(())
    }

    fn project_root() -> Result<PathBuf, std::io::Error> {
        if let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") {
            // development and testing environments, configs live at the workspace root
            Ok(PathBuf::from(manifest_dir).join(".."))
        } else {
            // runtime root relative path `folder/executable` -> `folder/`
            let exe = env::current_exe()?;
            Ok(exe.parent().map(|p| p.to_path_buf()).unwrap_or_default())
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            logger: Logger {
                level: "info".to_string(),
            },
            controller: Controller::default(),
            dashboard: Dashboard::default(),
        }
    }
}
