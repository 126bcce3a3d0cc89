use config::ConfigError;

/// Startup failures; the only errors that reach `main`.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Settings error: {0}")]
    Settings(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Invalid controller URL: {0}")]
    InvalidUrl(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
