pub mod models;

/// Path of the snapshot endpoint exposed by the controller.
pub const DATA_PATH: &str = "/api/data";

/// Path of the command endpoint exposed by the controller.
pub const CONTROL_PATH: &str = "/api/control";

/// Path of the threshold settings endpoint exposed by the controller.
pub const SETTINGS_PATH: &str = "/api/settings";
