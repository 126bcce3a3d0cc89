pub mod settings;

pub use settings::{Controller, Dashboard, Logger, Settings};
