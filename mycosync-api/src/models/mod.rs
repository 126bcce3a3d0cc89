mod control;
mod lenient;
mod settings;
mod snapshot;

pub use control::*;
pub use settings::*;
pub use snapshot::*;
