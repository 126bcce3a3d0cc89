pub mod alert_log;
pub mod client_service;
pub mod dispatcher;
pub mod evaluator;
pub mod scheduler;
#[cfg(any(test, feature = "mock"))]
pub mod testing;
pub mod uptime;

pub use client_service::{ControllerApi, HttpControllerClient};
pub use dispatcher::{RequestDispatcher, TokioDispatcher};
pub use scheduler::{Scheduler, TimerHandle, TokioScheduler};
