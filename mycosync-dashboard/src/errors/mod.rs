mod client;
mod dashboard;

pub use client::ClientError;
pub use dashboard::DashboardError;
