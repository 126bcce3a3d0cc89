use std::io;
use std::sync::Arc;

use crate::app::{DashboardApp, spawn_input_reader, spawn_shutdown_signal, stdout_renderer};
use crate::configs::Settings;
use crate::errors::DashboardError;
use crate::services::client_service::{ControllerApi, HttpControllerClient};

pub mod app;
pub mod configs;
pub mod controller;
pub mod errors;
pub mod events;
pub mod render;
pub mod services;

pub async fn run(settings: &Settings) -> Result<(), DashboardError> {
    let client = HttpControllerClient::new(&settings.controller)?;
    tracing::info!("Polling controller at {}", client.data_url());

    let api: Arc<dyn ControllerApi> = Arc::new(client);

    let app = DashboardApp::new(settings.dashboard.clone(), api, stdout_renderer());
    spawn_input_reader(io::BufReader::new(io::stdin()), app.sender())?;
    spawn_shutdown_signal(app.sender());

    app.run().await;

    Ok(())
}
