use std::io;
use std::net::{IpAddr, SocketAddr};

use tokio::net::TcpListener;

use crate::settings::Settings;

pub mod app;
mod handles;
pub mod settings;
mod simulate;
pub mod state;

pub use app::create_app;
pub use state::{MockState, Readings};

pub async fn run(settings: &Settings) -> io::Result<()> {
    let ip_addr = settings
        .mock
        .host
        .parse::<IpAddr>()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let address = SocketAddr::from((ip_addr, settings.mock.port));

    let listener = TcpListener::bind(&address).await?;

    tracing::info!("Mock controller listening on {:?}", address);

    axum::serve(listener, create_app(MockState::new())).await
}

/// Serves the mock on an ephemeral local port; returns its base URL.
pub async fn spawn(state: MockState) -> io::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let address = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, create_app(state)).await {
            tracing::error!("Mock controller stopped: {e}");
        }
    });

    Ok(format!("http://{address}"))
}
