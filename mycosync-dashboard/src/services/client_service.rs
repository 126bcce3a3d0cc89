use async_trait::async_trait;
use mycosync_api::models::{CommandResponse, ControlCommand, SettingsUpdate, Snapshot};
use reqwest::{Client, Response};
use serde::Serialize;

use crate::configs::Controller;
use crate::errors::{ClientError, DashboardError};

/// Remote controller endpoints the dashboard talks to.
#[async_trait]
pub trait ControllerApi: Send + Sync {
    async fn fetch_snapshot(&self) -> Result<Snapshot, ClientError>;

    async fn send_control(&self, command: &ControlCommand) -> Result<CommandResponse, ClientError>;

    async fn update_settings(&self, update: &SettingsUpdate) -> Result<CommandResponse, ClientError>;
}

pub struct HttpControllerClient {
    http_client: Client,
    data_url: String,
    control_url: String,
    settings_url: String,
}

impl HttpControllerClient {
    pub fn new(controller: &Controller) -> Result<Self, DashboardError> {
        let base_url = controller.base_url.trim_end_matches('/');
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(DashboardError::InvalidUrl(controller.base_url.clone()));
        }

        let http_client = Client::builder()
            .timeout(controller.request_timeout())
            .build()?;

        Ok(Self {
            http_client,
            data_url: format!("{base_url}{}", controller.data_path),
            control_url: format!("{base_url}{}", controller.control_path),
            settings_url: format!("{base_url}{}", controller.settings_path),
        })
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    async fn post<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<CommandResponse, ClientError> {
        // `json` sets `Content-Type: application/json`
        let response = self.http_client.post(url).json(body).send().await?;
        let response = Self::check_status(response)?;
        let bytes = response.bytes().await?;

        // Controllers may answer a 2xx with an empty or free-form body
        Ok(serde_json::from_slice(&bytes).unwrap_or_else(|_| CommandResponse {
            success: true,
            message: String::from_utf8_lossy(&bytes).into_owned(),
        }))
    }

    fn check_status(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(ClientError::Protocol { status })
        }
    }
}

#[async_trait]
impl ControllerApi for HttpControllerClient {
    async fn fetch_snapshot(&self) -> Result<Snapshot, ClientError> {
        tracing::debug!("GET {}", self.data_url);

        let response = self.http_client.get(&self.data_url).send().await?;
        let response = Self::check_status(response)?;
        let bytes = response.bytes().await?;

        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn send_control(&self, command: &ControlCommand) -> Result<CommandResponse, ClientError> {
        tracing::debug!("POST {} {}", self.control_url, command);

        self.post(&self.control_url, command).await
    }

    async fn update_settings(&self, update: &SettingsUpdate) -> Result<CommandResponse, ClientError> {
        tracing::debug!("POST {} {:?}", self.settings_url, update);

        self.post(&self.settings_url, update).await
    }
}
