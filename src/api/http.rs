//! HTTP implementation of the camera API

use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use super::wire::{self, Ack, CameraListPayload, CameraRequest, ConnectPayload, StartShootRequest, StatusPayload};
use super::{ApiOutcome, CameraApi, CameraListing};
use crate::config::RemoteConfig;
use crate::types::{CameraId, RemoteState, ShotParameters, StatusSnapshot};
use crate::{RemoteError, Result};

/// Camera API backed by the backend's JSON endpoints.
#[derive(Debug, Clone)]
pub struct HttpCameraApi {
    client: Client,
    base_url: String,
}

impl HttpCameraApi {
    /// Build a client for the configured backend.
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| RemoteError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self::with_client(client, &config.base_url))
    }

    /// Use an existing `reqwest` client, sharing its connection pool.
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self { client, base_url: base_url.trim_end_matches('/').to_string() }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, operation: &str, path: &str) -> Result<T> {
        self.exchange(operation, self.client.get(self.url(path))).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        operation: &str,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.exchange(operation, self.client.post(self.url(path)).json(body)).await
    }

    /// Send one request and decode its envelope.
    ///
    /// A readable envelope wins over the HTTP status: backends may answer
    /// `status: "failure"` with a 4xx/5xx code and a useful description.
    async fn exchange<T: DeserializeOwned>(&self, operation: &str, request: RequestBuilder) -> Result<T> {
        trace!(operation, "Sending request");
        let response = request.send().await.map_err(|e| RemoteError::network(operation, e))?;
        let status = response.status();
        let body = response.bytes().await.map_err(|e| RemoteError::network(operation, e))?;

        match serde_json::from_slice::<ApiOutcome<T>>(&body) {
            Ok(outcome) => {
                debug!(operation, http_status = status.as_u16(), success = outcome.is_success(), "Backend replied");
                outcome.into_result(operation)
            }
            Err(e) if status.is_success() => Err(RemoteError::decode(operation, e.to_string())),
            Err(_) => Err(RemoteError::network_failed(operation, format!("HTTP {status}"))),
        }
    }
}

#[async_trait::async_trait]
impl CameraApi for HttpCameraApi {
    async fn list_cameras(&self) -> Result<CameraListing> {
        let payload: CameraListPayload = self.get("list cameras", wire::LIST_CAMERAS).await?;
        Ok(CameraListing { cameras: payload.cameras, state: payload.state })
    }

    async fn connect(&self, camera: &CameraId) -> Result<Option<RemoteState>> {
        let body = CameraRequest { camera: camera.clone() };
        let payload: ConnectPayload = self.post("connect", wire::CONNECT, &body).await?;
        Ok(payload.state)
    }

    async fn disconnect(&self, camera: &CameraId) -> Result<()> {
        let body = CameraRequest { camera: camera.clone() };
        self.post::<_, Ack>("disconnect", wire::DISCONNECT, &body).await.map(drop)
    }

    async fn start_shoot(&self, camera: &CameraId, parameters: &ShotParameters) -> Result<()> {
        let body = StartShootRequest { camera: camera.clone(), parameters: *parameters };
        self.post::<_, Ack>("start shoot", wire::START_SHOOT, &body).await.map(drop)
    }

    async fn stop_shoot(&self, camera: &CameraId) -> Result<()> {
        let body = CameraRequest { camera: camera.clone() };
        self.post::<_, Ack>("stop shoot", wire::STOP_SHOOT, &body).await.map(drop)
    }

    async fn take_picture(&self, camera: &CameraId) -> Result<()> {
        let body = CameraRequest { camera: camera.clone() };
        self.post::<_, Ack>("take picture", wire::TAKE_PICTURE, &body).await.map(drop)
    }

    async fn get_status(&self, camera: &CameraId) -> Result<StatusSnapshot> {
        let body = CameraRequest { camera: camera.clone() };
        let payload: StatusPayload = self.post("state", wire::STATE, &body).await?;
        Ok(payload.state)
    }
}
