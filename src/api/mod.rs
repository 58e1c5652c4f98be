//! Backend camera API
//!
//! [`CameraApi`] is the seam between session logic and the backend that owns
//! the camera hardware. [`HttpCameraApi`] talks to the real backend over HTTP;
//! tests substitute in-memory implementations.
//!
//! Every backend response is an envelope tagged with `status`. Envelopes are
//! decoded into an [`ApiOutcome`] and then into a [`Result`], so callers only
//! ever see [`RemoteError::Backend`] for `status: "failure"`.

mod http;
pub mod wire;

pub use http::HttpCameraApi;

use serde::Deserialize;

use crate::types::{CameraDescriptor, CameraId, RemoteState, ShotParameters, StatusSnapshot};
use crate::{RemoteError, Result};

/// Camera enumeration result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CameraListing {
    pub cameras: Vec<CameraDescriptor>,
    /// Backend's current session state, when it reports one.
    pub state: Option<RemoteState>,
}

/// Operations the backend exposes for one camera at a time.
///
/// Implementations make exactly one request per call: no retries, no caching.
#[async_trait::async_trait]
pub trait CameraApi: Send + Sync + 'static {
    async fn list_cameras(&self) -> Result<CameraListing>;

    /// Returns the backend's state block for the connected camera, when present.
    async fn connect(&self, camera: &CameraId) -> Result<Option<RemoteState>>;

    async fn disconnect(&self, camera: &CameraId) -> Result<()>;

    async fn start_shoot(&self, camera: &CameraId, parameters: &ShotParameters) -> Result<()>;

    async fn stop_shoot(&self, camera: &CameraId) -> Result<()>;

    /// Trigger a single exposure. Does not affect shooting state.
    async fn take_picture(&self, camera: &CameraId) -> Result<()>;

    /// Authoritative shooting status, used by the polling supervisor.
    async fn get_status(&self, camera: &CameraId) -> Result<StatusSnapshot>;
}

/// Decoded backend envelope.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ApiOutcome<T> {
    Success(T),
    Failure {
        #[serde(default = "unspecified_failure")]
        description: String,
    },
}

fn unspecified_failure() -> String {
    "The camera server reported an unspecified failure".to_string()
}

impl<T> ApiOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, ApiOutcome::Success(_))
    }

    pub fn into_result(self, operation: &str) -> Result<T> {
        match self {
            ApiOutcome::Success(payload) => Ok(payload),
            ApiOutcome::Failure { description } => Err(RemoteError::backend(operation, description)),
        }
    }
}
