//! Async session client for remote intervalometer camera backends.
//!
//! Shutterlink drives a time-lapse workflow against a backend HTTP service
//! that owns the camera hardware: list cameras, connect, set delay, exposure,
//! interval and frame count, start and stop shoots, and trigger single shots.
//!
//! # Architecture
//!
//! - **API client** ([`api`]): one typed call per backend endpoint
//! - **Session store** ([`store`]): the canonical session snapshot, changed only
//!   through named pure transitions
//! - **Polling supervisor** ([`supervisor`]): polls shoot status while, and only
//!   while, a shoot is running
//! - **Camera session** ([`CameraSession`]): the guarded user-facing verbs
//!
//! ## Example
//!
//! ```rust,no_run
//! use shutterlink::{ParameterField, Shutterlink};
//!
//! #[tokio::main]
//! async fn main() -> shutterlink::Result<()> {
//!     let session = Shutterlink::from_env()?;
//!
//!     session.refresh_cameras().await?;
//!     session.connect().await?;
//!     session.edit_parameter(ParameterField::IntervalSeconds, 5)?;
//!     session.edit_parameter(ParameterField::FrameCount, 120)?;
//!     session.start_shoot().await?;
//!
//!     let mut updates = session.subscribe();
//!     while updates.changed().await.is_ok() {
//!         if !updates.borrow().session.shooting {
//!             break;
//!         }
//!     }
//!     Ok(())
//! }
//! ```

mod error;
#[cfg(test)]
mod test_utils;

pub mod api;
pub mod config;
pub mod session;
pub mod store;
pub mod supervisor;
pub mod types;

pub use api::{ApiOutcome, CameraApi, CameraListing, HttpCameraApi};
pub use config::RemoteConfig;
pub use error::*;
pub use session::CameraSession;
pub use store::{Controls, SessionStore, StoreSnapshot};
pub use supervisor::{PollHealth, PollPhase, PollSettings, PollingSupervisor};
pub use types::*;

use std::sync::Arc;

/// Unified entry point for camera sessions.
///
/// Every constructor spawns the session's polling supervisor, so each must be
/// called from within a tokio runtime.
pub struct Shutterlink;

impl Shutterlink {
    /// Session against the backend named by the environment.
    ///
    /// See [`config`] for the variables read.
    ///
    /// # Errors
    ///
    /// Returns a config error if a variable is malformed or the backend URL
    /// is not an http(s) URL.
    pub fn from_env() -> Result<CameraSession> {
        Self::with_config(&RemoteConfig::from_env()?)
    }

    /// Session against the backend described by `config`.
    ///
    /// ```rust,no_run
    /// use shutterlink::{RemoteConfig, Shutterlink};
    ///
    /// # #[tokio::main]
    /// # async fn main() -> shutterlink::Result<()> {
    /// let config = RemoteConfig::default().with_base_url("http://raspberrypi.local:8000");
    /// let session = Shutterlink::with_config(&config)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_config(config: &RemoteConfig) -> Result<CameraSession> {
        let api = HttpCameraApi::new(config)?;
        Ok(Self::with_api(Arc::new(api), config))
    }

    /// Session over any [`CameraApi`] implementation.
    pub fn with_api(api: Arc<dyn CameraApi>, config: &RemoteConfig) -> CameraSession {
        CameraSession::new(api, PollSettings::from(config))
    }

    /// Session against the backend described by `config`, with the camera
    /// list already fetched.
    ///
    /// A failed initial refresh is logged and leaves the session in its
    /// reset state; call [`CameraSession::refresh_cameras`] to retry.
    ///
    /// # Errors
    ///
    /// Only configuration errors are returned.
    pub async fn open(config: &RemoteConfig) -> Result<CameraSession> {
        let api = HttpCameraApi::new(config)?;
        Ok(Self::open_with_api(Arc::new(api), config).await)
    }

    /// [`Shutterlink::open`] over any [`CameraApi`] implementation.
    pub async fn open_with_api(api: Arc<dyn CameraApi>, config: &RemoteConfig) -> CameraSession {
        let session = Self::with_api(api, config);
        if let Err(e) = session.refresh_cameras().await {
            tracing::warn!(error = %e, "Initial camera refresh failed");
        }
        session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FakeCameraApi, Op};

    #[tokio::test]
    async fn open_fetches_the_camera_list() {
        let api = Arc::new(FakeCameraApi::with_camera(CameraDescriptor::new(1, "Canon R5")));
        let session = Shutterlink::open_with_api(api.clone(), &RemoteConfig::default()).await;

        assert_eq!(api.calls(Op::List), 1);
        let snapshot = session.snapshot();
        assert_eq!(snapshot.cameras.len(), 1);
        assert_eq!(snapshot.session.selected_camera, Some(CameraId::Index(1)));
        assert!(session.controls().connect);
    }

    #[tokio::test]
    async fn open_survives_a_failed_refresh() {
        let api = Arc::new(FakeCameraApi::with_camera(CameraDescriptor::new(1, "Canon R5")));
        api.fail_network(Op::List, "connection refused");
        let session = Shutterlink::open_with_api(api.clone(), &RemoteConfig::default()).await;

        assert_eq!(session.snapshot(), StoreSnapshot::default());
        api.clear_failure(Op::List);
        session.refresh_cameras().await.unwrap();
        assert_eq!(session.snapshot().cameras.len(), 1);
    }

    #[tokio::test]
    async fn open_rejects_bad_config() {
        let config = RemoteConfig::default().with_base_url("ftp://camera.local");
        let error = Shutterlink::open(&config).await.err().unwrap();
        assert_eq!(error.kind(), ErrorKind::Config);
    }
}
