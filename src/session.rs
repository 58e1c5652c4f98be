//! Camera session: the user-facing verbs
//!
//! Each verb follows the same sequence:
//!
//! 1. Check the guard for the current state. A failed guard is a
//!    [`RemoteError::Rejected`] and no request is made.
//! 2. Call the backend through [`CameraApi`].
//! 3. On success, apply the matching store transition.
//! 4. On failure, return the error for the caller to surface. State is left
//!    as it was, except that a failed camera-list refresh resets the session.
//!
//! Only one verb runs at a time per session; a second call while another is
//! in flight is rejected rather than queued.

use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard, watch};
use tokio_stream::wrappers::WatchStream;
use tracing::{info, warn};

use crate::api::CameraApi;
use crate::store::{Controls, SessionStore, StoreSnapshot};
use crate::supervisor::{PollHealth, PollSettings, PollingSupervisor};
use crate::types::{CameraDescriptor, CameraId, ParameterField, parse_parameter};
use crate::{RemoteError, Result};

/// One client session against a camera backend.
pub struct CameraSession {
    api: Arc<dyn CameraApi>,
    store: Arc<SessionStore>,
    supervisor: PollingSupervisor,
    in_flight: Mutex<()>,
}

impl CameraSession {
    /// Create a session with a fresh store and start its polling supervisor.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(api: Arc<dyn CameraApi>, settings: PollSettings) -> Self {
        let store = Arc::new(SessionStore::new());
        let supervisor = PollingSupervisor::spawn(api.clone(), store.clone(), settings);
        Self { api, store, supervisor, in_flight: Mutex::new(()) }
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.store.snapshot()
    }

    /// Controls to enable right now. All locked while a verb is in flight.
    pub fn controls(&self) -> Controls {
        if self.is_busy() { Controls::locked() } else { self.store.controls() }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.try_lock().is_err()
    }

    pub fn poll_health(&self) -> PollHealth {
        self.supervisor.health()
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot> {
        self.store.subscribe()
    }

    pub fn updates(&self) -> WatchStream<StoreSnapshot> {
        self.store.updates()
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub fn supervisor(&self) -> &PollingSupervisor {
        &self.supervisor
    }

    /// Fetch the camera list. Any failure resets the session.
    pub async fn refresh_cameras(&self) -> Result<Vec<CameraDescriptor>> {
        let _guard = self.begin("refresh cameras")?;
        self.guard("refresh cameras", |c| c.refresh, "disconnect the camera first")?;

        match self.api.list_cameras().await {
            Ok(listing) => {
                info!(cameras = listing.cameras.len(), resumed = listing.state.is_some(), "Camera list refreshed");
                self.store.apply_camera_list(listing.cameras.clone(), listing.state.as_ref());
                Ok(listing.cameras)
            }
            Err(e) => {
                warn!(error = %e, "Camera list refresh failed, resetting session");
                self.store.reset();
                Err(e)
            }
        }
    }

    /// Choose which listed camera the next connect targets.
    pub fn select_camera(&self, id: &CameraId) -> Result<()> {
        let _guard = self.begin("select camera")?;
        self.store.apply_selection(id)?;
        info!(camera = %id, "Camera selected");
        Ok(())
    }

    pub async fn connect(&self) -> Result<()> {
        let _guard = self.begin("connect")?;
        self.guard("connect", |c| c.connect, "no available camera selected or already connected")?;
        let camera = self.selected_camera("connect")?;

        let remote = self
            .api
            .connect(&camera)
            .await
            .inspect_err(|e| warn!(camera = %camera, error = %e, "Connect failed"))?;
        self.store.apply_connected(remote.as_ref());
        info!(camera = %camera, "Camera connected");
        Ok(())
    }

    pub async fn disconnect(&self) -> Result<()> {
        let _guard = self.begin("disconnect")?;
        self.guard("disconnect", |c| c.disconnect, "not connected or a shoot is in progress")?;
        let camera = self.selected_camera("disconnect")?;

        self.api.disconnect(&camera).await.inspect_err(|e| warn!(camera = %camera, error = %e, "Disconnect failed"))?;
        self.store.apply_disconnected();
        info!(camera = %camera, "Camera disconnected");
        Ok(())
    }

    /// Start a shoot with the session's current parameters.
    pub async fn start_shoot(&self) -> Result<()> {
        let _guard = self.begin("start shoot")?;
        self.guard("start shoot", |c| c.start, "not connected or already shooting")?;
        let camera = self.selected_camera("start shoot")?;
        let parameters = self.store.snapshot().session.parameters;

        self.api
            .start_shoot(&camera, &parameters)
            .await
            .inspect_err(|e| warn!(camera = %camera, error = %e, "Start shoot failed"))?;
        self.store.apply_shooting_started()?;
        info!(
            camera = %camera,
            delay = parameters.delay_seconds,
            exposure = parameters.exposure_seconds,
            interval = parameters.interval_seconds,
            frames = parameters.frame_count,
            "Shoot started"
        );
        Ok(())
    }

    pub async fn stop_shoot(&self) -> Result<()> {
        let _guard = self.begin("stop shoot")?;
        self.guard("stop shoot", |c| c.stop, "no shoot in progress")?;
        let camera = self.selected_camera("stop shoot")?;

        self.api.stop_shoot(&camera).await.inspect_err(|e| warn!(camera = %camera, error = %e, "Stop shoot failed"))?;
        self.store.apply_shooting_stopped();
        info!(camera = %camera, "Shoot stopped");
        Ok(())
    }

    /// Trigger one exposure. Allowed while a shoot is running.
    pub async fn take_picture(&self) -> Result<()> {
        let _guard = self.begin("take picture")?;
        self.guard("take picture", |c| c.take_picture, "not connected")?;
        let camera = self.selected_camera("take picture")?;

        self.api
            .take_picture(&camera)
            .await
            .inspect_err(|e| warn!(camera = %camera, error = %e, "Take picture failed"))?;
        info!(camera = %camera, "Picture taken");
        Ok(())
    }

    pub fn edit_parameter(&self, field: ParameterField, value: u32) -> Result<()> {
        let _guard = self.begin("edit parameter")?;
        self.store.apply_parameter_edit(field, value)?;
        Ok(())
    }

    /// Edit a parameter from raw user input. Malformed text becomes 0.
    pub fn edit_parameter_text(&self, field: ParameterField, raw: &str) -> Result<()> {
        self.edit_parameter(field, parse_parameter(raw))
    }

    fn begin(&self, action: &str) -> Result<MutexGuard<'_, ()>> {
        self.in_flight
            .try_lock()
            .map_err(|_| RemoteError::rejected(action, "another action is in progress"))
    }

    fn guard(&self, action: &str, allowed: impl Fn(&Controls) -> bool, reason: &str) -> Result<()> {
        if allowed(&self.store.controls()) { Ok(()) } else { Err(RemoteError::rejected(action, reason)) }
    }

    fn selected_camera(&self, action: &str) -> Result<CameraId> {
        self.store
            .snapshot()
            .session
            .selected_camera
            .ok_or_else(|| RemoteError::rejected(action, "no camera selected"))
    }
}
