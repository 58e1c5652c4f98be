//! In-memory camera backend for unit tests
//!
//! [`FakeCameraApi`] behaves like a cooperative backend: connect, start and
//! stop update its own state, and any operation can be switched to fail with
//! either a backend description or a network error.

#![cfg(test)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::api::{CameraApi, CameraListing};
use crate::types::{CameraDescriptor, CameraId, RemoteState, ShotParameters, StatusSnapshot};
use crate::{RemoteError, Result};

/// Backend operations, used to address counters and injected failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    List,
    Connect,
    Disconnect,
    StartShoot,
    StopShoot,
    TakePicture,
    Status,
}

#[derive(Debug, Clone)]
enum Failure {
    Backend(String),
    Network(String),
}

#[derive(Debug, Default)]
struct Inner {
    cameras: Vec<CameraDescriptor>,
    listing_state: Option<RemoteState>,
    remote: RemoteState,
    status: StatusSnapshot,
    status_delay: Option<Duration>,
    failures: HashMap<Op, Failure>,
    calls: HashMap<Op, usize>,
    last_parameters: Option<ShotParameters>,
}

#[derive(Debug, Default)]
pub struct FakeCameraApi {
    inner: Mutex<Inner>,
}

impl FakeCameraApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_camera(camera: CameraDescriptor) -> Self {
        let api = Self::new();
        api.set_cameras(vec![camera]);
        api
    }

    pub fn set_cameras(&self, cameras: Vec<CameraDescriptor>) {
        self.inner.lock().unwrap().cameras = cameras;
    }

    /// State block returned alongside the camera list.
    pub fn set_listing_state(&self, state: Option<RemoteState>) {
        self.inner.lock().unwrap().listing_state = state;
    }

    /// State block returned by connect.
    pub fn set_remote_state(&self, state: RemoteState) {
        self.inner.lock().unwrap().remote = state;
    }

    pub fn set_status(&self, status: StatusSnapshot) {
        let mut inner = self.inner.lock().unwrap();
        inner.status = status;
        inner.failures.remove(&Op::Status);
    }

    /// Hold every status response for `delay` of tokio time.
    pub fn set_status_delay(&self, delay: Duration) {
        self.inner.lock().unwrap().status_delay = Some(delay);
    }

    pub fn fail_status_with(&self, description: &str) {
        self.fail(Op::Status, description);
    }

    /// Make `op` answer `status: "failure"` with `description` until cleared.
    pub fn fail(&self, op: Op, description: &str) {
        self.inner.lock().unwrap().failures.insert(op, Failure::Backend(description.to_string()));
    }

    /// Make `op` fail as if the request never completed.
    pub fn fail_network(&self, op: Op, reason: &str) {
        self.inner.lock().unwrap().failures.insert(op, Failure::Network(reason.to_string()));
    }

    pub fn clear_failure(&self, op: Op) {
        self.inner.lock().unwrap().failures.remove(&op);
    }

    pub fn calls(&self, op: Op) -> usize {
        self.inner.lock().unwrap().calls.get(&op).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.inner.lock().unwrap().calls.values().sum()
    }

    pub fn status_calls(&self) -> usize {
        self.calls(Op::Status)
    }

    pub fn last_parameters(&self) -> Option<ShotParameters> {
        self.inner.lock().unwrap().last_parameters
    }

    /// Count the call and return any injected failure for it.
    fn enter(&self, op: Op, operation: &str) -> Result<std::sync::MutexGuard<'_, Inner>> {
        let mut inner = self.inner.lock().unwrap();
        *inner.calls.entry(op).or_default() += 1;
        match inner.failures.get(&op) {
            Some(Failure::Backend(description)) => Err(RemoteError::backend(operation, description.clone())),
            Some(Failure::Network(reason)) => Err(RemoteError::network_failed(operation, reason.clone())),
            None => Ok(inner),
        }
    }
}

#[async_trait::async_trait]
impl CameraApi for FakeCameraApi {
    async fn list_cameras(&self) -> Result<CameraListing> {
        let inner = self.enter(Op::List, "list cameras")?;
        Ok(CameraListing { cameras: inner.cameras.clone(), state: inner.listing_state.clone() })
    }

    async fn connect(&self, _camera: &CameraId) -> Result<Option<RemoteState>> {
        let mut inner = self.enter(Op::Connect, "connect")?;
        inner.remote.connected = true;
        Ok(Some(inner.remote.clone()))
    }

    async fn disconnect(&self, _camera: &CameraId) -> Result<()> {
        let mut inner = self.enter(Op::Disconnect, "disconnect")?;
        inner.remote.connected = false;
        Ok(())
    }

    async fn start_shoot(&self, _camera: &CameraId, parameters: &ShotParameters) -> Result<()> {
        let mut inner = self.enter(Op::StartShoot, "start shoot")?;
        inner.last_parameters = Some(*parameters);
        inner.remote.shooting = true;
        Ok(())
    }

    async fn stop_shoot(&self, _camera: &CameraId) -> Result<()> {
        let mut inner = self.enter(Op::StopShoot, "stop shoot")?;
        inner.remote.shooting = false;
        Ok(())
    }

    async fn take_picture(&self, _camera: &CameraId) -> Result<()> {
        self.enter(Op::TakePicture, "take picture").map(drop)
    }

    async fn get_status(&self, _camera: &CameraId) -> Result<StatusSnapshot> {
        let (status, delay) = {
            let inner = self.enter(Op::Status, "state")?;
            (inner.status, inner.status_delay)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(status)
    }
}
