//! Session state store
//!
//! [`SessionStore`] owns the single [`StoreSnapshot`] of a session inside a
//! `tokio::sync::watch` channel. Writers go through named transitions, each a
//! pure function from [`transitions`]; the new snapshot is published only when
//! it differs from the old one, so observers never see redundant updates.
//!
//! ```rust
//! use shutterlink::store::SessionStore;
//! use shutterlink::types::CameraDescriptor;
//!
//! let store = SessionStore::new();
//! store.apply_camera_list(vec![CameraDescriptor::new(1, "Canon R5")], None);
//! store.apply_connected(None);
//!
//! assert!(store.snapshot().session.connected);
//! ```

mod controls;
pub mod transitions;

pub use controls::Controls;
pub use transitions::StoreSnapshot;

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::trace;

use crate::Result;
use crate::types::{CameraDescriptor, CameraId, ParameterField, RemoteState, StatusSnapshot};

/// Owner of the session snapshot.
#[derive(Debug)]
pub struct SessionStore {
    tx: watch::Sender<StoreSnapshot>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_snapshot(StoreSnapshot::default())
    }

    pub fn with_snapshot(snapshot: StoreSnapshot) -> Self {
        let (tx, _rx) = watch::channel(snapshot);
        Self { tx }
    }

    /// Copy of the current snapshot.
    pub fn snapshot(&self) -> StoreSnapshot {
        self.tx.borrow().clone()
    }

    pub fn controls(&self) -> Controls {
        Controls::for_snapshot(&self.tx.borrow())
    }

    /// Receiver that is notified on every committed change.
    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot> {
        self.tx.subscribe()
    }

    /// Stream of snapshots, starting with the current one.
    pub fn updates(&self) -> WatchStream<StoreSnapshot> {
        WatchStream::new(self.tx.subscribe())
    }

    pub fn apply_camera_list(&self, cameras: Vec<CameraDescriptor>, remote: Option<&RemoteState>) -> bool {
        self.commit("camera list", |current| current.apply_camera_list(cameras, remote))
    }

    pub fn apply_selection(&self, id: &CameraId) -> Result<bool> {
        self.try_commit("selection", |current| current.apply_selection(id))
    }

    pub fn apply_connected(&self, remote: Option<&RemoteState>) -> bool {
        self.commit("connected", |current| current.apply_connected(remote))
    }

    pub fn apply_disconnected(&self) -> bool {
        self.commit("disconnected", StoreSnapshot::apply_disconnected)
    }

    pub fn apply_shooting_started(&self) -> Result<bool> {
        self.try_commit("shooting started", StoreSnapshot::apply_shooting_started)
    }

    pub fn apply_shooting_stopped(&self) -> bool {
        self.commit("shooting stopped", StoreSnapshot::apply_shooting_stopped)
    }

    pub fn apply_parameter_edit(&self, field: ParameterField, value: u32) -> Result<bool> {
        self.try_commit("parameter edit", |current| current.apply_parameter_edit(field, value))
    }

    pub fn apply_poll_result(&self, generation: u64, status: &StatusSnapshot) -> bool {
        self.commit("poll result", |current| current.apply_poll_result(generation, status))
    }

    pub fn reset(&self) -> bool {
        self.commit("reset", StoreSnapshot::reset)
    }

    /// Apply an infallible transition. Returns whether the snapshot changed.
    fn commit(&self, transition: &'static str, f: impl FnOnce(&StoreSnapshot) -> StoreSnapshot) -> bool {
        self.tx.send_if_modified(|current| {
            let next = f(current);
            if next == *current {
                return false;
            }
            trace!(transition, "Committing state change");
            *current = next;
            true
        })
    }

    /// Apply a guarded transition. A rejection leaves the snapshot untouched.
    fn try_commit(
        &self,
        transition: &'static str,
        f: impl FnOnce(&StoreSnapshot) -> Result<StoreSnapshot>,
    ) -> Result<bool> {
        let mut outcome = Ok(false);
        self.tx.send_if_modified(|current| match f(current) {
            Ok(next) if next == *current => false,
            Ok(next) => {
                trace!(transition, "Committing state change");
                *current = next;
                outcome = Ok(true);
                true
            }
            Err(rejection) => {
                outcome = Err(rejection);
                false
            }
        });
        outcome
    }
}
