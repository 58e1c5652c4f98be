//! Pure state transitions
//!
//! Every transition takes the current [`StoreSnapshot`] by reference and
//! returns the next one. Nothing here performs I/O or mutates in place, so the
//! same functions back both the live store and the property tests.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{
    CameraDescriptor, CameraId, ParameterField, RemoteState, SessionState, StatusSnapshot,
};
use crate::{RemoteError, Result};

/// Everything the store owns: the last camera list and the session built on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub cameras: Vec<CameraDescriptor>,
    pub session: SessionState,
    /// Bumped each time a shoot starts. Poll results issued under an older
    /// generation are discarded.
    pub shoot_generation: u64,
}

impl StoreSnapshot {
    /// The descriptor for the selected camera, if any.
    pub fn selected(&self) -> Option<&CameraDescriptor> {
        let id = self.session.selected_camera.as_ref()?;
        self.cameras.iter().find(|camera| &camera.id == id)
    }

    /// Replace the camera list.
    ///
    /// A list with no available camera resets the session. Otherwise the
    /// current selection is kept when it is still listed and available, and
    /// the first available camera is selected when it is not. A backend state
    /// block, when present, is adopted for the selected camera.
    pub fn apply_camera_list(
        &self,
        cameras: Vec<CameraDescriptor>,
        remote: Option<&RemoteState>,
    ) -> Self {
        let first_available = cameras.iter().find(|camera| camera.available).map(|c| c.id.clone());
        let Some(first_available) = first_available else {
            debug!(listed = cameras.len(), "No available camera, resetting session");
            return Self { cameras, shoot_generation: self.shoot_generation, ..Self::default() };
        };

        let keep_current = self
            .session
            .selected_camera
            .as_ref()
            .is_some_and(|id| cameras.iter().any(|camera| &camera.id == id && camera.available));

        let mut next = self.clone();
        next.cameras = cameras;

        if !keep_current {
            next.session = SessionState {
                selected_camera: Some(first_available),
                parameters: self.session.parameters,
                ..SessionState::default()
            };
        }

        if let Some(remote) = remote {
            next = next.adopt_remote(remote);
        }

        next
    }

    /// Select another listed camera. Only allowed while disconnected.
    pub fn apply_selection(&self, id: &CameraId) -> Result<Self> {
        if self.session.connected {
            return Err(RemoteError::rejected("select camera", "disconnect the current camera first"));
        }
        match self.cameras.iter().find(|camera| &camera.id == id) {
            Some(camera) if camera.available => {
                let mut next = self.clone();
                next.session.selected_camera = Some(id.clone());
                Ok(next)
            }
            Some(_) => Err(RemoteError::rejected("select camera", format!("camera {id} is not available"))),
            None => Err(RemoteError::rejected("select camera", format!("camera {id} is not listed"))),
        }
    }

    /// Mark the session connected. Connecting never starts a shoot.
    pub fn apply_connected(&self, remote: Option<&RemoteState>) -> Self {
        let mut next = self.clone();
        next.session.connected = true;
        next.session.shooting = false;
        if let Some(remote) = remote {
            next.session.parameters = remote.parameters();
            next.session.hold_mode = remote.hold;
        }
        next
    }

    pub fn apply_disconnected(&self) -> Self {
        let mut next = self.clone();
        next.session.connected = false;
        next.session.shooting = false;
        next
    }

    /// Mark the session shooting. Refused while disconnected.
    pub fn apply_shooting_started(&self) -> Result<Self> {
        if !self.session.connected {
            return Err(RemoteError::rejected("start shoot", "camera is not connected"));
        }
        let mut next = self.clone();
        if !next.session.shooting {
            next.session.shooting = true;
            next.shoot_generation += 1;
        }
        Ok(next)
    }

    pub fn apply_shooting_stopped(&self) -> Self {
        let mut next = self.clone();
        next.session.shooting = false;
        next
    }

    /// Set one shot parameter. Refused while disconnected or shooting.
    pub fn apply_parameter_edit(&self, field: ParameterField, value: u32) -> Result<Self> {
        if !self.session.connected {
            return Err(RemoteError::rejected("edit parameter", "camera is not connected"));
        }
        if self.session.shooting {
            return Err(RemoteError::rejected("edit parameter", "a shoot is in progress"));
        }
        let mut next = self.clone();
        next.session.parameters = next.session.parameters.with(field, value);
        Ok(next)
    }

    /// Reconcile a polled status.
    ///
    /// Only the `shooting` flag is read, and only a running shoot can be ended
    /// by a poll. Results from an earlier shoot generation, or arriving after
    /// the shoot already stopped, are stale and leave the snapshot unchanged.
    pub fn apply_poll_result(&self, generation: u64, status: &StatusSnapshot) -> Self {
        if generation != self.shoot_generation || !self.session.shooting {
            debug!(generation, current = self.shoot_generation, "Discarding stale poll result");
            return self.clone();
        }
        if status.shooting == self.session.shooting {
            return self.clone();
        }
        self.apply_shooting_stopped()
    }

    /// Back to an empty session with no cameras.
    pub fn reset(&self) -> Self {
        Self { shoot_generation: self.shoot_generation, ..Self::default() }
    }

    fn adopt_remote(mut self, remote: &RemoteState) -> Self {
        let was_shooting = self.session.shooting;
        self.session.connected = remote.connected;
        self.session.shooting = remote.connected && remote.shooting;
        self.session.parameters = remote.parameters();
        self.session.hold_mode = remote.hold;
        if self.session.shooting && !was_shooting {
            self.shoot_generation += 1;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ShotParameters;

    fn canon() -> CameraDescriptor {
        CameraDescriptor::new(1, "Canon R5")
    }

    fn connected() -> StoreSnapshot {
        StoreSnapshot::default().apply_camera_list(vec![canon()], None).apply_connected(None)
    }

    #[test]
    fn first_available_camera_is_selected() {
        let snapshot = StoreSnapshot::default().apply_camera_list(
            vec![CameraDescriptor::new(0, "Broken").unavailable(), canon()],
            None,
        );
        assert_eq!(snapshot.session.selected_camera, Some(CameraId::Index(1)));
    }

    #[test]
    fn existing_selection_survives_refresh() {
        let list = vec![canon(), CameraDescriptor::new(2, "EOS 90D")];
        let snapshot = StoreSnapshot::default()
            .apply_camera_list(list.clone(), None)
            .apply_selection(&CameraId::Index(2))
            .unwrap()
            .apply_camera_list(list, None);
        assert_eq!(snapshot.session.selected_camera, Some(CameraId::Index(2)));
    }

    #[test]
    fn empty_or_unavailable_list_resets() {
        let start = connected().apply_parameter_edit(ParameterField::FrameCount, 9).unwrap();

        let empty = start.apply_camera_list(Vec::new(), None);
        assert_eq!(empty.session, SessionState::default());

        let unavailable = start.apply_camera_list(vec![canon().unavailable()], None);
        assert_eq!(unavailable.session, SessionState::default());
        assert_eq!(unavailable.cameras.len(), 1);
    }

    #[test]
    fn remote_state_is_adopted_on_refresh() {
        let remote = RemoteState { connected: true, shooting: true, frames: 20, ..Default::default() };
        let snapshot = StoreSnapshot::default().apply_camera_list(vec![canon()], Some(&remote));

        assert!(snapshot.session.connected);
        assert!(snapshot.session.shooting);
        assert_eq!(snapshot.session.parameters.frame_count, 20);
        assert_eq!(snapshot.shoot_generation, 1);
    }

    #[test]
    fn remote_shooting_without_connection_is_ignored() {
        let remote = RemoteState { connected: false, shooting: true, ..Default::default() };
        let snapshot = StoreSnapshot::default().apply_camera_list(vec![canon()], Some(&remote));
        assert!(!snapshot.session.shooting);
    }

    #[test]
    fn connect_never_starts_shooting() {
        let remote = RemoteState { connected: true, shooting: true, delay: 3, ..Default::default() };
        let snapshot = StoreSnapshot::default()
            .apply_camera_list(vec![canon()], None)
            .apply_connected(Some(&remote));

        assert!(snapshot.session.connected);
        assert!(!snapshot.session.shooting);
        assert_eq!(snapshot.session.parameters.delay_seconds, 3);
    }

    #[test]
    fn shooting_requires_connection() {
        let snapshot = StoreSnapshot::default().apply_camera_list(vec![canon()], None);
        assert!(snapshot.apply_shooting_started().is_err());
    }

    #[test]
    fn selection_rules() {
        let listed = StoreSnapshot::default()
            .apply_camera_list(vec![canon(), CameraDescriptor::new(2, "Off").unavailable()], None);

        assert!(listed.apply_selection(&CameraId::Index(9)).is_err());
        assert!(listed.apply_selection(&CameraId::Index(2)).is_err());
        assert!(listed.apply_connected(None).apply_selection(&CameraId::Index(1)).is_err());
    }

    #[test]
    fn edits_are_refused_while_shooting_or_disconnected() {
        let shooting = connected().apply_shooting_started().unwrap();
        assert!(shooting.apply_parameter_edit(ParameterField::DelaySeconds, 4).is_err());

        let disconnected = StoreSnapshot::default().apply_camera_list(vec![canon()], None);
        assert!(disconnected.apply_parameter_edit(ParameterField::DelaySeconds, 4).is_err());

        let edited = connected().apply_parameter_edit(ParameterField::DelaySeconds, 4).unwrap();
        assert_eq!(edited.session.parameters, ShotParameters::new(4, 0, 0, 0));
    }

    #[test]
    fn poll_result_ends_current_shoot() {
        let shooting = connected().apply_shooting_started().unwrap();
        let generation = shooting.shoot_generation;

        let still = shooting.apply_poll_result(generation, &StatusSnapshot::shooting(true));
        assert_eq!(still, shooting);

        let done = shooting.apply_poll_result(generation, &StatusSnapshot::shooting(false));
        assert!(!done.session.shooting);
        assert!(done.session.connected);
    }

    #[test]
    fn stale_poll_results_are_discarded() {
        let first = connected().apply_shooting_started().unwrap();
        let stale_generation = first.shoot_generation;

        // Stopped and restarted before the old poll response arrived.
        let second = first.apply_shooting_stopped().apply_shooting_started().unwrap();
        let after = second.apply_poll_result(stale_generation, &StatusSnapshot::shooting(false));
        assert!(after.session.shooting);

        // A late "still shooting" answer cannot restart a stopped shoot.
        let stopped = second.apply_shooting_stopped();
        let after = stopped.apply_poll_result(second.shoot_generation, &StatusSnapshot::shooting(true));
        assert!(!after.session.shooting);
    }
}
