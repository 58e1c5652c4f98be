//! Session state as seen by the client and as reported by the backend

use serde::{Deserialize, Serialize};

use super::{CameraId, ShotParameters, clamp_parameter};

/// Canonical client-side view of one camera session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub selected_camera: Option<CameraId>,
    pub connected: bool,
    pub shooting: bool,
    pub parameters: ShotParameters,
    /// Continuous-exposure flag. Carried through state updates, never sent.
    pub hold_mode: bool,
}

/// State block as serialized by the backend.
///
/// Every field is optional on the wire. Parameters arrive signed because the
/// backend uses -1 for unparseable input; [`RemoteState::parameters`] clamps them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(default)]
pub struct RemoteState {
    pub connected: bool,
    pub shooting: bool,
    pub delay: i64,
    pub exposure: i64,
    pub interval: i64,
    pub frames: i64,
    pub hold: bool,
}

impl RemoteState {
    pub fn parameters(&self) -> ShotParameters {
        ShotParameters::new(
            clamp_parameter(self.delay),
            clamp_parameter(self.exposure),
            clamp_parameter(self.interval),
            clamp_parameter(self.frames),
        )
    }
}

/// Polled shooting status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct StatusSnapshot {
    #[serde(default)]
    pub shooting: bool,
    /// Progress counter some backends include. Informational only.
    #[serde(default, alias = "framesTaken", skip_serializing_if = "Option::is_none")]
    pub frames_taken: Option<u32>,
}

impl StatusSnapshot {
    pub fn shooting(shooting: bool) -> Self {
        Self { shooting, frames_taken: None }
    }
}
