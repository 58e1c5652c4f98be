//! Which controls a presentation layer should enable

use serde::{Deserialize, Serialize};

use super::StoreSnapshot;

/// Enabled/disabled flags derived from a snapshot.
///
/// Each flag matches the guard the corresponding session verb enforces, so a
/// control that is enabled here will not be rejected for state reasons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(rename_all = "camelCase")]
pub struct Controls {
    pub refresh: bool,
    pub connect: bool,
    pub disconnect: bool,
    pub edit_parameters: bool,
    pub start: bool,
    pub stop: bool,
    pub take_picture: bool,
}

impl Controls {
    pub fn for_snapshot(snapshot: &StoreSnapshot) -> Self {
        let session = &snapshot.session;
        let camera_ready = snapshot.selected().is_some_and(|camera| camera.available);
        let idle_connection = session.connected && !session.shooting;

        Self {
            refresh: !session.connected,
            connect: camera_ready && !session.connected,
            disconnect: idle_connection,
            edit_parameters: idle_connection,
            start: idle_connection,
            stop: session.shooting,
            take_picture: session.connected,
        }
    }

    /// Every control disabled, used while an action is in flight.
    pub fn locked() -> Self {
        Self::default()
    }
}

impl From<&StoreSnapshot> for Controls {
    fn from(snapshot: &StoreSnapshot) -> Self {
        Controls::for_snapshot(snapshot)
    }
}
