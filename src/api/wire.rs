//! Request and response bodies exchanged with the backend

use serde::{Deserialize, Serialize};

use crate::types::{CameraDescriptor, CameraId, RemoteState, ShotParameters, StatusSnapshot};

pub const LIST_CAMERAS: &str = "/api/cameras";
pub const CONNECT: &str = "/api/camera/connect";
pub const DISCONNECT: &str = "/api/camera/disconnect";
pub const START_SHOOT: &str = "/api/camera/start-shoot";
pub const STOP_SHOOT: &str = "/api/camera/stop-shoot";
pub const STATE: &str = "/api/camera/state";
pub const TAKE_PICTURE: &str = "/api/camera/take-picture";

/// Body of every single-camera request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraRequest {
    pub camera: CameraId,
}

/// Body of a start-shoot request. Parameter keys sit next to `camera`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartShootRequest {
    pub camera: CameraId,
    #[serde(flatten)]
    pub parameters: ShotParameters,
}

/// Success payload carrying nothing but the status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Ack {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CameraListPayload {
    #[serde(default)]
    pub cameras: Vec<CameraDescriptor>,
    #[serde(default)]
    pub state: Option<RemoteState>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConnectPayload {
    #[serde(default)]
    pub state: Option<RemoteState>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StatusPayload {
    pub state: StatusSnapshot,
}
