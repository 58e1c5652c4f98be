//! Camera identity as enumerated by the backend

use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend-assigned camera identifier.
///
/// Backends hand out either numeric indices or opaque names; both round-trip
/// unchanged into request bodies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(untagged)]
pub enum CameraId {
    Index(u64),
    Name(String),
}

impl fmt::Display for CameraId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraId::Index(index) => write!(f, "{index}"),
            CameraId::Name(name) => f.write_str(name),
        }
    }
}

impl From<u64> for CameraId {
    fn from(index: u64) -> Self {
        CameraId::Index(index)
    }
}

impl From<&str> for CameraId {
    fn from(name: &str) -> Self {
        CameraId::Name(name.to_string())
    }
}

impl From<String> for CameraId {
    fn from(name: String) -> Self {
        CameraId::Name(name)
    }
}

/// One entry of the backend's camera enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct CameraDescriptor {
    pub id: CameraId,
    #[serde(default)]
    pub description: String,
    /// Listed cameras are assumed available unless the backend says otherwise.
    #[serde(default = "available_by_default")]
    pub available: bool,
}

fn available_by_default() -> bool {
    true
}

impl CameraDescriptor {
    pub fn new(id: impl Into<CameraId>, description: impl Into<String>) -> Self {
        Self { id: id.into(), description: description.into(), available: true }
    }

    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }
}
