//! Core types for camera session data.
//!
//! These are the values that flow between the backend, the session store and
//! the presentation layer:
//! - [`CameraDescriptor`] is one entry of the backend's camera enumeration
//! - [`SessionState`] is the client's canonical view of a session
//! - [`ShotParameters`] holds the intervalometer settings for a run
//! - [`RemoteState`] and [`StatusSnapshot`] are the state blocks the backend reports
//!
//! ## Usage Example
//!
//! ```rust
//! use shutterlink::types::{ParameterField, ShotParameters, parse_parameter};
//!
//! let parameters = ShotParameters::default()
//!     .with(ParameterField::IntervalSeconds, parse_parameter("5"))
//!     .with(ParameterField::FrameCount, parse_parameter("not a number"));
//!
//! assert_eq!(parameters.interval_seconds, 5);
//! assert_eq!(parameters.frame_count, 0);
//! ```

mod camera;
mod parameters;
mod state;

pub use camera::{CameraDescriptor, CameraId};
pub use parameters::{ParameterField, ShotParameters, clamp_parameter, parse_parameter};
pub use state::{RemoteState, SessionState, StatusSnapshot};
