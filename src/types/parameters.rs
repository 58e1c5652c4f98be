//! Shot parameters for an intervalometer run

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{RemoteError, Result};

/// One editable shot parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(rename_all = "camelCase")]
pub enum ParameterField {
    /// Wait between pressing start and the first exposure
    DelaySeconds,
    /// Length of each exposure
    ExposureSeconds,
    /// Time between consecutive frames
    IntervalSeconds,
    /// Number of frames to capture
    FrameCount,
}

impl ParameterField {
    pub const ALL: [ParameterField; 4] = [
        ParameterField::DelaySeconds,
        ParameterField::ExposureSeconds,
        ParameterField::IntervalSeconds,
        ParameterField::FrameCount,
    ];

    /// Key used for this field in backend request and state bodies.
    pub fn wire_name(self) -> &'static str {
        match self {
            ParameterField::DelaySeconds => "delay",
            ParameterField::ExposureSeconds => "exposure",
            ParameterField::IntervalSeconds => "interval",
            ParameterField::FrameCount => "frames",
        }
    }
}

impl fmt::Display for ParameterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for ParameterField {
    type Err = RemoteError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "delay" | "delaySeconds" => Ok(ParameterField::DelaySeconds),
            "exposure" | "exposureSeconds" => Ok(ParameterField::ExposureSeconds),
            "interval" | "intervalSeconds" => Ok(ParameterField::IntervalSeconds),
            "frames" | "frameCount" => Ok(ParameterField::FrameCount),
            other => Err(RemoteError::rejected("edit parameter", format!("unknown field '{other}'"))),
        }
    }
}

/// Delay, exposure, interval and frame count for one shooting session.
///
/// Unsigned by construction; values coming from text or the backend pass
/// through [`clamp_parameter`] first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct ShotParameters {
    #[serde(rename = "delay", default)]
    pub delay_seconds: u32,
    #[serde(rename = "exposure", default)]
    pub exposure_seconds: u32,
    #[serde(rename = "interval", default)]
    pub interval_seconds: u32,
    #[serde(rename = "frames", default)]
    pub frame_count: u32,
}

impl ShotParameters {
    pub fn new(delay_seconds: u32, exposure_seconds: u32, interval_seconds: u32, frame_count: u32) -> Self {
        Self { delay_seconds, exposure_seconds, interval_seconds, frame_count }
    }

    pub fn get(&self, field: ParameterField) -> u32 {
        match field {
            ParameterField::DelaySeconds => self.delay_seconds,
            ParameterField::ExposureSeconds => self.exposure_seconds,
            ParameterField::IntervalSeconds => self.interval_seconds,
            ParameterField::FrameCount => self.frame_count,
        }
    }

    /// Copy with one field replaced.
    pub fn with(mut self, field: ParameterField, value: u32) -> Self {
        match field {
            ParameterField::DelaySeconds => self.delay_seconds = value,
            ParameterField::ExposureSeconds => self.exposure_seconds = value,
            ParameterField::IntervalSeconds => self.interval_seconds = value,
            ParameterField::FrameCount => self.frame_count = value,
        }
        self
    }
}

/// Clamp a signed value into the valid parameter range.
pub fn clamp_parameter(value: i64) -> u32 {
    value.clamp(0, u32::MAX as i64) as u32
}

/// Parse user-entered text into a parameter value.
///
/// Reads an optional sign and the leading run of digits, ignoring anything
/// after it. Text with no digits, and negative numbers, become 0.
pub fn parse_parameter(raw: &str) -> u32 {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: &str = {
        let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        &rest[..end]
    };

    if digits.is_empty() || negative {
        return 0;
    }

    // Saturates on overflow; any run of digits is non-negative here.
    digits.parse::<u64>().map(|v| v.min(u32::MAX as u64) as u32).unwrap_or(u32::MAX)
}
