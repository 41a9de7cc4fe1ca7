// src/error.rs
use std::path::PathBuf;

use thiserror::Error;

use crate::zones::DrumZone;

pub type Result<T> = std::result::Result<T, DrumError>;

#[derive(Debug, Error)]
pub enum DrumError {
    #[error("Invalid zone {zone}: {reason}")]
    InvalidZone { zone: DrumZone, reason: String },

    #[error("Zone {0} is declared more than once")]
    DuplicateZone(DrumZone),

    #[error("No sound sample configured for zone {0}")]
    MissingSound(DrumZone),

    /// An enter event named a zone that has no sound or rectangle bound to it.
    #[error("Zone {0} is not bound to the drum kit")]
    UnboundZone(DrumZone),

    #[error("Failed to load sound {}: {reason}", .path.display())]
    SoundLoad { path: PathBuf, reason: String },

    #[error("Audio output unavailable: {0}")]
    AudioDevice(String),

    #[error("Camera error: {0}")]
    Camera(String),

    #[error("Failed to capture frame: {0}")]
    Capture(String),

    #[error("Hand detector error: {0}")]
    Detector(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl DrumError {
    pub fn camera(msg: impl Into<String>) -> Self {
        Self::Camera(msg.into())
    }

    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture(msg.into())
    }

    pub fn detector(msg: impl Into<String>) -> Self {
        Self::Detector(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
