// src/config.rs - Static drum kit configuration
use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use crate::error::{DrumError, Result};
use crate::tracking::TrackerConfig;
use crate::zones::DrumZone;

/// Sample file for each zone, relative to [`DrumConfig::sounds_dir`].
pub const SOUND_TABLE: [(DrumZone, &str); DrumZone::COUNT] = [
    (DrumZone::Kick, "kick.wav"),
    (DrumZone::Snare, "snare.wav"),
    (DrumZone::HiHat, "hihat.wav"),
    (DrumZone::Tom1, "tom1.wav"),
    (DrumZone::Tom2, "tom2.wav"),
    (DrumZone::Cymbal, "cymbal.wav"),
];

/// Log directives used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Filter from `RUST_LOG`, or [`DEFAULT_LOG_FILTER`] when it is unset or invalid.
pub fn log_filter() -> EnvFilter {
    log_filter_from(std::env::var("RUST_LOG").ok().as_deref())
}

fn log_filter_from(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[derive(Debug, Clone)]
pub struct CameraConfig {
    pub index: u32,
    pub width: u32,
    pub height: u32,
    pub frame_rate: u32,
    /// Flip frames horizontally so the preview behaves like a mirror.
    pub mirror: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: 0,
            width: 1280,
            height: 720,
            frame_rate: 30,
            mirror: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DetectorConfig {
    pub python: PathBuf,
    pub script: PathBuf,
    pub max_num_hands: u32,
    pub min_detection_confidence: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            python: PathBuf::from(".venv/bin/python"),
            script: PathBuf::from("scripts/hand_detect.py"),
            max_num_hands: 2,
            min_detection_confidence: 0.7,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DrumConfig {
    pub camera: CameraConfig,
    pub detector: DetectorConfig,
    pub tracker: TrackerConfig,
    pub sounds_dir: PathBuf,
    pub volume: f32,
    pub overlay_alpha: f32,
    pub window_title: String,
}

impl Default for DrumConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            detector: DetectorConfig::default(),
            tracker: TrackerConfig::default(),
            sounds_dir: PathBuf::from("sounds"),
            volume: 0.9,
            overlay_alpha: 0.25,
            window_title: "Virtual Drum".to_string(),
        }
    }
}

impl DrumConfig {
    pub fn sound_paths(&self) -> Vec<(DrumZone, PathBuf)> {
        SOUND_TABLE
            .iter()
            .map(|(zone, file)| (*zone, self.sounds_dir.join(file)))
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(DrumError::invalid_config(format!(
                "volume {} is outside [0, 1]",
                self.volume
            )));
        }
        if !(0.0..=1.0).contains(&self.overlay_alpha) {
            return Err(DrumError::invalid_config(format!(
                "overlay alpha {} is outside [0, 1]",
                self.overlay_alpha
            )));
        }
        if self.camera.width == 0 || self.camera.height == 0 {
            return Err(DrumError::invalid_config("camera resolution must be non-zero"));
        }
        if self.detector.max_num_hands == 0 {
            return Err(DrumError::invalid_config("max_num_hands must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.detector.min_detection_confidence) {
            return Err(DrumError::invalid_config(format!(
                "detection confidence {} is outside [0, 1]",
                self.detector.min_detection_confidence
            )));
        }
        Ok(())
    }
}
