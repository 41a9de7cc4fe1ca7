// src/mediapipe_bridge.rs - MediaPipe hand landmarker behind a subprocess
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use image::RgbImage;
use nalgebra::Point2;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::DetectorConfig;
use crate::error::{DrumError, Result};
use crate::tracking::{Finger, Hand};
use crate::zones::PixelPoint;

/// MediaPipe 21-point hand model indices.
pub mod landmarks {
    pub const COUNT: usize = 21;

    pub const INDEX_FINGER_TIP: usize = 8;
    pub const MIDDLE_FINGER_TIP: usize = 12;
}

/// Bones drawn between landmarks.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (0, 1), (1, 2), (2, 3), (3, 4),
    (0, 5), (5, 6), (6, 7), (7, 8),
    (5, 9), (9, 10), (10, 11), (11, 12),
    (9, 13), (13, 14), (14, 15), (15, 16),
    (13, 17), (0, 17), (17, 18), (18, 19), (19, 20),
];

/// One hand found in a frame. Landmarks are normalised to `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedHand {
    pub label: Hand,
    pub score: f32,
    landmarks: Vec<Point2<f32>>,
}

impl DetectedHand {
    /// Returns `None` unless all 21 landmarks are present.
    pub fn new(label: Hand, score: f32, landmarks: Vec<Point2<f32>>) -> Option<Self> {
        if landmarks.len() < landmarks::COUNT {
            return None;
        }
        Some(Self { label, score, landmarks })
    }

    pub fn fingertip(&self, finger: Finger, width: u32, height: u32) -> PixelPoint {
        denormalize(&self.landmarks[finger.tip_landmark()], width, height)
    }

    pub fn pixel_landmarks(&self, width: u32, height: u32) -> Vec<PixelPoint> {
        self.landmarks
            .iter()
            .map(|lm| denormalize(lm, width, height))
            .collect()
    }
}

/// Scales a normalised landmark to frame pixels, truncating toward zero.
pub fn denormalize(lm: &Point2<f32>, width: u32, height: u32) -> PixelPoint {
    PixelPoint::new((lm.x * width as f32) as i32, (lm.y * height as f32) as i32)
}

pub trait HandDetector {
    fn detect(&mut self, frame: &RgbImage) -> Result<Vec<DetectedHand>>;
}

impl<D: HandDetector + ?Sized> HandDetector for Box<D> {
    fn detect(&mut self, frame: &RgbImage) -> Result<Vec<DetectedHand>> {
        (**self).detect(frame)
    }
}

#[derive(Deserialize, Debug)]
struct LandmarkJson {
    x: f32,
    y: f32,
    #[allow(dead_code)]
    #[serde(default)]
    z: f32,
}

#[derive(Deserialize, Debug)]
struct HandJson {
    handedness: String,
    #[serde(default)]
    score: f32,
    landmarks: Vec<LandmarkJson>,
}

#[derive(Deserialize, Debug)]
struct DetectionReply {
    #[serde(default)]
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

/// Parses one reply line. Hands with an unknown label or missing landmarks
/// are dropped; a reply carrying an `error` yields no hands.
fn parse_reply(line: &str) -> Result<Vec<DetectedHand>> {
    let reply: DetectionReply = serde_json::from_str(line.trim())?;

    if let Some(error) = reply.error {
        warn!("Hand detector reported: {}", error);
        return Ok(Vec::new());
    }

    let mut hands = Vec::with_capacity(reply.hands.len());
    for hand in reply.hands {
        let Some(label) = Hand::from_label(&hand.handedness) else {
            warn!("Skipping hand with unknown handedness {:?}", hand.handedness);
            continue;
        };

        let count = hand.landmarks.len();
        let points = hand.landmarks.iter().map(|lm| Point2::new(lm.x, lm.y)).collect();
        match DetectedHand::new(label, hand.score, points) {
            Some(detected) => hands.push(detected),
            None => warn!(
                "Skipping {} hand: expected {} landmarks, got {}",
                label,
                landmarks::COUNT,
                count
            ),
        }
    }

    Ok(hands)
}

/// Runs the MediaPipe hand landmarker in a Python child process.
///
/// Each frame is written to the child's stdin as a 12-byte header (width,
/// height, channels as little-endian `u32`) followed by raw RGB bytes. The
/// child answers with one JSON line per frame.
pub struct MediaPipeDetector {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl MediaPipeDetector {
    pub fn spawn(config: &DetectorConfig) -> Result<Self> {
        if !config.script.exists() {
            return Err(DrumError::detector(format!(
                "hand detection script not found at {}",
                config.script.display()
            )));
        }

        info!("Starting MediaPipe hand detector ({})", config.script.display());

        let mut process = Command::new(&config.python)
            .arg(&config.script)
            .arg("--max-num-hands")
            .arg(config.max_num_hands.to_string())
            .arg("--min-detection-confidence")
            .arg(config.min_detection_confidence.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| {
                DrumError::detector(format!("failed to start {}: {}", config.python.display(), e))
            })?;

        let (Some(stdin), Some(stdout)) = (process.stdin.take(), process.stdout.take()) else {
            let _ = process.kill();
            return Err(DrumError::detector("child process pipes unavailable"));
        };

        let mut detector = Self {
            process,
            stdin,
            stdout: BufReader::new(stdout),
        };
        detector.wait_ready(&config.script)?;

        info!("MediaPipe hand detector ready");
        Ok(detector)
    }

    fn wait_ready(&mut self, script: &Path) -> Result<()> {
        let mut line = String::new();
        self.stdout.read_line(&mut line).map_err(bridge_io)?;

        if line.trim() != "READY" {
            return Err(DrumError::detector(format!(
                "{} did not signal ready, got {:?}",
                script.display(),
                line.trim()
            )));
        }
        Ok(())
    }
}

impl HandDetector for MediaPipeDetector {
    fn detect(&mut self, frame: &RgbImage) -> Result<Vec<DetectedHand>> {
        let (width, height) = frame.dimensions();

        let mut header = [0u8; 12];
        header[0..4].copy_from_slice(&width.to_le_bytes());
        header[4..8].copy_from_slice(&height.to_le_bytes());
        header[8..12].copy_from_slice(&3u32.to_le_bytes());

        self.stdin.write_all(&header).map_err(bridge_io)?;
        self.stdin.write_all(frame.as_raw()).map_err(bridge_io)?;
        self.stdin.flush().map_err(bridge_io)?;

        let mut line = String::new();
        if self.stdout.read_line(&mut line).map_err(bridge_io)? == 0 {
            return Err(DrumError::detector("detector process closed its output"));
        }

        let hands = parse_reply(&line)?;
        debug!("Detected {} hand(s)", hands.len());
        Ok(hands)
    }
}

/// A failed pipe means the child is gone or wedged.
fn bridge_io(e: std::io::Error) -> DrumError {
    DrumError::detector(format!("bridge I/O failed: {}", e))
}

impl Drop for MediaPipeDetector {
    fn drop(&mut self) {
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}
