// src/session.rs - One iteration of the capture, detect, play loop
use image::RgbImage;

use crate::audio::AudioEngine;
use crate::error::Result;
use crate::kit::{DrumKit, FrameReport};
use crate::mediapipe_bridge::HandDetector;
use crate::video::FrameSource;

pub struct Frame {
    pub image: RgbImage,
    pub report: FrameReport,
}

/// Owns the collaborators for a run. Dropping it releases the camera and
/// stops the detector process.
pub struct Session<S, D, A> {
    source: S,
    detector: D,
    kit: DrumKit<A>,
    frames: u64,
}

impl<S: FrameSource, D: HandDetector, A: AudioEngine> Session<S, D, A> {
    pub fn new(source: S, detector: D, kit: DrumKit<A>) -> Self {
        Self {
            source,
            detector,
            kit,
            frames: 0,
        }
    }

    /// Blocks for the next frame and processes it to completion. Any error
    /// is fatal for the run.
    pub fn step(&mut self) -> Result<Frame> {
        let image = self.source.next_frame()?;
        let (width, height) = image.dimensions();

        let hands = self.detector.detect(&image)?;
        let report = self.kit.process_frame(&hands, width, height)?;

        self.frames += 1;
        Ok(Frame { image, report })
    }

    pub fn kit(&self) -> &DrumKit<A> {
        &self.kit
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames
    }
}
