// src/video.rs - Camera frame acquisition
use image::{imageops, RgbImage};
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
};
use nokhwa::Camera;
use tracing::{debug, info};

use crate::config::CameraConfig;
use crate::error::{DrumError, Result};

/// Blocking source of RGB frames. An error ends the run.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<RgbImage>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn next_frame(&mut self) -> Result<RgbImage> {
        (**self).next_frame()
    }
}

#[derive(Debug, Clone)]
pub struct CameraInfo {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

pub struct CameraSource {
    camera: Camera,
    mirror: bool,
}

impl CameraSource {
    pub fn open(config: &CameraConfig) -> Result<Self> {
        debug!("Opening camera index {}", config.index);

        let format = CameraFormat::new(
            Resolution::new(config.width, config.height),
            FrameFormat::MJPEG,
            config.frame_rate,
        );
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(format));

        let camera = Camera::new(CameraIndex::Index(config.index), requested)
            .map_err(|e| DrumError::camera(format!("failed to open camera {}: {}", config.index, e)))?;

        let source = Self {
            camera,
            mirror: config.mirror,
        };
        let info = source.info();
        info!(
            "Camera {} opened at {}x{} @ {} fps",
            info.name, info.width, info.height, info.fps
        );
        Ok(source)
    }

    pub fn info(&self) -> CameraInfo {
        let resolution = self.camera.resolution();
        CameraInfo {
            name: self.camera.info().human_name(),
            width: resolution.width(),
            height: resolution.height(),
            fps: self.camera.frame_rate(),
        }
    }
}

impl FrameSource for CameraSource {
    fn next_frame(&mut self) -> Result<RgbImage> {
        if !self.camera.is_stream_open() {
            self.camera
                .open_stream()
                .map_err(|e| DrumError::capture(format!("failed to open camera stream: {}", e)))?;
        }

        let frame = self
            .camera
            .frame()
            .map_err(|e| DrumError::capture(e.to_string()))?;

        let decoded = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| DrumError::capture(format!("failed to decode frame: {}", e)))?;

        let width = decoded.width();
        let height = decoded.height();
        let image = RgbImage::from_raw(width, height, decoded.into_vec())
            .ok_or_else(|| DrumError::capture("frame buffer does not match its dimensions"))?;

        if self.mirror {
            Ok(imageops::flip_horizontal(&image))
        } else {
            Ok(image)
        }
    }
}

impl Drop for CameraSource {
    fn drop(&mut self) {
        if self.camera.is_stream_open() {
            let _ = self.camera.stop_stream();
            debug!("Camera stream stopped");
        }
    }
}
