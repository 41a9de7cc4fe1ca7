//! Camera-driven virtual drum kit.
//!
//! Index and middle fingertips of up to two hands are tracked against six
//! on-screen drum zones. A fingertip entering a zone plays that zone's sample
//! once; it has to leave (or the hands have to drop out of frame) before the
//! same zone plays again for that fingertip.
//!
//! Per frame: [`video`] captures, [`mediapipe_bridge`] finds hands,
//! [`kit::DrumKit`] classifies fingertips with [`zones`], tracks transitions
//! with [`tracking`] and plays through [`dispatch`] / [`audio`]; [`ui`] draws
//! the overlay.

pub mod app;
pub mod audio;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod kit;
pub mod mediapipe_bridge;
pub mod session;
pub mod tracking;
pub mod ui;
pub mod video;
pub mod zones;

pub use error::{DrumError, Result};
