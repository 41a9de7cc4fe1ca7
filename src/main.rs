// src/main.rs
use anyhow::{Context, Result};
use eframe::egui;
use tracing::{info, warn};

use virtual_drum::app::VirtualDrumApp;
use virtual_drum::audio::{RodioEngine, SoundBank};
use virtual_drum::config::{log_filter, DrumConfig};
use virtual_drum::dispatch::EventDispatcher;
use virtual_drum::kit::DrumKit;
use virtual_drum::mediapipe_bridge::MediaPipeDetector;
use virtual_drum::session::Session;
use virtual_drum::tracking::TransitionTracker;
use virtual_drum::ui::OverlayStyle;
use virtual_drum::video::CameraSource;
use virtual_drum::zones::ZoneMap;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt().with_env_filter(log_filter()).init();

    let config = DrumConfig::default();
    config.validate()?;

    match nokhwa::query(nokhwa::utils::ApiBackend::Auto) {
        Ok(cameras) => {
            info!("Found {} camera(s)", cameras.len());
            for (i, camera) in cameras.iter().enumerate() {
                info!("  [{}] {}", i, camera.human_name());
            }
        }
        Err(e) => warn!("Failed to query cameras: {}", e),
    }

    // Samples are loaded before anything else is opened so a missing file
    // aborts startup.
    let zones = ZoneMap::default_kit();
    let mut engine = RodioEngine::new().context("Failed to open audio output")?;
    let bank = SoundBank::load(&mut engine, &zones, &config.sound_paths())
        .context("Failed to load drum samples")?;

    let dispatcher = EventDispatcher::new(engine, bank, config.volume);
    let kit = DrumKit::new(zones, TransitionTracker::new(config.tracker.clone()), dispatcher);

    let source = CameraSource::open(&config.camera).context("Failed to open camera")?;
    let detector =
        MediaPipeDetector::spawn(&config.detector).context("Failed to start hand detector")?;
    let session = Session::new(source, detector, kit);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.camera.width as f32, config.camera.height as f32])
            .with_min_inner_size([640.0, 360.0]),
        centered: true,
        ..Default::default()
    };

    let style = OverlayStyle::with_alpha(config.overlay_alpha);
    eframe::run_native(
        &config.window_title,
        options,
        Box::new(move |_cc| Box::new(VirtualDrumApp::new(session, style))),
    )
    .map_err(|e| anyhow::anyhow!("Error running application: {}", e))?;

    info!("Virtual drum closed");
    Ok(())
}
