// src/app.rs
use eframe::egui;
use tracing::{error, info};

use crate::audio::AudioEngine;
use crate::kit::FrameReport;
use crate::mediapipe_bridge::HandDetector;
use crate::session::Session;
use crate::ui::{draw_overlay, OverlayStyle, PainterRenderer, VideoWidget};
use crate::video::FrameSource;

/// Drives one [`Session::step`] per repaint until the quit key is pressed or
/// a step fails.
pub struct VirtualDrumApp<S, D, A> {
    session: Session<S, D, A>,
    video: VideoWidget,
    style: OverlayStyle,
    report: FrameReport,
    stopped: bool,
}

impl<S: FrameSource, D: HandDetector, A: AudioEngine> VirtualDrumApp<S, D, A> {
    pub fn new(session: Session<S, D, A>, style: OverlayStyle) -> Self {
        Self {
            session,
            video: VideoWidget::new(),
            style,
            report: FrameReport::default(),
            stopped: false,
        }
    }

    fn stop(&mut self, ctx: &egui::Context) {
        self.stopped = true;
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }
}

impl<S: FrameSource, D: HandDetector, A: AudioEngine> eframe::App for VirtualDrumApp<S, D, A> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.stopped {
            return;
        }

        if ctx.input(|i| i.key_pressed(egui::Key::Q)) {
            info!(
                "Quit requested after {} frames",
                self.session.frames_processed()
            );
            self.stop(ctx);
            return;
        }

        match self.session.step() {
            Ok(frame) => {
                self.video.update_frame(ctx, &frame.image);
                self.report = frame.report;
            }
            Err(e) => {
                error!("Stopping: {}", e);
                self.stop(ctx);
                return;
            }
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(egui::Color32::BLACK))
            .show(ctx, |ui| {
                if let Some(rect) = self.video.show(ui) {
                    let mut renderer =
                        PainterRenderer::new(ui.painter_at(rect), rect, self.video.frame_size());
                    draw_overlay(&mut renderer, self.session.kit().zones(), &self.report, &self.style);
                }
            });

        ctx.request_repaint();
    }
}
