// src/ui.rs - Overlay drawing and the video widget
use egui::{self, Align2, Color32, FontId, Pos2, Rect, Rounding, Stroke, Vec2};
use image::RgbImage;

use crate::dispatch::Highlight;
use crate::kit::FrameReport;
use crate::mediapipe_bridge::HAND_CONNECTIONS;
use crate::zones::{PixelPoint, Rgb, ZoneMap, ZoneRect};

/// Drawing primitives in frame pixel coordinates.
pub trait FrameRenderer {
    /// Fills `rect` with `color` blended over the frame at `alpha`.
    fn fill_rect(&mut self, rect: &ZoneRect, color: Rgb, alpha: f32);
    fn stroke_rect(&mut self, rect: &ZoneRect, color: Rgb, thickness: f32);
    /// `pos` is the left end of the text baseline.
    fn text(&mut self, pos: PixelPoint, text: &str, color: Rgb, alpha: f32, size: f32);
    fn circle(&mut self, center: PixelPoint, radius: f32, color: Rgb);
    fn line(&mut self, from: PixelPoint, to: PixelPoint, color: Rgb, thickness: f32);
}

#[derive(Debug, Clone)]
pub struct OverlayStyle {
    pub zone_alpha: f32,
    pub label_color: Rgb,
    pub label_size: f32,
    pub label_offset: (i32, i32),
    pub fingertip_color: Rgb,
    pub fingertip_radius: f32,
    pub landmark_color: Rgb,
    pub landmark_radius: f32,
    pub bone_color: Rgb,
    pub bone_thickness: f32,
    pub highlight_color: Rgb,
    pub highlight_thickness: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            zone_alpha: 0.25,
            label_color: Rgb::WHITE,
            label_size: 32.0,
            label_offset: (15, 45),
            fingertip_color: Rgb::RED,
            fingertip_radius: 10.0,
            landmark_color: Rgb::RED,
            landmark_radius: 3.0,
            bone_color: Rgb::LIGHT_GRAY,
            bone_thickness: 2.0,
            highlight_color: Rgb::WHITE,
            highlight_thickness: 8.0,
        }
    }
}

impl OverlayStyle {
    pub fn with_alpha(alpha: f32) -> Self {
        Self {
            zone_alpha: alpha,
            ..Self::default()
        }
    }
}

/// Draws zones, hand skeletons, fingertips and this frame's highlights.
pub fn draw_overlay<R: FrameRenderer>(
    renderer: &mut R,
    zones: &ZoneMap,
    report: &FrameReport,
    style: &OverlayStyle,
) {
    for zone in zones.iter() {
        renderer.fill_rect(&zone.rect, zone.color, style.zone_alpha);
        let label = PixelPoint::new(
            zone.rect.x1 + style.label_offset.0,
            zone.rect.y1 + style.label_offset.1,
        );
        // Labels are blended with the zone fill
        renderer.text(
            label,
            zone.id.name(),
            style.label_color,
            style.zone_alpha,
            style.label_size,
        );
    }

    for hand in &report.hands {
        for &(a, b) in HAND_CONNECTIONS.iter() {
            if let (Some(from), Some(to)) = (hand.landmarks.get(a), hand.landmarks.get(b)) {
                renderer.line(*from, *to, style.bone_color, style.bone_thickness);
            }
        }
        for lm in &hand.landmarks {
            renderer.circle(*lm, style.landmark_radius, style.landmark_color);
        }
    }

    for tip in &report.fingertips {
        renderer.circle(tip.position, style.fingertip_radius, style.fingertip_color);
    }

    for Highlight { rect, .. } in &report.highlights {
        renderer.stroke_rect(rect, style.highlight_color, style.highlight_thickness);
    }
}

fn color32(c: Rgb) -> Color32 {
    Color32::from_rgb(c.0, c.1, c.2)
}

fn blended(c: Rgb, alpha: f32) -> Color32 {
    let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(c.0, c.1, c.2, a)
}

/// Renders frame-space primitives onto an egui painter, scaled to the
/// rectangle the frame is displayed in.
pub struct PainterRenderer {
    painter: egui::Painter,
    target: Rect,
    scale: Vec2,
}

impl PainterRenderer {
    pub fn new(painter: egui::Painter, target: Rect, frame_size: [u32; 2]) -> Self {
        let scale = Vec2::new(
            target.width() / frame_size[0].max(1) as f32,
            target.height() / frame_size[1].max(1) as f32,
        );
        Self {
            painter,
            target,
            scale,
        }
    }

    fn to_screen(&self, p: PixelPoint) -> Pos2 {
        self.target.min + Vec2::new(p.x as f32 * self.scale.x, p.y as f32 * self.scale.y)
    }

    fn to_screen_rect(&self, r: &ZoneRect) -> Rect {
        Rect::from_min_max(
            self.to_screen(PixelPoint::new(r.x1, r.y1)),
            self.to_screen(PixelPoint::new(r.x2, r.y2)),
        )
    }

    fn scaled(&self, length: f32) -> f32 {
        length * self.scale.min_elem()
    }
}

impl FrameRenderer for PainterRenderer {
    fn fill_rect(&mut self, rect: &ZoneRect, color: Rgb, alpha: f32) {
        self.painter.rect_filled(
            self.to_screen_rect(rect),
            Rounding::same(0.0),
            blended(color, alpha),
        );
    }

    fn stroke_rect(&mut self, rect: &ZoneRect, color: Rgb, thickness: f32) {
        self.painter.rect_stroke(
            self.to_screen_rect(rect),
            Rounding::same(0.0),
            Stroke::new(self.scaled(thickness), color32(color)),
        );
    }

    fn text(&mut self, pos: PixelPoint, text: &str, color: Rgb, alpha: f32, size: f32) {
        self.painter.text(
            self.to_screen(pos),
            Align2::LEFT_BOTTOM,
            text,
            FontId::proportional(self.scaled(size)),
            blended(color, alpha),
        );
    }

    fn circle(&mut self, center: PixelPoint, radius: f32, color: Rgb) {
        self.painter
            .circle_filled(self.to_screen(center), self.scaled(radius), color32(color));
    }

    fn line(&mut self, from: PixelPoint, to: PixelPoint, color: Rgb, thickness: f32) {
        self.painter.line_segment(
            [self.to_screen(from), self.to_screen(to)],
            Stroke::new(self.scaled(thickness), color32(color)),
        );
    }
}

/// Camera frame shown as a texture, letterboxed into the available space.
pub struct VideoWidget {
    texture: Option<egui::TextureHandle>,
    frame_size: [u32; 2],
}

impl VideoWidget {
    pub fn new() -> Self {
        Self {
            texture: None,
            frame_size: [0, 0],
        }
    }

    pub fn update_frame(&mut self, ctx: &egui::Context, frame: &RgbImage) {
        let (width, height) = frame.dimensions();
        let color_image =
            egui::ColorImage::from_rgb([width as usize, height as usize], frame.as_raw());

        match self.texture.as_mut() {
            Some(texture) => texture.set(color_image, Default::default()),
            None => {
                self.texture = Some(ctx.load_texture("video_frame", color_image, Default::default()));
            }
        }
        self.frame_size = [width, height];
    }

    pub fn frame_size(&self) -> [u32; 2] {
        self.frame_size
    }

    /// Paints the latest frame and returns the screen rectangle it covers.
    pub fn show(&self, ui: &mut egui::Ui) -> Option<Rect> {
        let available = ui.available_rect_before_wrap();

        let Some(texture) = self.texture.as_ref() else {
            ui.painter().rect_filled(available, Rounding::same(4.0), Color32::from_rgb(50, 50, 55));
            ui.painter().text(
                available.center(),
                Align2::CENTER_CENTER,
                "No Video Signal",
                FontId::proportional(16.0),
                Color32::from_rgb(150, 150, 155),
            );
            return None;
        };

        let rect = fit_rect(available, self.frame_size);
        ui.painter().image(
            texture.id(),
            rect,
            Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
            Color32::WHITE,
        );
        Some(rect)
    }
}

impl Default for VideoWidget {
    fn default() -> Self {
        Self::new()
    }
}

/// Largest rectangle with the frame's aspect ratio centred in `available`.
fn fit_rect(available: Rect, frame_size: [u32; 2]) -> Rect {
    let [w, h] = frame_size;
    if w == 0 || h == 0 {
        return available;
    }
    let scale = (available.width() / w as f32).min(available.height() / h as f32);
    Rect::from_center_size(available.center(), Vec2::new(w as f32 * scale, h as f32 * scale))
}
