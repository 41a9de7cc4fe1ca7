// src/zones.rs - Drum zone registry and point classification
use std::fmt;

use nalgebra::Point2;

use crate::error::{DrumError, Result};

/// Pixel coordinate in frame space.
pub type PixelPoint = Point2<i32>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrumZone {
    Kick,
    Snare,
    HiHat,
    Tom1,
    Tom2,
    Cymbal,
}

impl DrumZone {
    pub const COUNT: usize = 6;

    /// Declaration order. The default kit lists its zones in this order.
    pub const ALL: [DrumZone; DrumZone::COUNT] = [
        DrumZone::Kick,
        DrumZone::Snare,
        DrumZone::HiHat,
        DrumZone::Tom1,
        DrumZone::Tom2,
        DrumZone::Cymbal,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DrumZone::Kick => "Kick",
            DrumZone::Snare => "Snare",
            DrumZone::HiHat => "HiHat",
            DrumZone::Tom1 => "Tom1",
            DrumZone::Tom2 => "Tom2",
            DrumZone::Cymbal => "Cymbal",
        }
    }

    /// Dense index, usable for fixed-size per-zone tables.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for DrumZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const RED: Rgb = Rgb(255, 0, 0);
    pub const GREEN: Rgb = Rgb(0, 255, 0);
    pub const BLUE: Rgb = Rgb(0, 0, 255);
    pub const CYAN: Rgb = Rgb(0, 255, 255);
    pub const MAGENTA: Rgb = Rgb(255, 0, 255);
    pub const YELLOW: Rgb = Rgb(255, 255, 0);
    pub const LIGHT_GRAY: Rgb = Rgb(224, 224, 224);
}

/// Axis-aligned rectangle in frame pixels, `x1 < x2` and `y1 < y2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneRect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl ZoneRect {
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Open-interval containment: a point on an edge is outside.
    pub fn contains(&self, p: &PixelPoint) -> bool {
        self.x1 < p.x && p.x < self.x2 && self.y1 < p.y && p.y < self.y2
    }

    pub fn width(&self) -> i32 {
        self.x2 - self.x1
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    pub id: DrumZone,
    pub rect: ZoneRect,
    pub color: Rgb,
}

impl Zone {
    pub const fn new(id: DrumZone, rect: ZoneRect, color: Rgb) -> Self {
        Self { id, rect, color }
    }
}

/// Immutable registry of drum zones.
///
/// Iteration order is the order the zones were given to [`ZoneMap::new`] and
/// it is the tie-break for overlapping rectangles: [`ZoneMap::classify`]
/// returns the first zone that contains the point.
#[derive(Debug, Clone)]
pub struct ZoneMap {
    zones: Vec<Zone>,
}

impl ZoneMap {
    pub fn new(zones: Vec<Zone>) -> Result<Self> {
        let mut seen = [false; DrumZone::COUNT];

        for zone in &zones {
            if seen[zone.id.index()] {
                return Err(DrumError::DuplicateZone(zone.id));
            }
            seen[zone.id.index()] = true;

            let r = zone.rect;
            if r.x1 >= r.x2 || r.y1 >= r.y2 {
                return Err(DrumError::InvalidZone {
                    zone: zone.id,
                    reason: format!(
                        "rectangle ({}, {}, {}, {}) is empty",
                        r.x1, r.y1, r.x2, r.y2
                    ),
                });
            }
        }

        Ok(Self { zones })
    }

    /// The six-piece layout sized for a 1280x720 frame.
    pub fn default_kit() -> Self {
        Self {
            zones: vec![
                Zone::new(DrumZone::Kick, ZoneRect::new(100, 400, 300, 600), Rgb::BLUE),
                Zone::new(DrumZone::Snare, ZoneRect::new(350, 400, 550, 600), Rgb::GREEN),
                Zone::new(DrumZone::HiHat, ZoneRect::new(600, 400, 800, 600), Rgb::RED),
                Zone::new(DrumZone::Tom1, ZoneRect::new(850, 400, 1050, 600), Rgb::CYAN),
                Zone::new(DrumZone::Tom2, ZoneRect::new(400, 100, 600, 300), Rgb::MAGENTA),
                Zone::new(DrumZone::Cymbal, ZoneRect::new(700, 100, 900, 300), Rgb::YELLOW),
            ],
        }
    }

    /// First zone, in registry order, whose open rectangle contains `point`.
    pub fn classify(&self, point: &PixelPoint) -> Option<DrumZone> {
        self.zones
            .iter()
            .find(|zone| zone.rect.contains(point))
            .map(|zone| zone.id)
    }

    pub fn get(&self, id: DrumZone) -> Option<&Zone> {
        self.zones.iter().find(|zone| zone.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Zone> {
        self.zones.iter()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

impl Default for ZoneMap {
    fn default() -> Self {
        Self::default_kit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_zone_map() -> ZoneMap {
        ZoneMap::new(vec![
            Zone::new(DrumZone::Kick, ZoneRect::new(0, 0, 100, 100), Rgb::BLUE),
            Zone::new(DrumZone::Snare, ZoneRect::new(200, 200, 300, 300), Rgb::GREEN),
        ])
        .unwrap()
    }

    #[test]
    fn test_classify_inside_and_outside() {
        let map = two_zone_map();
        assert_eq!(map.classify(&PixelPoint::new(50, 50)), Some(DrumZone::Kick));
        assert_eq!(map.classify(&PixelPoint::new(250, 250)), Some(DrumZone::Snare));
        assert_eq!(map.classify(&PixelPoint::new(400, 400)), None);
        assert_eq!(map.classify(&PixelPoint::new(150, 150)), None);
    }

    #[test]
    fn test_edges_are_outside() {
        let map = two_zone_map();
        for p in [(0, 50), (100, 50), (50, 0), (50, 100), (0, 0), (100, 100)] {
            assert_eq!(map.classify(&PixelPoint::new(p.0, p.1)), None, "{:?}", p);
        }
        assert_eq!(map.classify(&PixelPoint::new(1, 1)), Some(DrumZone::Kick));
        assert_eq!(map.classify(&PixelPoint::new(99, 99)), Some(DrumZone::Kick));
    }

    #[test]
    fn test_overlap_first_declared_wins() {
        let map = ZoneMap::new(vec![
            Zone::new(DrumZone::Tom2, ZoneRect::new(0, 0, 100, 100), Rgb::MAGENTA),
            Zone::new(DrumZone::Cymbal, ZoneRect::new(50, 50, 150, 150), Rgb::YELLOW),
        ])
        .unwrap();
        assert_eq!(map.classify(&PixelPoint::new(75, 75)), Some(DrumZone::Tom2));
        assert_eq!(map.classify(&PixelPoint::new(120, 120)), Some(DrumZone::Cymbal));

        let swapped = ZoneMap::new(vec![
            Zone::new(DrumZone::Cymbal, ZoneRect::new(50, 50, 150, 150), Rgb::YELLOW),
            Zone::new(DrumZone::Tom2, ZoneRect::new(0, 0, 100, 100), Rgb::MAGENTA),
        ])
        .unwrap();
        assert_eq!(swapped.classify(&PixelPoint::new(75, 75)), Some(DrumZone::Cymbal));
    }

    #[test]
    fn test_rejects_empty_rect() {
        let err = ZoneMap::new(vec![Zone::new(
            DrumZone::HiHat,
            ZoneRect::new(100, 0, 100, 50),
            Rgb::RED,
        )])
        .unwrap_err();
        assert!(matches!(err, DrumError::InvalidZone { zone: DrumZone::HiHat, .. }));

        let err = ZoneMap::new(vec![Zone::new(
            DrumZone::HiHat,
            ZoneRect::new(0, 60, 100, 50),
            Rgb::RED,
        )])
        .unwrap_err();
        assert!(matches!(err, DrumError::InvalidZone { .. }));
    }

    #[test]
    fn test_rejects_duplicate_zone() {
        let err = ZoneMap::new(vec![
            Zone::new(DrumZone::Kick, ZoneRect::new(0, 0, 10, 10), Rgb::BLUE),
            Zone::new(DrumZone::Kick, ZoneRect::new(20, 20, 30, 30), Rgb::BLUE),
        ])
        .unwrap_err();
        assert!(matches!(err, DrumError::DuplicateZone(DrumZone::Kick)));
    }

    #[test]
    fn test_default_kit_layout() {
        let kit = ZoneMap::default_kit();
        let order: Vec<DrumZone> = kit.iter().map(|z| z.id).collect();
        assert_eq!(order, DrumZone::ALL.to_vec());
        assert!(ZoneMap::new(kit.iter().cloned().collect()).is_ok());

        assert_eq!(kit.classify(&PixelPoint::new(200, 500)), Some(DrumZone::Kick));
        assert_eq!(kit.classify(&PixelPoint::new(800, 200)), Some(DrumZone::Cymbal));
        // gap between Kick and Snare
        assert_eq!(kit.classify(&PixelPoint::new(325, 500)), None);
        assert_eq!(kit.get(DrumZone::Tom1).map(|z| z.rect.width()), Some(200));
    }
}
