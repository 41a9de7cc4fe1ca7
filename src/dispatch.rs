// src/dispatch.rs - Turns enter events into sound triggers and highlights
use tracing::error;

use crate::audio::{AudioEngine, SoundBank};
use crate::error::{DrumError, Result};
use crate::tracking::EnterEvent;
use crate::zones::{DrumZone, ZoneMap, ZoneRect};

/// Outline requested around an entered zone for the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    pub zone: DrumZone,
    pub rect: ZoneRect,
}

pub struct EventDispatcher<A> {
    engine: A,
    bank: SoundBank,
    volume: f32,
}

impl<A: AudioEngine> EventDispatcher<A> {
    pub fn new(engine: A, bank: SoundBank, volume: f32) -> Self {
        Self {
            engine,
            bank,
            volume: volume.clamp(0.0, 1.0),
        }
    }

    /// Plays the zone's sample and returns the highlight to draw.
    ///
    /// Events are only produced for zones of the kit, so a zone without a
    /// sound or rectangle means the zone map and sound bank disagree.
    pub fn dispatch(&mut self, event: &EnterEvent, zones: &ZoneMap) -> Result<Highlight> {
        let bound = self
            .bank
            .handle(event.zone)
            .zip(zones.get(event.zone).map(|zone| zone.rect));

        let Some((sound, rect)) = bound else {
            error!("Enter event for unbound zone {} from {}", event.zone, event.point);
            debug_assert!(false, "zone {} is not bound to the drum kit", event.zone);
            return Err(DrumError::UnboundZone(event.zone));
        };

        self.engine.play(sound, self.volume);
        Ok(Highlight { zone: event.zone, rect })
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn engine(&self) -> &A {
        &self.engine
    }
}
