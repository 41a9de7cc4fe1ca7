// src/kit.rs - Per-frame classify, track and dispatch
use tracing::debug;

use crate::audio::AudioEngine;
use crate::dispatch::{EventDispatcher, Highlight};
use crate::error::Result;
use crate::mediapipe_bridge::DetectedHand;
use crate::tracking::{EnterEvent, Finger, TrackedPoint, TransitionTracker};
use crate::zones::{DrumZone, PixelPoint, ZoneMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingertip {
    pub point: TrackedPoint,
    pub position: PixelPoint,
    pub zone: Option<DrumZone>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandOverlay {
    pub landmarks: Vec<PixelPoint>,
}

/// What happened in one frame, for drawing and inspection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub hands: Vec<HandOverlay>,
    pub fingertips: Vec<Fingertip>,
    pub events: Vec<EnterEvent>,
    pub highlights: Vec<Highlight>,
}

pub struct DrumKit<A> {
    zones: ZoneMap,
    tracker: TransitionTracker,
    dispatcher: EventDispatcher<A>,
}

impl<A: AudioEngine> DrumKit<A> {
    pub fn new(zones: ZoneMap, tracker: TransitionTracker, dispatcher: EventDispatcher<A>) -> Self {
        Self {
            zones,
            tracker,
            dispatcher,
        }
    }

    /// Runs every tracked fingertip of every detected hand through the zone
    /// classifier and transition tracker, triggering a sound for each entry.
    ///
    /// Hands are handled in detector order and fingers Index then Middle.
    /// A frame without hands clears all occupancy.
    pub fn process_frame(
        &mut self,
        hands: &[DetectedHand],
        width: u32,
        height: u32,
    ) -> Result<FrameReport> {
        let mut report = FrameReport::default();
        let mut seen = Vec::with_capacity(hands.len());

        for hand in hands {
            seen.push(hand.label);
            report.hands.push(HandOverlay {
                landmarks: hand.pixel_landmarks(width, height),
            });

            for finger in Finger::ALL {
                let point = TrackedPoint::new(hand.label, finger);
                let position = hand.fingertip(finger, width, height);
                let zone = self.zones.classify(&position);
                report.fingertips.push(Fingertip { point, position, zone });

                if let Some(event) = self.tracker.update(point, zone) {
                    debug!("{} entered {} at ({}, {})", point, event.zone, position.x, position.y);
                    let highlight = self.dispatcher.dispatch(&event, &self.zones)?;
                    report.events.push(event);
                    report.highlights.push(highlight);
                }
            }
        }

        self.tracker.finish_frame(&seen);
        Ok(report)
    }

    pub fn zones(&self) -> &ZoneMap {
        &self.zones
    }

    pub fn tracker(&self) -> &TransitionTracker {
        &self.tracker
    }

    pub fn dispatcher(&self) -> &EventDispatcher<A> {
        &self.dispatcher
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{SoundBank, SoundHandle};
    use crate::tracking::Hand;
    use nalgebra::Point2;
    use std::path::Path;

    #[derive(Default)]
    struct CountingEngine {
        plays: usize,
    }

    impl AudioEngine for CountingEngine {
        fn load_sound(&mut self, _path: &Path) -> Result<SoundHandle> {
            Ok(SoundHandle(0))
        }

        fn play(&mut self, _sound: SoundHandle, _volume: f32) {
            self.plays += 1;
        }
    }

    fn kit() -> DrumKit<CountingEngine> {
        let mut bank = SoundBank::default();
        for zone in DrumZone::ALL {
            bank.bind(zone, SoundHandle(zone.index()));
        }
        let dispatcher = EventDispatcher::new(CountingEngine::default(), bank, 0.9);
        DrumKit::new(ZoneMap::default_kit(), TransitionTracker::default(), dispatcher)
    }

    /// Hand on a 1280x720 frame with index and middle tips at pixel positions.
    fn hand(label: Hand, index: (i32, i32), middle: (i32, i32)) -> DetectedHand {
        let norm = |(x, y): (i32, i32)| Point2::new((x as f32 + 0.5) / 1280.0, (y as f32 + 0.5) / 720.0);
        let mut landmarks = vec![Point2::new(0.0, 0.0); 21];
        landmarks[8] = norm(index);
        landmarks[12] = norm(middle);
        DetectedHand::new(label, 0.9, landmarks).unwrap()
    }

    #[test]
    fn test_both_fingers_classified_in_order() {
        let mut kit = kit();
        let report = kit
            .process_frame(&[hand(Hand::Right, (200, 500), (450, 500))], 1280, 720)
            .unwrap();

        let zones: Vec<_> = report.fingertips.iter().map(|f| (f.point.finger, f.zone)).collect();
        assert_eq!(
            zones,
            vec![(Finger::Index, Some(DrumZone::Kick)), (Finger::Middle, Some(DrumZone::Snare))]
        );
        assert_eq!(report.fingertips[0].position, PixelPoint::new(200, 500));
        assert_eq!(report.events.len(), 2);
        assert_eq!(report.highlights[1].zone, DrumZone::Snare);
        assert_eq!(report.hands[0].landmarks.len(), 21);
        assert_eq!(kit.dispatcher().engine().plays, 2);
    }

    #[test]
    fn test_no_hands_resets_and_reports_nothing() {
        let mut kit = kit();
        kit.process_frame(&[hand(Hand::Left, (200, 500), (0, 0))], 1280, 720).unwrap();
        assert_eq!(
            kit.tracker().occupancy().get(TrackedPoint::new(Hand::Left, Finger::Index)),
            Some(DrumZone::Kick)
        );

        let report = kit.process_frame(&[], 1280, 720).unwrap();
        assert_eq!(report, FrameReport::default());
        assert!(kit.tracker().occupancy().is_clear());
    }

    #[test]
    fn test_same_label_twice_later_hand_wins() {
        let mut kit = kit();
        let report = kit
            .process_frame(
                &[hand(Hand::Right, (200, 500), (0, 0)), hand(Hand::Right, (800, 200), (0, 0))],
                1280,
                720,
            )
            .unwrap();

        let entered: Vec<_> = report.events.iter().map(|e| e.zone).collect();
        assert_eq!(entered, vec![DrumZone::Kick, DrumZone::Cymbal]);
        assert_eq!(
            kit.tracker().occupancy().get(TrackedPoint::new(Hand::Right, Finger::Index)),
            Some(DrumZone::Cymbal)
        );
    }
}
