// src/tracking.rs - Per-fingertip zone occupancy and enter-event detection
use std::fmt;

use tracing::debug;

use crate::mediapipe_bridge::landmarks;
use crate::zones::DrumZone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    pub const ALL: [Hand; 2] = [Hand::Left, Hand::Right];

    /// Parses the detector's handedness label ("Left" / "Right").
    pub fn from_label(label: &str) -> Option<Hand> {
        match label {
            "Left" => Some(Hand::Left),
            "Right" => Some(Hand::Right),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Hand::Left => "Left",
            Hand::Right => "Right",
        }
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Index,
    Middle,
}

impl Finger {
    /// Processing order within a hand.
    pub const ALL: [Finger; 2] = [Finger::Index, Finger::Middle];

    /// Landmark index of this finger's tip in the 21-point hand model.
    pub fn tip_landmark(self) -> usize {
        match self {
            Finger::Index => landmarks::INDEX_FINGER_TIP,
            Finger::Middle => landmarks::MIDDLE_FINGER_TIP,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Finger::Index => "Index",
            Finger::Middle => "Middle",
        }
    }
}

impl fmt::Display for Finger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One fingertip whose zone occupancy is tracked across frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrackedPoint {
    pub hand: Hand,
    pub finger: Finger,
}

impl TrackedPoint {
    pub const COUNT: usize = 4;

    pub const ALL: [TrackedPoint; TrackedPoint::COUNT] = [
        TrackedPoint::new(Hand::Left, Finger::Index),
        TrackedPoint::new(Hand::Left, Finger::Middle),
        TrackedPoint::new(Hand::Right, Finger::Index),
        TrackedPoint::new(Hand::Right, Finger::Middle),
    ];

    pub const fn new(hand: Hand, finger: Finger) -> Self {
        Self { hand, finger }
    }

    fn slot(self) -> usize {
        let hand = match self.hand {
            Hand::Left => 0,
            Hand::Right => 1,
        };
        let finger = match self.finger {
            Finger::Index => 0,
            Finger::Middle => 1,
        };
        hand * 2 + finger
    }
}

impl fmt::Display for TrackedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.hand, self.finger)
    }
}

/// Fired the frame a tracked point's occupied zone changes to a new zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnterEvent {
    pub point: TrackedPoint,
    pub zone: DrumZone,
}

/// Occupied zone for every tracked point; `None` means no zone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneOccupancy {
    slots: [Option<DrumZone>; TrackedPoint::COUNT],
}

impl ZoneOccupancy {
    pub fn get(&self, point: TrackedPoint) -> Option<DrumZone> {
        self.slots[point.slot()]
    }

    pub fn set(&mut self, point: TrackedPoint, zone: Option<DrumZone>) {
        self.slots[point.slot()] = zone;
    }

    pub fn clear(&mut self) {
        self.slots = [None; TrackedPoint::COUNT];
    }

    pub fn clear_hand(&mut self, hand: Hand) {
        for finger in Finger::ALL {
            self.set(TrackedPoint::new(hand, finger), None);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (TrackedPoint, Option<DrumZone>)> + '_ {
        TrackedPoint::ALL.iter().map(move |p| (*p, self.get(*p)))
    }

    pub fn is_clear(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TrackerConfig {
    /// Also clear a hand's points when that hand alone drops out of frame.
    /// Off by default: only a frame with no hands at all clears occupancy.
    pub reset_absent_hands: bool,
}

pub struct TransitionTracker {
    occupancy: ZoneOccupancy,
    config: TrackerConfig,
}

impl TransitionTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            occupancy: ZoneOccupancy::default(),
            config,
        }
    }

    /// Records the zone `point` was classified into this frame and returns an
    /// enter event if that zone differs from the one it occupied before.
    pub fn update(&mut self, point: TrackedPoint, zone: Option<DrumZone>) -> Option<EnterEvent> {
        let previous = self.occupancy.get(point);
        self.occupancy.set(point, zone);

        match zone {
            Some(zone) if previous != Some(zone) => Some(EnterEvent { point, zone }),
            _ => None,
        }
    }

    /// Forces every tracked point back to no zone.
    pub fn reset(&mut self) {
        self.occupancy.clear();
    }

    pub fn reset_hand(&mut self, hand: Hand) {
        self.occupancy.clear_hand(hand);
    }

    /// Applies the end-of-frame reset rules given the hands detected this frame.
    pub fn finish_frame(&mut self, seen: &[Hand]) {
        if seen.is_empty() {
            if !self.occupancy.is_clear() {
                debug!("No hands detected, clearing zone occupancy");
            }
            self.reset();
            return;
        }

        if self.config.reset_absent_hands {
            for hand in Hand::ALL {
                if !seen.contains(&hand) {
                    debug!("{} hand not detected, clearing its occupancy", hand);
                    self.reset_hand(hand);
                }
            }
        }
    }

    pub fn occupancy(&self) -> &ZoneOccupancy {
        &self.occupancy
    }

}

impl Default for TransitionTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RIGHT_INDEX: TrackedPoint = TrackedPoint::new(Hand::Right, Finger::Index);
    const RIGHT_MIDDLE: TrackedPoint = TrackedPoint::new(Hand::Right, Finger::Middle);
    const LEFT_INDEX: TrackedPoint = TrackedPoint::new(Hand::Left, Finger::Index);

    #[test]
    fn test_initial_state_is_no_zone() {
        let tracker = TransitionTracker::default();
        assert!(tracker.occupancy().is_clear());
        for (_, zone) in tracker.occupancy().iter() {
            assert_eq!(zone, None);
        }
        assert_eq!(tracker.occupancy().iter().count(), 4);
    }

    #[test]
    fn test_dwell_fires_once() {
        let mut tracker = TransitionTracker::default();
        let fired: Vec<_> = (0..10)
            .filter_map(|_| tracker.update(RIGHT_INDEX, Some(DrumZone::Snare)))
            .collect();
        assert_eq!(
            fired,
            vec![EnterEvent { point: RIGHT_INDEX, zone: DrumZone::Snare }]
        );
        assert_eq!(tracker.occupancy().get(RIGHT_INDEX), Some(DrumZone::Snare));
    }

    #[test]
    fn test_reentry_after_leaving_fires_again() {
        let mut tracker = TransitionTracker::default();
        assert!(tracker.update(RIGHT_INDEX, Some(DrumZone::Kick)).is_some());
        assert!(tracker.update(RIGHT_INDEX, None).is_none());
        assert_eq!(tracker.occupancy().get(RIGHT_INDEX), None);
        assert_eq!(
            tracker.update(RIGHT_INDEX, Some(DrumZone::Kick)),
            Some(EnterEvent { point: RIGHT_INDEX, zone: DrumZone::Kick })
        );
    }

    #[test]
    fn test_direct_zone_change_fires() {
        let mut tracker = TransitionTracker::default();
        tracker.update(LEFT_INDEX, Some(DrumZone::Tom1));
        let event = tracker.update(LEFT_INDEX, Some(DrumZone::Tom2));
        assert_eq!(event.map(|e| e.zone), Some(DrumZone::Tom2));
        assert_eq!(tracker.occupancy().get(LEFT_INDEX), Some(DrumZone::Tom2));
    }

    #[test]
    fn test_global_reset_allows_retrigger() {
        let mut tracker = TransitionTracker::default();
        tracker.update(RIGHT_INDEX, Some(DrumZone::HiHat));
        tracker.finish_frame(&[Hand::Right]);
        assert_eq!(tracker.occupancy().get(RIGHT_INDEX), Some(DrumZone::HiHat));

        tracker.finish_frame(&[]);
        assert!(tracker.occupancy().is_clear());
        assert!(tracker.update(RIGHT_INDEX, Some(DrumZone::HiHat)).is_some());
    }

    #[test]
    fn test_points_are_independent() {
        let mut tracker = TransitionTracker::default();
        tracker.update(RIGHT_INDEX, Some(DrumZone::Kick));
        assert!(tracker.update(RIGHT_MIDDLE, Some(DrumZone::Kick)).is_some());
        assert!(tracker.update(LEFT_INDEX, Some(DrumZone::Kick)).is_some());

        tracker.update(RIGHT_MIDDLE, None);
        assert_eq!(tracker.occupancy().get(RIGHT_INDEX), Some(DrumZone::Kick));
        assert_eq!(tracker.occupancy().get(LEFT_INDEX), Some(DrumZone::Kick));
        assert!(tracker.update(RIGHT_INDEX, Some(DrumZone::Kick)).is_none());
    }

    #[test]
    fn test_absent_hand_keeps_occupancy_by_default() {
        let mut tracker = TransitionTracker::default();
        tracker.update(LEFT_INDEX, Some(DrumZone::Cymbal));
        tracker.update(RIGHT_INDEX, Some(DrumZone::Kick));

        // left hand drops out while the right hand stays visible
        tracker.update(RIGHT_INDEX, Some(DrumZone::Kick));
        tracker.finish_frame(&[Hand::Right]);

        assert_eq!(tracker.occupancy().get(LEFT_INDEX), Some(DrumZone::Cymbal));
        assert!(tracker.update(LEFT_INDEX, Some(DrumZone::Cymbal)).is_none());
    }

    #[test]
    fn test_absent_hand_reset_when_enabled() {
        let mut tracker = TransitionTracker::new(TrackerConfig { reset_absent_hands: true });
        tracker.update(LEFT_INDEX, Some(DrumZone::Cymbal));
        tracker.update(RIGHT_INDEX, Some(DrumZone::Kick));
        tracker.finish_frame(&[Hand::Left, Hand::Right]);

        tracker.update(RIGHT_INDEX, Some(DrumZone::Kick));
        tracker.finish_frame(&[Hand::Right]);

        assert_eq!(tracker.occupancy().get(LEFT_INDEX), None);
        assert_eq!(tracker.occupancy().get(RIGHT_INDEX), Some(DrumZone::Kick));
        assert!(tracker.update(LEFT_INDEX, Some(DrumZone::Cymbal)).is_some());
    }

    #[test]
    fn test_hand_labels() {
        assert_eq!(Hand::from_label("Left"), Some(Hand::Left));
        assert_eq!(Hand::from_label("Right"), Some(Hand::Right));
        assert_eq!(Hand::from_label("left"), None);
        assert_eq!(RIGHT_MIDDLE.to_string(), "Right/Middle");
        assert_eq!(Finger::Middle.tip_landmark(), 12);
    }
}
