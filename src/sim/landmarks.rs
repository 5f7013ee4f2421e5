//! Per-frame pose landmarks
//!
//! The pose source produces a fresh frame every tick. A missing landmark means
//! "not detected this frame" and never produces a collision.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Playfield;

/// Tracked body points
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Landmark {
    LeftHand,
    RightHand,
    Head,
    Torso,
    LeftShoulder,
    RightShoulder,
    LeftHip,
    RightHip,
}

impl Landmark {
    pub const COUNT: usize = 8;

    pub const ALL: [Landmark; Landmark::COUNT] = [
        Landmark::LeftHand,
        Landmark::RightHand,
        Landmark::Head,
        Landmark::Torso,
        Landmark::LeftShoulder,
        Landmark::RightShoulder,
        Landmark::LeftHip,
        Landmark::RightHip,
    ];

    pub const HANDS: [Landmark; 2] = [Landmark::LeftHand, Landmark::RightHand];

    pub const BODY: [Landmark; 6] = [
        Landmark::Head,
        Landmark::Torso,
        Landmark::LeftShoulder,
        Landmark::RightShoulder,
        Landmark::LeftHip,
        Landmark::RightHip,
    ];

    #[inline]
    fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Landmark::LeftHand => "left_hand",
            Landmark::RightHand => "right_hand",
            Landmark::Head => "head",
            Landmark::Torso => "torso",
            Landmark::LeftShoulder => "left_shoulder",
            Landmark::RightShoulder => "right_shoulder",
            Landmark::LeftHip => "left_hip",
            Landmark::RightHip => "right_hip",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        Landmark::ALL.into_iter().find(|l| l.as_str() == s)
    }
}

/// Landmark positions for one frame, in playfield coordinates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    points: [Option<Vec2>; Landmark::COUNT],
    /// Hand gesture flags (only consulted when fists are required)
    pub left_fist: bool,
    pub right_fist: bool,
}

impl LandmarkFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with(mut self, landmark: Landmark, point: Vec2) -> Self {
        self.set(landmark, Some(point));
        self
    }

    /// Builder-style fist flags
    pub fn with_fists(mut self, left: bool, right: bool) -> Self {
        self.left_fist = left;
        self.right_fist = right;
        self
    }

    pub fn set(&mut self, landmark: Landmark, point: Option<Vec2>) {
        self.points[landmark.index()] = point;
    }

    #[inline]
    pub fn get(&self, landmark: Landmark) -> Option<Vec2> {
        self.points[landmark.index()]
    }

    pub fn is_empty(&self) -> bool {
        self.points.iter().all(Option::is_none)
    }

    /// Fist flag for a hand landmark (false for body landmarks)
    pub fn is_fist(&self, landmark: Landmark) -> bool {
        match landmark {
            Landmark::LeftHand => self.left_fist,
            Landmark::RightHand => self.right_fist,
            _ => false,
        }
    }

    /// Present landmarks in declaration order
    pub fn present(&self) -> impl Iterator<Item = (Landmark, Vec2)> + '_ {
        Landmark::ALL
            .into_iter()
            .filter_map(|l| self.get(l).map(|p| (l, p)))
    }

    /// Copy of the frame with malformed points removed
    ///
    /// A point is malformed when a coordinate is not finite or lies more than
    /// `slack` outside the playfield. Returns the cleaned frame and how many
    /// points were dropped.
    pub fn sanitized(&self, field: &Playfield, slack: f32) -> (LandmarkFrame, usize) {
        let mut clean = self.clone();
        let mut dropped = 0;
        for landmark in Landmark::ALL {
            if let Some(p) = self.get(landmark) {
                if !p.is_finite() || !field.contains(p, slack) {
                    log::debug!("Dropping malformed {} landmark {:?}", landmark.as_str(), p);
                    clean.set(landmark, None);
                    dropped += 1;
                }
            }
        }
        (clean, dropped)
    }
}
