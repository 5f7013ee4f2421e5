//! Landmark vs. object collision detection
//!
//! Pure: reads the landmark frame and the object set, returns typed events.
//! Removal and scoring happen later in the tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::landmarks::{Landmark, LandmarkFrame};
use super::state::{GameObject, ObjectClass, ObjectId, ObjectKind, PowerKind};
use crate::config::GameConfig;

/// Outcome of a landmark touching an object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CollisionEvent {
    /// A hand punched a target (or swatted an obstacle away)
    PunchHit { id: ObjectId },
    /// A hand grabbed a power-up
    GrabPowerUp {
        id: ObjectId,
        power: PowerKind,
        duration: f32,
    },
    /// An obstacle hit the body
    BodyHit { id: ObjectId },
}

impl CollisionEvent {
    pub fn object_id(&self) -> ObjectId {
        match *self {
            CollisionEvent::PunchHit { id }
            | CollisionEvent::GrabPowerUp { id, .. }
            | CollisionEvent::BodyHit { id } => id,
        }
    }

    /// Application order within a tick: hand events before body hits
    pub fn priority(&self) -> u8 {
        match self {
            CollisionEvent::PunchHit { .. } | CollisionEvent::GrabPowerUp { .. } => 0,
            CollisionEvent::BodyHit { .. } => 1,
        }
    }
}

/// Distance from `point` to the object center if it lies within `reach` of
/// the object's edge (equality counts as a hit)
#[inline]
pub fn hit_distance(point: Vec2, obj: &GameObject, reach: f32) -> Option<f32> {
    let d = point.distance(obj.pos);
    (d <= obj.radius + reach).then_some(d)
}

/// Collision radii and gesture rules
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEngine {
    pub hand_hit_radius: f32,
    pub body_hit_radius: f32,
    /// Punches on targets only count while the hand is a fist
    pub require_fist: bool,
}

impl CollisionEngine {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            hand_hit_radius: config.hand_hit_radius,
            body_hit_radius: config.body_hit_radius,
            require_fist: config.require_fist,
        }
    }

    /// Evaluate one frame against the live objects
    ///
    /// Each present hand hits at most one object (the closest in range); body
    /// landmarks only collide with obstacles. An object is matched at most
    /// once per call. Hand events come before body events in the output.
    pub fn evaluate(&self, frame: &LandmarkFrame, objects: &[GameObject]) -> Vec<CollisionEvent> {
        let mut events = Vec::new();
        let mut claimed: Vec<ObjectId> = Vec::new();

        for hand in Landmark::HANDS {
            let Some(point) = frame.get(hand) else {
                continue;
            };
            let fist = frame.is_fist(hand);
            let hit = closest_hit(point, objects, self.hand_hit_radius, &claimed, |obj| {
                match obj.kind {
                    ObjectKind::Target => !self.require_fist || fist,
                    ObjectKind::Obstacle | ObjectKind::PowerUp { .. } => true,
                }
            });
            if let Some(obj) = hit {
                claimed.push(obj.id);
                events.push(match obj.kind {
                    ObjectKind::PowerUp { power, duration } => CollisionEvent::GrabPowerUp {
                        id: obj.id,
                        power,
                        duration,
                    },
                    ObjectKind::Target | ObjectKind::Obstacle => {
                        CollisionEvent::PunchHit { id: obj.id }
                    }
                });
            }
        }

        for part in Landmark::BODY {
            let Some(point) = frame.get(part) else {
                continue;
            };
            let hit = closest_hit(point, objects, self.body_hit_radius, &claimed, |obj| {
                obj.class() == ObjectClass::Obstacle
            });
            if let Some(obj) = hit {
                claimed.push(obj.id);
                events.push(CollisionEvent::BodyHit { id: obj.id });
            }
        }

        events
    }
}

/// Closest unclaimed object accepted by `eligible` within reach of `point`
///
/// Ties keep the earlier object in slice order.
fn closest_hit<'a>(
    point: Vec2,
    objects: &'a [GameObject],
    reach: f32,
    claimed: &[ObjectId],
    eligible: impl Fn(&GameObject) -> bool,
) -> Option<&'a GameObject> {
    let mut best: Option<(&GameObject, f32)> = None;
    for obj in objects {
        if claimed.contains(&obj.id) || !eligible(obj) {
            continue;
        }
        if let Some(d) = hit_distance(point, obj, reach) {
            match best {
                Some((_, best_d)) if best_d <= d => {}
                _ => best = Some((obj, d)),
            }
        }
    }
    best.map(|(obj, _)| obj)
}
