//! Game object and playfield types
//!
//! Objects are plain data: the spawner creates them, the loop moves and
//! prunes them, the collision pass only reads them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Unique, monotonically increasing object identifier
pub type ObjectId = u32;

/// Timed power-up effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PowerKind {
    /// Blocks damage from body hits
    Shield,
    /// Multiplies punch points
    DoubleScore,
    /// Slows object motion
    SlowMotion,
}

impl PowerKind {
    pub const ALL: [PowerKind; 3] = [
        PowerKind::Shield,
        PowerKind::DoubleScore,
        PowerKind::SlowMotion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerKind::Shield => "shield",
            PowerKind::DoubleScore => "double_score",
            PowerKind::SlowMotion => "slow_motion",
        }
    }
}

/// Object kind without payload (used for per-kind tables)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectClass {
    Target,
    Obstacle,
    PowerUp,
}

impl ObjectClass {
    pub const ALL: [ObjectClass; 3] = [
        ObjectClass::Target,
        ObjectClass::Obstacle,
        ObjectClass::PowerUp,
    ];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            ObjectClass::Target => 0,
            ObjectClass::Obstacle => 1,
            ObjectClass::PowerUp => 2,
        }
    }
}

/// Object kind with kind-specific payload
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Punch for points
    Target,
    /// Damages the player on a body hit
    Obstacle,
    /// Grab to activate `power` for `duration` seconds
    PowerUp { power: PowerKind, duration: f32 },
}

impl ObjectKind {
    pub fn class(&self) -> ObjectClass {
        match self {
            ObjectKind::Target => ObjectClass::Target,
            ObjectKind::Obstacle => ObjectClass::Obstacle,
            ObjectKind::PowerUp { .. } => ObjectClass::PowerUp,
        }
    }
}

/// Rectangular playfield with the origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Point lies inside the playfield grown by `slack` on every side
    pub fn contains(&self, p: Vec2, slack: f32) -> bool {
        p.x >= -slack && p.x <= self.width + slack && p.y >= -slack && p.y <= self.height + slack
    }
}

/// A moving game object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameObject {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Match time (seconds) at creation
    pub spawn_time: f64,
    /// Remaining lifetime in seconds, `None` = infinite
    pub ttl: Option<f32>,
}

impl GameObject {
    #[inline]
    pub fn class(&self) -> ObjectClass {
        self.kind.class()
    }

    /// Remaining lifetime ran out
    #[inline]
    pub fn is_expired(&self) -> bool {
        matches!(self.ttl, Some(ttl) if ttl <= 0.0)
    }

    /// Integrate velocity and age the object
    ///
    /// `motion_dt` is the (possibly slowed) step used for movement, `real_dt`
    /// the wall-clock step used for the lifetime. Targets and power-ups bounce
    /// off the walls; obstacles fly straight through.
    pub fn advance(&mut self, motion_dt: f32, real_dt: f32, field: &Playfield) {
        self.pos += self.vel * motion_dt;
        if let Some(ttl) = self.ttl.as_mut() {
            *ttl -= real_dt;
        }

        if matches!(self.kind, ObjectKind::Obstacle) {
            return;
        }

        let r = self.radius;
        if self.pos.x - r <= 0.0 || self.pos.x + r >= field.width {
            self.vel.x = -self.vel.x;
            self.pos.x = self.pos.x.clamp(r, (field.width - r).max(r));
        }
        if self.pos.y - r <= 0.0 || self.pos.y + r >= field.height {
            self.vel.y = -self.vel.y;
            self.pos.y = self.pos.y.clamp(r, (field.height - r).max(r));
        }
    }
}
