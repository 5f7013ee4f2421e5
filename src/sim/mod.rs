//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Elapsed time is always passed in, never read from a clock
//! - Seeded RNG only
//! - Stable iteration order (by object ID)
//! - No rendering, audio or camera dependencies

pub mod collision;
pub mod landmarks;
pub mod score;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{CollisionEngine, CollisionEvent, hit_distance};
pub use landmarks::{Landmark, LandmarkFrame};
pub use score::{
    ActivePowerUp, ActivePowerUps, AudioTrigger, MatchStats, ScoreRules, ScoreState, StateDelta,
};
pub use spawner::Spawner;
pub use state::{GameObject, ObjectClass, ObjectId, ObjectKind, Playfield, PowerKind};
pub use tick::{GameLoop, Snapshot, TickReport};
