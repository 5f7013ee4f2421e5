//! Punch Arena - collision and game-state core for a webcam motion game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (objects, spawning, collisions, scoring)
//! - `config`: Data-driven game tuning, loaded once at startup
//! - `collaborators`: Pose source / presenter seams and the per-frame driver
//! - `highscores`: Persistent leaderboard

pub mod collaborators;
pub mod config;
pub mod error;
pub mod highscores;
pub mod sim;

pub use config::GameConfig;
pub use error::SimError;
pub use highscores::HighScores;

/// Default tuning constants (every one is overridable through `GameConfig`)
pub mod consts {
    /// Fixed simulation timestep used by the demo driver (60 Hz camera rate)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Playfield dimensions (capture frame pixel space)
    pub const PLAYFIELD_WIDTH: f32 = 1280.0;
    pub const PLAYFIELD_HEIGHT: f32 = 720.0;
    /// Spawn positions keep this far away from the walls
    pub const SPAWN_MARGIN: f32 = 100.0;

    /// Seconds between spawns per kind
    pub const TARGET_INTERVAL: f32 = 3.0;
    pub const OBSTACLE_INTERVAL: f32 = 5.0;
    pub const POWERUP_INTERVAL: f32 = 15.0;

    /// Speed ranges (units/s)
    pub const TARGET_SPEED: (f32, f32) = (50.0, 150.0);
    pub const OBSTACLE_SPEED: (f32, f32) = (80.0, 200.0);
    pub const POWERUP_SPEED: (f32, f32) = (0.0, 30.0);

    /// Object radii
    pub const TARGET_RADIUS: f32 = 25.0;
    pub const OBSTACLE_RADIUS: f32 = 30.0;
    pub const POWERUP_RADIUS: f32 = 20.0;

    /// On-screen lifetimes (seconds)
    pub const OBSTACLE_TTL: f32 = 10.0;
    pub const POWERUP_TTL: f32 = 5.0;

    /// Power-up effect durations (seconds)
    pub const SHIELD_DURATION: f32 = 5.0;
    pub const DOUBLE_SCORE_DURATION: f32 = 8.0;
    pub const SLOW_MOTION_DURATION: f32 = 6.0;
    /// Motion multiplier while SlowMotion is active
    pub const SLOW_MOTION_FACTOR: f32 = 0.5;

    /// Landmark collision radii
    pub const HAND_HIT_RADIUS: f32 = 25.0;
    pub const BODY_HIT_RADIUS: f32 = 30.0;

    pub const INITIAL_LIVES: u32 = 3;
    pub const PUNCH_POINTS: i64 = 10;
    pub const BODY_HIT_PENALTY: i64 = 20;
    pub const DOUBLE_SCORE_MULTIPLIER: i64 = 2;

    /// Obstacles entering this circle around the playfield center hit the player
    pub const PLAYER_ZONE_RADIUS: f32 = 120.0;
    /// Obstacles aim at the playfield center +/- this much
    pub const OBSTACLE_AIM_JITTER: f32 = 100.0;

    /// Difficulty ramp: spawn rate +10% every 1000 points
    pub const RAMP_EVERY_POINTS: i64 = 1000;
    pub const RAMP_STEP: f32 = 0.1;
    pub const MIN_TARGET_INTERVAL: f32 = 1.5;
    pub const MIN_OBSTACLE_INTERVAL: f32 = 3.0;

    pub const LEVEL_EVERY_POINTS: i64 = 500;

    /// Landmarks further than this outside the playfield are treated as malformed
    pub const LANDMARK_SLACK: f32 = 200.0;

    pub const DEFAULT_SEED: u64 = 0x5EED_F157;
}

/// Format whole seconds as MM:SS
pub fn format_clock(seconds: f64) -> String {
    let whole = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    format!("{:02}:{:02}", whole / 60, whole % 60)
}
