//! Game tuning
//!
//! Loaded once at startup from JSON. Every field has a default, so a config
//! file only needs to name the values it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{SimError, SimResult};
use crate::sim::{ObjectClass, Playfield, PowerKind};

/// Inclusive speed range (units/s)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedRange {
    pub min: f32,
    pub max: f32,
}

impl SpeedRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    fn validate(&self, field: &'static str) -> SimResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(SimError::invalid(field, "must be finite"));
        }
        if self.min < 0.0 {
            return Err(SimError::invalid(field, format!("min {} is negative", self.min)));
        }
        if self.min > self.max {
            return Err(SimError::invalid(
                field,
                format!("min {} exceeds max {}", self.min, self.max),
            ));
        }
        Ok(())
    }
}

/// All tunable numbers of a match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Playfield ===
    pub playfield: Playfield,
    /// Distance from the walls that spawn positions keep
    pub spawn_margin: f32,

    // === Spawning ===
    pub target_interval: f32,
    pub obstacle_interval: f32,
    pub powerup_interval: f32,
    pub target_speed: SpeedRange,
    pub obstacle_speed: SpeedRange,
    pub powerup_speed: SpeedRange,
    pub target_radius: f32,
    pub obstacle_radius: f32,
    pub powerup_radius: f32,
    /// `None` keeps targets alive until punched
    pub target_ttl: Option<f32>,
    pub obstacle_ttl: Option<f32>,
    pub powerup_ttl: Option<f32>,
    /// Obstacles aim at the playfield center +/- this much on each axis
    pub obstacle_aim_jitter: f32,

    // === Power-ups ===
    pub shield_duration: f32,
    pub double_score_duration: f32,
    pub slow_motion_duration: f32,
    pub slow_motion_factor: f32,

    // === Collision ===
    pub hand_hit_radius: f32,
    pub body_hit_radius: f32,
    pub player_zone_radius: f32,
    /// Punches on targets only count while the hand is a fist
    pub require_fist: bool,
    /// Landmarks further than this outside the playfield are dropped
    pub landmark_slack: f32,

    // === Scoring ===
    pub initial_lives: u32,
    pub punch_points: i64,
    pub body_hit_penalty: i64,
    pub double_score_multiplier: i64,
    pub level_every_points: i64,

    // === Difficulty ramp ===
    pub difficulty_ramp: bool,
    pub ramp_every_points: i64,
    pub ramp_step: f32,
    pub min_target_interval: f32,
    pub min_obstacle_interval: f32,

    /// Spawner RNG seed
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            playfield: Playfield::new(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT),
            spawn_margin: SPAWN_MARGIN,

            target_interval: TARGET_INTERVAL,
            obstacle_interval: OBSTACLE_INTERVAL,
            powerup_interval: POWERUP_INTERVAL,
            target_speed: SpeedRange::new(TARGET_SPEED.0, TARGET_SPEED.1),
            obstacle_speed: SpeedRange::new(OBSTACLE_SPEED.0, OBSTACLE_SPEED.1),
            powerup_speed: SpeedRange::new(POWERUP_SPEED.0, POWERUP_SPEED.1),
            target_radius: TARGET_RADIUS,
            obstacle_radius: OBSTACLE_RADIUS,
            powerup_radius: POWERUP_RADIUS,
            target_ttl: None,
            obstacle_ttl: Some(OBSTACLE_TTL),
            powerup_ttl: Some(POWERUP_TTL),
            obstacle_aim_jitter: OBSTACLE_AIM_JITTER,

            shield_duration: SHIELD_DURATION,
            double_score_duration: DOUBLE_SCORE_DURATION,
            slow_motion_duration: SLOW_MOTION_DURATION,
            slow_motion_factor: SLOW_MOTION_FACTOR,

            hand_hit_radius: HAND_HIT_RADIUS,
            body_hit_radius: BODY_HIT_RADIUS,
            player_zone_radius: PLAYER_ZONE_RADIUS,
            require_fist: false,
            landmark_slack: LANDMARK_SLACK,

            initial_lives: INITIAL_LIVES,
            punch_points: PUNCH_POINTS,
            body_hit_penalty: BODY_HIT_PENALTY,
            double_score_multiplier: DOUBLE_SCORE_MULTIPLIER,
            level_every_points: LEVEL_EVERY_POINTS,

            difficulty_ramp: true,
            ramp_every_points: RAMP_EVERY_POINTS,
            ramp_step: RAMP_STEP,
            min_target_interval: MIN_TARGET_INTERVAL,
            min_obstacle_interval: MIN_OBSTACLE_INTERVAL,

            seed: DEFAULT_SEED,
        }
    }
}

fn positive(field: &'static str, value: f32) -> SimResult<()> {
    if !value.is_finite() {
        return Err(SimError::invalid(field, "must be finite"));
    }
    if value <= 0.0 {
        return Err(SimError::invalid(field, format!("must be > 0, got {value}")));
    }
    Ok(())
}

fn non_negative(field: &'static str, value: f32) -> SimResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(SimError::invalid(field, format!("must be >= 0, got {value}")));
    }
    Ok(())
}

fn positive_ttl(field: &'static str, ttl: Option<f32>) -> SimResult<()> {
    match ttl {
        Some(value) => positive(field, value),
        None => Ok(()),
    }
}

impl GameConfig {
    /// Reject configurations the core cannot run with
    pub fn validate(&self) -> SimResult<()> {
        positive("playfield.width", self.playfield.width)?;
        positive("playfield.height", self.playfield.height)?;
        non_negative("spawn_margin", self.spawn_margin)?;
        if self.spawn_margin * 2.0 >= self.playfield.width.min(self.playfield.height) {
            return Err(SimError::invalid(
                "spawn_margin",
                "leaves no room to spawn inside the playfield",
            ));
        }

        positive("target_interval", self.target_interval)?;
        positive("obstacle_interval", self.obstacle_interval)?;
        positive("powerup_interval", self.powerup_interval)?;
        self.target_speed.validate("target_speed")?;
        self.obstacle_speed.validate("obstacle_speed")?;
        self.powerup_speed.validate("powerup_speed")?;
        positive("target_radius", self.target_radius)?;
        positive("obstacle_radius", self.obstacle_radius)?;
        positive("powerup_radius", self.powerup_radius)?;
        positive_ttl("target_ttl", self.target_ttl)?;
        positive_ttl("obstacle_ttl", self.obstacle_ttl)?;
        positive_ttl("powerup_ttl", self.powerup_ttl)?;
        non_negative("obstacle_aim_jitter", self.obstacle_aim_jitter)?;

        positive("shield_duration", self.shield_duration)?;
        positive("double_score_duration", self.double_score_duration)?;
        positive("slow_motion_duration", self.slow_motion_duration)?;
        positive("slow_motion_factor", self.slow_motion_factor)?;
        if self.slow_motion_factor > 1.0 {
            return Err(SimError::invalid(
                "slow_motion_factor",
                format!("must be <= 1, got {}", self.slow_motion_factor),
            ));
        }

        positive("hand_hit_radius", self.hand_hit_radius)?;
        positive("body_hit_radius", self.body_hit_radius)?;
        positive("player_zone_radius", self.player_zone_radius)?;
        non_negative("landmark_slack", self.landmark_slack)?;

        if self.initial_lives == 0 {
            return Err(SimError::invalid("initial_lives", "must be at least 1"));
        }
        if self.punch_points < 0 {
            return Err(SimError::invalid("punch_points", "must be >= 0"));
        }
        if self.body_hit_penalty < 0 {
            return Err(SimError::invalid("body_hit_penalty", "must be >= 0"));
        }
        if self.double_score_multiplier < 1 {
            return Err(SimError::invalid("double_score_multiplier", "must be >= 1"));
        }
        if self.level_every_points <= 0 {
            return Err(SimError::invalid("level_every_points", "must be > 0"));
        }

        if self.ramp_every_points <= 0 {
            return Err(SimError::invalid("ramp_every_points", "must be > 0"));
        }
        non_negative("ramp_step", self.ramp_step)?;
        positive("min_target_interval", self.min_target_interval)?;
        positive("min_obstacle_interval", self.min_obstacle_interval)?;

        Ok(())
    }

    /// Seconds an activated power-up stays active
    pub fn power_duration(&self, kind: PowerKind) -> f32 {
        match kind {
            PowerKind::Shield => self.shield_duration,
            PowerKind::DoubleScore => self.double_score_duration,
            PowerKind::SlowMotion => self.slow_motion_duration,
        }
    }

    /// Base spawn interval per object class
    pub fn spawn_interval(&self, class: ObjectClass) -> f32 {
        match class {
            ObjectClass::Target => self.target_interval,
            ObjectClass::Obstacle => self.obstacle_interval,
            ObjectClass::PowerUp => self.powerup_interval,
        }
    }

    pub fn speed_range(&self, class: ObjectClass) -> SpeedRange {
        match class {
            ObjectClass::Target => self.target_speed,
            ObjectClass::Obstacle => self.obstacle_speed,
            ObjectClass::PowerUp => self.powerup_speed,
        }
    }

    pub fn radius(&self, class: ObjectClass) -> f32 {
        match class {
            ObjectClass::Target => self.target_radius,
            ObjectClass::Obstacle => self.obstacle_radius,
            ObjectClass::PowerUp => self.powerup_radius,
        }
    }

    pub fn ttl(&self, class: ObjectClass) -> Option<f32> {
        match class {
            ObjectClass::Target => self.target_ttl,
            ObjectClass::Obstacle => self.obstacle_ttl,
            ObjectClass::PowerUp => self.powerup_ttl,
        }
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config: GameConfig = serde_json::from_str(&json)?;
        if let Err(err) = config.validate() {
            log::warn!("Rejected config {}: {}", path.display(), err);
            return Err(err);
        }
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write the config as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> SimResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Config saved to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_negative_radius() {
        let config = GameConfig {
            hand_hit_radius: -1.0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            SimError::InvalidConfiguration {
                field: "hand_hit_radius",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_zero_interval() {
        let config = GameConfig {
            obstacle_interval: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GameConfig {
            powerup_interval: -5.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_speed_range() {
        let config = GameConfig {
            target_speed: SpeedRange::new(150.0, 50.0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_nan() {
        let config = GameConfig {
            slow_motion_factor: f32::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_oversized_margin() {
        let config = GameConfig {
            spawn_margin: 400.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{ "initial_lives": 5, "target_interval": 2.0 }"#).unwrap();
        assert_eq!(config.initial_lives, 5);
        assert_eq!(config.target_interval, 2.0);
        assert_eq!(config.obstacle_interval, OBSTACLE_INTERVAL);
        assert_eq!(config.powerup_ttl, Some(POWERUP_TTL));
    }

    #[test]
    fn test_save_load_file() {
        let path =
            std::env::temp_dir().join(format!("punch_arena_cfg_{}.json", std::process::id()));
        let config = GameConfig {
            seed: 42,
            require_fist: true,
            ..Default::default()
        };
        config.save(&path).unwrap();
        let loaded = GameConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_power_durations() {
        let config = GameConfig::default();
        assert_eq!(config.power_duration(PowerKind::Shield), 5.0);
        assert_eq!(config.power_duration(PowerKind::DoubleScore), 8.0);
        assert_eq!(config.power_duration(PowerKind::SlowMotion), 6.0);
    }
}
