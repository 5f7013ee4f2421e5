//! Score, lives and timed power-ups
//!
//! The only place match progress changes. Collision events come in, a
//! `StateDelta` describing the transitions comes out.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::collision::CollisionEvent;
use super::state::{ObjectId, PowerKind};
use crate::config::GameConfig;

/// Discrete sound cues, one per transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioTrigger {
    /// Punch landed
    Hit,
    /// Life lost
    Damage,
    /// Power-up grabbed
    PowerUp,
    /// Last life lost
    GameOver,
    /// Score crossed a level boundary
    LevelUp,
}

impl AudioTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioTrigger::Hit => "hit",
            AudioTrigger::Damage => "damage",
            AudioTrigger::PowerUp => "powerup",
            AudioTrigger::GameOver => "game_over",
            AudioTrigger::LevelUp => "level_up",
        }
    }
}

/// One running power-up effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivePowerUp {
    pub activated_at: f64,
    pub duration: f32,
}

impl ActivePowerUp {
    #[inline]
    pub fn is_expired(&self, now: f64) -> bool {
        now - self.activated_at >= self.duration as f64
    }

    /// Seconds left at `now` (never negative)
    pub fn remaining(&self, now: f64) -> f32 {
        (self.activated_at + self.duration as f64 - now).max(0.0) as f32
    }
}

/// At most one entry per kind; grabbing again refreshes instead of stacking
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivePowerUps {
    entries: BTreeMap<PowerKind, ActivePowerUp>,
}

impl ActivePowerUps {
    #[inline]
    pub fn is_active(&self, kind: PowerKind) -> bool {
        self.entries.contains_key(&kind)
    }

    pub fn get(&self, kind: PowerKind) -> Option<&ActivePowerUp> {
        self.entries.get(&kind)
    }

    /// Insert or refresh an effect
    pub fn activate(&mut self, kind: PowerKind, now: f64, duration: f32) {
        self.entries.insert(
            kind,
            ActivePowerUp {
                activated_at: now,
                duration,
            },
        );
    }

    /// Drop expired entries, returning their kinds in stable order
    pub fn expire(&mut self, now: f64) -> Vec<PowerKind> {
        let expired: Vec<PowerKind> = self
            .entries
            .iter()
            .filter(|(_, p)| p.is_expired(now))
            .map(|(&k, _)| k)
            .collect();
        for kind in &expired {
            self.entries.remove(kind);
        }
        expired
    }

    pub fn iter(&self) -> impl Iterator<Item = (PowerKind, &ActivePowerUp)> {
        self.entries.iter().map(|(&k, p)| (k, p))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Scoring constants for a match
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreRules {
    pub initial_lives: u32,
    pub punch_points: i64,
    pub body_hit_penalty: i64,
    pub double_score_multiplier: i64,
    pub level_every_points: i64,
}

impl ScoreRules {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            initial_lives: config.initial_lives,
            punch_points: config.punch_points,
            body_hit_penalty: config.body_hit_penalty,
            double_score_multiplier: config.double_score_multiplier,
            level_every_points: config.level_every_points,
        }
    }
}

impl Default for ScoreRules {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

/// Per-match counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStats {
    pub punches_landed: u32,
    pub powerups_grabbed: u32,
    pub hits_taken: u32,
    pub hits_absorbed: u32,
    pub obstacles_dodged: u32,
}

/// Transitions produced by one `apply` call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateDelta {
    pub score_delta: i64,
    pub lives_lost: u32,
    pub activated: Vec<PowerKind>,
    /// Body hits blocked by Shield
    pub absorbed: u32,
    /// Objects whose events were processed (to be removed)
    pub consumed: Vec<ObjectId>,
    pub triggers: Vec<AudioTrigger>,
    /// This call ended the match
    pub game_over: bool,
}

impl StateDelta {
    pub fn is_empty(&self) -> bool {
        *self == StateDelta::default()
    }
}

/// Score, lives and active power-ups of one match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreState {
    /// Raw signed score (may go negative)
    pub score: i64,
    pub lives: u32,
    pub game_over: bool,
    pub active_power_ups: ActivePowerUps,
    /// Starts at 1, grows each time the score climbs past a multiple of
    /// `level_every_points`
    pub level: u32,
    /// Best score seen this session (survives `reset`)
    pub high_score: i64,
    pub stats: MatchStats,
    rules: ScoreRules,
}

impl ScoreState {
    pub fn new(rules: ScoreRules) -> Self {
        Self {
            score: 0,
            lives: rules.initial_lives,
            game_over: false,
            active_power_ups: ActivePowerUps::default(),
            level: 1,
            high_score: 0,
            stats: MatchStats::default(),
            rules,
        }
    }

    /// Score for display (clamped at zero)
    pub fn display_score(&self) -> i64 {
        self.score.max(0)
    }

    #[inline]
    pub fn is_active(&self, kind: PowerKind) -> bool {
        self.active_power_ups.is_active(kind)
    }

    /// Remove power-ups that ran out by `now`
    pub fn expire_power_ups(&mut self, now: f64) -> Vec<PowerKind> {
        let expired = self.active_power_ups.expire(now);
        for kind in &expired {
            log::debug!("Power-up {} expired at {:.2}s", kind.as_str(), now);
        }
        expired
    }

    /// Apply one tick's events
    ///
    /// Hand events are applied before body hits so a Shield grabbed this tick
    /// already protects. Once the match is over every call is a no-op.
    pub fn apply(&mut self, now: f64, events: &[CollisionEvent]) -> StateDelta {
        let mut delta = StateDelta::default();
        if self.game_over {
            return delta;
        }

        let mut ordered = events.to_vec();
        ordered.sort_by_key(|e| e.priority());

        for event in ordered {
            match event {
                CollisionEvent::PunchHit { .. } => {
                    let multiplier = if self.is_active(PowerKind::DoubleScore) {
                        self.rules.double_score_multiplier
                    } else {
                        1
                    };
                    delta.triggers.push(AudioTrigger::Hit);
                    self.add_score(self.rules.punch_points * multiplier, &mut delta);
                    self.stats.punches_landed += 1;
                }
                CollisionEvent::GrabPowerUp { power, duration, .. } => {
                    self.active_power_ups.activate(power, now, duration);
                    self.stats.powerups_grabbed += 1;
                    delta.activated.push(power);
                    delta.triggers.push(AudioTrigger::PowerUp);
                    log::debug!("Power-up {} active for {:.1}s", power.as_str(), duration);
                }
                CollisionEvent::BodyHit { .. } => {
                    if self.is_active(PowerKind::Shield) {
                        self.stats.hits_absorbed += 1;
                        delta.absorbed += 1;
                    } else {
                        self.score -= self.rules.body_hit_penalty;
                        delta.score_delta -= self.rules.body_hit_penalty;
                        self.lives = self.lives.saturating_sub(1);
                        self.stats.hits_taken += 1;
                        delta.lives_lost += 1;
                        if self.lives == 0 {
                            self.game_over = true;
                            delta.game_over = true;
                            delta.triggers.push(AudioTrigger::GameOver);
                            log::info!("Game over with score {}", self.score);
                        } else {
                            delta.triggers.push(AudioTrigger::Damage);
                        }
                    }
                }
            }
            delta.consumed.push(event.object_id());
            if self.game_over {
                break;
            }
        }

        delta
    }

    /// Count an obstacle that left without hitting anyone
    pub fn record_dodge(&mut self) {
        if !self.game_over {
            self.stats.obstacles_dodged += 1;
        }
    }

    /// Back to a fresh match (call between matches only)
    pub fn reset(&mut self) {
        self.score = 0;
        self.lives = self.rules.initial_lives;
        self.game_over = false;
        self.active_power_ups.clear();
        self.level = 1;
        self.stats = MatchStats::default();
    }

    /// Every upward crossing of a level boundary counts, including one
    /// re-crossed after a penalty
    fn add_score(&mut self, points: i64, delta: &mut StateDelta) {
        let old = self.score;
        self.score += points;
        delta.score_delta += points;
        self.high_score = self.high_score.max(self.score);

        let every = self.rules.level_every_points.max(1);
        let crossed = self.score.max(0) / every - old.max(0) / every;
        if crossed > 0 {
            self.level += crossed as u32;
            delta.triggers.push(AudioTrigger::LevelUp);
            log::info!("Level up: {}", self.level);
        }
    }
}

impl Default for ScoreState {
    fn default() -> Self {
        Self::new(ScoreRules::default())
    }
}
