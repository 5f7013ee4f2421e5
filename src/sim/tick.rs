//! Per-frame match driver
//!
//! One `tick` advances the match by the elapsed time: move and prune objects,
//! spawn, detect collisions, apply them to the score, remove what was hit.
//! A tick always completes; pause and game over freeze it entirely.

use serde::{Deserialize, Serialize};

use super::collision::{CollisionEngine, CollisionEvent};
use super::landmarks::LandmarkFrame;
use super::score::{AudioTrigger, ScoreRules, ScoreState, StateDelta};
use super::spawner::Spawner;
use super::state::{GameObject, ObjectClass, ObjectId, ObjectKind, PowerKind};
use crate::config::GameConfig;
use crate::error::SimResult;
use glam::Vec2;

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// Seconds the match advanced (0 when frozen)
    pub elapsed: f32,
    pub spawned: Vec<ObjectId>,
    /// Landmark collisions plus obstacles that reached the player zone
    pub events: Vec<CollisionEvent>,
    pub delta: StateDelta,
    /// Power-ups that ran out this tick (informational)
    pub expired_power_ups: Vec<PowerKind>,
    /// Objects gone this tick for any reason
    pub removed: Vec<ObjectId>,
    /// Malformed landmarks ignored this tick
    pub dropped_landmarks: usize,
}

impl TickReport {
    pub fn triggers(&self) -> &[AudioTrigger] {
        &self.delta.triggers
    }
}

/// Read-only view handed to the renderer
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub objects: &'a [GameObject],
    pub score: &'a ScoreState,
    /// Match time in seconds
    pub now: f64,
    pub paused: bool,
}

/// One match: owns the object set and the score
#[derive(Debug, Clone)]
pub struct GameLoop {
    config: GameConfig,
    spawner: Spawner,
    collision: CollisionEngine,
    score: ScoreState,
    objects: Vec<GameObject>,
    now: f64,
    last_reading: Option<f64>,
    paused: bool,
}

impl GameLoop {
    /// Validate the config and set up a fresh match
    pub fn new(config: GameConfig) -> SimResult<Self> {
        config.validate()?;
        log::info!(
            "New match: {}x{} playfield, {} lives, seed {}",
            config.playfield.width,
            config.playfield.height,
            config.initial_lives,
            config.seed
        );
        Ok(Self {
            spawner: Spawner::new(&config),
            collision: CollisionEngine::from_config(&config),
            score: ScoreState::new(ScoreRules::from_config(&config)),
            objects: Vec::new(),
            now: 0.0,
            last_reading: None,
            paused: false,
            config,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn objects(&self) -> &[GameObject] {
        &self.objects
    }

    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_game_over(&self) -> bool {
        self.score.game_over
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            objects: &self.objects,
            score: &self.score,
            now: self.now,
            paused: self.paused,
        }
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.paused != paused {
            log::info!("{}", if paused { "Paused" } else { "Resumed" });
        }
        self.paused = paused;
    }

    pub fn toggle_pause(&mut self) {
        self.set_paused(!self.paused);
    }

    /// Start a new match (between ticks only)
    pub fn reset(&mut self) {
        self.objects.clear();
        self.score.reset();
        self.spawner.reset();
        self.now = 0.0;
        self.last_reading = None;
        self.paused = false;
        log::info!("Match reset");
    }

    /// Create an object of `class` at a chosen position and velocity
    pub fn spawn_at(&mut self, class: ObjectClass, pos: Vec2, vel: Vec2) -> ObjectId {
        let mut obj = self.spawner.spawn(class);
        obj.pos = pos;
        obj.vel = vel;
        obj.spawn_time = self.now;
        let id = obj.id;
        self.objects.push(obj);
        id
    }

    /// Tick from a raw clock reading (seconds)
    ///
    /// Elapsed time is the difference to the previous reading. The first
    /// reading, and any reading that is not finite or goes backwards,
    /// advances the match by zero.
    pub fn tick_at(&mut self, reading: f64, frame: Option<&LandmarkFrame>) -> TickReport {
        let elapsed = match self.last_reading {
            Some(prev) if reading.is_finite() && reading > prev => (reading - prev) as f32,
            _ => 0.0,
        };
        if reading.is_finite() && self.last_reading.is_none_or(|prev| reading > prev) {
            self.last_reading = Some(reading);
        }
        self.tick(elapsed, frame)
    }

    /// Advance the match by `elapsed` seconds with this frame's landmarks
    ///
    /// `None` means the pose source had nothing this frame.
    pub fn tick(&mut self, elapsed: f32, frame: Option<&LandmarkFrame>) -> TickReport {
        let mut report = TickReport::default();
        if self.paused || self.score.game_over {
            return report;
        }

        let dt = if elapsed.is_finite() && elapsed > 0.0 {
            elapsed
        } else {
            0.0
        };
        self.now += dt as f64;
        report.elapsed = dt;

        report.expired_power_ups = self.score.expire_power_ups(self.now);

        // Move, age and prune
        let motion_dt = if self.score.is_active(PowerKind::SlowMotion) {
            dt * self.config.slow_motion_factor
        } else {
            dt
        };
        let mut zone_hits = Vec::new();
        self.advance_objects(motion_dt, dt, &mut zone_hits, &mut report.removed);

        // Spawn
        self.spawner.set_score(self.score.score);
        for obj in self.spawner.tick(dt) {
            report.spawned.push(obj.id);
            self.objects.push(obj);
        }

        // Collide
        if let Some(frame) = frame {
            let (clean, dropped) =
                frame.sanitized(&self.config.playfield, self.config.landmark_slack);
            report.dropped_landmarks = dropped;
            report.events = self.collision.evaluate(&clean, &self.objects);
        }
        report.events.extend(zone_hits);

        // Score
        report.delta = self.score.apply(self.now, &report.events);

        // Remove what was hit
        let consumed = &report.delta.consumed;
        self.objects.retain(|o| !consumed.contains(&o.id));
        for &id in consumed {
            if !report.removed.contains(&id) {
                report.removed.push(id);
            }
        }

        self.objects.sort_by_key(|o| o.id);
        report
    }

    /// Integrate motion and drop expired or escaped objects
    ///
    /// Obstacles entering the player zone become body hits instead of
    /// vanishing; obstacles that expire or leave the playfield count as dodged.
    fn advance_objects(
        &mut self,
        motion_dt: f32,
        real_dt: f32,
        zone_hits: &mut Vec<CollisionEvent>,
        removed: &mut Vec<ObjectId>,
    ) {
        let field = self.config.playfield;
        let zone_center = field.center();
        let zone_radius = self.config.player_zone_radius;
        let escape_slack = self.config.spawn_margin;
        let score = &mut self.score;

        self.objects.retain_mut(|obj| {
            obj.advance(motion_dt, real_dt, &field);
            let is_obstacle = matches!(obj.kind, ObjectKind::Obstacle);

            if obj.is_expired() {
                if is_obstacle {
                    score.record_dodge();
                }
                log::debug!("#{} expired", obj.id);
                removed.push(obj.id);
                return false;
            }
            if is_obstacle && obj.pos.distance(zone_center) <= zone_radius {
                log::debug!("Obstacle #{} reached the player zone", obj.id);
                zone_hits.push(CollisionEvent::BodyHit { id: obj.id });
                removed.push(obj.id);
                return false;
            }
            if !field.contains(obj.pos, escape_slack + obj.radius) {
                if is_obstacle {
                    score.record_dodge();
                }
                log::debug!("#{} left the playfield", obj.id);
                removed.push(obj.id);
                return false;
            }
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::landmarks::Landmark;

    /// Config with spawning pushed out of the way
    fn quiet_config() -> GameConfig {
        GameConfig {
            target_interval: 1000.0,
            obstacle_interval: 1000.0,
            powerup_interval: 1000.0,
            ..Default::default()
        }
    }

    fn quiet_loop() -> GameLoop {
        GameLoop::new(quiet_config()).unwrap()
    }

    fn hand_at(pos: Vec2) -> LandmarkFrame {
        LandmarkFrame::new().with(Landmark::RightHand, pos)
    }

    #[test]
    fn test_invalid_config_refused() {
        let config = GameConfig {
            target_radius: 0.0,
            ..Default::default()
        };
        assert!(GameLoop::new(config).is_err());
    }

    #[test]
    fn test_punch_removes_target_and_scores() {
        let mut game = quiet_loop();
        let id = game.spawn_at(ObjectClass::Target, Vec2::new(300.0, 300.0), Vec2::ZERO);
        let report = game.tick(SIM_DT, Some(&hand_at(Vec2::new(310.0, 300.0))));
        assert_eq!(report.events, vec![CollisionEvent::PunchHit { id }]);
        assert_eq!(report.triggers(), &[AudioTrigger::Hit]);
        assert_eq!(game.score().score, 10);
        assert!(game.objects().is_empty());
        assert_eq!(report.removed, vec![id]);
    }

    #[test]
    fn test_missing_frame_is_not_a_hit() {
        let mut game = quiet_loop();
        game.spawn_at(ObjectClass::Target, Vec2::new(300.0, 300.0), Vec2::ZERO);
        let report = game.tick(SIM_DT, None);
        assert!(report.events.is_empty());
        let report = game.tick(SIM_DT, Some(&LandmarkFrame::new()));
        assert!(report.events.is_empty());
        assert_eq!(game.objects().len(), 1);
    }

    #[test]
    fn test_nan_landmark_treated_as_absent() {
        let mut game = quiet_loop();
        game.spawn_at(ObjectClass::Target, Vec2::new(300.0, 300.0), Vec2::ZERO);
        let report = game.tick(SIM_DT, Some(&hand_at(Vec2::new(f32::NAN, 300.0))));
        assert!(report.events.is_empty());
        assert_eq!(report.dropped_landmarks, 1);
    }

    #[test]
    fn test_shielded_body_hit_still_removes_obstacle() {
        let mut game = quiet_loop();
        game.spawn_at(ObjectClass::PowerUp, Vec2::new(200.0, 200.0), Vec2::ZERO);
        // Force the power-up to be a shield
        game.objects[0].kind = ObjectKind::PowerUp {
            power: PowerKind::Shield,
            duration: 5.0,
        };
        let obstacle = game.spawn_at(ObjectClass::Obstacle, Vec2::new(1000.0, 200.0), Vec2::ZERO);

        let frame = LandmarkFrame::new()
            .with(Landmark::LeftHand, Vec2::new(200.0, 200.0))
            .with(Landmark::Head, Vec2::new(1000.0, 210.0));
        let report = game.tick(SIM_DT, Some(&frame));
        assert_eq!(report.delta.absorbed, 1);
        assert_eq!(game.score().lives, 3);
        assert_eq!(game.score().score, 0);
        assert!(report.removed.contains(&obstacle));
        assert!(game.objects().is_empty());
    }

    #[test]
    fn test_obstacle_reaching_player_zone_hits() {
        let mut game = quiet_loop();
        let center = game.config().playfield.center();
        let id = game.spawn_at(
            ObjectClass::Obstacle,
            center + Vec2::new(130.0, 0.0),
            Vec2::new(-100.0, 0.0),
        );
        let report = game.tick(0.2, None);
        assert_eq!(report.events, vec![CollisionEvent::BodyHit { id }]);
        assert_eq!(game.score().lives, 2);
        assert_eq!(report.triggers(), &[AudioTrigger::Damage]);
    }

    #[test]
    fn test_obstacle_leaving_playfield_is_dodged() {
        let mut game = quiet_loop();
        game.spawn_at(ObjectClass::Obstacle, Vec2::new(50.0, 50.0), Vec2::new(-200.0, 0.0));
        for _ in 0..120 {
            game.tick(SIM_DT, None);
        }
        assert!(game.objects().is_empty());
        assert_eq!(game.score().stats.obstacles_dodged, 1);
        assert_eq!(game.score().lives, 3);
    }

    #[test]
    fn test_slow_motion_halves_motion() {
        let mut game = quiet_loop();
        game.spawn_at(ObjectClass::PowerUp, Vec2::new(200.0, 200.0), Vec2::ZERO);
        game.objects[0].kind = ObjectKind::PowerUp {
            power: PowerKind::SlowMotion,
            duration: 6.0,
        };
        game.tick(SIM_DT, Some(&hand_at(Vec2::new(200.0, 200.0))));
        assert!(game.score().is_active(PowerKind::SlowMotion));

        let id = game.spawn_at(ObjectClass::Target, Vec2::new(600.0, 360.0), Vec2::new(100.0, 0.0));
        game.tick(1.0, None);
        let target = game.objects().iter().find(|o| o.id == id).unwrap();
        assert!((target.pos.x - 650.0).abs() < 1e-3);
    }

    #[test]
    fn test_power_up_expires_on_schedule() {
        let mut game = quiet_loop();
        game.spawn_at(ObjectClass::PowerUp, Vec2::new(200.0, 200.0), Vec2::ZERO);
        game.objects[0].kind = ObjectKind::PowerUp {
            power: PowerKind::DoubleScore,
            duration: 8.0,
        };
        game.tick(0.0, Some(&hand_at(Vec2::new(200.0, 200.0))));
        game.tick(7.9, None);
        assert!(game.score().is_active(PowerKind::DoubleScore));
        let report = game.tick(0.2, None);
        assert_eq!(report.expired_power_ups, vec![PowerKind::DoubleScore]);
        assert!(!game.score().is_active(PowerKind::DoubleScore));
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut game = GameLoop::new(GameConfig::default()).unwrap();
        game.set_paused(true);
        let report = game.tick(10.0, None);
        assert_eq!(report, TickReport::default());
        assert_eq!(game.now(), 0.0);
        assert!(game.objects().is_empty());
        assert!(game.snapshot().paused);

        game.toggle_pause();
        let report = game.tick(3.0, None);
        assert_eq!(report.spawned.len(), 1);
    }

    #[test]
    fn test_game_over_freezes_match() {
        let config = GameConfig {
            initial_lives: 1,
            ..quiet_config()
        };
        let mut game = GameLoop::new(config).unwrap();
        game.spawn_at(ObjectClass::Obstacle, Vec2::new(100.0, 100.0), Vec2::ZERO);
        let frame = LandmarkFrame::new().with(Landmark::Torso, Vec2::new(100.0, 100.0));
        let report = game.tick(SIM_DT, Some(&frame));
        assert!(report.delta.game_over);
        assert_eq!(report.triggers(), &[AudioTrigger::GameOver]);
        assert!(game.is_game_over());

        let now = game.now();
        game.spawn_at(ObjectClass::Target, Vec2::new(300.0, 300.0), Vec2::ZERO);
        let report = game.tick(SIM_DT, Some(&hand_at(Vec2::new(300.0, 300.0))));
        assert!(report.events.is_empty());
        assert_eq!(game.now(), now);

        game.reset();
        assert!(!game.is_game_over());
        assert_eq!(game.score().lives, 1);
        assert!(game.objects().is_empty());
    }

    #[test]
    fn test_clock_going_backwards_counts_as_zero() {
        let mut game = GameLoop::new(GameConfig::default()).unwrap();
        assert_eq!(game.tick_at(100.0, None).elapsed, 0.0);
        assert_eq!(game.tick_at(101.5, None).elapsed, 1.5);
        assert_eq!(game.tick_at(99.0, None).elapsed, 0.0);
        assert_eq!(game.tick_at(f64::NAN, None).elapsed, 0.0);
        // Measured from the latest good reading
        assert_eq!(game.tick_at(102.0, None).elapsed, 0.5);
        assert_eq!(game.now(), 2.0);
    }

    #[test]
    fn test_spawns_arrive_on_schedule() {
        let mut game = GameLoop::new(GameConfig::default()).unwrap();
        let mut spawned = 0;
        for _ in 0..6 {
            spawned += game.tick(0.5, None).spawned.len();
        }
        assert_eq!(spawned, 1);
        assert_eq!(game.objects()[0].class(), ObjectClass::Target);
    }

    #[test]
    fn test_determinism() {
        let mut a = GameLoop::new(GameConfig::default()).unwrap();
        let mut b = GameLoop::new(GameConfig::default()).unwrap();
        let frame = LandmarkFrame::new()
            .with(Landmark::LeftHand, Vec2::new(500.0, 300.0))
            .with(Landmark::RightHand, Vec2::new(780.0, 300.0))
            .with(Landmark::Torso, Vec2::new(640.0, 420.0));
        for _ in 0..1200 {
            let ra = a.tick(SIM_DT, Some(&frame));
            let rb = b.tick(SIM_DT, Some(&frame));
            assert_eq!(ra, rb);
        }
        assert_eq!(a.objects(), b.objects());
        assert_eq!(a.score(), b.score());
    }
}
