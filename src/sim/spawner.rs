//! Timed object creation
//!
//! Each object class has its own interval. The spawner keeps its own clock,
//! advanced only by the elapsed time handed to `tick`, and a seeded RNG so a
//! given seed always produces the same sequence of objects.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{GameObject, ObjectClass, ObjectId, ObjectKind, PowerKind};
use crate::config::GameConfig;

/// Creates targets, obstacles and power-ups on a timer
#[derive(Debug, Clone)]
pub struct Spawner {
    config: GameConfig,
    rng: Pcg32,
    /// Seconds advanced so far this match
    clock: f64,
    /// Clock value of the last spawn per class
    last_spawn: [f64; 3],
    /// Score used by the difficulty ramp
    score: i64,
    next_id: ObjectId,
}

impl Spawner {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            config: config.clone(),
            rng: Pcg32::seed_from_u64(config.seed),
            clock: 0.0,
            last_spawn: [0.0; 3],
            score: 0,
            next_id: 1,
        }
    }

    /// Seconds advanced so far this match
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Feed the current score into the difficulty ramp
    pub fn set_score(&mut self, score: i64) {
        self.score = score;
    }

    /// Interval currently in effect for a class
    pub fn interval(&self, class: ObjectClass) -> f32 {
        let base = self.config.spawn_interval(class);
        if !self.config.difficulty_ramp {
            return base;
        }
        let floor = match class {
            ObjectClass::Target => self.config.min_target_interval,
            ObjectClass::Obstacle => self.config.min_obstacle_interval,
            ObjectClass::PowerUp => return base,
        };
        let steps = (self.score.max(0) / self.config.ramp_every_points.max(1)) as f32;
        let factor = 1.0 + steps * self.config.ramp_step;
        (base / factor).max(floor.min(base))
    }

    /// Advance the spawn clock and emit every object whose interval elapsed
    ///
    /// Non-finite or negative elapsed times count as zero.
    pub fn tick(&mut self, elapsed: f32) -> Vec<GameObject> {
        if elapsed.is_finite() && elapsed > 0.0 {
            self.clock += elapsed as f64;
        }

        let mut spawned = Vec::new();
        for class in ObjectClass::ALL {
            let idx = class.index();
            if self.clock - self.last_spawn[idx] >= self.interval(class) as f64 {
                let obj = self.spawn(class);
                log::debug!(
                    "Spawned {:?} #{} at ({:.0}, {:.0}) t={:.2}",
                    class,
                    obj.id,
                    obj.pos.x,
                    obj.pos.y,
                    self.clock
                );
                spawned.push(obj);
                self.last_spawn[idx] = self.clock;
            }
        }
        spawned
    }

    /// Create one object of `class` right now
    pub fn spawn(&mut self, class: ObjectClass) -> GameObject {
        let id = self.next_id;
        self.next_id += 1;

        let speed_range = self.config.speed_range(class);
        let speed = self.rng.random_range(speed_range.min..=speed_range.max);

        let (kind, pos, vel) = match class {
            ObjectClass::Target => {
                let pos = self.interior_point();
                (ObjectKind::Target, pos, self.random_direction() * speed)
            }
            ObjectClass::Obstacle => {
                let pos = self.edge_point();
                let jitter = self.config.obstacle_aim_jitter;
                let aim = self.config.playfield.center()
                    + Vec2::new(
                        self.rng.random_range(-jitter..=jitter),
                        self.rng.random_range(-jitter..=jitter),
                    );
                let dir = (aim - pos).normalize_or_zero();
                (ObjectKind::Obstacle, pos, dir * speed)
            }
            ObjectClass::PowerUp => {
                let power = PowerKind::ALL[self.rng.random_range(0..PowerKind::ALL.len())];
                let kind = ObjectKind::PowerUp {
                    power,
                    duration: self.config.power_duration(power),
                };
                let pos = self.interior_point();
                (kind, pos, self.random_direction() * speed)
            }
        };

        GameObject {
            id,
            kind,
            pos,
            vel,
            radius: self.config.radius(class),
            spawn_time: self.clock,
            ttl: self.config.ttl(class),
        }
    }

    /// Restart the clocks and RNG for a new match (ids keep increasing)
    pub fn reset(&mut self) {
        self.rng = Pcg32::seed_from_u64(self.config.seed);
        self.clock = 0.0;
        self.last_spawn = [0.0; 3];
        self.score = 0;
    }

    /// Random point inside the playfield, away from the walls
    fn interior_point(&mut self) -> Vec2 {
        let field = self.config.playfield;
        let m = self.config.spawn_margin;
        Vec2::new(
            self.rng.random_range(m..=field.width - m),
            self.rng.random_range(m..=field.height - m),
        )
    }

    /// Random point on one of the four walls, away from the corners
    fn edge_point(&mut self) -> Vec2 {
        let field = self.config.playfield;
        let m = self.config.spawn_margin;
        let along_x = self.rng.random_range(m..=field.width - m);
        let along_y = self.rng.random_range(m..=field.height - m);
        match self.rng.random_range(0..4u8) {
            0 => Vec2::new(along_x, 0.0),
            1 => Vec2::new(along_x, field.height),
            2 => Vec2::new(0.0, along_y),
            _ => Vec2::new(field.width, along_y),
        }
    }

    fn random_direction(&mut self) -> Vec2 {
        let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
        Vec2::new(angle.cos(), angle.sin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(objs: &[GameObject]) -> Vec<ObjectClass> {
        objs.iter().map(|o| o.class()).collect()
    }

    #[test]
    fn test_nothing_before_first_interval() {
        let mut spawner = Spawner::new(&GameConfig::default());
        assert!(spawner.tick(2.9).is_empty());
    }

    #[test]
    fn test_default_schedule() {
        let mut spawner = Spawner::new(&GameConfig::default());
        let mut log = Vec::new();
        // 16 seconds in 0.5s steps
        for step in 1..=32 {
            for obj in spawner.tick(0.5) {
                log.push((step as f32 * 0.5, obj.class()));
            }
        }
        let targets: Vec<f32> = log
            .iter()
            .filter(|(_, c)| *c == ObjectClass::Target)
            .map(|(t, _)| *t)
            .collect();
        let obstacles: Vec<f32> = log
            .iter()
            .filter(|(_, c)| *c == ObjectClass::Obstacle)
            .map(|(t, _)| *t)
            .collect();
        let powerups: Vec<f32> = log
            .iter()
            .filter(|(_, c)| *c == ObjectClass::PowerUp)
            .map(|(t, _)| *t)
            .collect();
        assert_eq!(targets, vec![3.0, 6.0, 9.0, 12.0, 15.0]);
        assert_eq!(obstacles, vec![5.0, 10.0, 15.0]);
        assert_eq!(powerups, vec![15.0]);
    }

    #[test]
    fn test_one_spawn_per_class_per_tick() {
        let mut spawner = Spawner::new(&GameConfig::default());
        // A huge stall still yields one of each, not a backlog
        let objs = spawner.tick(100.0);
        assert_eq!(
            kinds(&objs),
            vec![ObjectClass::Target, ObjectClass::Obstacle, ObjectClass::PowerUp]
        );
    }

    #[test]
    fn test_negative_and_nan_elapsed_ignored() {
        let mut spawner = Spawner::new(&GameConfig::default());
        spawner.tick(2.0);
        assert!(spawner.tick(-10.0).is_empty());
        assert!(spawner.tick(f32::NAN).is_empty());
        assert_eq!(spawner.clock(), 2.0);
        assert_eq!(kinds(&spawner.tick(1.0)), vec![ObjectClass::Target]);
    }

    #[test]
    fn test_spawned_objects_respect_bounds_and_speed() {
        let config = GameConfig::default();
        let mut spawner = Spawner::new(&config);
        for _ in 0..200 {
            let t = spawner.spawn(ObjectClass::Target);
            assert!(t.pos.x >= 100.0 && t.pos.x <= 1180.0);
            assert!(t.pos.y >= 100.0 && t.pos.y <= 620.0);
            let speed = t.vel.length();
            assert!(speed >= 50.0 - 1e-3 && speed <= 150.0 + 1e-3);
            assert_eq!(t.ttl, None);

            let o = spawner.spawn(ObjectClass::Obstacle);
            assert!(config.playfield.contains(o.pos, 0.0));
            let speed = o.vel.length();
            assert!(speed >= 80.0 - 1e-3 && speed <= 200.0 + 1e-3);
            // Heading into the playfield
            assert!(o.vel.dot(config.playfield.center() - o.pos) > 0.0);
            assert_eq!(o.ttl, Some(10.0));
        }
    }

    #[test]
    fn test_powerup_payload_matches_kind() {
        let mut spawner = Spawner::new(&GameConfig::default());
        let mut seen = Vec::new();
        for _ in 0..100 {
            let p = spawner.spawn(ObjectClass::PowerUp);
            assert_eq!(p.ttl, Some(5.0));
            let ObjectKind::PowerUp { power, duration } = p.kind else {
                panic!("expected power-up");
            };
            let expected = match power {
                PowerKind::Shield => 5.0,
                PowerKind::DoubleScore => 8.0,
                PowerKind::SlowMotion => 6.0,
            };
            assert_eq!(duration, expected);
            if !seen.contains(&power) {
                seen.push(power);
            }
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut spawner = Spawner::new(&GameConfig::default());
        let a = spawner.spawn(ObjectClass::Target);
        let b = spawner.spawn(ObjectClass::PowerUp);
        spawner.reset();
        let c = spawner.spawn(ObjectClass::Obstacle);
        assert!(a.id < b.id && b.id < c.id);
    }

    #[test]
    fn test_same_seed_same_objects() {
        let config = GameConfig::default();
        let mut a = Spawner::new(&config);
        let mut b = Spawner::new(&config);
        for _ in 0..40 {
            assert_eq!(a.tick(0.5), b.tick(0.5));
        }
    }

    #[test]
    fn test_difficulty_ramp_shortens_intervals() {
        let mut spawner = Spawner::new(&GameConfig::default());
        assert_eq!(spawner.interval(ObjectClass::Target), 3.0);
        spawner.set_score(5000);
        // 3 / 1.5 = 2
        assert!((spawner.interval(ObjectClass::Target) - 2.0).abs() < 1e-5);
        spawner.set_score(100_000);
        assert_eq!(spawner.interval(ObjectClass::Target), 1.5);
        assert_eq!(spawner.interval(ObjectClass::Obstacle), 3.0);
        assert_eq!(spawner.interval(ObjectClass::PowerUp), 15.0);

        let flat = GameConfig {
            difficulty_ramp: false,
            ..Default::default()
        };
        let mut spawner = Spawner::new(&flat);
        spawner.set_score(100_000);
        assert_eq!(spawner.interval(ObjectClass::Target), 3.0);
    }

    #[test]
    fn test_zero_ramp_step_does_not_panic() {
        let mut spawner = Spawner::new(&GameConfig {
            ramp_every_points: 0,
            ..Default::default()
        });
        spawner.set_score(2500);
        assert_eq!(spawner.interval(ObjectClass::Target), 1.5);
    }
}
