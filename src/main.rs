//! Punch Arena headless runner
//!
//! Drives a match at a fixed timestep with a scripted pose source standing in
//! for the camera, logging what a renderer and sound system would receive.
//!
//! Usage: punch-arena [config.json] [seconds]

use glam::Vec2;

use punch_arena::collaborators::{PoseReading, PoseSource, Presenter, run_frame};
use punch_arena::consts::SIM_DT;
use punch_arena::highscores::HighScoreEntry;
use punch_arena::sim::{AudioTrigger, GameLoop, Landmark, LandmarkFrame, Snapshot};
use punch_arena::{GameConfig, HighScores, SimError, format_clock};

const HIGHSCORE_FILE: &str = "punch_arena_highscores.json";
const DEFAULT_SECONDS: f32 = 60.0;

/// Player standing in the middle, sweeping both hands around
struct ScriptedPose {
    center: Vec2,
    t: f32,
}

impl ScriptedPose {
    fn new(center: Vec2) -> Self {
        Self { center, t: 0.0 }
    }
}

impl PoseSource for ScriptedPose {
    fn poll(&mut self) -> PoseReading {
        self.t += SIM_DT;
        let t = self.t;

        // Drop out now and then like a real tracker
        if (t * 0.7).sin() > 0.97 {
            return PoseReading::NoDetection;
        }

        let sway = Vec2::new((t * 0.4).sin() * 60.0, 0.0);
        let body = self.center + sway;
        let reach = 260.0 + (t * 1.3).sin() * 180.0;
        let left = body + Vec2::new(-(t * 0.9).cos().abs() * reach, (t * 1.7).sin() * 250.0);
        let right = body + Vec2::new((t * 1.1).sin().abs() * reach, (t * 1.4).cos() * 250.0);

        PoseReading::Frame(
            LandmarkFrame::new()
                .with(Landmark::Head, body + Vec2::new(0.0, -140.0))
                .with(Landmark::Torso, body)
                .with(Landmark::LeftShoulder, body + Vec2::new(-60.0, -90.0))
                .with(Landmark::RightShoulder, body + Vec2::new(60.0, -90.0))
                .with(Landmark::LeftHip, body + Vec2::new(-45.0, 90.0))
                .with(Landmark::RightHip, body + Vec2::new(45.0, 90.0))
                .with(Landmark::LeftHand, left)
                .with(Landmark::RightHand, right)
                .with_fists((t * 2.0).sin() > -0.5, (t * 2.3).cos() > -0.5),
        )
    }
}

/// Logs what a renderer and sound system would receive
#[derive(Default)]
struct LogPresenter {
    frames: u64,
}

impl Presenter for LogPresenter {
    fn present(&mut self, snapshot: &Snapshot<'_>) {
        self.frames += 1;
        // Once a second is plenty for a text log
        if self.frames % 60 != 0 {
            return;
        }
        let powers: Vec<String> = snapshot
            .score
            .active_power_ups
            .iter()
            .map(|(kind, p)| format!("{} {:.1}s", kind.as_str(), p.remaining(snapshot.now)))
            .collect();
        log::info!(
            "[{}] score {} lives {} level {} objects {} powers {:?}",
            format_clock(snapshot.now),
            snapshot.score.display_score(),
            snapshot.score.lives,
            snapshot.score.level,
            snapshot.objects.len(),
            powers
        );
    }

    fn play(&mut self, trigger: AudioTrigger) {
        log::info!("sound: {}", trigger.as_str());
    }
}

fn load_config(path: Option<&String>) -> Result<GameConfig, SimError> {
    match path {
        Some(path) => GameConfig::load(path),
        None => Ok(GameConfig::default()),
    }
}

fn run() -> Result<(), SimError> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = load_config(args.first())?;
    let seconds = args
        .get(1)
        .and_then(|s| s.parse::<f32>().ok())
        .filter(|s| s.is_finite() && *s > 0.0)
        .unwrap_or(DEFAULT_SECONDS);

    let mut game = GameLoop::new(config)?;
    let mut source = ScriptedPose::new(game.config().playfield.center());
    let mut presenter = LogPresenter::default();

    let frames = (seconds / SIM_DT).ceil() as u64;
    for _ in 0..frames {
        let report = run_frame(&mut game, &mut source, &mut presenter, SIM_DT);
        for kind in &report.expired_power_ups {
            log::info!("power-up ended: {}", kind.as_str());
        }
        if game.is_game_over() {
            break;
        }
    }

    let score = game.score();
    let stats = score.stats;
    log::info!(
        "Match finished after {}: score {} (best {}), level {}, lives {}",
        format_clock(game.now()),
        score.display_score(),
        score.high_score,
        score.level,
        score.lives
    );
    log::info!(
        "Punches {}, power-ups {}, hits taken {}, absorbed {}, dodged {}",
        stats.punches_landed,
        stats.powerups_grabbed,
        stats.hits_taken,
        stats.hits_absorbed,
        stats.obstacles_dodged
    );

    let mut highscores = HighScores::load(HIGHSCORE_FILE);
    if let Some(rank) = highscores.add(HighScoreEntry::from_match(score, game.now())) {
        log::info!("New high score, rank {}", rank);
        highscores.save(HIGHSCORE_FILE)?;
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}
