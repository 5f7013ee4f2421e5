//! Seams to the outside world
//!
//! Camera/pose estimation, drawing and sound live outside the core. Each is
//! touched once per frame: poll the pose source, tick, hand the snapshot and
//! the frame's sound cues to the presenter.

use crate::sim::{AudioTrigger, GameLoop, LandmarkFrame, Snapshot, TickReport};

/// Result of polling the pose source for one frame
#[derive(Debug, Clone, PartialEq)]
pub enum PoseReading {
    Frame(LandmarkFrame),
    /// Source ran but found nobody
    NoDetection,
    /// Source could not answer in time
    TimedOut,
}

impl PoseReading {
    pub fn frame(&self) -> Option<&LandmarkFrame> {
        match self {
            PoseReading::Frame(frame) => Some(frame),
            PoseReading::NoDetection | PoseReading::TimedOut => None,
        }
    }
}

/// Supplies the latest landmarks; must not block indefinitely
pub trait PoseSource {
    fn poll(&mut self) -> PoseReading;
}

/// Consumes per-frame output (renderer plus audio)
pub trait Presenter {
    fn present(&mut self, snapshot: &Snapshot<'_>);

    fn play(&mut self, trigger: AudioTrigger);
}

/// Run one frame: poll, tick, present
///
/// Paused or finished matches still get presented (frozen state).
pub fn run_frame(
    game: &mut GameLoop,
    source: &mut impl PoseSource,
    presenter: &mut impl Presenter,
    elapsed: f32,
) -> TickReport {
    let reading = source.poll();
    if reading == PoseReading::TimedOut {
        log::debug!("Pose source timed out, ticking without landmarks");
    }

    let report = game.tick(elapsed, reading.frame());
    for &trigger in report.triggers() {
        presenter.play(trigger);
    }
    presenter.present(&game.snapshot());
    report
}
