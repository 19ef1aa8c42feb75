//! Fixed-cadence frame loop over a [`Simulation`].

use chairline_core::fixed::{Units, fixed64_to_f64};
use chairline_core::id::{Material, StageId};
use chairline_core::sim::Simulation;
use tracing::{debug, info};

use crate::error::DemoError;

/// Most frames a single run will draw. Ten million frames is about 46 hours
/// of simulated time at 60 fps.
pub const MAX_FRAMES: u64 = 10_000_000;

/// How long to run and how often to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunConfig {
    /// Simulated seconds to run.
    pub seconds: f64,
    /// Synthetic frames per second.
    pub fps: u32,
}

impl RunConfig {
    pub fn new(seconds: f64, fps: u32) -> Self {
        Self { seconds, fps }
    }

    fn validate(&self) -> Result<(), DemoError> {
        if !self.seconds.is_finite() || self.seconds < 0.0 {
            return Err(DemoError::InvalidArgument {
                name: "seconds",
                detail: format!("expected a non-negative number, got {}", self.seconds),
            });
        }
        if self.fps == 0 {
            return Err(DemoError::InvalidArgument {
                name: "fps",
                detail: "must be at least 1".to_string(),
            });
        }
        if self.frame_count() > MAX_FRAMES {
            return Err(DemoError::InvalidArgument {
                name: "seconds",
                detail: format!(
                    "{} s at {} fps needs more than {MAX_FRAMES} frames",
                    self.seconds, self.fps
                ),
            });
        }
        Ok(())
    }

    /// Number of frames needed to cover `seconds`. Saturates at `u64::MAX`.
    pub fn frame_count(&self) -> u64 {
        (self.seconds * f64::from(self.fps)).ceil() as u64
    }
}

/// One overflow warning raised during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverflowNotice {
    /// Frame on which the alert was raised.
    pub frame: u64,
    pub materials: Vec<(Material, Units)>,
}

/// What happened over a run, beyond the final engine state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub alerts: Vec<OverflowNotice>,
    /// Running-to-Waiting transitions per stage.
    pub starvations: [u64; StageId::COUNT],
}

/// Start the simulation at timestamp zero and feed it evenly spaced frames.
pub fn run(sim: &mut Simulation, config: &RunConfig) -> Result<RunSummary, DemoError> {
    config.validate()?;
    let frame_ms = 1_000.0 / f64::from(config.fps);
    let frames = config.frame_count();
    info!(seconds = config.seconds, fps = config.fps, frames, "starting run");

    let mut summary = RunSummary::default();
    sim.start(0.0);

    for frame in 1..=frames {
        let now_ms = (frame as f64 * frame_ms).min(config.seconds * 1_000.0);
        let Some(report) = sim.frame(now_ms) else {
            break;
        };
        for stage in report.starved() {
            summary.starvations[stage.index()] += 1;
        }
        if let Some(materials) = sim.take_alert() {
            debug!(frame, count = materials.len(), "overflow alert");
            summary.alerts.push(OverflowNotice { frame, materials });
        }
        summary.frames = frame;
    }

    sim.stop();
    info!(
        total_time = fixed64_to_f64(sim.engine().total_time()),
        finished = sim.engine().finished(),
        alerts = summary.alerts.len(),
        "run complete"
    );
    Ok(summary)
}
