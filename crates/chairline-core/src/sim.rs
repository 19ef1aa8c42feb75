//! Frame driver and overflow alert debounce.
//!
//! The engine only knows elapsed seconds. [`Simulation`] sits between it and
//! a host that reports frame timestamps in milliseconds: it holds the
//! running flag and the last-update stamp, turns each frame into one `tick`
//! call, and decides when an overflow warning should be raised.

use tracing::{info, warn};

use crate::config::ControlSettings;
use crate::engine::LineEngine;
use crate::event::TickReport;
use crate::fixed::{Fixed64, Units, fixed64_to_f64};
use crate::id::Material;

/// Simulated seconds an overflow alert stays up before it can fire again.
pub const ALERT_COOLDOWN_SECS: i32 = 5;

// ---------------------------------------------------------------------------
// Overflow alert
// ---------------------------------------------------------------------------

/// Debounces overflow reports so one warning is raised per cool-down window.
///
/// The window is counted down by each step's elapsed time rather than pinned
/// to the engine clock, so an engine reset cannot stretch it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverflowAlert {
    /// Simulated seconds left before another alert may fire.
    remaining: Option<Fixed64>,
    pending: Option<Vec<(Material, Units)>>,
}

impl OverflowAlert {
    /// Feed one overflow check taken after a step of `elapsed` seconds.
    /// Raises an alert when something overflows and no alert is armed.
    pub fn poll(&mut self, elapsed: Fixed64, overflow: Vec<(Material, Units)>) -> bool {
        if let Some(left) = self.remaining {
            let left = left.saturating_sub(elapsed.max(Fixed64::ZERO));
            if left > Fixed64::ZERO {
                self.remaining = Some(left);
                return false;
            }
            self.remaining = None;
        }
        if overflow.is_empty() {
            return false;
        }
        self.remaining = Some(Fixed64::from_num(ALERT_COOLDOWN_SECS));
        self.pending = Some(overflow);
        true
    }

    pub fn is_armed(&self) -> bool {
        self.remaining.is_some()
    }

    /// The materials of the last raised alert, if nobody has shown it yet.
    pub fn take(&mut self) -> Option<Vec<(Material, Units)>> {
        self.pending.take()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

// ---------------------------------------------------------------------------
// Frame driver
// ---------------------------------------------------------------------------

/// Runs a [`LineEngine`] from host frame timestamps.
#[derive(Debug, Clone)]
pub struct Simulation {
    engine: LineEngine,
    running: bool,
    last_update_ms: f64,
    alert: OverflowAlert,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(LineEngine::default())
    }
}

impl Simulation {
    /// Wrap an engine. The driver starts stopped.
    pub fn new(engine: LineEngine) -> Self {
        Self {
            engine,
            running: false,
            last_update_ms: 0.0,
            alert: OverflowAlert::default(),
        }
    }

    pub fn engine(&self) -> &LineEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut LineEngine {
        &mut self.engine
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Resume from the current state. Time before `now_ms` is not counted.
    pub fn start(&mut self, now_ms: f64) {
        if !self.running {
            info!(now_ms, "line started");
        }
        self.running = true;
        self.last_update_ms = rebase(now_ms, self.last_update_ms);
    }

    pub fn stop(&mut self) {
        if self.running {
            info!(
                total_time = fixed64_to_f64(self.engine.total_time()),
                "line stopped"
            );
        }
        self.running = false;
    }

    /// Advance by the time since the previous frame. `None` while stopped.
    pub fn frame(&mut self, now_ms: f64) -> Option<TickReport> {
        if !self.running {
            return None;
        }
        let elapsed = if now_ms.is_finite() {
            ((now_ms - self.last_update_ms) / 1000.0).max(0.0)
        } else {
            warn!(now_ms, "ignoring non-finite frame timestamp");
            0.0
        };
        self.last_update_ms = rebase(now_ms, self.last_update_ms);

        let report = self.engine.tick(elapsed);
        if self
            .alert
            .poll(report.elapsed, self.engine.check_overflow())
        {
            warn!(total_time = fixed64_to_f64(self.engine.total_time()), "inventory overflow");
        }
        Some(report)
    }

    /// Clear all line state and any armed alert. Controls and the running
    /// flag are kept.
    pub fn reset(&mut self, now_ms: f64) {
        self.engine.reset();
        self.alert.clear();
        self.last_update_ms = rebase(now_ms, self.last_update_ms);
    }

    /// Take the overflow alert raised by the last frames, if any.
    pub fn take_alert(&mut self) -> Option<Vec<(Material, Units)>> {
        self.alert.take()
    }

    pub fn alert(&self) -> &OverflowAlert {
        &self.alert
    }

    // -----------------------------------------------------------------------
    // Controls
    // -----------------------------------------------------------------------

    pub fn settings(&self) -> &ControlSettings {
        self.engine.settings()
    }

    pub fn settings_mut(&mut self) -> &mut ControlSettings {
        self.engine.settings_mut()
    }
}

/// Take a new timestamp, keeping the old one if the new one is unusable.
fn rebase(now_ms: f64, previous: f64) -> f64 {
    if now_ms.is_finite() { now_ms } else { previous }
}

// ---------------------------------------------------------------------------
// State hash
// ---------------------------------------------------------------------------

/// A deterministic hash of line state, for checking that two runs agree.
///
/// FNV-1a (64-bit). Not cryptographic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateHash(pub u64);

impl StateHash {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;

    pub fn new() -> Self {
        Self(Self::FNV_OFFSET)
    }

    pub fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= b as u64;
            self.0 = self.0.wrapping_mul(Self::FNV_PRIME);
        }
    }

    pub fn write_u64(&mut self, v: u64) {
        self.write(&v.to_le_bytes());
    }

    pub fn write_fixed64(&mut self, v: Fixed64) {
        self.write(&v.to_bits().to_le_bytes());
    }

    pub fn finish(self) -> u64 {
        self.0
    }

    /// Hash every buffer, counter, accumulator and badge of an engine.
    pub fn of(engine: &LineEngine) -> u64 {
        let mut h = Self::new();
        for (_, q) in engine.inventory().iter() {
            h.write_u64(q);
        }
        for id in crate::id::StageId::ALL {
            let s = engine.stage_state(id);
            h.write_fixed64(s.credit);
            h.write_fixed64(s.secondary_credit);
            h.write_u64(s.produced);
            h.write(&[s.status as u8]);
        }
        h.write_u64(engine.rejected());
        h.write_fixed64(engine.raw_produced());
        h.write_fixed64(engine.total_time());
        h.finish()
    }
}

impl Default for StateHash {
    fn default() -> Self {
        Self::new()
    }
}
