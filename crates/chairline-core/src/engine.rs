//! The line engine: owns every piece of simulation state and advances it.
//!
//! # Architecture
//!
//! The `LineEngine` owns:
//! - The operator's [`ControlSettings`]
//! - One [`Inventory`] shared by all stages
//! - One [`StageState`] per stage (banked credit, counter, badge)
//! - The rejected-chair counter, raw-material counter and simulated clock
//!
//! # Tick
//!
//! Each `tick()`:
//! 1. **Clamp** -- negative or non-finite elapsed time becomes zero.
//! 2. **Read controls** -- effective rates and the defect rate are fixed for
//!    the whole tick.
//! 3. **Process** -- every stage in [`LINE`] order accrues credit and spends
//!    it against the inventory, so downstream stages see upstream output
//!    from the same tick.
//! 4. **Bookkeeping** -- advance the clock and the raw-material counter.
//!
//! The engine never schedules itself and never fails: stalls and overflow
//! are state to be queried, not errors.

use tracing::{debug, info};

use crate::config::{ControlSettings, DefectRate};
use crate::event::{LineEvent, TickReport};
use crate::fixed::{Fixed64, Units, fixed64_to_f64, sanitize_elapsed};
use crate::id::{Material, StageId};
use crate::item::Inventory;
use crate::metrics::{self, Bottleneck};
use crate::processor::{StageResult, StageState, StageStatus};
use crate::query::{LineSnapshot, StageSnapshot};
use crate::registry::{LINE, effective_rate};

/// Buffered quantities strictly above this are reported as overflow.
pub const OVERFLOW_THRESHOLD: Units = 300;

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// The chair line simulation. One value holds the whole state block, and
/// [`reset`](Self::reset) clears it as a unit.
#[derive(Debug, Clone)]
pub struct LineEngine {
    settings: ControlSettings,
    inventory: Inventory,
    stages: [StageState; StageId::COUNT],
    rejected: Units,
    /// Raw material delivered, `rate * time`, before whole-unit rounding.
    raw_produced: Fixed64,
    total_time: Fixed64,
}

impl Default for LineEngine {
    fn default() -> Self {
        Self::new(ControlSettings::default())
    }
}

impl LineEngine {
    /// Create an engine with empty buffers and the given controls.
    pub fn new(settings: ControlSettings) -> Self {
        Self {
            settings,
            inventory: Inventory::new(),
            stages: Default::default(),
            rejected: 0,
            raw_produced: Fixed64::ZERO,
            total_time: Fixed64::ZERO,
        }
    }

    // -----------------------------------------------------------------------
    // Controls
    // -----------------------------------------------------------------------

    pub fn settings(&self) -> &ControlSettings {
        &self.settings
    }

    /// Mutable access for the control setters. Changes take effect at the
    /// start of the next tick.
    pub fn settings_mut(&mut self) -> &mut ControlSettings {
        &mut self.settings
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// Advance the line by `elapsed_seconds` of wall-clock time.
    pub fn tick(&mut self, elapsed_seconds: f64) -> TickReport {
        self.tick_fixed(sanitize_elapsed(elapsed_seconds))
    }

    /// Advance the line by an already-clamped fixed-point step.
    pub fn tick_fixed(&mut self, elapsed: Fixed64) -> TickReport {
        let elapsed = elapsed.max(Fixed64::ZERO);
        let mut report = TickReport {
            elapsed,
            events: Vec::new(),
        };

        // Controls are read once, up front.
        let rates: [Fixed64; StageId::COUNT] =
            std::array::from_fn(|i| effective_rate(&LINE[i], &self.settings));
        let defects = self.settings.defect_rate();

        for def in LINE.iter() {
            let state = &mut self.stages[def.id.index()];
            let result = def.tick(state, rates[def.id.index()], elapsed, &mut self.inventory, defects);
            self.rejected = self.rejected.saturating_add(result.rejected);
            record(def.id, &result, state.status, &mut report);
        }

        let raw_rate = rates[StageId::RawSupply.index()];
        self.raw_produced = self.raw_produced.saturating_add(raw_rate.saturating_mul(elapsed));
        self.total_time = self.total_time.saturating_add(elapsed);

        report
    }

    // -----------------------------------------------------------------------
    // Reset
    // -----------------------------------------------------------------------

    /// Zero every buffer, counter, accumulator and the clock, and put every
    /// badge back to Running. Controls are kept.
    pub fn reset(&mut self) {
        info!(
            total_time = fixed64_to_f64(self.total_time),
            finished = self.finished(),
            "resetting line"
        );
        self.inventory.clear();
        self.stages = Default::default();
        self.rejected = 0;
        self.raw_produced = Fixed64::ZERO;
        self.total_time = Fixed64::ZERO;
    }

    // -----------------------------------------------------------------------
    // Inventory
    // -----------------------------------------------------------------------

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Quantity of one material on hand.
    pub fn quantity(&self, material: Material) -> Units {
        self.inventory.quantity(material)
    }

    /// Overwrite a buffer. Meant for seeding scenarios.
    pub fn set_quantity(&mut self, material: Material, quantity: Units) {
        self.inventory.set(material, quantity);
    }

    /// Buffered materials strictly above [`OVERFLOW_THRESHOLD`], in line
    /// order. Read-only; alerting and debouncing are up to the caller.
    pub fn check_overflow(&self) -> Vec<(Material, Units)> {
        Material::BUFFERED
            .iter()
            .map(|m| (*m, self.inventory.quantity(*m)))
            .filter(|(_, q)| *q > OVERFLOW_THRESHOLD)
            .collect()
    }

    // -----------------------------------------------------------------------
    // Stage queries
    // -----------------------------------------------------------------------

    pub fn stage_state(&self, stage: StageId) -> &StageState {
        &self.stages[stage.index()]
    }

    pub fn status(&self, stage: StageId) -> StageStatus {
        self.stages[stage.index()].status
    }

    /// Units a stage has emitted since the last reset. For inspection this
    /// counts every chair inspected, passed or not.
    pub fn produced(&self, stage: StageId) -> Units {
        self.stages[stage.index()].produced
    }

    /// Banked credit of a stage (the steel lane, for the supply).
    pub fn accumulator(&self, stage: StageId) -> Fixed64 {
        self.stages[stage.index()].credit
    }

    /// Overwrite a stage's banked credit. Meant for seeding scenarios.
    pub fn set_accumulator(&mut self, stage: StageId, credit: Fixed64) {
        self.stages[stage.index()].credit = credit.max(Fixed64::ZERO);
    }

    /// Effective rate of a stage under the current controls.
    pub fn rate(&self, stage: StageId) -> Fixed64 {
        effective_rate(&LINE[stage.index()], &self.settings)
    }

    // -----------------------------------------------------------------------
    // Counters and statistics
    // -----------------------------------------------------------------------

    /// Chairs that passed inspection.
    pub fn finished(&self) -> Units {
        self.inventory.quantity(Material::Finished)
    }

    /// Chairs that failed inspection.
    pub fn rejected(&self) -> Units {
        self.rejected
    }

    /// Chairs inspected, passed or rejected.
    pub fn qc_processed(&self) -> Units {
        self.produced(StageId::Inspection)
    }

    pub fn raw_produced(&self) -> Fixed64 {
        self.raw_produced
    }

    /// Seconds simulated since the last reset.
    pub fn total_time(&self) -> Fixed64 {
        self.total_time
    }

    pub fn defect_rate(&self) -> DefectRate {
        self.settings.defect_rate()
    }

    pub fn throughput_per_minute(&self) -> Fixed64 {
        metrics::throughput_per_minute(self.finished(), self.total_time)
    }

    /// Finished chairs as a percentage of what the bottleneck allowed.
    pub fn efficiency(&self) -> Fixed64 {
        metrics::efficiency(self.finished(), self.total_time, &self.settings)
    }

    pub fn bottleneck(&self) -> Bottleneck {
        metrics::bottleneck(&self.settings)
    }

    /// An owned view of everything a renderer shows.
    pub fn snapshot(&self) -> LineSnapshot {
        LineSnapshot {
            inventory: self.inventory.clone(),
            stages: StageId::ALL
                .iter()
                .map(|id| StageSnapshot::new(*id, &self.stages[id.index()], self.rate(*id)))
                .collect(),
            finished: self.finished(),
            rejected: self.rejected,
            qc_processed: self.qc_processed(),
            raw_produced: self.raw_produced,
            total_time: self.total_time,
            throughput_per_minute: self.throughput_per_minute(),
            efficiency: self.efficiency(),
            defect_rate: self.defect_rate(),
            bottleneck: self.bottleneck(),
            overflow: self.check_overflow(),
        }
    }
}

/// Translate one stage's result into report events.
fn record(stage: StageId, result: &StageResult, status: StageStatus, report: &mut TickReport) {
    for &(material, quantity) in &result.consumed {
        report.events.push(LineEvent::UnitsConsumed {
            stage,
            material,
            quantity,
        });
    }
    for &(material, quantity) in &result.produced {
        report.events.push(LineEvent::UnitsProduced {
            stage,
            material,
            quantity,
        });
    }
    if result.rejected > 0 {
        report.events.push(LineEvent::UnitsRejected {
            stage,
            quantity: result.rejected,
        });
    }
    if result.previous_status.is_some() {
        match status {
            StageStatus::Waiting => {
                debug!(%stage, "stage starved");
                report.events.push(LineEvent::StageStarved { stage });
            }
            StageStatus::Running => {
                debug!(%stage, "stage resumed");
                report.events.push(LineEvent::StageResumed { stage });
            }
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
