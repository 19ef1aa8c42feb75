//! Read-only views of line state.
//!
//! Snapshot types aggregate engine state into plain owned values for
//! rendering. Nothing here borrows from the engine.

use crate::config::DefectRate;
use crate::fixed::{Fixed64, Units};
use crate::id::{Material, StageId};
use crate::item::Inventory;
use crate::metrics::Bottleneck;
use crate::processor::{StageState, StageStatus};

// ---------------------------------------------------------------------------
// Stage snapshot
// ---------------------------------------------------------------------------

/// One stage as a status panel shows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSnapshot {
    pub id: StageId,
    pub status: StageStatus,
    /// Units emitted since the last reset.
    pub produced: Units,
    /// Banked credit. For the supply, the steel lane.
    pub credit: Fixed64,
    /// Effective units per second under the controls of the snapshot.
    pub rate: Fixed64,
}

impl StageSnapshot {
    pub fn new(id: StageId, state: &StageState, rate: Fixed64) -> Self {
        Self {
            id,
            status: state.status,
            produced: state.produced,
            credit: state.credit,
            rate,
        }
    }

    /// Text for the status badge.
    pub fn badge(&self) -> &'static str {
        match (self.id, self.status) {
            (_, StageStatus::Waiting) => "Waiting",
            (StageId::Inspection, StageStatus::Running) => "Inspecting",
            (_, StageStatus::Running) => "Running",
        }
    }
}

// ---------------------------------------------------------------------------
// Line snapshot
// ---------------------------------------------------------------------------

/// Everything a dashboard shows, copied out of the engine at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSnapshot {
    pub inventory: Inventory,
    /// One entry per stage, in line order.
    pub stages: Vec<StageSnapshot>,
    pub finished: Units,
    pub rejected: Units,
    pub qc_processed: Units,
    pub raw_produced: Fixed64,
    pub total_time: Fixed64,
    pub throughput_per_minute: Fixed64,
    pub efficiency: Fixed64,
    pub defect_rate: DefectRate,
    pub bottleneck: Bottleneck,
    /// Buffers above the overflow threshold.
    pub overflow: Vec<(Material, Units)>,
}

impl LineSnapshot {
    pub fn stage(&self, id: StageId) -> &StageSnapshot {
        &self.stages[id.index()]
    }

    pub fn quantity(&self, material: Material) -> Units {
        self.inventory.quantity(material)
    }

    /// Stages currently starved of inputs.
    pub fn waiting(&self) -> impl Iterator<Item = StageId> + '_ {
        self.stages
            .iter()
            .filter(|s| s.status == StageStatus::Waiting)
            .map(|s| s.id)
    }
}
