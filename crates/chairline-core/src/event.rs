//! Per-tick line events.
//!
//! Every call to [`LineEngine::tick`](crate::engine::LineEngine::tick)
//! returns a [`TickReport`] listing what each stage consumed and produced and
//! which badges flipped. Renderers use it to animate transitions; tests use
//! it to check conservation without diffing whole inventories.

use crate::fixed::{Fixed64, Units};
use crate::id::{Material, StageId};

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

/// Something that happened on the line during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEvent {
    // -- Production --
    UnitsProduced {
        stage: StageId,
        material: Material,
        quantity: Units,
    },
    UnitsConsumed {
        stage: StageId,
        material: Material,
        quantity: Units,
    },
    UnitsRejected {
        stage: StageId,
        quantity: Units,
    },

    // -- Badges --
    /// Credit is banked but inputs ran short.
    StageStarved { stage: StageId },
    /// A starved stage made something again.
    StageResumed { stage: StageId },
}

// ---------------------------------------------------------------------------
// Tick report
// ---------------------------------------------------------------------------

/// Everything that happened in one tick, in stage order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Seconds actually simulated after clamping.
    pub elapsed: Fixed64,
    pub events: Vec<LineEvent>,
}

impl TickReport {
    /// Units of `material` a stage produced this tick.
    pub fn produced(&self, stage: StageId, material: Material) -> Units {
        self.events
            .iter()
            .filter_map(|e| match *e {
                LineEvent::UnitsProduced { stage: s, material: m, quantity } if s == stage && m == material => {
                    Some(quantity)
                }
                _ => None,
            })
            .sum()
    }

    /// Units of `material` a stage consumed this tick.
    pub fn consumed(&self, stage: StageId, material: Material) -> Units {
        self.events
            .iter()
            .filter_map(|e| match *e {
                LineEvent::UnitsConsumed { stage: s, material: m, quantity } if s == stage && m == material => {
                    Some(quantity)
                }
                _ => None,
            })
            .sum()
    }

    /// Chairs rejected by inspection this tick.
    pub fn rejected(&self) -> Units {
        self.events
            .iter()
            .filter_map(|e| match *e {
                LineEvent::UnitsRejected { quantity, .. } => Some(quantity),
                _ => None,
            })
            .sum()
    }

    /// Stages that went from Running to Waiting this tick.
    pub fn starved(&self) -> impl Iterator<Item = StageId> + '_ {
        self.events.iter().filter_map(|e| match *e {
            LineEvent::StageStarved { stage } => Some(stage),
            _ => None,
        })
    }

    /// Whether nothing moved this tick.
    pub fn is_idle(&self) -> bool {
        self.events.is_empty()
    }
}
