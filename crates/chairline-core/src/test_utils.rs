//! Shared test helpers for integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::config::{ControlSettings, QualityLevel};
use crate::engine::LineEngine;
use crate::event::TickReport;
use crate::fixed::{Fixed64, f64_to_fixed64};
use crate::id::Material;

// ===========================================================================
// Fixed-point helper
// ===========================================================================

pub fn fixed(v: f64) -> Fixed64 {
    f64_to_fixed64(v)
}

// ===========================================================================
// Settings constructors
// ===========================================================================

/// Defaults with a different raw-material rate.
pub fn settings_with_raw(rate: f64) -> ControlSettings {
    let mut s = ControlSettings::default();
    s.set_raw_material_rate(rate);
    s
}

/// Defaults with Premium quality: slower machines, 1% defects.
pub fn premium_settings() -> ControlSettings {
    let mut s = ControlSettings::default();
    s.set_quality(QualityLevel::Premium);
    s
}

// ===========================================================================
// Engine helpers
// ===========================================================================

/// An engine with no raw supply, so only seeded stock moves.
pub fn closed_engine() -> LineEngine {
    LineEngine::new(settings_with_raw(0.0))
}

/// An engine seeded with the given buffers.
pub fn seeded_engine(settings: ControlSettings, stock: &[(Material, u64)]) -> LineEngine {
    let mut engine = LineEngine::new(settings);
    for &(material, quantity) in stock {
        engine.set_quantity(material, quantity);
    }
    engine
}

/// Run `count` ticks of `seconds` each and return every report.
pub fn run_ticks(engine: &mut LineEngine, count: usize, seconds: f64) -> Vec<TickReport> {
    (0..count).map(|_| engine.tick(seconds)).collect()
}

/// Inventory as a plain array, in [`Material::ALL`] order.
pub fn stock(engine: &LineEngine) -> [u64; Material::COUNT] {
    Material::ALL.map(|m| engine.quantity(m))
}
