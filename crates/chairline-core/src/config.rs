//! Line controls: the knobs the operator turns while the line runs.
//!
//! Every setter sanitizes its input instead of rejecting it. Out-of-range
//! but finite values are accepted as given; only values the engine cannot
//! use (non-finite rates, unknown quality levels) are dropped, leaving the
//! previous setting in place.

use crate::fixed::{Fixed64, Units, f64_to_fixed64, fixed64_to_f64};
use serde::{Deserialize, Serialize};
use tracing::warn;

// ---------------------------------------------------------------------------
// Quality level
// ---------------------------------------------------------------------------

/// Inspection strictness. Trades line speed for fewer defects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QualityLevel {
    Fast,
    #[default]
    Standard,
    Premium,
}

impl QualityLevel {
    /// Map the slider position (1..=3) to a level.
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(QualityLevel::Fast),
            2 => Some(QualityLevel::Standard),
            3 => Some(QualityLevel::Premium),
            _ => None,
        }
    }

    pub fn level(self) -> u8 {
        match self {
            QualityLevel::Fast => 1,
            QualityLevel::Standard => 2,
            QualityLevel::Premium => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QualityLevel::Fast => "Fast",
            QualityLevel::Standard => "Standard",
            QualityLevel::Premium => "Premium",
        }
    }

    /// Speed factor applied to every machine stage, as a percentage.
    pub fn speed_percent(self) -> u32 {
        match self {
            QualityLevel::Fast => 120,
            QualityLevel::Standard => 100,
            QualityLevel::Premium => 80,
        }
    }

    fn base_defect_bps(self) -> u32 {
        match self {
            QualityLevel::Fast => 1_500,
            QualityLevel::Standard => 500,
            QualityLevel::Premium => 100,
        }
    }
}

// ---------------------------------------------------------------------------
// Defect rate
// ---------------------------------------------------------------------------

/// Fraction of inspected chairs that fail, held in basis points so the
/// pass/fail split is exact integer arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DefectRate(u32);

impl DefectRate {
    const SCALE: u32 = 10_000;
    /// Maintenance never pushes defects below 1%.
    const MAINTENANCE_FLOOR_BPS: u32 = 100;

    /// Derive the rate from the quality level and maintenance mode.
    pub fn derive(quality: QualityLevel, maintenance: bool) -> Self {
        let base = quality.base_defect_bps();
        if maintenance {
            Self((base * 3 / 10).max(Self::MAINTENANCE_FLOOR_BPS))
        } else {
            Self(base)
        }
    }

    pub fn basis_points(self) -> u32 {
        self.0
    }

    /// `floor(n * (1 - rate))`.
    pub fn passed(self, n: Units) -> Units {
        let keep = u128::from(Self::SCALE - self.0);
        (u128::from(n) * keep / u128::from(Self::SCALE)) as Units
    }

    /// `1 - rate` as a fixed-point fraction.
    pub fn pass_fraction(self) -> Fixed64 {
        Fixed64::from_num(Self::SCALE - self.0) / Fixed64::from_num(Self::SCALE)
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / f64::from(Self::SCALE)
    }
}

// ---------------------------------------------------------------------------
// Controls
// ---------------------------------------------------------------------------

/// Which speed slider a stage listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shop {
    Metal,
    Wood,
    Assembly,
}

/// The operator's current control settings, read at the top of every tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlSettings {
    raw_material_rate: Fixed64,
    metal_shop_speed: u32,
    wood_shop_speed: u32,
    assembly_speed: u32,
    quality: QualityLevel,
    maintenance_mode: bool,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            raw_material_rate: Fixed64::from_num(5),
            metal_shop_speed: 100,
            wood_shop_speed: 100,
            assembly_speed: 100,
            quality: QualityLevel::Standard,
            maintenance_mode: false,
        }
    }
}

impl ControlSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw-material units delivered per second.
    pub fn raw_material_rate(&self) -> Fixed64 {
        self.raw_material_rate
    }

    pub fn shop_speed(&self, shop: Shop) -> u32 {
        match shop {
            Shop::Metal => self.metal_shop_speed,
            Shop::Wood => self.wood_shop_speed,
            Shop::Assembly => self.assembly_speed,
        }
    }

    pub fn quality(&self) -> QualityLevel {
        self.quality
    }

    pub fn maintenance_mode(&self) -> bool {
        self.maintenance_mode
    }

    /// Maintenance halves every machine's speed.
    pub fn maintenance_percent(&self) -> u32 {
        if self.maintenance_mode { 50 } else { 100 }
    }

    pub fn defect_rate(&self) -> DefectRate {
        DefectRate::derive(self.quality, self.maintenance_mode)
    }

    /// Set the raw-material rate. Non-finite values keep the previous rate;
    /// negative values clamp to zero.
    pub fn set_raw_material_rate(&mut self, rate: f64) {
        if !rate.is_finite() {
            warn!(rate, kept = fixed64_to_f64(self.raw_material_rate), "ignoring non-finite raw material rate");
            return;
        }
        if rate < 0.0 {
            warn!(rate, "clamping negative raw material rate to zero");
            self.raw_material_rate = Fixed64::ZERO;
            return;
        }
        self.raw_material_rate = f64_to_fixed64(rate);
    }

    pub fn set_shop_speed(&mut self, shop: Shop, percent: u32) {
        match shop {
            Shop::Metal => self.metal_shop_speed = percent,
            Shop::Wood => self.wood_shop_speed = percent,
            Shop::Assembly => self.assembly_speed = percent,
        }
    }

    pub fn set_quality(&mut self, quality: QualityLevel) {
        self.quality = quality;
    }

    /// Set the quality from its slider position. Unknown positions keep the
    /// previous level.
    pub fn set_quality_level(&mut self, level: u8) {
        match QualityLevel::from_level(level) {
            Some(q) => self.quality = q,
            None => warn!(level, kept = self.quality.level(), "ignoring unknown quality level"),
        }
    }

    pub fn set_maintenance_mode(&mut self, on: bool) {
        self.maintenance_mode = on;
    }
}
