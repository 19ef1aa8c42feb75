//! Serde data file structs for line control settings.
//!
//! The on-disk form is a flat table of slider positions. Every field is
//! optional; anything left out keeps the factory default.

use serde::Deserialize;

/// Control settings as written in a data file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsData {
    /// Raw-material units per second.
    pub raw_material_rate: f64,
    /// Metal shop speed, percent.
    pub metal_shop_speed: u32,
    /// Wood shop speed, percent.
    pub wood_shop_speed: u32,
    /// Assembly speed, percent.
    pub assembly_speed: u32,
    /// 1 = Fast, 2 = Standard, 3 = Premium.
    pub quality_level: u8,
    pub maintenance_mode: bool,
}

impl Default for SettingsData {
    fn default() -> Self {
        Self {
            raw_material_rate: 5.0,
            metal_shop_speed: 100,
            wood_shop_speed: 100,
            assembly_speed: 100,
            quality_level: 2,
            maintenance_mode: false,
        }
    }
}
