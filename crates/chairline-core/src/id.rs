use serde::{Deserialize, Serialize};
use std::fmt;

/// A material held in a line inventory. Cheap to copy and compare; doubles
/// as an index into [`Inventory`](crate::item::Inventory).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Material {
    Steel,
    Wood,
    Bolts,
    Rods,
    Legs,
    Seats,
    Backs,
    /// Chairs off the assembly stage, waiting for inspection.
    Assembled,
    /// Chairs that passed inspection.
    Finished,
}

impl Material {
    pub const COUNT: usize = 9;

    /// Every material, in line order.
    pub const ALL: [Material; Material::COUNT] = [
        Material::Steel,
        Material::Wood,
        Material::Bolts,
        Material::Rods,
        Material::Legs,
        Material::Seats,
        Material::Backs,
        Material::Assembled,
        Material::Finished,
    ];

    /// Materials that sit in a buffer between stages. Finished chairs leave
    /// the line and are not buffered.
    pub const BUFFERED: [Material; 8] = [
        Material::Steel,
        Material::Wood,
        Material::Bolts,
        Material::Rods,
        Material::Legs,
        Material::Seats,
        Material::Backs,
        Material::Assembled,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Material::Steel => "Steel",
            Material::Wood => "Wood",
            Material::Bolts => "Bolts",
            Material::Rods => "Rods",
            Material::Legs => "Legs",
            Material::Seats => "Seats",
            Material::Backs => "Backs",
            Material::Assembled => "Assembled",
            Material::Finished => "Finished",
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identifies a stage of the line. Declaration order is topological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StageId {
    RawSupply,
    Bolts,
    Rods,
    Legs,
    Seats,
    Backs,
    Assembly,
    Inspection,
}

impl StageId {
    pub const COUNT: usize = 8;

    pub const ALL: [StageId; StageId::COUNT] = [
        StageId::RawSupply,
        StageId::Bolts,
        StageId::Rods,
        StageId::Legs,
        StageId::Seats,
        StageId::Backs,
        StageId::Assembly,
        StageId::Inspection,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Label shown on the machine badge.
    pub fn label(self) -> &'static str {
        match self {
            StageId::RawSupply => "Raw Material Supply",
            StageId::Bolts => "Bolt Machine",
            StageId::Rods => "Rod Machine",
            StageId::Legs => "Leg Assembly",
            StageId::Seats => "Seat Machine",
            StageId::Backs => "Back Machine",
            StageId::Assembly => "Chair Assembly",
            StageId::Inspection => "Quality Control",
        }
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
