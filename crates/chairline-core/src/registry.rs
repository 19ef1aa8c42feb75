//! The fixed line layout: every stage, its base speed, its recipe and where
//! its output goes. The table is frozen at build time and listed in
//! topological order, so a single forward pass lets each stage consume what
//! upstream stages made earlier in the same tick.

use crate::config::{ControlSettings, Shop};
use crate::fixed::{Fixed64, ratio};
use crate::id::{Material, StageId};
use crate::processor::{RecipeInput, StageDef, StageOutput};

/// Share of the raw-material rate delivered as steel; the rest is wood.
pub const STEEL_SHARE_PERCENT: u32 = 60;

const fn input(material: Material, quantity: u64) -> RecipeInput {
    RecipeInput { material, quantity }
}

const ONE_STEEL: [RecipeInput; 1] = [input(Material::Steel, 1)];
const TWO_WOOD: [RecipeInput; 1] = [input(Material::Wood, 2)];
const LEG_RECIPE: [RecipeInput; 2] = [input(Material::Bolts, 8), input(Material::Rods, 4)];
const CHAIR_RECIPE: [RecipeInput; 3] = [
    input(Material::Legs, 4),
    input(Material::Seats, 1),
    input(Material::Backs, 1),
];
const INSPECT_ONE: [RecipeInput; 1] = [input(Material::Assembled, 1)];

/// The chair line, indexed by [`StageId::index`].
pub static LINE: [StageDef; StageId::COUNT] = [
    StageDef {
        id: StageId::RawSupply,
        base_milli_rate: 0,
        shop: None,
        inputs: &[],
        output: StageOutput::Split {
            primary: Material::Steel,
            secondary: Material::Wood,
            primary_percent: STEEL_SHARE_PERCENT,
        },
    },
    StageDef {
        id: StageId::Bolts,
        base_milli_rate: 2_000,
        shop: Some(Shop::Metal),
        inputs: &ONE_STEEL,
        output: StageOutput::Single(Material::Bolts),
    },
    StageDef {
        id: StageId::Rods,
        base_milli_rate: 2_000,
        shop: Some(Shop::Metal),
        inputs: &ONE_STEEL,
        output: StageOutput::Single(Material::Rods),
    },
    StageDef {
        id: StageId::Legs,
        base_milli_rate: 500,
        shop: Some(Shop::Metal),
        inputs: &LEG_RECIPE,
        output: StageOutput::Single(Material::Legs),
    },
    StageDef {
        id: StageId::Seats,
        base_milli_rate: 500,
        shop: Some(Shop::Wood),
        inputs: &TWO_WOOD,
        output: StageOutput::Single(Material::Seats),
    },
    StageDef {
        id: StageId::Backs,
        base_milli_rate: 500,
        shop: Some(Shop::Wood),
        inputs: &TWO_WOOD,
        output: StageOutput::Single(Material::Backs),
    },
    StageDef {
        id: StageId::Assembly,
        base_milli_rate: 300,
        shop: Some(Shop::Assembly),
        inputs: &CHAIR_RECIPE,
        output: StageOutput::Single(Material::Assembled),
    },
    StageDef {
        id: StageId::Inspection,
        base_milli_rate: 1_000,
        shop: None,
        inputs: &INSPECT_ONE,
        output: StageOutput::Inspected {
            passed: Material::Finished,
        },
    },
];

/// Look up a stage definition.
#[inline]
pub fn stage(id: StageId) -> &'static StageDef {
    &LINE[id.index()]
}

/// Units per second a stage runs at under the given controls.
///
/// `base * speed% * maintenance% * quality%`, folded as one integer product
/// and divided once. The supply stage runs at the raw-material rate as set.
pub fn effective_rate(def: &StageDef, settings: &ControlSettings) -> Fixed64 {
    if matches!(def.output, StageOutput::Split { .. }) {
        return settings.raw_material_rate();
    }
    let speed = def.shop.map_or(100, |shop| settings.shop_speed(shop));
    let num = u128::from(def.base_milli_rate)
        * u128::from(speed)
        * u128::from(settings.maintenance_percent())
        * u128::from(settings.quality().speed_percent());
    ratio(num, 1_000 * 100 * 100 * 100)
}
