use crate::config::DefectRate;
use crate::fixed::{Fixed64, Units, scale_percent, units_to_fixed64, whole_units};
use crate::id::{Material, StageId};
use crate::item::Inventory;

// ---------------------------------------------------------------------------
// Recipe types
// ---------------------------------------------------------------------------

/// An input requirement: `quantity` units of `material` per unit of output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecipeInput {
    pub material: Material,
    pub quantity: Units,
}

/// Where a stage puts what it makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutput {
    /// Two independently accrued lanes fed from one rate, split by percent.
    Split {
        primary: Material,
        secondary: Material,
        primary_percent: u32,
    },
    /// One unit of `material` per unit of credit spent.
    Single(Material),
    /// Each processed unit either passes into `passed` or is rejected.
    Inspected { passed: Material },
}

// ---------------------------------------------------------------------------
// Stage state
// ---------------------------------------------------------------------------

/// Badge state of a stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum StageStatus {
    #[default]
    Running,
    /// Whole units of credit are banked but inputs are short.
    Waiting,
}

/// Runtime state of a stage: banked credit, output counter and badge.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StageState {
    /// Unspent production credit in units. Below 1 after a spend; may sit
    /// at or above 1 while the stage is starved.
    pub credit: Fixed64,
    /// Credit for the secondary lane of a split stage. Zero otherwise.
    pub secondary_credit: Fixed64,
    /// Units emitted since the last reset.
    pub produced: Units,
    pub status: StageStatus,
}

// ---------------------------------------------------------------------------
// Tick result
// ---------------------------------------------------------------------------

/// The outcome of one tick for one stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageResult {
    /// Units taken from the inventory this tick.
    pub consumed: Vec<(Material, Units)>,
    /// Units added to the inventory this tick.
    pub produced: Vec<(Material, Units)>,
    /// Units processed by inspection that failed.
    pub rejected: Units,
    /// Set when the badge flipped; holds the previous status.
    pub previous_status: Option<StageStatus>,
}

// ---------------------------------------------------------------------------
// Stage definition
// ---------------------------------------------------------------------------

/// Static description of one stage of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageDef {
    pub id: StageId,
    /// Base speed in thousandths of a unit per second. Ignored by split
    /// stages, whose rate comes straight from the raw-material control.
    pub base_milli_rate: u32,
    /// Speed slider the stage listens to. `None` runs at a fixed 100%.
    pub shop: Option<crate::config::Shop>,
    pub inputs: &'static [RecipeInput],
    pub output: StageOutput,
}

impl StageDef {
    /// Advance this stage by `elapsed` seconds at `rate` units per second.
    ///
    /// Credit accrues by `rate * elapsed`. Once it holds at least one whole
    /// unit the stage makes as many units as both the credit and its inputs
    /// allow, and spends exactly that many units of credit. Credit blocked by
    /// missing inputs stays banked for a later tick.
    pub fn tick(
        &self,
        state: &mut StageState,
        rate: Fixed64,
        elapsed: Fixed64,
        inventory: &mut Inventory,
        defects: DefectRate,
    ) -> StageResult {
        match self.output {
            StageOutput::Split {
                primary,
                secondary,
                primary_percent,
            } => tick_split(state, rate, elapsed, inventory, primary, secondary, primary_percent),
            StageOutput::Single(material) => {
                tick_recipe(self.inputs, state, rate, elapsed, inventory, |made, inv, result| {
                    inv.add(material, made);
                    result.produced.push((material, made));
                })
            }
            StageOutput::Inspected { passed } => {
                tick_recipe(self.inputs, state, rate, elapsed, inventory, |made, inv, result| {
                    let ok = defects.passed(made);
                    inv.add(passed, ok);
                    result.produced.push((passed, ok));
                    result.rejected = made - ok;
                })
            }
        }
    }

    /// Largest number of units the inputs on hand can support.
    /// `None` for stages without inputs.
    pub fn material_bound(&self, inventory: &Inventory) -> Option<Units> {
        material_bound(self.inputs, inventory)
    }
}

// ---------------------------------------------------------------------------
// Split (supply) tick
// ---------------------------------------------------------------------------

fn tick_split(
    state: &mut StageState,
    rate: Fixed64,
    elapsed: Fixed64,
    inventory: &mut Inventory,
    primary: Material,
    secondary: Material,
    primary_percent: u32,
) -> StageResult {
    let mut result = StageResult::default();

    let primary_rate = scale_percent(rate, primary_percent);
    let secondary_rate = rate.saturating_sub(primary_rate);

    for (credit, lane_rate, material) in [
        (&mut state.credit, primary_rate, primary),
        (&mut state.secondary_credit, secondary_rate, secondary),
    ] {
        *credit = credit.saturating_add(lane_rate.saturating_mul(elapsed));
        let whole = whole_units(*credit);
        if whole > 0 {
            *credit -= units_to_fixed64(whole);
            inventory.add(material, whole);
            state.produced = state.produced.saturating_add(whole);
            result.produced.push((material, whole));
        }
    }

    // A supply never starves.
    set_status(state, StageStatus::Running, &mut result);
    result
}

// ---------------------------------------------------------------------------
// Recipe tick
// ---------------------------------------------------------------------------

fn tick_recipe(
    inputs: &[RecipeInput],
    state: &mut StageState,
    rate: Fixed64,
    elapsed: Fixed64,
    inventory: &mut Inventory,
    emit: impl FnOnce(Units, &mut Inventory, &mut StageResult),
) -> StageResult {
    let mut result = StageResult::default();

    state.credit = state.credit.saturating_add(rate.saturating_mul(elapsed));

    let wanted = whole_units(state.credit);
    if wanted == 0 {
        // Mid-accrual: the badge keeps whatever it last showed.
        return result;
    }

    let can_make = material_bound(inputs, inventory).map_or(wanted, |b| b.min(wanted));

    if can_make == 0 {
        set_status(state, StageStatus::Waiting, &mut result);
        return result;
    }

    for input in inputs {
        let need = can_make * input.quantity;
        let taken = inventory.remove(input.material, need);
        debug_assert_eq!(taken, need, "material bound checked above");
        result.consumed.push((input.material, taken));
    }

    emit(can_make, inventory, &mut result);
    state.credit -= units_to_fixed64(can_make);
    state.produced = state.produced.saturating_add(can_make);
    set_status(state, StageStatus::Running, &mut result);

    result
}

fn material_bound(inputs: &[RecipeInput], inventory: &Inventory) -> Option<Units> {
    inputs
        .iter()
        .map(|input| inventory.quantity(input.material) / input.quantity)
        .min()
}

fn set_status(state: &mut StageState, status: StageStatus, result: &mut StageResult) {
    if state.status != status {
        result.previous_status = Some(state.status);
        state.status = status;
    }
}

// ===========================================================================
// Tests
// ===========================================================================
