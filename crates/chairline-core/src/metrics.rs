//! Derived line statistics: bottleneck, efficiency and throughput.
//!
//! The theoretical ceiling comes from walking the stage table backwards from
//! one finished chair, multiplying recipe quantities into a per-chair demand
//! for every material. Each stage can then sustain `rate / demand` chairs per
//! second; the smallest of those is the bottleneck.

use crate::config::ControlSettings;
use crate::fixed::{Fixed64, Units, scale_percent, units_to_fixed64};
use crate::id::{Material, StageId};
use crate::processor::StageOutput;
use crate::registry::{LINE, effective_rate};

/// The stage (and, for the supply, the lane) that caps chair output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bottleneck {
    pub stage: StageId,
    /// Set when the limit is one output lane of a split stage.
    pub lane: Option<Material>,
    /// Finished chairs per second the line could sustain, before defects.
    pub chairs_per_second: Fixed64,
}

/// Units of each material consumed or produced per finished chair.
pub fn per_chair_demand() -> [Units; Material::COUNT] {
    let mut demand = [0; Material::COUNT];
    demand[Material::Finished.index()] = 1;

    for def in LINE.iter().rev() {
        let made = match def.output {
            StageOutput::Single(m) => demand[m.index()],
            StageOutput::Inspected { passed } => demand[passed.index()],
            StageOutput::Split { .. } => continue,
        };
        for input in def.inputs {
            demand[input.material.index()] += made * input.quantity;
        }
    }

    demand
}

/// Find the bottleneck under the given controls. Ties go to the upstream
/// stage.
pub fn bottleneck(settings: &ControlSettings) -> Bottleneck {
    let demand = per_chair_demand();
    let mut best: Option<Bottleneck> = None;

    let mut consider = |stage: StageId, lane: Option<Material>, rate: Fixed64, need: Units| {
        if need == 0 {
            return;
        }
        let chairs_per_second = rate / units_to_fixed64(need);
        if best.is_none_or(|b| chairs_per_second < b.chairs_per_second) {
            best = Some(Bottleneck {
                stage,
                lane,
                chairs_per_second,
            });
        }
    };

    for def in LINE.iter() {
        let rate = effective_rate(def, settings);
        match def.output {
            StageOutput::Split {
                primary,
                secondary,
                primary_percent,
            } => {
                let primary_rate = scale_percent(rate, primary_percent);
                let secondary_rate = rate.saturating_sub(primary_rate);
                consider(def.id, Some(primary), primary_rate, demand[primary.index()]);
                consider(def.id, Some(secondary), secondary_rate, demand[secondary.index()]);
            }
            StageOutput::Single(m) => consider(def.id, None, rate, demand[m.index()]),
            StageOutput::Inspected { passed } => consider(def.id, None, rate, demand[passed.index()]),
        }
    }

    best.unwrap_or(Bottleneck {
        stage: StageId::RawSupply,
        lane: None,
        chairs_per_second: Fixed64::ZERO,
    })
}

/// Finished chairs the line could have made in `total_time` seconds.
pub fn theoretical_max(total_time: Fixed64, settings: &ControlSettings) -> Fixed64 {
    bottleneck(settings)
        .chairs_per_second
        .saturating_mul(total_time)
        .saturating_mul(settings.defect_rate().pass_fraction())
}

/// Actual finished chairs as a percentage of the theoretical maximum,
/// capped at 100. Reads 100 before any time has passed or when the
/// ceiling is zero.
pub fn efficiency(finished: Units, total_time: Fixed64, settings: &ControlSettings) -> Fixed64 {
    let hundred = Fixed64::from_num(100);
    if total_time <= Fixed64::ZERO {
        return hundred;
    }
    let theoretical = theoretical_max(total_time, settings);
    if theoretical <= Fixed64::ZERO {
        return hundred;
    }
    units_to_fixed64(finished)
        .saturating_mul(hundred)
        .checked_div(theoretical)
        .unwrap_or(Fixed64::MAX)
        .min(hundred)
}

/// Finished chairs per minute of simulated time.
pub fn throughput_per_minute(finished: Units, total_time: Fixed64) -> Fixed64 {
    if total_time <= Fixed64::ZERO {
        return Fixed64::ZERO;
    }
    units_to_fixed64(finished)
        .saturating_mul(Fixed64::from_num(60))
        .checked_div(total_time)
        .unwrap_or(Fixed64::MAX)
}
