//! Integration tests for the chair line engine.
//!
//! These tests exercise end-to-end behavior across the whole line: supply,
//! shops, assembly, inspection, the frame driver and reset.

use chairline_core::config::QualityLevel;
use chairline_core::engine::{LineEngine, OVERFLOW_THRESHOLD};
use chairline_core::fixed::{Fixed64, units_to_fixed64};
use chairline_core::id::{Material, StageId};
use chairline_core::processor::{StageOutput, StageStatus};
use chairline_core::registry::LINE;
use chairline_core::sim::Simulation;
use chairline_core::test_utils::*;

// ===========================================================================
// Test 1: Ten seconds of the default line
// ===========================================================================
//
// Raw 5/s split 3 steel + 2 wood, all shops at 100%, Standard quality,
// maintenance off, ten one-second ticks.

#[test]
fn ten_seconds_of_default_line() {
    let mut engine = LineEngine::default();
    run_ticks(&mut engine, 10, 1.0);

    assert_eq!(engine.quantity(Material::Steel), 0);
    assert_eq!(engine.quantity(Material::Wood), 0);
    assert_eq!(engine.quantity(Material::Bolts), 4);
    assert_eq!(engine.quantity(Material::Rods), 2);
    assert_eq!(engine.quantity(Material::Legs), 2);
    assert_eq!(engine.quantity(Material::Seats), 5);
    assert_eq!(engine.quantity(Material::Backs), 5);
    assert_eq!(engine.quantity(Material::Assembled), 0);
    assert_eq!(engine.finished(), 0);
    assert_eq!(engine.rejected(), 0);

    assert_eq!(engine.produced(StageId::RawSupply), 50);
    assert_eq!(engine.produced(StageId::Bolts), 20);
    assert_eq!(engine.produced(StageId::Rods), 10);
    assert_eq!(engine.produced(StageId::Legs), 2);
    assert_eq!(engine.produced(StageId::Seats), 5);
    assert_eq!(engine.produced(StageId::Backs), 5);
    assert_eq!(engine.produced(StageId::Assembly), 0);
    assert_eq!(engine.qc_processed(), 0);

    assert_eq!(engine.raw_produced(), Fixed64::from_num(50));
    assert_eq!(engine.total_time(), Fixed64::from_num(10));

    // Rods earn 2/s but only ever get one steel per second.
    assert_eq!(engine.accumulator(StageId::Rods), Fixed64::from_num(10));
    assert_eq!(engine.status(StageId::Rods), StageStatus::Running);

    // Legs banked 3 units of credit but hold only 4 bolts.
    assert_eq!(engine.accumulator(StageId::Legs), Fixed64::from_num(3));
    assert_eq!(engine.status(StageId::Legs), StageStatus::Waiting);

    assert!(engine.accumulator(StageId::Assembly) >= Fixed64::from_num(3));
    assert_eq!(engine.status(StageId::Assembly), StageStatus::Waiting);
    assert_eq!(engine.accumulator(StageId::Inspection), Fixed64::from_num(10));
    assert_eq!(engine.status(StageId::Inspection), StageStatus::Waiting);

    assert_eq!(engine.efficiency(), Fixed64::ZERO);
    assert_eq!(engine.throughput_per_minute(), Fixed64::ZERO);
}

// ===========================================================================
// Test 2: Short on bolts
// ===========================================================================

#[test]
fn seven_bolts_make_no_legs() {
    let mut engine = seeded_engine(
        settings_with_raw(0.0),
        &[(Material::Bolts, 7), (Material::Rods, 4)],
    );
    engine.tick(100.0);

    assert_eq!(engine.quantity(Material::Legs), 0);
    assert_eq!(engine.quantity(Material::Bolts), 7);
    assert_eq!(engine.quantity(Material::Rods), 4);
    assert!(engine.accumulator(StageId::Legs) >= Fixed64::ONE);
    assert_eq!(engine.status(StageId::Legs), StageStatus::Waiting);
}

// ===========================================================================
// Test 3: Banked credit is spent once inputs arrive
// ===========================================================================

#[test]
fn banked_credit_spends_when_unblocked() {
    let mut engine = closed_engine();
    let reports = run_ticks(&mut engine, 3, 2.0);

    // Only the first starved tick flips the badge.
    assert_eq!(reports[0].starved().filter(|s| *s == StageId::Legs).count(), 1);
    assert_eq!(reports[1].starved().filter(|s| *s == StageId::Legs).count(), 0);
    assert_eq!(engine.accumulator(StageId::Legs), Fixed64::from_num(3));

    engine.set_quantity(Material::Bolts, 80);
    engine.set_quantity(Material::Rods, 40);
    let report = engine.tick(1.0);

    // 3.5 units of credit, enough stock for 10: three legs.
    assert_eq!(report.produced(StageId::Legs, Material::Legs), 3);
    assert_eq!(engine.accumulator(StageId::Legs), fixed(0.5));
    assert_eq!(engine.status(StageId::Legs), StageStatus::Running);
    assert!(report
        .events
        .iter()
        .any(|e| *e == chairline_core::event::LineEvent::StageResumed { stage: StageId::Legs }));
}

#[test]
fn banked_credit_is_capped_by_stock() {
    let mut engine = closed_engine();
    run_ticks(&mut engine, 10, 1.0);
    engine.set_quantity(Material::Bolts, 16);
    engine.set_quantity(Material::Rods, 100);
    engine.tick(0.0);

    assert_eq!(engine.quantity(Material::Legs), 2);
    assert_eq!(engine.accumulator(StageId::Legs), Fixed64::from_num(3));
    assert_eq!(engine.quantity(Material::Rods), 92);
}

// ===========================================================================
// Test 4: Overflow threshold
// ===========================================================================

#[test]
fn overflow_reports_only_above_threshold() {
    let mut engine = closed_engine();
    engine.set_quantity(Material::Seats, OVERFLOW_THRESHOLD);
    assert!(engine.check_overflow().is_empty());

    engine.set_quantity(Material::Seats, OVERFLOW_THRESHOLD + 1);
    assert_eq!(engine.check_overflow(), vec![(Material::Seats, 301)]);

    // Checking twice changes nothing.
    assert_eq!(engine.check_overflow(), vec![(Material::Seats, 301)]);
}

#[test]
fn fast_supply_floods_raw_buffers() {
    // The wood shop is off, so wood piles up at 40/s.
    let mut engine = LineEngine::new(settings_with_raw(100.0));
    engine.settings_mut().set_shop_speed(chairline_core::config::Shop::Wood, 0);
    engine.tick(8.0);
    assert!(engine.check_overflow().contains(&(Material::Wood, 320)));
}

// ===========================================================================
// Test 5: Reset
// ===========================================================================

#[test]
fn reset_clears_everything_but_controls() {
    let mut engine = LineEngine::new(premium_settings());
    run_ticks(&mut engine, 30, 1.0);
    engine.set_quantity(Material::Assembled, 5);
    engine.tick(3.0);
    assert!(engine.produced(StageId::Bolts) > 0);

    engine.reset();

    for m in Material::ALL {
        assert_eq!(engine.quantity(m), 0, "{m}");
    }
    for id in StageId::ALL {
        assert_eq!(engine.produced(id), 0);
        assert_eq!(engine.status(id), StageStatus::Running);
        assert_eq!(engine.accumulator(id), Fixed64::ZERO);
    }
    assert_eq!(engine.rejected(), 0);
    assert_eq!(engine.qc_processed(), 0);
    assert_eq!(engine.raw_produced(), Fixed64::ZERO);
    assert_eq!(engine.total_time(), Fixed64::ZERO);
    assert_eq!(engine.efficiency(), Fixed64::from_num(100));
    assert_eq!(engine.settings(), &premium_settings());
}

// ===========================================================================
// Test 6: Zero-length ticks
// ===========================================================================

#[test]
fn zero_tick_after_running_changes_nothing() {
    let mut engine = LineEngine::default();
    run_ticks(&mut engine, 7, 1.3);
    let before = engine.snapshot();
    engine.tick(0.0);
    let after = engine.snapshot();

    assert_eq!(after.inventory, before.inventory);
    assert_eq!(after.total_time, before.total_time);
    assert_eq!(after.rejected, before.rejected);
    for (a, b) in after.stages.iter().zip(&before.stages) {
        assert_eq!(a.produced, b.produced);
        assert_eq!(a.credit, b.credit);
    }
}

#[test]
fn zero_tick_flags_a_stage_that_ran_dry() {
    // Rods spend one steel per second and keep the rest of their credit
    // banked, so a zero step finds them starved.
    let mut engine = LineEngine::default();
    engine.tick(1.0);
    assert_eq!(engine.status(StageId::Rods), StageStatus::Running);
    let report = engine.tick(0.0);
    assert!(report.starved().any(|s| s == StageId::Rods));
    assert_eq!(engine.accumulator(StageId::Rods), Fixed64::ONE);
}

// ===========================================================================
// Test 7: Conservation through the report
// ===========================================================================

#[test]
fn every_recipe_consumes_its_bill_of_materials() {
    let mut engine = LineEngine::default();
    engine.set_quantity(Material::Legs, 40);
    engine.set_quantity(Material::Seats, 10);
    engine.set_quantity(Material::Backs, 10);

    for report in run_ticks(&mut engine, 40, 0.7) {
        for def in LINE.iter() {
            let made = match def.output {
                StageOutput::Split { .. } => continue,
                StageOutput::Single(m) => report.produced(def.id, m),
                StageOutput::Inspected { passed } => {
                    report.produced(def.id, passed)
                        + report
                            .events
                            .iter()
                            .filter_map(|e| match *e {
                                chairline_core::event::LineEvent::UnitsRejected { stage, quantity }
                                    if stage == def.id =>
                                {
                                    Some(quantity)
                                }
                                _ => None,
                            })
                            .sum::<u64>()
                }
            };
            for input in def.inputs {
                assert_eq!(
                    report.consumed(def.id, input.material),
                    made * input.quantity,
                    "{} {}",
                    def.id,
                    input.material
                );
            }
        }
    }
    assert!(engine.qc_processed() > 0);
    assert_eq!(engine.qc_processed(), engine.finished() + engine.rejected());
}

// ===========================================================================
// Test 8: A full chair
// ===========================================================================

#[test]
fn stocked_line_finishes_chairs() {
    let mut engine = seeded_engine(
        premium_settings(),
        &[
            (Material::Legs, 4 * 50),
            (Material::Seats, 50),
            (Material::Backs, 50),
        ],
    );
    // Premium assembly runs at 0.24/s and inspection at 0.8/s. Long steps
    // let inspection see a dozen chairs at once.
    run_ticks(&mut engine, 2, 50.0);

    let inspected = engine.qc_processed();
    assert!(inspected >= 20, "inspected {inspected}");
    assert_eq!(engine.finished() + engine.rejected(), inspected);
    assert!(engine.efficiency() > Fixed64::ZERO);
    assert!(engine.efficiency() <= Fixed64::from_num(100));
    assert_eq!(
        engine.throughput_per_minute(),
        units_to_fixed64(engine.finished() * 60) / engine.total_time()
    );
}

// ===========================================================================
// Test 9: Rates that land exactly on a whole unit
// ===========================================================================

#[test]
fn premium_assembly_makes_six_chairs_in_25_seconds() {
    let mut engine = seeded_engine(
        settings_with_raw(0.0),
        &[
            (Material::Legs, 40),
            (Material::Seats, 10),
            (Material::Backs, 10),
        ],
    );
    engine.settings_mut().set_quality(QualityLevel::Premium);
    // 0.3/s * 0.8 = 0.24/s, and 0.24 * 25 = 6.
    let report = engine.tick(25.0);

    assert_eq!(report.produced(StageId::Assembly, Material::Assembled), 6);
    assert_eq!(engine.produced(StageId::Assembly), 6);
    assert_eq!(engine.quantity(Material::Legs), 40 - 24);
    assert!(engine.accumulator(StageId::Assembly) < Fixed64::ONE);
}

#[test]
fn fast_bolts_make_twelve_in_5_seconds() {
    let mut engine = seeded_engine(settings_with_raw(0.0), &[(Material::Steel, 100)]);
    engine.settings_mut().set_quality(QualityLevel::Fast);
    // 2/s * 1.2 = 2.4/s, and 2.4 * 5 = 12.
    let report = engine.tick(5.0);

    assert_eq!(report.produced(StageId::Bolts, Material::Bolts), 12);
    assert_eq!(engine.produced(StageId::Bolts), 12);
    assert!(engine.accumulator(StageId::Bolts) < Fixed64::ONE);
}

#[test]
fn split_tick_matches_one_long_tick_on_exact_boundaries() {
    // Five one-second steps of 2.4/s reach 12 as well.
    let mut engine = seeded_engine(settings_with_raw(0.0), &[(Material::Steel, 100)]);
    engine.settings_mut().set_quality(QualityLevel::Fast);
    run_ticks(&mut engine, 5, 1.0);
    assert_eq!(engine.produced(StageId::Bolts), 12);
}

// ===========================================================================
// Test 10: Frame driver
// ===========================================================================

#[test]
fn driver_matches_direct_ticks() {
    let mut sim = Simulation::default();
    sim.start(0.0);
    for frame in 1..=10 {
        sim.frame(frame as f64 * 1_000.0);
    }

    let mut engine = LineEngine::default();
    run_ticks(&mut engine, 10, 1.0);

    assert_eq!(stock(sim.engine()), stock(&engine));
    assert_eq!(sim.engine().snapshot(), engine.snapshot());
}

#[test]
fn driver_raises_one_alert_per_window() {
    let mut sim = Simulation::new(seeded_engine(
        settings_with_raw(0.0),
        &[(Material::Backs, 400)],
    ));
    sim.start(0.0);

    let mut alerts = 0;
    // 12 simulated seconds in 100 ms frames.
    for frame in 1..=120 {
        sim.frame(frame as f64 * 100.0);
        if let Some(over) = sim.take_alert() {
            assert_eq!(over, vec![(Material::Backs, 400)]);
            alerts += 1;
        }
    }
    // Raised at 0.1 s, 5.1 s and 10.1 s.
    assert_eq!(alerts, 3);
}
