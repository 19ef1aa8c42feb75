//! Chairline Core -- the production-accrual engine behind a chair factory
//! line simulation.
//!
//! Raw steel and wood arrive at a configurable rate, pass through metal and
//! wood shops, are assembled into chairs and inspected. Every stage earns
//! fractional production credit from its effective rate and elapsed time, and
//! turns whole units of credit into output as far as its inputs allow.
//!
//! # Tick
//!
//! Each call to [`engine::LineEngine::tick`] advances the line by the given
//! number of seconds:
//!
//! 1. **Clamp** -- bad elapsed time becomes zero.
//! 2. **Read controls** -- rates and the defect rate are fixed for the tick.
//! 3. **Process** -- stages run in [`registry::LINE`] order.
//! 4. **Bookkeeping** -- the clock and the raw-material counter advance.
//!
//! # Key Types
//!
//! - [`engine::LineEngine`] -- all line state and the tick.
//! - [`sim::Simulation`] -- frame driver and overflow alert debounce.
//! - [`config::ControlSettings`] -- the operator's sliders and switches.
//! - [`processor::StageDef`] -- one stage: rate, recipe and output.
//! - [`fixed::Fixed64`] -- Q32.32 fixed-point type for deterministic math.
//! - [`query::LineSnapshot`] -- an owned view for renderers.

pub mod config;
pub mod engine;
pub mod event;
pub mod fixed;
pub mod id;
pub mod item;
pub mod metrics;
pub mod processor;
pub mod query;
pub mod registry;
pub mod sim;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
