//! Headless demo for the chair line.
//!
//! Drives a [`Simulation`](chairline_core::sim::Simulation) from synthetic
//! frame timestamps, the way a browser animation loop would, and renders the
//! resulting state as a text dashboard.
//!
//! # Usage
//!
//! ```rust,ignore
//! use chairline_demo::runner::{RunConfig, run};
//!
//! let mut sim = Simulation::default();
//! let summary = run(&mut sim, &RunConfig::new(60.0, 30))?;
//! println!("{}", dashboard::render(&sim.engine().snapshot()));
//! ```

pub mod dashboard;
pub mod error;
pub mod runner;

pub use error::DemoError;
pub use runner::{RunConfig, RunSummary, run};
