//! Chairline headless runner.
//!
//! Runs the chair line for a fixed stretch of simulated time and prints a
//! dashboard. Run with: `cargo run --package chairline-demo -- --seconds 120`

use std::path::{Path, PathBuf};

use chairline_core::config::{ControlSettings, Shop};
use chairline_core::engine::LineEngine;
use chairline_core::sim::Simulation;
use chairline_data::{find_settings_file, load_settings};
use chairline_demo::dashboard;
use chairline_demo::{DemoError, RunConfig, run};
use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

/// Base name looked up when `--settings` points at a directory.
const SETTINGS_BASE: &str = "line";

#[derive(Parser)]
#[command(name = "chairline")]
#[command(about = "Headless chair factory line simulation")]
struct Cli {
    /// Simulated seconds to run
    #[arg(short, long, default_value = "60")]
    seconds: f64,

    /// Synthetic frames per second
    #[arg(long, default_value = "60", value_parser = clap::value_parser!(u32).range(1..))]
    fps: u32,

    /// Settings file (.ron, .toml, .json), or a directory holding line.*
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Raw-material units per second
    #[arg(long)]
    raw_rate: Option<f64>,

    /// Metal shop speed, percent
    #[arg(long)]
    metal_speed: Option<u32>,

    /// Wood shop speed, percent
    #[arg(long)]
    wood_speed: Option<u32>,

    /// Assembly speed, percent
    #[arg(long)]
    assembly_speed: Option<u32>,

    /// Quality level: 1 = Fast, 2 = Standard, 3 = Premium
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=3))]
    quality: Option<u8>,

    /// Run in maintenance mode
    #[arg(long)]
    maintenance: bool,

    /// Only print the final dashboard
    #[arg(short, long)]
    quiet: bool,

    /// Log engine detail (status changes, alerts)
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn settings(&self) -> Result<ControlSettings, DemoError> {
        let mut settings = match &self.settings {
            Some(path) => load_settings(&resolve_settings_path(path)?)?,
            None => ControlSettings::default(),
        };
        if let Some(rate) = self.raw_rate {
            settings.set_raw_material_rate(rate);
        }
        if let Some(pct) = self.metal_speed {
            settings.set_shop_speed(Shop::Metal, pct);
        }
        if let Some(pct) = self.wood_speed {
            settings.set_shop_speed(Shop::Wood, pct);
        }
        if let Some(pct) = self.assembly_speed {
            settings.set_shop_speed(Shop::Assembly, pct);
        }
        if let Some(level) = self.quality {
            settings.set_quality_level(level);
        }
        if self.maintenance {
            settings.set_maintenance_mode(true);
        }
        Ok(settings)
    }
}

fn resolve_settings_path(path: &Path) -> Result<PathBuf, DemoError> {
    if !path.is_dir() {
        return Ok(path.to_path_buf());
    }
    find_settings_file(path, SETTINGS_BASE)?.ok_or_else(|| DemoError::SettingsNotFound {
        dir: path.to_path_buf(),
        base: SETTINGS_BASE,
    })
}

fn main() -> Result<(), DemoError> {
    let cli = Cli::parse();

    let level = match (cli.quiet, cli.verbose) {
        (_, true) => Level::DEBUG,
        (true, false) => Level::WARN,
        (false, false) => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let settings = cli.settings()?;
    info!(settings = %dashboard::render_settings(&settings), "line configured");

    let mut sim = Simulation::new(LineEngine::new(settings));
    let summary = run(&mut sim, &RunConfig::new(cli.seconds, cli.fps))?;

    if !cli.quiet {
        for notice in &summary.alerts {
            println!("--- frame {} ---", notice.frame);
            println!("{}\n", dashboard::render_alert(&notice.materials));
        }
    }

    println!("{}", dashboard::render_settings(sim.settings()));
    println!();
    print!("{}", dashboard::render(&sim.engine().snapshot()));
    Ok(())
}
