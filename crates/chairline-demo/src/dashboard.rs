//! Text rendering of a [`LineSnapshot`].

use std::fmt::Write as _;

use chairline_core::config::ControlSettings;
use chairline_core::fixed::{Units, fixed64_to_f64};
use chairline_core::id::Material;
use chairline_core::query::LineSnapshot;

/// Colour band of an inventory counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockLevel {
    Low,
    Medium,
    High,
}

impl StockLevel {
    pub fn of(quantity: Units) -> Self {
        if quantity > 50 {
            StockLevel::High
        } else if quantity > 20 {
            StockLevel::Medium
        } else {
            StockLevel::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StockLevel::Low => "low",
            StockLevel::Medium => "medium",
            StockLevel::High => "high",
        }
    }
}

/// The controls in effect, one line.
pub fn render_settings(settings: &ControlSettings) -> String {
    use chairline_core::config::Shop;
    format!(
        "raw {:.1}/s | metal {}% | wood {}% | assembly {}% | quality {} | maintenance {}",
        fixed64_to_f64(settings.raw_material_rate()),
        settings.shop_speed(Shop::Metal),
        settings.shop_speed(Shop::Wood),
        settings.shop_speed(Shop::Assembly),
        settings.quality().label(),
        if settings.maintenance_mode() { "ON" } else { "OFF" },
    )
}

/// The full dashboard: machines, inventory and statistics.
pub fn render(snapshot: &LineSnapshot) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Machines");
    for stage in &snapshot.stages {
        let _ = writeln!(
            out,
            "  {:<20} {:<10} produced {:>6}  rate {:.2}/s",
            stage.id.label(),
            stage.badge(),
            stage.produced,
            fixed64_to_f64(stage.rate),
        );
    }

    let waiting: Vec<&str> = snapshot.waiting().map(|id| id.label()).collect();
    if !waiting.is_empty() {
        let _ = writeln!(out, "  waiting: {}", waiting.join(", "));
    }

    let _ = writeln!(out, "Inventory");
    for m in Material::BUFFERED {
        let q = snapshot.quantity(m);
        let _ = writeln!(out, "  {:<10} {:>6}  [{}]", m.name(), q, StockLevel::of(q).label());
    }
    let _ = writeln!(out, "  {:<10} {:>6}", "in process", snapshot.inventory.buffered_total());

    let _ = writeln!(out, "Output");
    let _ = writeln!(out, "  finished   {:>6}", snapshot.finished);
    let _ = writeln!(out, "  rejected   {:>6}", snapshot.rejected);
    let _ = writeln!(out, "  inspected  {:>6}", snapshot.qc_processed);
    let _ = writeln!(
        out,
        "  raw in     {:>6.0}",
        fixed64_to_f64(snapshot.raw_produced)
    );

    let _ = writeln!(out, "Statistics");
    let _ = writeln!(
        out,
        "  time        {:.1}s",
        fixed64_to_f64(snapshot.total_time)
    );
    let _ = writeln!(
        out,
        "  throughput  {:.1} chairs/min",
        fixed64_to_f64(snapshot.throughput_per_minute)
    );
    let _ = writeln!(
        out,
        "  efficiency  {:.0}%",
        fixed64_to_f64(snapshot.efficiency)
    );
    let _ = writeln!(
        out,
        "  defects     {:.1}%",
        snapshot.defect_rate.as_f64() * 100.0
    );
    let b = &snapshot.bottleneck;
    let lane = b.lane.map(|m| format!(" ({m})")).unwrap_or_default();
    let _ = writeln!(
        out,
        "  bottleneck  {}{} at {:.3} chairs/s",
        b.stage.label(),
        lane,
        fixed64_to_f64(b.chairs_per_second)
    );

    out
}

/// The overflow warning text.
pub fn render_alert(materials: &[(Material, Units)]) -> String {
    let mut out = String::from(
        "TOO MUCH INVENTORY!\nThe following items have exceeded 300 units:\n",
    );
    for (m, q) in materials {
        let _ = writeln!(out, "  {m}: {q}");
    }
    out.push_str("Adjust your production rates to balance the line!");
    out
}
