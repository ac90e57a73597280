//! Formatted terminal output.
//!
//! Formatting lives here so the calculation code stays free of presentation
//! concerns and output changes stay localized.

use crate::app::pipeline::RunOutput;
use crate::domain::{CalculationCar, CarFfbSens, Surface};
use crate::io::export::CarResult;

/// How many results carry all, some, or none of the surfaces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Coverage {
    pub complete: usize,
    pub partial: usize,
    pub none: usize,
}

pub fn coverage<'a>(results: impl IntoIterator<Item = &'a CarFfbSens>) -> Coverage {
    let mut c = Coverage::default();
    for sens in results {
        if sens.is_complete() {
            c.complete += 1;
        } else if sens.has_any() {
            c.partial += 1;
        } else {
            c.none += 1;
        }
    }
    c
}

/// Format the run summary (inputs, adjustments, coverage).
pub fn format_run_summary(run: &RunOutput) -> String {
    let mut out = String::new();
    let adj = &run.adjustments;

    out.push_str("=== ffbsens - FFB sensitivity calculation ===\n");
    out.push_str(&format!(
        "Weight ratio: {:.0}% (rotation {:.0}% / weight {:.0}%)\n",
        adj.weight_ratio_percent,
        100.0 - adj.weight_ratio_percent,
        adj.weight_ratio_percent,
    ));
    out.push_str(&format!(
        "Drivetrain factors: FWD {:.0}% | RWD {:.0}% | AWD {:.0}%\n",
        adj.fwd_percent, adj.rwd_percent, adj.awd_percent,
    ));
    out.push_str(&format!(
        "References: n={} | {}\n",
        run.references.len(),
        format_point_counts(&run.references),
    ));
    out.push_str(&format!(
        "Catalog: n={} | rotation overrides={} | skipped rows={}\n",
        run.catalog.len(),
        run.overrides.applied,
        run.skipped_rows,
    ));

    let target = match adj.target_car_id {
        Some(id) => format!("car {id}"),
        None => "all cars".to_string(),
    };
    let c = coverage(run.results.values());
    out.push_str(&format!(
        "Targets: n={} ({target}) | complete={} partial={} none={}\n",
        run.results.len(),
        c.complete,
        c.partial,
        c.none,
    ));
    out.push('\n');

    out
}

fn format_point_counts(references: &[CalculationCar]) -> String {
    let parts: Vec<String> = Surface::ALL
        .iter()
        .map(|s| {
            let n = references.iter().filter(|r| r.ffb_sens.get(*s).is_some()).count();
            format!("{}={n}", s.name())
        })
        .collect();
    parts.join(" ")
}

/// Format the per-car result table.
pub fn format_results_table(rows: &[CarResult]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:>6} {:<28} {:<5} {:>6} {:>6} {:>7} {:>7} {:>7}",
            "id", "name", "drive", "rot", "kg", "gravel", "tarmac", "snow"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(&format!(
        "{:-<6} {:-<28} {:-<5} {:-<6} {:-<6} {:-<7} {:-<7} {:-<7}\n",
        "", "", "", "", "", "", "", ""
    ));

    for r in rows {
        out.push_str(
            format!(
                "{:>6} {:<28} {:<5} {:>6} {:>6} {:>7} {:>7} {:>7}",
                r.car_id,
                truncate(&r.name, 28),
                r.drivetrain.label(),
                r.rotation,
                r.weight_kg,
                fmt_sens(r.ffb_sens.gravel),
                fmt_sens(r.ffb_sens.tarmac),
                fmt_sens(r.ffb_sens.snow),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

fn fmt_sens(v: Option<i32>) -> String {
    v.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
