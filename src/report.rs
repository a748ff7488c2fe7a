// Text report for the notification body. Deterministic for a given summary,
// ranking, account and generation time.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use crate::models::{RollupSummary, Tally, VolumeRecord};

const RULE_WIDTH: usize = 40;
pub const NO_VOLUMES_LINE: &str = "No unattached volumes found.";

pub fn render(
    summary: &RollupSummary,
    top_idle: &IndexMap<String, Vec<VolumeRecord>>,
    account_id: &str,
    generated_at: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    out.push_str(&format!("Snapshot Inventory Summary for Account {account_id}\n"));
    out.push_str(&format!(
        "Generated on: {}\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!(
        "\nTotal Snapshots: {} ({:.2} GB)\n",
        summary.total_count, summary.total_size_gb
    ));

    section(&mut out, "Breakdown by Region");
    for (region, rollup) in &summary.by_region {
        tally_line(&mut out, "", region, rollup.total);
        for (kind, tally) in &rollup.by_type {
            tally_line(&mut out, "  ", kind.label(), *tally);
        }
    }

    section(&mut out, "Breakdown by Type");
    for (kind, tally) in &summary.by_type {
        tally_line(&mut out, "", kind.label(), *tally);
    }

    section(&mut out, "Breakdown by Age");
    for (group, tally) in &summary.by_age_group {
        tally_line(&mut out, "", group.label(), *tally);
    }

    section(&mut out, "Unattached Volumes");
    if summary.volumes.total_count == 0 {
        out.push_str(NO_VOLUMES_LINE);
        out.push('\n');
        return out;
    }
    out.push_str(&format!(
        "Total Unattached Volumes: {} ({} GB)\n",
        summary.volumes.total_count, summary.volumes.total_size_gb
    ));
    for (region, totals) in &summary.volumes.by_region {
        out.push_str(&format!(
            "\n{region}: {} volumes, {} GB\n",
            totals.count, totals.size_gb
        ));
        let ranked = top_idle.get(region).map(Vec::as_slice).unwrap_or_default();
        if ranked.is_empty() {
            continue;
        }
        out.push_str(&format!("  Top {} by idle days:\n", ranked.len()));
        for v in ranked {
            out.push_str(&format!(
                "    {}: {} idle days, {} GB, {}, {}\n",
                v.id,
                v.idle_days,
                v.size_gb,
                display_or_dash(&v.volume_type),
                display_or_dash(&v.state)
            ));
        }
    }
    out
}

/// Default report plus references to where the exports were stored.
pub fn enrich(report: &str, export_locations: &[String]) -> String {
    let mut out = report.trim_end().to_string();
    if export_locations.is_empty() {
        return out;
    }
    out.push_str("\n\nDetailed reports available at:\n");
    for loc in export_locations {
        out.push_str(&format!("  {loc}\n"));
    }
    out
}

fn section(out: &mut String, title: &str) {
    out.push_str(&format!("\n{title}:\n{}\n", "-".repeat(RULE_WIDTH)));
}

fn tally_line(out: &mut String, indent: &str, label: &str, t: Tally) {
    out.push_str(&format!(
        "{indent}{label}: {} snapshots, {:.2} GB\n",
        t.count, t.size_gb
    ));
}

fn display_or_dash(s: &str) -> &str {
    if s.is_empty() { "-" } else { s }
}
