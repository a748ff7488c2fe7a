// One inventory run: collect across regions, store both exports, aggregate,
// render, publish. Collection never fails the run; storing or publishing does.

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument};

use crate::clients::Clients;
use crate::config::AppConfig;
use crate::export::{export_keys, snapshots_csv, volumes_csv};
use crate::fanout::collect_all;
use crate::models::RollupSummary;
use crate::report::{enrich, render};
use crate::rollup::{aggregate, top_idle_volumes};
use crate::version::{NAME, VERSION};

/// Result of a completed run; printed as JSON by the binary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobOutcome {
    pub service: String,
    pub version: String,
    pub account_id: String,
    pub generated_at: DateTime<Utc>,
    pub subject: String,
    pub snapshot_export: String,
    pub volume_export: String,
    pub regions: usize,
    pub failed_sources: usize,
    pub snapshot_count: usize,
    pub volume_count: usize,
    pub summary: RollupSummary,
}

/// `now` is the single evaluation instant for ages, idle days, keys and the report header.
#[instrument(skip(clients, config), fields(account = %config.account.id))]
pub async fn run(
    clients: &Clients,
    config: &AppConfig,
    now: DateTime<Utc>,
) -> anyhow::Result<JobOutcome> {
    let account_id = config.account.id.as_str();
    let inventory = collect_all(clients.lister.clone(), &config.fanout_options(), now).await;

    let keys = export_keys(&config.export.key_prefix, account_id, now);
    let snapshot_body = snapshots_csv(&inventory.snapshots)?;
    clients
        .store
        .put(&keys.snapshots, snapshot_body)
        .await
        .with_context(|| format!("store snapshot export {}", keys.snapshots))?;
    let volume_body = volumes_csv(&inventory.volumes)?;
    clients
        .store
        .put(&keys.volumes, volume_body)
        .await
        .with_context(|| format!("store volume export {}", keys.volumes))?;

    let summary = aggregate(&inventory.snapshots, &inventory.volumes);
    let ranking = top_idle_volumes(&inventory.volumes, config.report.top_idle_volumes);
    let report = render(&summary, &ranking, account_id, now);
    let locations = [
        clients.store.locate(&keys.snapshots),
        clients.store.locate(&keys.volumes),
    ];
    let rich = enrich(&report, &locations);

    let subject = config.subject();
    clients
        .publisher
        .publish(&subject, &report, &rich)
        .await
        .context("publish inventory notification")?;

    info!(
        snapshots = summary.total_count,
        unattached_volumes = summary.volumes.total_count,
        failed_sources = inventory.failed_sources,
        "inventory run complete"
    );

    Ok(JobOutcome {
        service: NAME.to_string(),
        version: VERSION.to_string(),
        account_id: account_id.to_string(),
        generated_at: now,
        subject,
        snapshot_export: keys.snapshots,
        volume_export: keys.volumes,
        regions: inventory.regions.len(),
        failed_sources: inventory.failed_sources,
        snapshot_count: inventory.snapshots.len(),
        volume_count: inventory.volumes.len(),
        summary,
    })
}
