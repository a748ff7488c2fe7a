// Region fan-out: discover regions, then run each region's snapshot traversal and
// volume traversal as independent tasks, bounded by a semaphore. Each source
// listing runs under its own deadline. Results are joined after all tasks finish
// and concatenated in sorted-region order.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use crate::clients::{ResourceLister, SourceError};
use crate::collector::{SourceOutcome, collect_snapshots, collect_volumes};
use crate::models::{SnapshotKind, SnapshotRecord, VolumeRecord};
use crate::normalize::{normalize_snapshot, normalize_volume};

#[derive(Debug, Clone)]
pub struct FanoutOptions {
    pub max_concurrent_regions: usize,
    /// Deadline for each source listing (region x kind, or region volumes),
    /// measured once the region task holds its permit.
    pub region_timeout: Duration,
}

impl Default for FanoutOptions {
    fn default() -> Self {
        Self {
            max_concurrent_regions: 4,
            region_timeout: Duration::from_secs(120),
        }
    }
}

/// Account-wide collections. Order: regions sorted by name; within a region,
/// snapshots by kind (block, database, filesystem) then listing order.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    pub regions: Vec<String>,
    pub snapshots: Vec<SnapshotRecord>,
    pub volumes: Vec<VolumeRecord>,
    /// Sources (region x kind) that contributed nothing because they failed or timed out.
    pub failed_sources: usize,
}

/// Lists regions, deduplicated and sorted. Failure yields no regions.
pub async fn discover_regions(lister: &dyn ResourceLister) -> Vec<String> {
    match lister.list_regions().await {
        Ok(mut regions) => {
            regions.retain(|r| !r.trim().is_empty());
            regions.sort();
            regions.dedup();
            regions
        }
        Err(e) => {
            warn!(error = %e, operation = "list_regions", "region discovery failed; report will be empty");
            Vec::new()
        }
    }
}

enum Harvest {
    Snapshots {
        region_idx: usize,
        records: Vec<SnapshotRecord>,
        failed: usize,
    },
    Volumes {
        region_idx: usize,
        records: Vec<VolumeRecord>,
        failed: usize,
    },
}

#[instrument(skip(lister, opts), fields(operation = "collect_all", max_concurrent = opts.max_concurrent_regions))]
pub async fn collect_all(
    lister: Arc<dyn ResourceLister>,
    opts: &FanoutOptions,
    now: DateTime<Utc>,
) -> Inventory {
    let regions = discover_regions(lister.as_ref()).await;
    if regions.is_empty() {
        return Inventory::default();
    }

    let permits = Arc::new(Semaphore::new(opts.max_concurrent_regions.max(1)));
    let mut tasks: JoinSet<Harvest> = JoinSet::new();

    let deadline = opts.region_timeout;
    for (region_idx, region) in regions.iter().enumerate() {
        {
            let lister = lister.clone();
            let permits = permits.clone();
            let region = region.clone();
            tasks.spawn(async move {
                let Ok(_permit) = permits.acquire_owned().await else {
                    return Harvest::Snapshots {
                        region_idx,
                        records: Vec::new(),
                        failed: SnapshotKind::ALL.len(),
                    };
                };
                let (records, failed) =
                    snapshot_region(lister.as_ref(), &region, now, deadline).await;
                Harvest::Snapshots {
                    region_idx,
                    records,
                    failed,
                }
            });
        }
        {
            let lister = lister.clone();
            let permits = permits.clone();
            let region = region.clone();
            tasks.spawn(async move {
                let Ok(_permit) = permits.acquire_owned().await else {
                    return Harvest::Volumes {
                        region_idx,
                        records: Vec::new(),
                        failed: 1,
                    };
                };
                let (records, failed) =
                    volume_region(lister.as_ref(), &region, now, deadline).await;
                Harvest::Volumes {
                    region_idx,
                    records,
                    failed,
                }
            });
        }
    }

    // Barrier: nothing is aggregated until every task has finished.
    let mut snapshots_by_region: Vec<Vec<SnapshotRecord>> = vec![Vec::new(); regions.len()];
    let mut volumes_by_region: Vec<Vec<VolumeRecord>> = vec![Vec::new(); regions.len()];
    let mut failed_sources = 0usize;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Harvest::Snapshots {
                region_idx,
                records,
                failed,
            }) => {
                snapshots_by_region[region_idx] = records;
                failed_sources += failed;
            }
            Ok(Harvest::Volumes {
                region_idx,
                records,
                failed,
            }) => {
                volumes_by_region[region_idx] = records;
                failed_sources += failed;
            }
            Err(e) => {
                warn!(error = %e, "region task aborted; treating as empty");
                failed_sources += 1;
            }
        }
    }

    let inventory = Inventory {
        snapshots: snapshots_by_region.into_iter().flatten().collect(),
        volumes: volumes_by_region.into_iter().flatten().collect(),
        regions,
        failed_sources,
    };
    info!(
        regions = inventory.regions.len(),
        snapshots = inventory.snapshots.len(),
        unattached_volumes = inventory.volumes.len(),
        failed_sources = inventory.failed_sources,
        "collection complete"
    );
    inventory
}

/// All three snapshot kinds for one region, in kind order. Each kind gets its own
/// `deadline`; a kind that misses it is empty while the others keep their records.
/// Returns records and failed-source count.
pub async fn snapshot_region(
    lister: &dyn ResourceLister,
    region: &str,
    now: DateTime<Utc>,
    deadline: Duration,
) -> (Vec<SnapshotRecord>, usize) {
    let mut records = Vec::new();
    let mut failed = 0;
    for kind in SnapshotKind::ALL {
        let outcome = within(
            deadline,
            region,
            kind.label(),
            collect_snapshots(lister, region, kind),
        )
        .await;
        if outcome.is_failed() {
            failed += 1;
        }
        let raw = outcome.into_records();
        let before = records.len();
        records.extend(raw.iter().filter_map(|r| normalize_snapshot(r, region, now)));
        let skipped = raw.len() - (records.len() - before);
        if skipped > 0 {
            debug!(region, source = kind.label(), skipped, "ineligible records skipped");
        }
    }
    (records, failed)
}

/// Unattached volumes for one region. Returns records and failed-source count.
pub async fn volume_region(
    lister: &dyn ResourceLister,
    region: &str,
    now: DateTime<Utc>,
    deadline: Duration,
) -> (Vec<VolumeRecord>, usize) {
    let outcome = within(deadline, region, "volume", collect_volumes(lister, region)).await;
    let failed = usize::from(outcome.is_failed());
    let records = outcome
        .into_records()
        .iter()
        .filter_map(|v| normalize_volume(v, region, now))
        .collect();
    (records, failed)
}

async fn within<T>(
    deadline: Duration,
    region: &str,
    source: &str,
    collect: impl Future<Output = SourceOutcome<T>>,
) -> SourceOutcome<T> {
    match tokio::time::timeout(deadline, collect).await {
        Ok(outcome) => outcome,
        Err(_) => {
            warn!(
                region,
                source,
                timeout_secs = deadline.as_secs(),
                "source timed out; treating as empty"
            );
            SourceOutcome::Failed(SourceError::TimedOut(deadline))
        }
    }
}
