// Raw listing records -> SnapshotRecord / VolumeRecord.
// Returns None for records that fail their kind's completeness check.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::age::{age_in_days, classify};
use crate::models::{
    RawAttachment, RawBackupJob, RawBlockSnapshot, RawDatabaseSnapshot, RawSnapshot, RawVolume, SnapshotKind,
    SnapshotRecord, VolumeRecord,
};

const BYTES_PER_GB: f64 = (1u64 << 30) as f64;
const COMPLETED_STATE: &str = "completed";
const DETACHED_STATE: &str = "detached";

/// Bytes -> GB (2^30), rounded to 2 decimal places.
pub fn bytes_to_gb(bytes: u64) -> f64 {
    let gb = bytes as f64 / BYTES_PER_GB;
    (gb * 100.0).round() / 100.0
}

pub fn normalize_snapshot(
    raw: &RawSnapshot,
    region: &str,
    now: DateTime<Utc>,
) -> Option<SnapshotRecord> {
    match raw {
        RawSnapshot::BlockSnapshot(s) => normalize_block(s, region, now),
        RawSnapshot::DatabaseSnapshot(s) => normalize_database(s, region, now),
        RawSnapshot::FilesystemBackup(j) => normalize_backup_job(j, region, now),
    }
}

fn normalize_block(
    raw: &RawBlockSnapshot,
    region: &str,
    now: DateTime<Utc>,
) -> Option<SnapshotRecord> {
    let id = non_empty(raw.snapshot_id.as_deref())?;
    let Some(created_at) = raw.start_time else {
        debug!(region, id, "block snapshot without start time skipped");
        return None;
    };
    Some(build_snapshot(
        id,
        SnapshotKind::BlockSnapshot,
        region,
        created_at,
        raw.volume_size.unwrap_or(0.0),
        now,
    ))
}

fn normalize_database(
    raw: &RawDatabaseSnapshot,
    region: &str,
    now: DateTime<Utc>,
) -> Option<SnapshotRecord> {
    let id = non_empty(raw.db_snapshot_identifier.as_deref())?;
    let Some(created_at) = raw.snapshot_create_time else {
        debug!(region, id, "database snapshot still in progress skipped");
        return None;
    };
    Some(build_snapshot(
        id,
        SnapshotKind::DatabaseSnapshot,
        region,
        created_at,
        raw.allocated_storage.unwrap_or(0.0),
        now,
    ))
}

fn normalize_backup_job(
    raw: &RawBackupJob,
    region: &str,
    now: DateTime<Utc>,
) -> Option<SnapshotRecord> {
    let completed = raw
        .state
        .as_deref()
        .is_some_and(|s| s.eq_ignore_ascii_case(COMPLETED_STATE));
    if !completed {
        return None;
    }
    let id = non_empty(raw.backup_job_id.as_deref())?;
    let created_at = raw.creation_date?;
    Some(build_snapshot(
        id,
        SnapshotKind::FilesystemBackup,
        region,
        created_at,
        bytes_to_gb(raw.backup_size_in_bytes.unwrap_or(0)),
        now,
    ))
}

fn build_snapshot(
    id: &str,
    kind: SnapshotKind,
    region: &str,
    created_at: DateTime<Utc>,
    size_gb: f64,
    now: DateTime<Utc>,
) -> SnapshotRecord {
    let age_days = age_in_days(created_at, now);
    SnapshotRecord {
        id: id.to_string(),
        kind,
        region: region.to_string(),
        created_at,
        size_gb: size_gb.max(0.0),
        age_days,
        age_group: classify(age_days),
    }
}

/// Volumes with an active attachment and volumes without an identifier yield None.
pub fn normalize_volume(raw: &RawVolume, region: &str, now: DateTime<Utc>) -> Option<VolumeRecord> {
    if raw.attachments.iter().any(is_active) {
        return None;
    }
    let id = non_empty(raw.volume_id.as_deref())?;
    let idle_days = raw
        .last_state_transition
        .map(|t| age_in_days(t, now))
        .unwrap_or(0);
    Some(VolumeRecord {
        id: id.to_string(),
        region: region.to_string(),
        size_gb: raw.size.unwrap_or(0),
        state: raw.state.clone().unwrap_or_default(),
        idle_days,
        volume_type: raw.volume_type.clone().unwrap_or_default(),
        created_at: raw.create_time,
    })
}

/// Every attachment state except "detached" holds the volume; an unreported state counts as attached.
fn is_active(attachment: &RawAttachment) -> bool {
    !attachment
        .state
        .as_deref()
        .is_some_and(|s| s.eq_ignore_ascii_case(DETACHED_STATE))
}

/// Rejects blank identifiers; a non-blank one is kept exactly as listed.
fn non_empty(id: Option<&str>) -> Option<&str> {
    id.filter(|s| !s.trim().is_empty())
}
