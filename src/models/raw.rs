// Raw records as returned by the resource listing service. Every field the
// upstream may omit is optional; the normalizer decides what is load-bearing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SnapshotKind;

/// One page of a listing plus the continuation token, if more pages remain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

impl<T> Page<T> {
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_page_token: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBlockSnapshot {
    #[serde(default)]
    pub snapshot_id: Option<String>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    /// Size of the source volume, already in GB.
    #[serde(default)]
    pub volume_size: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDatabaseSnapshot {
    #[serde(default)]
    pub db_snapshot_identifier: Option<String>,
    /// Absent while the snapshot is still being created.
    #[serde(default)]
    pub snapshot_create_time: Option<DateTime<Utc>>,
    /// Allocated storage in GB.
    #[serde(default)]
    pub allocated_storage: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBackupJob {
    #[serde(default)]
    pub backup_job_id: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub backup_size_in_bytes: Option<u64>,
}

/// A raw record from one of the three snapshot-like sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RawSnapshot {
    BlockSnapshot(RawBlockSnapshot),
    DatabaseSnapshot(RawDatabaseSnapshot),
    FilesystemBackup(RawBackupJob),
}

impl RawSnapshot {
    pub fn kind(&self) -> SnapshotKind {
        match self {
            RawSnapshot::BlockSnapshot(_) => SnapshotKind::BlockSnapshot,
            RawSnapshot::DatabaseSnapshot(_) => SnapshotKind::DatabaseSnapshot,
            RawSnapshot::FilesystemBackup(_) => SnapshotKind::FilesystemBackup,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAttachment {
    #[serde(default)]
    pub instance_id: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawVolume {
    #[serde(default)]
    pub volume_id: Option<String>,
    /// Size in whole GB.
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub volume_type: Option<String>,
    #[serde(default)]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub attachments: Vec<RawAttachment>,
    #[serde(default)]
    pub last_state_transition: Option<DateTime<Utc>>,
}
