// Normalized snapshot record shared by all three backup sources

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::age::AgeGroup;

/// Resource-type tag; order here is the per-region collection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnapshotKind {
    BlockSnapshot,
    DatabaseSnapshot,
    FilesystemBackup,
}

impl SnapshotKind {
    pub const ALL: [SnapshotKind; 3] = [
        SnapshotKind::BlockSnapshot,
        SnapshotKind::DatabaseSnapshot,
        SnapshotKind::FilesystemBackup,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SnapshotKind::BlockSnapshot => "block-snapshot",
            SnapshotKind::DatabaseSnapshot => "database-snapshot",
            SnapshotKind::FilesystemBackup => "filesystem-backup",
        }
    }
}

impl fmt::Display for SnapshotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `age_days` and `age_group` are derived from `created_at` and the run's evaluation instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRecord {
    pub id: String,
    pub kind: SnapshotKind,
    pub region: String,
    pub created_at: DateTime<Utc>,
    pub size_gb: f64,
    pub age_days: u32,
    pub age_group: AgeGroup,
}
