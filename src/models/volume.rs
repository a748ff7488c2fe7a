// Unattached volume record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Only built for volumes with zero attachments at observation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeRecord {
    pub id: String,
    pub region: String,
    pub size_gb: u64,
    pub state: String,
    /// Days since the last state transition; 0 when the upstream did not report one.
    pub idle_days: u32,
    pub volume_type: String,
    pub created_at: Option<DateTime<Utc>>,
}
