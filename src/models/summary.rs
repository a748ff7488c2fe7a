// Rollup summary: count/size tallies keyed by type, age group and region.
// IndexMap keeps first-seen key order for report layout.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::SnapshotKind;
use crate::age::AgeGroup;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tally {
    pub count: u64,
    pub size_gb: f64,
}

impl Tally {
    pub fn add(&mut self, size_gb: f64) {
        self.count += 1;
        self.size_gb += size_gb;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionRollup {
    pub total: Tally,
    pub by_type: IndexMap<SnapshotKind, Tally>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionVolumes {
    pub count: u64,
    pub size_gb: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeSummary {
    pub total_count: u64,
    pub total_size_gb: u64,
    pub by_region: IndexMap<String, RegionVolumes>,
}

/// Invariant: every leaf dimension sums back to `total_count` / `total_size_gb`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollupSummary {
    pub total_count: u64,
    pub total_size_gb: f64,
    pub by_type: IndexMap<SnapshotKind, Tally>,
    pub by_age_group: IndexMap<AgeGroup, Tally>,
    pub by_region: IndexMap<String, RegionRollup>,
    pub volumes: VolumeSummary,
}
