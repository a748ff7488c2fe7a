// Rollups: one pass over snapshots into type / age-group / region (+ region x type)
// tallies, one pass over volumes into per-region tallies, and the per-region
// idle-volume ranking.

use indexmap::IndexMap;

use crate::models::{
    RegionRollup, RegionVolumes, RollupSummary, SnapshotRecord, Tally, VolumeRecord, VolumeSummary,
};

pub const DEFAULT_TOP_IDLE: usize = 5;

/// Builds the summary. Snapshots are visited oldest first so map keys appear
/// in the order the oldest records introduce them; totals do not depend on order.
pub fn aggregate(snapshots: &[SnapshotRecord], volumes: &[VolumeRecord]) -> RollupSummary {
    let mut ordered: Vec<&SnapshotRecord> = snapshots.iter().collect();
    ordered.sort_by(|a, b| b.age_days.cmp(&a.age_days));

    let mut summary = RollupSummary::default();
    for s in ordered {
        summary.total_count += 1;
        summary.total_size_gb += s.size_gb;
        summary.by_type.entry(s.kind).or_default().add(s.size_gb);
        summary
            .by_age_group
            .entry(s.age_group)
            .or_default()
            .add(s.size_gb);

        let region = summary.by_region.entry(s.region.clone()).or_default();
        region.total.add(s.size_gb);
        region.by_type.entry(s.kind).or_default().add(s.size_gb);
    }
    summary.volumes = summarize_volumes(volumes);
    summary
}

fn summarize_volumes(volumes: &[VolumeRecord]) -> VolumeSummary {
    let mut out = VolumeSummary::default();
    for v in volumes {
        out.total_count += 1;
        out.total_size_gb += v.size_gb;
        let region: &mut RegionVolumes = out.by_region.entry(v.region.clone()).or_default();
        region.count += 1;
        region.size_gb += v.size_gb;
    }
    out
}

/// Per region (first-seen order), the `n` volumes idle longest, most idle first.
/// Ties keep input order.
pub fn top_idle_volumes(volumes: &[VolumeRecord], n: usize) -> IndexMap<String, Vec<VolumeRecord>> {
    let mut by_region: IndexMap<String, Vec<VolumeRecord>> = IndexMap::new();
    for v in volumes {
        by_region.entry(v.region.clone()).or_default().push(v.clone());
    }
    for ranked in by_region.values_mut() {
        ranked.sort_by(|a, b| b.idle_days.cmp(&a.idle_days));
        ranked.truncate(n);
    }
    by_region
}

/// Sum of a tally map; used to check leaf dimensions against the totals.
pub fn sum_tallies<'a>(tallies: impl IntoIterator<Item = &'a Tally>) -> Tally {
    tallies.into_iter().fold(Tally::default(), |acc, t| Tally {
        count: acc.count + t.count,
        size_gb: acc.size_gb + t.size_gb,
    })
}

impl RollupSummary {
    /// True when every leaf dimension reproduces the totals (sizes within 1e-6).
    pub fn is_consistent(&self) -> bool {
        let close = |t: Tally| t.count == self.total_count && (t.size_gb - self.total_size_gb).abs() < 1e-6;
        let regions_ok = self.by_region.values().all(|r: &RegionRollup| {
            let inner = sum_tallies(r.by_type.values());
            inner.count == r.total.count && (inner.size_gb - r.total.size_gb).abs() < 1e-6
        });
        close(sum_tallies(self.by_type.values()))
            && close(sum_tallies(self.by_age_group.values()))
            && close(sum_tallies(self.by_region.values().map(|r| &r.total)))
            && regions_ok
    }
}
