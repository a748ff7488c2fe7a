// CSV exports of the normalized records and their timestamp-qualified store keys.

use bytes::Bytes;
use chrono::{DateTime, SecondsFormat, Utc};
use csv::Writer;
use std::path::{Component, Path};

use crate::models::{SnapshotRecord, VolumeRecord};

pub const SNAPSHOT_COLUMNS: [&str; 7] = [
    "Id",
    "Type",
    "Region",
    "StartTime",
    "Size",
    "Age",
    "AgeGroup",
];

pub const VOLUME_COLUMNS: [&str; 7] = [
    "Id",
    "Region",
    "Size",
    "State",
    "IdleDays",
    "VolumeType",
    "CreateTime",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportKeys {
    pub snapshots: String,
    pub volumes: String,
}

/// `<prefix>snapshot_inventory_<account>_<YYYYMMDD_HHMMSS>.csv` and the volume equivalent.
pub fn export_keys(prefix: &str, account_id: &str, at: DateTime<Utc>) -> ExportKeys {
    let stamp = at.format("%Y%m%d_%H%M%S");
    ExportKeys {
        snapshots: format!("{prefix}snapshot_inventory_{account_id}_{stamp}.csv"),
        volumes: format!("{prefix}unattached_volumes_{account_id}_{stamp}.csv"),
    }
}

/// True for a relative key made only of plain segments: no root, `.` or `..`.
pub fn is_plain_key(key: &str) -> bool {
    !key.is_empty()
        && Path::new(key)
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
}

/// True when `part` can be embedded in a key without adding a segment.
pub fn is_key_segment(part: &str) -> bool {
    is_plain_key(part) && Path::new(part).components().count() == 1 && !part.ends_with('/')
}

pub fn snapshots_csv(records: &[SnapshotRecord]) -> anyhow::Result<Bytes> {
    let mut wtr = Writer::from_writer(vec![]);
    wtr.write_record(SNAPSHOT_COLUMNS)?;
    for r in records {
        wtr.write_record([
            r.id.clone(),
            r.kind.label().to_string(),
            r.region.clone(),
            iso8601(r.created_at),
            r.size_gb.to_string(),
            r.age_days.to_string(),
            r.age_group.label().to_string(),
        ])?;
    }
    finish(wtr)
}

pub fn volumes_csv(records: &[VolumeRecord]) -> anyhow::Result<Bytes> {
    let mut wtr = Writer::from_writer(vec![]);
    wtr.write_record(VOLUME_COLUMNS)?;
    for r in records {
        wtr.write_record([
            r.id.clone(),
            r.region.clone(),
            r.size_gb.to_string(),
            r.state.clone(),
            r.idle_days.to_string(),
            r.volume_type.clone(),
            r.created_at.map(iso8601).unwrap_or_default(),
        ])?;
    }
    finish(wtr)
}

fn finish(wtr: Writer<Vec<u8>>) -> anyhow::Result<Bytes> {
    let data = wtr
        .into_inner()
        .map_err(|e| anyhow::anyhow!("CSV writer error: {}", e))?;
    Ok(Bytes::from(data))
}

fn iso8601(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn keys_are_timestamp_qualified() {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap();
        let keys = export_keys("reports/", "123456789012", at);
        assert_eq!(
            keys.snapshots,
            "reports/snapshot_inventory_123456789012_20240305_070809.csv"
        );
        assert_eq!(
            keys.volumes,
            "reports/unattached_volumes_123456789012_20240305_070809.csv"
        );
    }

    #[test]
    fn plain_keys_have_only_normal_segments() {
        assert!(is_plain_key("daily/snapshot_inventory_1_20240101_000000.csv"));
        assert!(is_plain_key("daily/"));
        assert!(!is_plain_key("./daily/"));
        assert!(!is_plain_key("../up/a.csv"));
        assert!(!is_plain_key("/abs.csv"));
        assert!(!is_plain_key(""));
    }

    #[test]
    fn key_segment_rejects_separators() {
        assert!(is_key_segment("123456789012"));
        assert!(!is_key_segment("12/34"));
        assert!(!is_key_segment("1234/"));
        assert!(!is_key_segment(".."));
        assert!(!is_key_segment("."));
    }

    #[test]
    fn empty_exports_have_header_only() {
        let snaps = snapshots_csv(&[]).unwrap();
        assert_eq!(&snaps[..], b"Id,Type,Region,StartTime,Size,Age,AgeGroup\n");
        let vols = volumes_csv(&[]).unwrap();
        assert_eq!(
            &vols[..],
            b"Id,Region,Size,State,IdleDays,VolumeType,CreateTime\n"
        );
    }
}
