// Domain models: raw listing payloads, normalized records, rollups

mod raw;
mod snapshot;
mod summary;
mod volume;

pub use raw::{
    Page, RawAttachment, RawBackupJob, RawBlockSnapshot, RawDatabaseSnapshot, RawSnapshot,
    RawVolume,
};
pub use snapshot::{SnapshotKind, SnapshotRecord};
pub use summary::{RegionRollup, RegionVolumes, RollupSummary, Tally, VolumeSummary};
pub use volume::VolumeRecord;
