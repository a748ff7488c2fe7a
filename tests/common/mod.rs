// Shared test helpers: scripted lister, recording/failing store and publisher, record builders

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Duration, TimeZone, Utc};
use snapshot_inventory::clients::{
    ArtifactStore, Clients, DeliveryError, NotificationPublisher, ResourceLister, SourceError,
};
use snapshot_inventory::models::*;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

pub fn days_ago(days: i64) -> DateTime<Utc> {
    now() - Duration::days(days)
}

pub fn block(id: &str, age_days: i64, size_gb: f64) -> RawSnapshot {
    RawSnapshot::BlockSnapshot(RawBlockSnapshot {
        snapshot_id: Some(id.into()),
        start_time: Some(days_ago(age_days)),
        volume_size: Some(size_gb),
    })
}

pub fn database(id: &str, age_days: i64, size_gb: f64) -> RawSnapshot {
    RawSnapshot::DatabaseSnapshot(RawDatabaseSnapshot {
        db_snapshot_identifier: Some(id.into()),
        snapshot_create_time: Some(days_ago(age_days)),
        allocated_storage: Some(size_gb),
    })
}

pub fn backup(id: &str, state: &str, age_days: i64, bytes: u64) -> RawSnapshot {
    RawSnapshot::FilesystemBackup(RawBackupJob {
        backup_job_id: Some(id.into()),
        state: Some(state.into()),
        creation_date: Some(days_ago(age_days)),
        backup_size_in_bytes: Some(bytes),
    })
}

pub fn volume(id: &str, idle_days: i64, size_gb: u64) -> RawVolume {
    RawVolume {
        volume_id: Some(id.into()),
        size: Some(size_gb),
        state: Some("available".into()),
        volume_type: Some("gp3".into()),
        create_time: Some(days_ago(idle_days + 30)),
        attachments: vec![],
        last_state_transition: Some(days_ago(idle_days)),
    }
}

pub fn snapshot_record(id: &str, kind: SnapshotKind, region: &str, age_days: u32, size_gb: f64) -> SnapshotRecord {
    SnapshotRecord {
        id: id.into(),
        kind,
        region: region.into(),
        created_at: days_ago(age_days as i64),
        size_gb,
        age_days,
        age_group: snapshot_inventory::age::classify(age_days),
    }
}

pub fn volume_record(id: &str, region: &str, idle_days: u32, size_gb: u64) -> VolumeRecord {
    VolumeRecord {
        id: id.into(),
        region: region.into(),
        size_gb,
        state: "available".into(),
        idle_days,
        volume_type: "gp3".into(),
        created_at: Some(days_ago(idle_days as i64 + 30)),
    }
}

/// In-memory listing with offset page tokens and injectable failures/delays.
pub struct ScriptedLister {
    pub regions: Result<Vec<String>, SourceError>,
    pub snapshots: HashMap<(String, SnapshotKind), Vec<RawSnapshot>>,
    pub volumes: HashMap<String, Vec<RawVolume>>,
    pub failing_snapshots: HashSet<(String, SnapshotKind)>,
    pub failing_volumes: HashSet<String>,
    /// Sources that serve page one, then fail on the continuation.
    pub failing_after_first_page: HashSet<(String, SnapshotKind)>,
    pub slow_regions: HashSet<String>,
    /// Single snapshot sources that stall while the rest of the region answers.
    pub slow_sources: HashSet<(String, SnapshotKind)>,
    pub delay: std::time::Duration,
    pub page_size: usize,
    pub calls: AtomicUsize,
}

impl ScriptedLister {
    pub fn new(regions: &[&str]) -> Self {
        Self {
            regions: Ok(regions.iter().map(|r| r.to_string()).collect()),
            snapshots: HashMap::new(),
            volumes: HashMap::new(),
            failing_snapshots: HashSet::new(),
            failing_volumes: HashSet::new(),
            failing_after_first_page: HashSet::new(),
            slow_regions: HashSet::new(),
            slow_sources: HashSet::new(),
            delay: std::time::Duration::from_secs(3600),
            page_size: 2,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_snapshots(mut self, region: &str, kind: SnapshotKind, items: Vec<RawSnapshot>) -> Self {
        self.snapshots.insert((region.into(), kind), items);
        self
    }

    pub fn with_volumes(mut self, region: &str, items: Vec<RawVolume>) -> Self {
        self.volumes.insert(region.into(), items);
        self
    }

    pub fn failing(mut self, region: &str, kind: SnapshotKind) -> Self {
        self.failing_snapshots.insert((region.into(), kind));
        self
    }

    pub fn failing_volumes_in(mut self, region: &str) -> Self {
        self.failing_volumes.insert(region.into());
        self
    }

    pub fn slow(mut self, region: &str) -> Self {
        self.slow_regions.insert(region.into());
        self
    }

    pub fn slow_source(mut self, region: &str, kind: SnapshotKind) -> Self {
        self.slow_sources.insert((region.into(), kind));
        self
    }

    fn page<T: Clone>(&self, items: &[T], token: Option<&str>) -> Page<T> {
        let start: usize = token.map(|t| t.parse().unwrap()).unwrap_or(0);
        let end = (start + self.page_size).min(items.len());
        Page {
            items: items[start..end].to_vec(),
            next_page_token: (end < items.len()).then(|| end.to_string()),
        }
    }

    async fn maybe_stall(&self, region: &str) {
        if self.slow_regions.contains(region) {
            tokio::time::sleep(self.delay).await;
        }
    }
}

#[async_trait]
impl ResourceLister for ScriptedLister {
    async fn list_regions(&self) -> Result<Vec<String>, SourceError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.regions.clone()
    }

    async fn list_snapshots(
        &self,
        region: &str,
        kind: SnapshotKind,
        page_token: Option<&str>,
    ) -> Result<Page<RawSnapshot>, SourceError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.maybe_stall(region).await;
        let key = (region.to_string(), kind);
        if self.slow_sources.contains(&key) {
            tokio::time::sleep(self.delay).await;
        }
        if self.failing_snapshots.contains(&key) {
            return Err(SourceError::Unauthorized(format!("{region}/{kind}")));
        }
        if page_token.is_some() && self.failing_after_first_page.contains(&key) {
            return Err(SourceError::Throttled(format!("{region}/{kind}")));
        }
        let items = self.snapshots.get(&key).cloned().unwrap_or_default();
        Ok(self.page(&items, page_token))
    }

    async fn list_volumes(
        &self,
        region: &str,
        page_token: Option<&str>,
    ) -> Result<Page<RawVolume>, SourceError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.maybe_stall(region).await;
        if self.failing_volumes.contains(region) {
            return Err(SourceError::Network(format!("{region}/volumes")));
        }
        let items = self.volumes.get(region).cloned().unwrap_or_default();
        Ok(self.page(&items, page_token))
    }
}

#[derive(Default)]
pub struct RecordingStore {
    pub puts: Mutex<Vec<(String, Bytes)>>,
}

impl RecordingStore {
    pub fn get(&self, key: &str) -> Option<String> {
        self.puts
            .lock()
            .unwrap()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, b)| String::from_utf8(b.to_vec()).unwrap())
    }
}

#[async_trait]
impl ArtifactStore for RecordingStore {
    async fn put(&self, key: &str, content: Bytes) -> Result<(), DeliveryError> {
        self.puts.lock().unwrap().push((key.to_string(), content));
        Ok(())
    }

    fn locate(&self, key: &str) -> String {
        format!("mem://exports/{key}")
    }
}

pub struct FailingStore;

#[async_trait]
impl ArtifactStore for FailingStore {
    async fn put(&self, key: &str, _content: Bytes) -> Result<(), DeliveryError> {
        Err(DeliveryError::Store {
            key: key.to_string(),
            reason: "access denied".into(),
        })
    }

    fn locate(&self, key: &str) -> String {
        key.to_string()
    }
}

#[derive(Default)]
pub struct RecordingPublisher {
    pub messages: Mutex<Vec<(String, String, String)>>,
}

#[async_trait]
impl NotificationPublisher for RecordingPublisher {
    async fn publish(&self, subject: &str, default_message: &str, rich_message: &str) -> Result<(), DeliveryError> {
        self.messages.lock().unwrap().push((
            subject.to_string(),
            default_message.to_string(),
            rich_message.to_string(),
        ));
        Ok(())
    }
}

pub struct FailingPublisher;

#[async_trait]
impl NotificationPublisher for FailingPublisher {
    async fn publish(&self, _subject: &str, _default: &str, _rich: &str) -> Result<(), DeliveryError> {
        Err(DeliveryError::Publish("topic not found".into()))
    }
}

pub fn clients(
    lister: ScriptedLister,
    store: Arc<dyn ArtifactStore>,
    publisher: Arc<dyn NotificationPublisher>,
) -> Clients {
    Clients {
        lister: Arc::new(lister),
        store,
        publisher,
    }
}
