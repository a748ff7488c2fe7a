// Resource listing backed by a JSON inventory dump, served page by page.

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{ResourceLister, SourceError};
use crate::models::{
    Page, RawBackupJob, RawBlockSnapshot, RawDatabaseSnapshot, RawSnapshot, RawVolume,
    SnapshotKind,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionInventory {
    #[serde(default)]
    pub block_snapshots: Vec<RawBlockSnapshot>,
    #[serde(default)]
    pub database_snapshots: Vec<RawDatabaseSnapshot>,
    #[serde(default)]
    pub filesystem_backups: Vec<RawBackupJob>,
    #[serde(default)]
    pub volumes: Vec<RawVolume>,
}

/// Regions listed in `unavailable_regions` are reported by `list_regions` but fail every listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryDocument {
    #[serde(default)]
    pub regions: IndexMap<String, RegionInventory>,
    #[serde(default)]
    pub unavailable_regions: Vec<String>,
}

pub struct InventoryFileLister {
    doc: InventoryDocument,
    page_size: usize,
}

impl InventoryFileLister {
    pub async fn load(path: impl AsRef<Path>, page_size: usize) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read(path)
            .await
            .map_err(|e| anyhow::anyhow!("read inventory {}: {}", path.display(), e))?;
        let doc: InventoryDocument = serde_json::from_slice(&raw)
            .map_err(|e| anyhow::anyhow!("parse inventory {}: {}", path.display(), e))?;
        Ok(Self::from_document(doc, page_size))
    }

    pub fn from_document(doc: InventoryDocument, page_size: usize) -> Self {
        Self {
            doc,
            page_size: page_size.max(1),
        }
    }

    fn region(&self, region: &str) -> Result<Option<&RegionInventory>, SourceError> {
        if self.doc.unavailable_regions.iter().any(|r| r == region) {
            return Err(SourceError::Unavailable(format!("region {region}")));
        }
        Ok(self.doc.regions.get(region))
    }

    fn page<T: Clone>(&self, items: &[T], page_token: Option<&str>) -> Result<Page<T>, SourceError> {
        let start = match page_token {
            None => 0,
            Some(t) => t
                .parse::<usize>()
                .map_err(|_| SourceError::Malformed(format!("bad page token {t:?}")))?,
        };
        let start = start.min(items.len());
        let end = (start + self.page_size).min(items.len());
        Ok(Page {
            items: items[start..end].to_vec(),
            next_page_token: (end < items.len()).then(|| end.to_string()),
        })
    }
}

#[async_trait]
impl ResourceLister for InventoryFileLister {
    async fn list_regions(&self) -> Result<Vec<String>, SourceError> {
        let mut regions: Vec<String> = self.doc.regions.keys().cloned().collect();
        for r in &self.doc.unavailable_regions {
            if !regions.contains(r) {
                regions.push(r.clone());
            }
        }
        Ok(regions)
    }

    async fn list_snapshots(
        &self,
        region: &str,
        kind: SnapshotKind,
        page_token: Option<&str>,
    ) -> Result<Page<RawSnapshot>, SourceError> {
        let Some(inv) = self.region(region)? else {
            return Ok(Page::last(Vec::new()));
        };
        let items: Vec<RawSnapshot> = match kind {
            SnapshotKind::BlockSnapshot => inv
                .block_snapshots
                .iter()
                .cloned()
                .map(RawSnapshot::BlockSnapshot)
                .collect(),
            SnapshotKind::DatabaseSnapshot => inv
                .database_snapshots
                .iter()
                .cloned()
                .map(RawSnapshot::DatabaseSnapshot)
                .collect(),
            SnapshotKind::FilesystemBackup => inv
                .filesystem_backups
                .iter()
                .cloned()
                .map(RawSnapshot::FilesystemBackup)
                .collect(),
        };
        self.page(&items, page_token)
    }

    async fn list_volumes(
        &self,
        region: &str,
        page_token: Option<&str>,
    ) -> Result<Page<RawVolume>, SourceError> {
        let Some(inv) = self.region(region)? else {
            return Ok(Page::last(Vec::new()));
        };
        self.page(&inv.volumes, page_token)
    }
}
