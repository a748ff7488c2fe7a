// Collaborator seams: resource listing, artifact store, notification publisher.
// One Clients bundle is built by the caller and passed into the core.

mod inventory_file;
mod local;

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;

use crate::models::{Page, RawSnapshot, RawVolume, SnapshotKind};

pub use inventory_file::{InventoryDocument, InventoryFileLister, RegionInventory};
pub use local::{DirectoryStore, FilePublisher, NotificationEnvelope};

/// Failure of a single upstream listing call. Never fatal to a run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("not authorized: {0}")]
    Unauthorized(String),
    #[error("throttled: {0}")]
    Throttled(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("service unavailable: {0}")]
    Unavailable(String),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("pagination token {0:?} returned twice")]
    PaginationLoop(String),
    #[error("timed out after {0:?}")]
    TimedOut(Duration),
}

/// Failure to store an export or deliver the notification. Fatal to a run.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("store rejected {key}: {reason}")]
    Store { key: String, reason: String },
    #[error("publish failed: {0}")]
    Publish(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[async_trait]
pub trait ResourceLister: Send + Sync {
    async fn list_regions(&self) -> Result<Vec<String>, SourceError>;

    async fn list_snapshots(
        &self,
        region: &str,
        kind: SnapshotKind,
        page_token: Option<&str>,
    ) -> Result<Page<RawSnapshot>, SourceError>;

    async fn list_volumes(
        &self,
        region: &str,
        page_token: Option<&str>,
    ) -> Result<Page<RawVolume>, SourceError>;
}

#[async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn put(&self, key: &str, content: Bytes) -> Result<(), DeliveryError>;

    /// Human-readable reference to a stored key (URL or path), used in the enriched message.
    fn locate(&self, key: &str) -> String;
}

#[async_trait]
pub trait NotificationPublisher: Send + Sync {
    async fn publish(
        &self,
        subject: &str,
        default_message: &str,
        rich_message: &str,
    ) -> Result<(), DeliveryError>;
}

/// Collaborator handles, constructed once per invocation.
#[derive(Clone)]
pub struct Clients {
    pub lister: Arc<dyn ResourceLister>,
    pub store: Arc<dyn ArtifactStore>,
    pub publisher: Arc<dyn NotificationPublisher>,
}
