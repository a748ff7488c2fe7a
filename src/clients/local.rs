// Filesystem-backed artifact store and notification publisher.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

use super::{ArtifactStore, DeliveryError, NotificationPublisher};
use crate::export::is_plain_key;

/// Writes each key as a file under `root`.
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, DeliveryError> {
        if !is_plain_key(key) {
            return Err(DeliveryError::Store {
                key: key.to_string(),
                reason: "key must be a relative path without '.' or '..' segments".into(),
            });
        }
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl ArtifactStore for DirectoryStore {
    async fn put(&self, key: &str, content: Bytes) -> Result<(), DeliveryError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &content).await?;
        info!(key, bytes = content.len(), path = %path.display(), "export stored");
        Ok(())
    }

    fn locate(&self, key: &str) -> String {
        self.root.join(key).display().to_string()
    }
}

/// Multi-protocol message body: `default` for plain subscribers, `email` with export references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationEnvelope {
    pub subject: String,
    pub default: String,
    pub email: String,
}

/// Writes the notification envelope as JSON to `destination`, replacing any previous one.
pub struct FilePublisher {
    destination: PathBuf,
}

impl FilePublisher {
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
        }
    }
}

#[async_trait]
impl NotificationPublisher for FilePublisher {
    async fn publish(
        &self,
        subject: &str,
        default_message: &str,
        rich_message: &str,
    ) -> Result<(), DeliveryError> {
        let envelope = NotificationEnvelope {
            subject: subject.to_string(),
            default: default_message.to_string(),
            email: rich_message.to_string(),
        };
        let body = serde_json::to_vec_pretty(&envelope)?;
        if let Some(parent) = self.destination.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.destination, body).await?;
        info!(subject, destination = %self.destination.display(), "notification published");
        Ok(())
    }
}
