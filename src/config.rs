use serde::Deserialize;
use std::time::Duration;

use crate::export::{is_key_segment, is_plain_key};
use crate::fanout::FanoutOptions;
use crate::rollup::DEFAULT_TOP_IDLE;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub account: AccountConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub collection: CollectionConfig,
    pub export: ExportConfig,
    pub notification: NotificationConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountConfig {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// JSON inventory dump served by the resource listing client.
    pub inventory_path: String,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    100
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionConfig {
    #[serde(default = "default_max_concurrent_regions")]
    pub max_concurrent_regions: usize,
    /// Per-region deadline; a region that misses it contributes nothing.
    #[serde(default = "default_region_timeout_secs")]
    pub region_timeout_secs: u64,
}

fn default_max_concurrent_regions() -> usize {
    4
}

fn default_region_timeout_secs() -> u64 {
    120
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            max_concurrent_regions: default_max_concurrent_regions(),
            region_timeout_secs: default_region_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    pub location: String,
    #[serde(default)]
    pub key_prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    pub destination: String,
    #[serde(default)]
    pub subject: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_top_idle_volumes")]
    pub top_idle_volumes: usize,
}

fn default_top_idle_volumes() -> usize {
    DEFAULT_TOP_IDLE
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_idle_volumes: default_top_idle_volumes(),
        }
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("read config {}: {}", path, e))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Subject line, falling back to one naming the account.
    pub fn subject(&self) -> String {
        match &self.notification.subject {
            Some(s) if !s.trim().is_empty() => s.clone(),
            _ => format!("Snapshot Inventory Report for Account {}", self.account.id),
        }
    }

    pub fn fanout_options(&self) -> FanoutOptions {
        FanoutOptions {
            max_concurrent_regions: self.collection.max_concurrent_regions,
            region_timeout: Duration::from_secs(self.collection.region_timeout_secs),
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.account.id.trim().is_empty(),
            "account.id must be non-empty"
        );
        anyhow::ensure!(
            is_key_segment(&self.account.id),
            "account.id must not contain path separators or be '.'/'..', got {:?}",
            self.account.id
        );
        anyhow::ensure!(
            !self.source.inventory_path.is_empty(),
            "source.inventory_path must be non-empty"
        );
        anyhow::ensure!(
            self.source.page_size > 0,
            "source.page_size must be > 0, got {}",
            self.source.page_size
        );
        anyhow::ensure!(
            self.collection.max_concurrent_regions > 0,
            "collection.max_concurrent_regions must be > 0, got {}",
            self.collection.max_concurrent_regions
        );
        anyhow::ensure!(
            self.collection.region_timeout_secs > 0,
            "collection.region_timeout_secs must be > 0, got {}",
            self.collection.region_timeout_secs
        );
        anyhow::ensure!(
            !self.export.location.trim().is_empty(),
            "export.location must be non-empty"
        );
        anyhow::ensure!(
            self.export.key_prefix.is_empty() || is_plain_key(&self.export.key_prefix),
            "export.key_prefix must be a relative path without '.' or '..' segments, got {:?}",
            self.export.key_prefix
        );
        anyhow::ensure!(
            !self.notification.destination.trim().is_empty(),
            "notification.destination must be non-empty"
        );
        anyhow::ensure!(
            self.report.top_idle_volumes > 0,
            "report.top_idle_volumes must be > 0, got {}",
            self.report.top_idle_volumes
        );
        Ok(())
    }
}
