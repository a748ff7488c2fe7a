use anyhow::Result;
use snapshot_inventory::clients::{Clients, DirectoryStore, FilePublisher, InventoryFileLister};
use snapshot_inventory::{config, job, version};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let app_config = config::AppConfig::load()?;
    tracing::info!(
        name = version::NAME,
        version = version::VERSION,
        account = %app_config.account.id,
        "starting inventory run"
    );

    let lister =
        InventoryFileLister::load(&app_config.source.inventory_path, app_config.source.page_size)
            .await?;
    let clients = Clients {
        lister: Arc::new(lister),
        store: Arc::new(DirectoryStore::new(&app_config.export.location)),
        publisher: Arc::new(FilePublisher::new(&app_config.notification.destination)),
    };

    let now = chrono::Utc::now();
    let outcome = job::run(&clients, &app_config, now).await?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
