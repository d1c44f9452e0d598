use iotsi_access::{AccessTable, Config, ConnectionManager, CredentialClassifier, EnvFileSource};
use mimalloc::MiMalloc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.database.redacted_url(),
        access_table = %cfg.database.access_table,
        env_file = %cfg.credentials.env_file.display(),
        loglevel = %cfg.loglevel
    );

    let handle = ConnectionManager::connect(&cfg.database)?;
    let table = AccessTable::new(&handle, cfg.database.access_table.clone())?;
    table.ensure_access_table().await?;

    let classifier = CredentialClassifier::new(EnvFileSource::new(&cfg.credentials.env_file));
    let classified = classifier.classify()?;

    // Only seed an empty table; the store enforces no uniqueness.
    if table.count_access_rows().await? == 0 {
        let records = classified.access_records();
        if records.is_empty() {
            warn!("no identifier/key pairs found; access table left empty");
        } else {
            table.insert_many(records).await?;
        }
    }

    let rows = table.count_access_rows().await?;
    info!(table = %table.table(), rows, "access table ready");

    handle.close().await;
    Ok(())
}
