//! Standalone backfill over `[BACKFILL__FROM_BLOCK, BACKFILL__TO_BLOCK]`,
//! sharing the service configuration and projection code.

use blockscout_service_launcher::launcher::ConfigSettings;
use multisig_indexer_server::Settings;

const SERVICE_NAME: &str = "multisig_indexer_backfill";

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let settings = Settings::build().expect("failed to read config");

    blockscout_service_launcher::tracing::init_logs(
        SERVICE_NAME,
        &settings.tracing,
        &settings.jaeger,
    )?;

    multisig_indexer_server::run_backfill(settings).await
}
