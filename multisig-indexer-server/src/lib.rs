mod health;
mod settings;

pub use settings::Settings;

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use blockscout_service_launcher::database;
use migration::Migrator;
use multisig_indexer_logic::{
    indexer::{status::IndexerStatus, Indexer},
    rpc::RpcClient,
};
use sea_orm::DatabaseConnection;
use tokio_util::sync::CancellationToken;

const SHUTDOWN_TIMEOUT_SEC: u64 = 10;

pub async fn run(settings: Settings) -> Result<(), anyhow::Error> {
    let db = Arc::new(connect_database(&settings).await?);
    let rpc = Arc::new(RpcClient::new(settings.indexer.rpc.clone()));
    let status = Arc::new(IndexerStatus::default());
    let cancel = CancellationToken::new();

    let indexer = Indexer::new(
        db.clone(),
        rpc.clone(),
        settings.indexer.clone(),
        status.clone(),
    );
    let indexer_cancel = cancel.clone();
    let mut indexer_handle = tokio::spawn(async move { indexer.start(indexer_cancel).await });

    let health_handle = if settings.health.enabled {
        let state = health::HealthState {
            db: db.clone(),
            rpc: rpc.clone(),
            status: status.clone(),
            confirmation_depth: settings.indexer.confirmation_depth,
            max_blocks_behind: settings.health.max_blocks_behind,
        };
        Some(tokio::spawn(health::run(
            state,
            settings.health.clone(),
            cancel.clone(),
        )))
    } else {
        tracing::warn!("health endpoints are disabled in settings");
        None
    };

    let run_result = tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
            Ok(())
        }
        res = &mut indexer_handle => {
            match res {
                Ok(inner) => {
                    inner.inspect_err(|err| tracing::error!(error = ?err, "indexer failed"))
                }
                Err(join_err) => {
                    Err(anyhow::Error::new(join_err).context("indexer task panicked"))
                }
            }
        }
    };

    cancel.cancel();
    let drain = async {
        // select! above may have consumed indexer_handle's completion
        if !indexer_handle.is_finished() {
            let _ = (&mut indexer_handle).await;
        }
        if let Some(handle) = health_handle {
            let _ = handle.await;
        }
    };
    if tokio::time::timeout(Duration::from_secs(SHUTDOWN_TIMEOUT_SEC), drain)
        .await
        .is_err()
    {
        anyhow::bail!("tasks did not stop within {SHUTDOWN_TIMEOUT_SEC}s, aborting");
    }

    run_result
}

/// One-shot bounded backfill used by the standalone binary.
pub async fn run_backfill(settings: Settings) -> Result<(), anyhow::Error> {
    let to_block = settings
        .backfill
        .to_block
        .context("BACKFILL__TO_BLOCK must be set")?;
    let from_block = settings.backfill.from_block;
    if from_block > to_block {
        anyhow::bail!("backfill range is empty: {from_block} > {to_block}");
    }

    let db = Arc::new(connect_database(&settings).await?);
    let rpc = Arc::new(RpcClient::new(settings.indexer.rpc.clone()));
    let status = Arc::new(IndexerStatus::default());

    let indexer = Indexer::new(db, rpc, settings.indexer.clone(), status);
    indexer
        .run_backfill(from_block, to_block, CancellationToken::new())
        .await
}

async fn connect_database(settings: &Settings) -> Result<DatabaseConnection, anyhow::Error> {
    let database_url = settings.database.connect.clone().url();
    let mut connect_options = sea_orm::ConnectOptions::new(&database_url);
    connect_options
        .sqlx_logging_level(tracing::log::LevelFilter::Debug)
        .set_schema_search_path(&settings.database_schema);
    database::initialize_postgres::<Migrator>(
        connect_options,
        settings.database.create_database,
        settings.database.run_migrations,
    )
    .await
}
