use std::sync::Arc;

use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};
use multisig_indexer_logic::{
    indexer::status::IndexerStatus,
    repository::checkpoint,
    rpc::RpcClient,
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::settings::HealthSettings;

const SHUTDOWN_TIMEOUT_SEC: u64 = 5;

pub struct HealthState {
    pub db: Arc<DatabaseConnection>,
    pub rpc: Arc<RpcClient>,
    pub status: Arc<IndexerStatus>,
    pub confirmation_depth: u64,
    pub max_blocks_behind: u64,
}

#[derive(Serialize)]
struct HealthReport {
    status: &'static str,
    checks: Checks,
    current_block: u64,
    last_indexed_block: u64,
    blocks_behind: u64,
    is_syncing: bool,
    tracked_wallets: u64,
}

#[derive(Serialize)]
struct Checks {
    chain_rpc: &'static str,
    database: &'static str,
    indexer: &'static str,
}

fn check(ok: bool) -> &'static str {
    if ok {
        "pass"
    } else {
        "fail"
    }
}

/// One RPC call and one store read feed every field of the report.
async fn snapshot(state: &HealthState) -> HealthReport {
    let current_block = match state.rpc.block_number().await {
        Ok(block) => Some(block),
        Err(err) => {
            tracing::warn!(error = %err, "health: chain rpc unreachable");
            None
        }
    };
    let last_indexed_block = match checkpoint::get(&state.db).await {
        Ok(row) => Some(row.last_indexed_block as u64),
        Err(err) => {
            tracing::warn!(error = ?err, "health: store unreachable");
            None
        }
    };

    let is_syncing = state.status.is_syncing();
    let blocks_behind = match (current_block, last_indexed_block) {
        (Some(current), Some(last)) => {
            current.saturating_sub(last + state.confirmation_depth)
        }
        _ => 0,
    };
    let rpc_ok = current_block.is_some();
    let db_ok = last_indexed_block.is_some();
    // running-ness gates readiness only; the health check cares about the
    // backlog unless a declared sync is in progress
    let indexer_ok = blocks_behind <= state.max_blocks_behind || is_syncing;

    HealthReport {
        status: if rpc_ok && db_ok && indexer_ok {
            "healthy"
        } else {
            "unhealthy"
        },
        checks: Checks {
            chain_rpc: check(rpc_ok),
            database: check(db_ok),
            indexer: check(indexer_ok),
        },
        current_block: current_block.unwrap_or(0),
        last_indexed_block: last_indexed_block.unwrap_or(0),
        blocks_behind,
        is_syncing,
        tracked_wallets: state.status.tracked_wallets(),
    }
}

#[get("/live")]
async fn live() -> impl Responder {
    HttpResponse::Ok().body("ok")
}

#[get("/ready")]
async fn ready(state: web::Data<HealthState>) -> impl Responder {
    let report = snapshot(&state).await;
    let ready = report.checks.chain_rpc == "pass"
        && report.checks.database == "pass"
        && state.status.is_running();
    if ready {
        HttpResponse::Ok().json(report)
    } else {
        HttpResponse::ServiceUnavailable().json(report)
    }
}

#[get("/health")]
async fn health(state: web::Data<HealthState>) -> impl Responder {
    let report = snapshot(&state).await;
    if report.status == "healthy" {
        HttpResponse::Ok().json(report)
    } else {
        HttpResponse::ServiceUnavailable().json(report)
    }
}

pub async fn run(
    state: HealthState,
    settings: HealthSettings,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let data = web::Data::new(state);
    tracing::info!(port = settings.port, "starting health server");
    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .service(live)
            .service(ready)
            .service(health)
    })
    .bind(("0.0.0.0", settings.port))?
    .shutdown_timeout(SHUTDOWN_TIMEOUT_SEC)
    .run();

    let handle = server.handle();
    tokio::spawn(async move {
        cancel.cancelled().await;
        tracing::info!("shutting down health server");
        handle.stop(true).await;
    });

    server.await?;
    Ok(())
}
