use std::{cmp::max, collections::HashSet, str::FromStr, sync::Arc};

use alloy::primitives::Address;
use anyhow::Context;
use sea_orm::DatabaseConnection;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::{
    decoder::{self, EventKind},
    repository::{checkpoint, wallets},
    rpc::{LogFilter, RawLog, RpcClient},
};

mod handlers;
pub mod settings;
pub mod status;

use handlers::HandlerContext;
use settings::IndexerSettings;
use status::IndexerStatus;

/// Log-source priority; orders heterogeneous sources within one block.
/// Factory events must land first so that a wallet created in block N is
/// tracked before its own events in the same batch are applied.
const PRIORITY_FACTORY: u8 = 0;
const PRIORITY_WALLET: u8 = 1;
const PRIORITY_MODULE: u8 = 2;

pub struct Indexer {
    db: Arc<DatabaseConnection>,
    rpc: Arc<RpcClient>,
    settings: IndexerSettings,
    status: Arc<IndexerStatus>,
    tracked_wallets: HashSet<Address>,
}

impl Indexer {
    pub fn new(
        db: Arc<DatabaseConnection>,
        rpc: Arc<RpcClient>,
        settings: IndexerSettings,
        status: Arc<IndexerStatus>,
    ) -> Self {
        Self {
            db,
            rpc,
            settings,
            status,
            tracked_wallets: HashSet::new(),
        }
    }

    /// Runs the pipeline until cancellation: one catch-up backfill from the
    /// persisted checkpoint, then the poll loop.
    #[instrument(name = "multisig_indexer", skip_all)]
    pub async fn start(mut self, cancel: CancellationToken) -> anyhow::Result<()> {
        self.status.set_running(true);

        let checkpoint = checkpoint::get(&self.db).await?;
        self.reload_tracked_wallets().await?;

        let tip = self.rpc.block_number().await?;
        let start_block = max(
            checkpoint.last_indexed_block as u64 + 1,
            self.settings.start_block,
        );
        let safe_block = tip.saturating_sub(self.settings.confirmation_depth);
        tracing::info!(
            start_block,
            safe_block,
            tracked_wallets = self.tracked_wallets.len(),
            "indexer initialized"
        );

        if start_block <= safe_block {
            if let Err(err) = self.backfill(start_block, safe_block, &cancel).await {
                tracing::error!(error = ?err, "initial backfill failed, poll loop will retry the range");
            }
        }

        self.poll(cancel).await;
        Ok(())
    }

    /// One-shot bounded backfill for the standalone entrypoint.
    pub async fn run_backfill(
        mut self,
        from_block: u64,
        to_block: u64,
        cancel: CancellationToken,
    ) -> anyhow::Result<()> {
        self.status.set_running(true);
        self.reload_tracked_wallets().await?;
        let result = self.backfill(from_block, to_block, &cancel).await;
        self.status.set_running(false);
        result
    }

    async fn poll(&mut self, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = sleep(self.settings.poll_interval) => {}
            }
            if let Err(err) = self.poll_once(&cancel).await {
                tracing::error!(error = ?err, "indexing iteration failed, range will be retried on the next poll");
            }
        }
        tracing::info!("indexer stopped");
        self.status.set_running(false);
    }

    async fn poll_once(&mut self, cancel: &CancellationToken) -> anyhow::Result<()> {
        let checkpoint = max(
            checkpoint::get(&self.db).await?.last_indexed_block as u64,
            self.settings.start_block.saturating_sub(1),
        );
        let tip = self.rpc.block_number().await?;
        let safe_block = tip.saturating_sub(self.settings.confirmation_depth);
        if safe_block <= checkpoint {
            return Ok(());
        }

        let from_block = checkpoint + 1;
        if safe_block - checkpoint > self.settings.batch_size {
            // a gap this large means downtime or a store reset; the store is
            // the authoritative wallet set, so refresh before scanning
            tracing::info!(
                from_block,
                safe_block,
                "checkpoint is far behind the safe tip, backfilling"
            );
            self.reload_tracked_wallets().await?;
            self.backfill(from_block, safe_block, cancel).await
        } else {
            self.index_range(from_block, safe_block).await
        }
    }

    async fn backfill(
        &mut self,
        from_block: u64,
        to_block: u64,
        cancel: &CancellationToken,
    ) -> anyhow::Result<()> {
        checkpoint::set_syncing(&self.db, true).await?;
        self.status.set_syncing(true);

        let result = self.backfill_ranges(from_block, to_block, cancel).await;

        self.status.set_syncing(false);
        if let Err(err) = checkpoint::set_syncing(&self.db, false).await {
            tracing::error!(error = ?err, "failed to clear syncing flag");
        }
        result
    }

    async fn backfill_ranges(
        &mut self,
        from_block: u64,
        to_block: u64,
        cancel: &CancellationToken,
    ) -> anyhow::Result<()> {
        tracing::info!(from_block, to_block, "starting backfill");
        let batch_size = self.settings.batch_size.max(1);
        let mut start = from_block;
        while start <= to_block {
            if cancel.is_cancelled() {
                tracing::info!(next_block = start, "backfill interrupted by shutdown");
                break;
            }
            let end = (start + batch_size - 1).min(to_block);
            self.index_range(start, end).await?;
            start = end + 1;
        }
        tracing::info!(to_block, "backfill finished");
        Ok(())
    }

    /// The atomic unit of progress: fetch all three log sources for
    /// `[from_block, to_block]`, apply them in deterministic order, then
    /// advance the checkpoint. A failure leaves the checkpoint untouched so
    /// the same range is retried.
    #[instrument(skip(self))]
    async fn index_range(&mut self, from_block: u64, to_block: u64) -> anyhow::Result<()> {
        let logs = self.fetch_range(from_block, to_block).await?;
        let fetched = logs.len();

        let db = Arc::clone(&self.db);
        let rpc = Arc::clone(&self.rpc);
        let modules = self.settings.modules.clone();
        let ctx = HandlerContext {
            db: db.as_ref(),
            rpc: rpc.as_ref(),
            modules: &modules,
        };

        let mut applied = 0usize;
        for (_, log) in &logs {
            let Some(event) = decoder::decode_log(log) else {
                continue;
            };
            // a factory event extends the tracked set before its handler
            // runs, so later events in this same batch see the new wallet
            match &event.kind {
                EventKind::WalletCreated(ev) => {
                    self.tracked_wallets.insert(ev.wallet);
                }
                EventKind::WalletRegistered(ev) => {
                    self.tracked_wallets.insert(ev.wallet);
                }
                _ => {}
            }
            handlers::apply(&ctx, &event)
                .await
                .with_context(|| format!("handler for {} failed", event.kind.name()))?;
            applied += 1;
        }

        checkpoint::advance(&self.db, to_block).await?;
        self.status.set_last_indexed_block(to_block);
        self.status
            .set_tracked_wallets(self.tracked_wallets.len() as u64);

        if fetched > 0 {
            tracing::info!(fetched, applied, "indexed block range");
        } else {
            tracing::debug!("indexed empty block range");
        }
        Ok(())
    }

    /// Pulls factory, tracked-wallet and module logs and merges them under
    /// the total `(block, priority, log_index)` order.
    async fn fetch_range(
        &self,
        from_block: u64,
        to_block: u64,
    ) -> anyhow::Result<Vec<(u8, RawLog)>> {
        let mut merged: Vec<(u8, RawLog)> = Vec::new();

        let factory_filter = LogFilter::new(
            &[self.settings.factory_address],
            decoder::factory_topics(),
            from_block,
            to_block,
        );
        merged.extend(
            self.rpc
                .get_logs(&factory_filter)
                .await?
                .into_iter()
                .map(|log| (PRIORITY_FACTORY, log)),
        );

        if !self.tracked_wallets.is_empty() {
            let mut addresses: Vec<Address> = self.tracked_wallets.iter().copied().collect();
            addresses.sort();
            for chunk in addresses.chunks(self.settings.address_chunk_size.max(1)) {
                let filter = LogFilter::new(chunk, decoder::wallet_topics(), from_block, to_block);
                merged.extend(
                    self.rpc
                        .get_logs(&filter)
                        .await?
                        .into_iter()
                        .map(|log| (PRIORITY_WALLET, log)),
                );
            }
        }

        let module_addresses = self.settings.modules.addresses();
        if !module_addresses.is_empty() {
            let filter = LogFilter::new(
                &module_addresses,
                decoder::module_topics(),
                from_block,
                to_block,
            );
            merged.extend(
                self.rpc
                    .get_logs(&filter)
                    .await?
                    .into_iter()
                    .map(|log| (PRIORITY_MODULE, log)),
            );
        }

        sort_logs(&mut merged);
        Ok(merged)
    }

    /// The store owns the authoritative wallet set; memory is a cache that
    /// must be rebuilt on startup and after detected resets.
    async fn reload_tracked_wallets(&mut self) -> anyhow::Result<()> {
        let addresses = wallets::all_addresses(&self.db).await?;
        self.tracked_wallets = addresses
            .iter()
            .map(|address| Address::from_str(address))
            .collect::<Result<HashSet<_>, _>>()
            .context("stored wallet address is not parseable")?;
        self.status
            .set_tracked_wallets(self.tracked_wallets.len() as u64);
        tracing::info!(count = self.tracked_wallets.len(), "loaded tracked wallet set");
        Ok(())
    }
}

fn sort_logs(logs: &mut [(u8, RawLog)]) {
    logs.sort_by_key(|(priority, log)| (log.block_number(), *priority, log.log_index()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Bytes, B256, U64};

    fn log(block: u64, index: u64) -> RawLog {
        RawLog {
            address: Address::ZERO,
            topics: vec![],
            data: Bytes::new(),
            block_number: U64::from(block),
            transaction_hash: B256::ZERO,
            log_index: U64::from(index),
        }
    }

    #[test]
    fn factory_logs_sort_before_wallet_logs_in_the_same_block() {
        let mut logs = vec![
            (PRIORITY_WALLET, log(100, 1)),
            (PRIORITY_MODULE, log(100, 0)),
            (PRIORITY_FACTORY, log(100, 5)),
        ];
        sort_logs(&mut logs);
        let priorities: Vec<u8> = logs.iter().map(|(p, _)| *p).collect();
        assert_eq!(
            priorities,
            vec![PRIORITY_FACTORY, PRIORITY_WALLET, PRIORITY_MODULE]
        );
    }

    #[test]
    fn block_number_dominates_priority() {
        let mut logs = vec![
            (PRIORITY_FACTORY, log(101, 0)),
            (PRIORITY_MODULE, log(100, 3)),
        ];
        sort_logs(&mut logs);
        assert_eq!(logs[0].1.block_number(), 100);
        assert_eq!(logs[1].1.block_number(), 101);
    }

    #[test]
    fn log_index_breaks_ties_within_a_priority() {
        let mut logs = vec![
            (PRIORITY_WALLET, log(100, 7)),
            (PRIORITY_WALLET, log(100, 2)),
            (PRIORITY_WALLET, log(100, 4)),
        ];
        sort_logs(&mut logs);
        let indexes: Vec<u64> = logs.iter().map(|(_, l)| l.log_index()).collect();
        assert_eq!(indexes, vec![2, 4, 7]);
    }
}
