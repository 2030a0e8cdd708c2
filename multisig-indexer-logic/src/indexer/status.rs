use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Pipeline liveness snapshot. The pipeline thread is the only writer;
/// the health probe reads it without touching the data path.
#[derive(Debug, Default)]
pub struct IndexerStatus {
    last_indexed_block: AtomicU64,
    tracked_wallets: AtomicU64,
    is_syncing: AtomicBool,
    is_running: AtomicBool,
}

impl IndexerStatus {
    pub fn last_indexed_block(&self) -> u64 {
        self.last_indexed_block.load(Ordering::SeqCst)
    }

    pub fn set_last_indexed_block(&self, block: u64) {
        self.last_indexed_block.store(block, Ordering::SeqCst);
    }

    pub fn tracked_wallets(&self) -> u64 {
        self.tracked_wallets.load(Ordering::SeqCst)
    }

    pub fn set_tracked_wallets(&self, count: u64) {
        self.tracked_wallets.store(count, Ordering::SeqCst);
    }

    pub fn is_syncing(&self) -> bool {
        self.is_syncing.load(Ordering::SeqCst)
    }

    pub fn set_syncing(&self, syncing: bool) {
        self.is_syncing.store(syncing, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::SeqCst)
    }

    pub fn set_running(&self, running: bool) {
        self.is_running.store(running, Ordering::SeqCst);
    }
}
