pub mod checkpoint;
pub mod confirmations;
pub mod daily_limit;
pub mod deposits;
pub mod module_transactions;
pub mod modules;
pub mod normalize;
pub mod owners;
pub mod recovery;
pub mod transactions;
pub mod wallets;
pub mod whitelist;
