pub mod decoder;
pub mod indexer;
pub mod repository;
pub mod rpc;
