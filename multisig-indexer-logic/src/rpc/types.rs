use alloy::primitives::{Address, Bytes, B256, U64};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RpcError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("malformed rpc response: {0}")]
    MalformedResponse(String),
    #[error("block {0} not found or missing timestamp")]
    BlockNotFound(u64),
}

#[derive(Debug, Deserialize)]
pub(crate) struct JsonRpcResponse {
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<JsonRpcErrorObject>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JsonRpcErrorObject {
    pub code: i64,
    pub message: String,
}

/// A single entry of a `<ns>_getLogs` response.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RawLog {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
    pub block_number: U64,
    pub transaction_hash: B256,
    pub log_index: U64,
}

impl RawLog {
    pub fn block_number(&self) -> u64 {
        self.block_number.to()
    }

    pub fn log_index(&self) -> u64 {
        self.log_index.to()
    }
}

/// Wire shape of a log filter. Some providers filter addresses
/// case-sensitively, so addresses are lowercased at construction.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogFilter {
    pub address: Vec<String>,
    pub topics: Vec<Vec<B256>>,
    pub from_block: String,
    pub to_block: String,
}

impl LogFilter {
    pub fn new(addresses: &[Address], topic0: Vec<B256>, from_block: u64, to_block: u64) -> Self {
        Self {
            address: addresses.iter().map(|a| format!("{a:#x}")).collect(),
            topics: vec![topic0],
            from_block: format!("{from_block:#x}"),
            to_block: format!("{to_block:#x}"),
        }
    }
}
