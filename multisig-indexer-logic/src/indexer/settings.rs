use std::time::Duration;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use crate::rpc::RpcSettings;

#[serde_as]
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct IndexerSettings {
    pub rpc: RpcSettings,

    pub factory_address: Address,

    pub wallet_implementation: Address,

    #[serde(default)]
    pub modules: ModuleSettings,

    #[serde(default = "default_start_block")]
    pub start_block: u64,

    #[serde(default = "default_batch_size")]
    pub batch_size: u64,

    #[serde(default = "default_poll_interval")]
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    pub poll_interval: Duration,

    #[serde(default = "default_confirmation_depth")]
    pub confirmation_depth: u64,

    #[serde(default = "default_address_chunk_size")]
    pub address_chunk_size: usize,
}

/// Module contract deployments to index; an unset module simply is not
/// watched.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ModuleSettings {
    pub daily_limit: Option<Address>,
    pub whitelist: Option<Address>,
    pub social_recovery: Option<Address>,
}

impl ModuleSettings {
    pub fn addresses(&self) -> Vec<Address> {
        [self.daily_limit, self.whitelist, self.social_recovery]
            .into_iter()
            .flatten()
            .collect()
    }

    pub fn contains(&self, address: Address) -> bool {
        self.addresses().contains(&address)
    }
}

fn default_start_block() -> u64 {
    0
}

fn default_batch_size() -> u64 {
    1000
}

fn default_poll_interval() -> Duration {
    Duration::from_millis(5000)
}

fn default_confirmation_depth() -> u64 {
    2
}

/// Providers cap the address list of a single log filter.
fn default_address_chunk_size() -> usize {
    100
}

impl Default for IndexerSettings {
    fn default() -> Self {
        Self {
            rpc: RpcSettings::default(),
            factory_address: Address::ZERO,
            wallet_implementation: Address::ZERO,
            modules: ModuleSettings::default(),
            start_block: default_start_block(),
            batch_size: default_batch_size(),
            poll_interval: default_poll_interval(),
            confirmation_depth: default_confirmation_depth(),
            address_chunk_size: default_address_chunk_size(),
        }
    }
}
