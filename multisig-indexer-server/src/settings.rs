use blockscout_service_launcher::{
    database::DatabaseSettings,
    launcher::ConfigSettings,
    tracing::{JaegerSettings, TracingSettings},
};
use multisig_indexer_logic::indexer::settings::IndexerSettings;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub tracing: TracingSettings,
    #[serde(default)]
    pub jaeger: JaegerSettings,

    pub database: DatabaseSettings,

    /// Logical schema per network, so one database can host e.g. a testnet
    /// and a mainnet projection side by side.
    #[serde(default = "default_database_schema")]
    pub database_schema: String,

    pub indexer: IndexerSettings,

    #[serde(default)]
    pub health: HealthSettings,

    #[serde(default)]
    pub backfill: BackfillSettings,
}

impl ConfigSettings for Settings {
    const SERVICE_NAME: &'static str = "MULTISIG_INDEXER";

    fn validate(&self) -> anyhow::Result<()> {
        if self.indexer.factory_address == self.indexer.wallet_implementation {
            anyhow::bail!("factory_address and wallet_implementation must differ");
        }
        if self.indexer.batch_size == 0 {
            anyhow::bail!("batch_size must be positive");
        }
        if self.indexer.address_chunk_size == 0 || self.indexer.address_chunk_size > 100 {
            anyhow::bail!("address_chunk_size must be within 1..=100");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct HealthSettings {
    pub enabled: bool,
    pub port: u16,
    pub max_blocks_behind: u64,
}

impl Default for HealthSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            port: 3000,
            max_blocks_behind: 100,
        }
    }
}

/// Range for the standalone backfill binary; unused by the long-running
/// service.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct BackfillSettings {
    pub from_block: u64,
    pub to_block: Option<u64>,
}

fn default_database_schema() -> String {
    "public".to_string()
}
