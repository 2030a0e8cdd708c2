use alloy::primitives::{Address, B256, U256};
use multisig_indexer_entity::{
    module_transactions::{ActiveModel, Column, Entity},
    sea_orm_active_enums::ModuleType,
};
use sea_orm::{sea_query::OnConflict, ActiveValue::Set, DatabaseConnection, EntityTrait};

use super::normalize::{address_string, hash_string};

/// Append-only module execution history, keyed by the containing
/// transaction so re-delivered events do not duplicate entries.
#[allow(clippy::too_many_arguments)]
pub async fn insert(
    db: &DatabaseConnection,
    wallet: Address,
    module_type: ModuleType,
    module_address: Address,
    to: Address,
    value: U256,
    remaining_limit: Option<U256>,
    block: u64,
    tx: B256,
) -> Result<(), anyhow::Error> {
    let model = ActiveModel {
        wallet_address: Set(address_string(wallet)),
        module_type: Set(module_type),
        module_address: Set(address_string(module_address)),
        to_address: Set(address_string(to)),
        value: Set(value.to_string()),
        remaining_limit: Set(remaining_limit.map(|limit| limit.to_string())),
        executed_at_block: Set(block as i64),
        executed_at_tx: Set(hash_string(tx)),
        ..Default::default()
    };
    Entity::insert(model)
        .on_conflict(
            OnConflict::columns([
                Column::WalletAddress,
                Column::ModuleType,
                Column::ExecutedAtTx,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}
