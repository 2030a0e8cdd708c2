use alloy::primitives::{Address, B256, U256};
use multisig_indexer_entity::deposits::{ActiveModel, Column, Entity};
use sea_orm::{sea_query::OnConflict, ActiveValue::Set, DatabaseConnection, EntityTrait};

use super::normalize::{address_string, hash_string};

/// A deposit is keyed by its containing transaction; re-delivered events
/// are no-ops.
pub async fn insert(
    db: &DatabaseConnection,
    wallet: Address,
    sender: Address,
    amount: U256,
    block: u64,
    tx: B256,
) -> Result<(), anyhow::Error> {
    let model = ActiveModel {
        wallet_address: Set(address_string(wallet)),
        sender_address: Set(address_string(sender)),
        amount: Set(amount.to_string()),
        deposited_at_block: Set(block as i64),
        deposited_at_tx: Set(hash_string(tx)),
        ..Default::default()
    };
    Entity::insert(model)
        .on_conflict(
            OnConflict::columns([Column::WalletAddress, Column::DepositedAtTx])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}
