use alloy::primitives::{Address, B256};
use multisig_indexer_entity::confirmations::{ActiveModel, Column, Entity};
use sea_orm::{
    sea_query::{Expr, OnConflict},
    ActiveValue::Set,
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};

use super::normalize::{address_string, hash_string};

/// Ledger insert; the store trigger recounts the transaction's active
/// confirmations on every write here.
pub async fn insert(
    db: &DatabaseConnection,
    wallet: Address,
    tx_hash: B256,
    owner: Address,
    block: u64,
    tx: B256,
) -> Result<(), anyhow::Error> {
    let model = ActiveModel {
        wallet_address: Set(address_string(wallet)),
        tx_hash: Set(hash_string(tx_hash)),
        owner_address: Set(address_string(owner)),
        confirmed_at_block: Set(block as i64),
        confirmed_at_tx: Set(hash_string(tx)),
        is_active: Set(true),
        ..Default::default()
    };
    Entity::insert(model)
        .on_conflict(
            OnConflict::columns([
                Column::WalletAddress,
                Column::TxHash,
                Column::OwnerAddress,
                Column::ConfirmedAtBlock,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

pub async fn revoke(
    db: &DatabaseConnection,
    wallet: Address,
    tx_hash: B256,
    owner: Address,
    block: u64,
    tx: B256,
) -> Result<(), anyhow::Error> {
    Entity::update_many()
        .col_expr(Column::IsActive, Expr::value(false))
        .col_expr(Column::RevokedAtBlock, Expr::value(block as i64))
        .col_expr(Column::RevokedAtTx, Expr::value(hash_string(tx)))
        .col_expr(Column::UpdatedAt, Expr::current_timestamp().into())
        .filter(Column::WalletAddress.eq(address_string(wallet)))
        .filter(Column::TxHash.eq(hash_string(tx_hash)))
        .filter(Column::OwnerAddress.eq(address_string(owner)))
        .filter(Column::IsActive.eq(true))
        .exec(db)
        .await?;
    Ok(())
}
