use alloy::primitives::{Address, B256};
use multisig_indexer_entity::wallet_owners::{ActiveModel, Column, Entity};
use sea_orm::{
    sea_query::{Expr, OnConflict},
    ActiveValue::Set,
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};

use super::normalize::{address_string, hash_string};

/// Inserts the owner ledger rows, skipping entries that already exist.
/// Returns the number of rows actually inserted.
pub async fn insert_many(
    db: &DatabaseConnection,
    wallet: Address,
    owners: &[Address],
    block: u64,
    tx: B256,
) -> Result<u64, anyhow::Error> {
    if owners.is_empty() {
        return Ok(0);
    }
    let models = owners.iter().map(|owner| ActiveModel {
        wallet_address: Set(address_string(wallet)),
        owner_address: Set(address_string(*owner)),
        added_at_block: Set(block as i64),
        added_at_tx: Set(hash_string(tx)),
        is_active: Set(true),
        ..Default::default()
    });
    let inserted = Entity::insert_many(models)
        .on_conflict(
            OnConflict::columns([
                Column::WalletAddress,
                Column::OwnerAddress,
                Column::AddedAtBlock,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(inserted)
}

pub async fn insert(
    db: &DatabaseConnection,
    wallet: Address,
    owner: Address,
    block: u64,
    tx: B256,
) -> Result<u64, anyhow::Error> {
    insert_many(db, wallet, &[owner], block, tx).await
}

/// Marks the active row for `(wallet, owner)` inactive. Returns the number
/// of rows touched, zero when the removal was already applied.
pub async fn deactivate(
    db: &DatabaseConnection,
    wallet: Address,
    owner: Address,
    block: u64,
    tx: B256,
) -> Result<u64, anyhow::Error> {
    let result = Entity::update_many()
        .col_expr(Column::IsActive, Expr::value(false))
        .col_expr(Column::RemovedAtBlock, Expr::value(block as i64))
        .col_expr(Column::RemovedAtTx, Expr::value(hash_string(tx)))
        .col_expr(Column::UpdatedAt, Expr::current_timestamp().into())
        .filter(Column::WalletAddress.eq(address_string(wallet)))
        .filter(Column::OwnerAddress.eq(address_string(owner)))
        .filter(Column::IsActive.eq(true))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}
