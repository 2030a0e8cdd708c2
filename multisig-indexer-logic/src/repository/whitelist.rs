use alloy::primitives::{Address, B256, U256};
use multisig_indexer_entity::whitelist_entries::{ActiveModel, Column, Entity};
use sea_orm::{
    sea_query::{Expr, OnConflict},
    ActiveValue::Set,
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};

use super::normalize::{address_string, hash_string};

pub async fn add(
    db: &DatabaseConnection,
    wallet: Address,
    whitelisted: Address,
    limit: U256,
    block: u64,
    tx: B256,
) -> Result<(), anyhow::Error> {
    let model = ActiveModel {
        wallet_address: Set(address_string(wallet)),
        whitelisted_address: Set(address_string(whitelisted)),
        limit: Set(limit.to_string()),
        added_at_block: Set(block as i64),
        added_at_tx: Set(hash_string(tx)),
        is_active: Set(true),
        ..Default::default()
    };
    Entity::insert(model)
        .on_conflict(
            OnConflict::columns([
                Column::WalletAddress,
                Column::WhitelistedAddress,
                Column::AddedAtBlock,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

pub async fn remove(
    db: &DatabaseConnection,
    wallet: Address,
    whitelisted: Address,
    block: u64,
    tx: B256,
) -> Result<(), anyhow::Error> {
    Entity::update_many()
        .col_expr(Column::IsActive, Expr::value(false))
        .col_expr(Column::RemovedAtBlock, Expr::value(block as i64))
        .col_expr(Column::RemovedAtTx, Expr::value(hash_string(tx)))
        .col_expr(Column::UpdatedAt, Expr::current_timestamp().into())
        .filter(Column::WalletAddress.eq(address_string(wallet)))
        .filter(Column::WhitelistedAddress.eq(address_string(whitelisted)))
        .filter(Column::IsActive.eq(true))
        .exec(db)
        .await?;
    Ok(())
}
