use alloy::primitives::{Address, B256};
use multisig_indexer_entity::wallets::{ActiveModel, Column, Entity};
use sea_orm::{
    sea_query::{Expr, OnConflict},
    ActiveValue::Set,
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
};

use super::normalize::{address_string, hash_string, parse_address};

/// The store caps result sets, so the full wallet listing pages through.
const PAGE_SIZE: u64 = 1000;

pub async fn upsert(
    db: &DatabaseConnection,
    wallet: Address,
    threshold: i32,
    owner_count: i32,
    block: u64,
    tx: B256,
) -> Result<(), anyhow::Error> {
    let model = ActiveModel {
        address: Set(address_string(wallet)),
        threshold: Set(threshold),
        owner_count: Set(owner_count),
        created_at_block: Set(block as i64),
        created_at_tx: Set(hash_string(tx)),
        ..Default::default()
    };
    Entity::insert(model)
        .on_conflict(
            OnConflict::column(Column::Address)
                .update_columns([Column::Threshold, Column::OwnerCount])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

pub async fn update_threshold(
    db: &DatabaseConnection,
    wallet: Address,
    threshold: i32,
) -> Result<(), anyhow::Error> {
    Entity::update_many()
        .col_expr(Column::Threshold, Expr::value(threshold))
        .col_expr(Column::UpdatedAt, Expr::current_timestamp().into())
        .filter(Column::Address.eq(address_string(wallet)))
        .exec(db)
        .await?;
    Ok(())
}

/// Server-side counter adjustment; owner-add/remove handlers must not
/// read-modify-write the count.
pub async fn adjust_owner_count(
    db: &DatabaseConnection,
    wallet: Address,
    delta: i32,
) -> Result<(), anyhow::Error> {
    Entity::update_many()
        .col_expr(Column::OwnerCount, Expr::col(Column::OwnerCount).add(delta))
        .col_expr(Column::UpdatedAt, Expr::current_timestamp().into())
        .filter(Column::Address.eq(address_string(wallet)))
        .exec(db)
        .await?;
    Ok(())
}

/// Every wallet address ever projected, paged at the store's query cap.
/// Rows come back as strings, so each one is re-validated before it can
/// seed the tracked set.
pub async fn all_addresses(db: &DatabaseConnection) -> Result<Vec<String>, anyhow::Error> {
    let mut paginator = Entity::find().paginate(db, PAGE_SIZE);
    let mut addresses = Vec::new();
    while let Some(batch) = paginator.fetch_and_next().await? {
        for wallet in batch {
            addresses.push(parse_address("wallet_address", &wallet.address)?);
        }
    }
    Ok(addresses)
}
