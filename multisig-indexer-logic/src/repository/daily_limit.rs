use std::str::FromStr;

use alloy::primitives::{Address, B256, U256};
use anyhow::Context;
use chrono::Utc;
use multisig_indexer_entity::daily_limit_states::{ActiveModel, Column, Entity};
use sea_orm::{
    sea_query::{Expr, OnConflict},
    ActiveValue::Set,
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};

use super::normalize::{address_string, hash_string};

pub async fn set_limit(
    db: &DatabaseConnection,
    wallet: Address,
    daily_limit: U256,
    block: u64,
    tx: B256,
) -> Result<(), anyhow::Error> {
    let model = ActiveModel {
        wallet_address: Set(address_string(wallet)),
        daily_limit: Set(daily_limit.to_string()),
        spent_today: Set("0".to_string()),
        last_reset_day: Set(Utc::now().date_naive()),
        updated_at_block: Set(block as i64),
        updated_at_tx: Set(hash_string(tx)),
        ..Default::default()
    };
    Entity::insert(model)
        .on_conflict(
            OnConflict::column(Column::WalletAddress)
                .update_columns([
                    Column::DailyLimit,
                    Column::SpentToday,
                    Column::LastResetDay,
                    Column::UpdatedAtBlock,
                    Column::UpdatedAtTx,
                ])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

pub async fn reset(
    db: &DatabaseConnection,
    wallet: Address,
    block: u64,
    tx: B256,
) -> Result<(), anyhow::Error> {
    Entity::update_many()
        .col_expr(Column::SpentToday, Expr::value("0"))
        .col_expr(Column::LastResetDay, Expr::value(Utc::now().date_naive()))
        .col_expr(Column::UpdatedAtBlock, Expr::value(block as i64))
        .col_expr(Column::UpdatedAtTx, Expr::value(hash_string(tx)))
        .col_expr(Column::UpdatedAt, Expr::current_timestamp().into())
        .filter(Column::WalletAddress.eq(address_string(wallet)))
        .exec(db)
        .await?;
    Ok(())
}

/// Derives `spent_today` from the chain-reported remaining limit. When the
/// limit was raised mid-day the remainder can exceed the stored limit;
/// the subtraction saturates so `0 <= spent_today <= daily_limit` holds.
pub async fn record_spend(
    db: &DatabaseConnection,
    wallet: Address,
    remaining_limit: U256,
    block: u64,
    tx: B256,
) -> Result<(), anyhow::Error> {
    let Some(state) = Entity::find()
        .filter(Column::WalletAddress.eq(address_string(wallet)))
        .one(db)
        .await?
    else {
        tracing::warn!(
            wallet = %address_string(wallet),
            "daily limit spend for a wallet with no limit state, skipping"
        );
        return Ok(());
    };

    let daily_limit = U256::from_str(&state.daily_limit)
        .with_context(|| format!("stored daily_limit is not numeric: {}", state.daily_limit))?;
    let spent = daily_limit.saturating_sub(remaining_limit);

    Entity::update_many()
        .col_expr(Column::SpentToday, Expr::value(spent.to_string()))
        .col_expr(Column::UpdatedAtBlock, Expr::value(block as i64))
        .col_expr(Column::UpdatedAtTx, Expr::value(hash_string(tx)))
        .col_expr(Column::UpdatedAt, Expr::current_timestamp().into())
        .filter(Column::WalletAddress.eq(address_string(wallet)))
        .exec(db)
        .await?;
    Ok(())
}
