use alloy::primitives::{Address, Bytes, B256, U256};
use multisig_indexer_entity::{
    sea_orm_active_enums::{TransactionStatus, TransactionType},
    transactions::{ActiveModel, Column, Entity},
};
use sea_orm::{
    sea_query::{Expr, OnConflict},
    ActiveValue::Set,
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};

use super::normalize::{address_string, hash_string};

/// Projects a `TransactionProposed` event. Replays must not reset the
/// status or the trigger-owned confirmation counter, so the conflict
/// update touches only the proposal fields.
#[allow(clippy::too_many_arguments)]
pub async fn upsert_proposed(
    db: &DatabaseConnection,
    wallet: Address,
    tx_hash: B256,
    to: Address,
    value: U256,
    data: &Bytes,
    transaction_type: TransactionType,
    decoded_params: serde_json::Value,
    proposer: Address,
    block: u64,
    tx: B256,
) -> Result<(), anyhow::Error> {
    let model = ActiveModel {
        wallet_address: Set(address_string(wallet)),
        tx_hash: Set(hash_string(tx_hash)),
        to_address: Set(address_string(to)),
        value: Set(value.to_string()),
        data: Set(data.to_string()),
        transaction_type: Set(transaction_type),
        decoded_params: Set(Some(decoded_params)),
        status: Set(TransactionStatus::Pending),
        confirmation_count: Set(0),
        submitted_by: Set(address_string(proposer)),
        submitted_at_block: Set(block as i64),
        submitted_at_tx: Set(hash_string(tx)),
        ..Default::default()
    };
    Entity::insert(model)
        .on_conflict(
            OnConflict::columns([Column::WalletAddress, Column::TxHash])
                .update_columns([
                    Column::ToAddress,
                    Column::Value,
                    Column::Data,
                    Column::TransactionType,
                    Column::DecodedParams,
                    Column::SubmittedBy,
                    Column::SubmittedAtBlock,
                    Column::SubmittedAtTx,
                ])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

pub async fn mark_executed(
    db: &DatabaseConnection,
    wallet: Address,
    tx_hash: B256,
    block: u64,
    tx: B256,
) -> Result<(), anyhow::Error> {
    Entity::update_many()
        .col_expr(
            Column::Status,
            Expr::value(TransactionStatus::Executed),
        )
        .col_expr(Column::ExecutedAtBlock, Expr::value(block as i64))
        .col_expr(Column::ExecutedAtTx, Expr::value(hash_string(tx)))
        .col_expr(Column::UpdatedAt, Expr::current_timestamp().into())
        .filter(Column::WalletAddress.eq(address_string(wallet)))
        .filter(Column::TxHash.eq(hash_string(tx_hash)))
        .exec(db)
        .await?;
    Ok(())
}

pub async fn mark_cancelled(
    db: &DatabaseConnection,
    wallet: Address,
    tx_hash: B256,
    block: u64,
    tx: B256,
) -> Result<(), anyhow::Error> {
    Entity::update_many()
        .col_expr(
            Column::Status,
            Expr::value(TransactionStatus::Cancelled),
        )
        .col_expr(Column::CancelledAtBlock, Expr::value(block as i64))
        .col_expr(Column::CancelledAtTx, Expr::value(hash_string(tx)))
        .col_expr(Column::UpdatedAt, Expr::current_timestamp().into())
        .filter(Column::WalletAddress.eq(address_string(wallet)))
        .filter(Column::TxHash.eq(hash_string(tx_hash)))
        .exec(db)
        .await?;
    Ok(())
}
