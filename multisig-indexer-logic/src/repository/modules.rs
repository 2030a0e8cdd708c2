use alloy::primitives::{Address, B256};
use multisig_indexer_entity::modules::{ActiveModel, Column, Entity};
use sea_orm::{
    sea_query::{Expr, OnConflict},
    ActiveValue::Set,
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};

use super::normalize::{address_string, hash_string};

/// Re-enabling a module updates the existing `(wallet, module)` row.
pub async fn enable(
    db: &DatabaseConnection,
    wallet: Address,
    module: Address,
    block: u64,
    tx: B256,
) -> Result<(), anyhow::Error> {
    let model = ActiveModel {
        wallet_address: Set(address_string(wallet)),
        module_address: Set(address_string(module)),
        enabled_at_block: Set(block as i64),
        enabled_at_tx: Set(hash_string(tx)),
        disabled_at_block: Set(None),
        disabled_at_tx: Set(None),
        is_active: Set(true),
        ..Default::default()
    };
    Entity::insert(model)
        .on_conflict(
            OnConflict::columns([Column::WalletAddress, Column::ModuleAddress])
                .update_columns([
                    Column::EnabledAtBlock,
                    Column::EnabledAtTx,
                    Column::DisabledAtBlock,
                    Column::DisabledAtTx,
                    Column::IsActive,
                ])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

pub async fn disable(
    db: &DatabaseConnection,
    wallet: Address,
    module: Address,
    block: u64,
    tx: B256,
) -> Result<(), anyhow::Error> {
    Entity::update_many()
        .col_expr(Column::IsActive, Expr::value(false))
        .col_expr(Column::DisabledAtBlock, Expr::value(block as i64))
        .col_expr(Column::DisabledAtTx, Expr::value(hash_string(tx)))
        .col_expr(Column::UpdatedAt, Expr::current_timestamp().into())
        .filter(Column::WalletAddress.eq(address_string(wallet)))
        .filter(Column::ModuleAddress.eq(address_string(module)))
        .exec(db)
        .await?;
    Ok(())
}
