use alloy::primitives::{Address, B256};
use multisig_indexer_entity::{
    recoveries,
    recovery_approvals,
    recovery_configs,
    recovery_guardians,
    sea_orm_active_enums::RecoveryStatus,
};
use sea_orm::{
    sea_query::{Expr, OnConflict},
    ActiveValue::Set,
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};
use serde_json::json;

use super::normalize::{address_string, hash_string};

pub async fn upsert_config(
    db: &DatabaseConnection,
    wallet: Address,
    threshold: i32,
    recovery_period: i64,
    block: u64,
    tx: B256,
) -> Result<(), anyhow::Error> {
    let model = recovery_configs::ActiveModel {
        wallet_address: Set(address_string(wallet)),
        threshold: Set(threshold),
        recovery_period: Set(recovery_period),
        setup_at_block: Set(block as i64),
        setup_at_tx: Set(hash_string(tx)),
        ..Default::default()
    };
    recovery_configs::Entity::insert(model)
        .on_conflict(
            OnConflict::column(recovery_configs::Column::WalletAddress)
                .update_columns([
                    recovery_configs::Column::Threshold,
                    recovery_configs::Column::RecoveryPeriod,
                    recovery_configs::Column::SetupAtBlock,
                    recovery_configs::Column::SetupAtTx,
                ])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

pub async fn get_config(
    db: &DatabaseConnection,
    wallet: Address,
) -> Result<Option<recovery_configs::Model>, anyhow::Error> {
    Ok(recovery_configs::Entity::find()
        .filter(recovery_configs::Column::WalletAddress.eq(address_string(wallet)))
        .one(db)
        .await?)
}

/// A re-setup replaces the guardian set: every previous guardian row is
/// retired before the new set is written.
pub async fn deactivate_guardians(
    db: &DatabaseConnection,
    wallet: Address,
) -> Result<(), anyhow::Error> {
    recovery_guardians::Entity::update_many()
        .col_expr(recovery_guardians::Column::IsActive, Expr::value(false))
        .col_expr(
            recovery_guardians::Column::UpdatedAt,
            Expr::current_timestamp().into(),
        )
        .filter(recovery_guardians::Column::WalletAddress.eq(address_string(wallet)))
        .filter(recovery_guardians::Column::IsActive.eq(true))
        .exec(db)
        .await?;
    Ok(())
}

/// Guardian rows share their natural key with the setup event's block, so
/// a replayed setup re-activates the same rows instead of duplicating.
pub async fn insert_guardians(
    db: &DatabaseConnection,
    wallet: Address,
    guardians: &[Address],
    block: u64,
    tx: B256,
) -> Result<(), anyhow::Error> {
    if guardians.is_empty() {
        return Ok(());
    }
    let models = guardians.iter().map(|guardian| recovery_guardians::ActiveModel {
        wallet_address: Set(address_string(wallet)),
        guardian_address: Set(address_string(*guardian)),
        added_at_block: Set(block as i64),
        added_at_tx: Set(hash_string(tx)),
        is_active: Set(true),
        ..Default::default()
    });
    recovery_guardians::Entity::insert_many(models)
        .on_conflict(
            OnConflict::columns([
                recovery_guardians::Column::WalletAddress,
                recovery_guardians::Column::GuardianAddress,
                recovery_guardians::Column::AddedAtBlock,
            ])
            .update_columns([recovery_guardians::Column::IsActive])
            .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

/// Projects a `RecoveryInitiated` event. The conflict update leaves the
/// status and the trigger-owned approval counter alone.
#[allow(clippy::too_many_arguments)]
pub async fn upsert_recovery(
    db: &DatabaseConnection,
    wallet: Address,
    recovery_hash: B256,
    new_owners: &[Address],
    new_threshold: i32,
    initiator: Address,
    required_threshold: i32,
    execution_time: i64,
    block: u64,
    tx: B256,
) -> Result<(), anyhow::Error> {
    let owners_json = json!(new_owners
        .iter()
        .map(|owner| address_string(*owner))
        .collect::<Vec<_>>());
    let model = recoveries::ActiveModel {
        wallet_address: Set(address_string(wallet)),
        recovery_hash: Set(hash_string(recovery_hash)),
        new_owners: Set(owners_json),
        new_threshold: Set(new_threshold),
        initiated_by: Set(address_string(initiator)),
        approval_count: Set(0),
        required_threshold: Set(required_threshold),
        execution_time: Set(execution_time),
        status: Set(RecoveryStatus::Pending),
        initiated_at_block: Set(block as i64),
        initiated_at_tx: Set(hash_string(tx)),
        ..Default::default()
    };
    recoveries::Entity::insert(model)
        .on_conflict(
            OnConflict::columns([
                recoveries::Column::WalletAddress,
                recoveries::Column::RecoveryHash,
            ])
            .update_columns([
                recoveries::Column::NewOwners,
                recoveries::Column::NewThreshold,
                recoveries::Column::InitiatedBy,
                recoveries::Column::RequiredThreshold,
                recoveries::Column::ExecutionTime,
                recoveries::Column::InitiatedAtBlock,
                recoveries::Column::InitiatedAtTx,
            ])
            .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

pub async fn insert_approval(
    db: &DatabaseConnection,
    wallet: Address,
    recovery_hash: B256,
    guardian: Address,
    block: u64,
    tx: B256,
) -> Result<(), anyhow::Error> {
    let model = recovery_approvals::ActiveModel {
        wallet_address: Set(address_string(wallet)),
        recovery_hash: Set(hash_string(recovery_hash)),
        guardian_address: Set(address_string(guardian)),
        approved_at_block: Set(block as i64),
        approved_at_tx: Set(hash_string(tx)),
        is_active: Set(true),
        ..Default::default()
    };
    recovery_approvals::Entity::insert(model)
        .on_conflict(
            OnConflict::columns([
                recovery_approvals::Column::WalletAddress,
                recovery_approvals::Column::RecoveryHash,
                recovery_approvals::Column::GuardianAddress,
                recovery_approvals::Column::ApprovedAtBlock,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

pub async fn revoke_approval(
    db: &DatabaseConnection,
    wallet: Address,
    recovery_hash: B256,
    guardian: Address,
    block: u64,
    tx: B256,
) -> Result<(), anyhow::Error> {
    recovery_approvals::Entity::update_many()
        .col_expr(recovery_approvals::Column::IsActive, Expr::value(false))
        .col_expr(
            recovery_approvals::Column::RevokedAtBlock,
            Expr::value(block as i64),
        )
        .col_expr(
            recovery_approvals::Column::RevokedAtTx,
            Expr::value(hash_string(tx)),
        )
        .col_expr(
            recovery_approvals::Column::UpdatedAt,
            Expr::current_timestamp().into(),
        )
        .filter(recovery_approvals::Column::WalletAddress.eq(address_string(wallet)))
        .filter(recovery_approvals::Column::RecoveryHash.eq(hash_string(recovery_hash)))
        .filter(recovery_approvals::Column::GuardianAddress.eq(address_string(guardian)))
        .filter(recovery_approvals::Column::IsActive.eq(true))
        .exec(db)
        .await?;
    Ok(())
}

pub async fn mark_recovery_executed(
    db: &DatabaseConnection,
    wallet: Address,
    recovery_hash: B256,
    block: u64,
    tx: B256,
) -> Result<(), anyhow::Error> {
    recoveries::Entity::update_many()
        .col_expr(
            recoveries::Column::Status,
            Expr::value(RecoveryStatus::Executed),
        )
        .col_expr(recoveries::Column::ExecutedAtBlock, Expr::value(block as i64))
        .col_expr(recoveries::Column::ExecutedAtTx, Expr::value(hash_string(tx)))
        .col_expr(recoveries::Column::UpdatedAt, Expr::current_timestamp().into())
        .filter(recoveries::Column::WalletAddress.eq(address_string(wallet)))
        .filter(recoveries::Column::RecoveryHash.eq(hash_string(recovery_hash)))
        .exec(db)
        .await?;
    Ok(())
}

pub async fn mark_recovery_cancelled(
    db: &DatabaseConnection,
    wallet: Address,
    recovery_hash: B256,
    block: u64,
    tx: B256,
) -> Result<(), anyhow::Error> {
    recoveries::Entity::update_many()
        .col_expr(
            recoveries::Column::Status,
            Expr::value(RecoveryStatus::Cancelled),
        )
        .col_expr(
            recoveries::Column::CancelledAtBlock,
            Expr::value(block as i64),
        )
        .col_expr(
            recoveries::Column::CancelledAtTx,
            Expr::value(hash_string(tx)),
        )
        .col_expr(recoveries::Column::UpdatedAt, Expr::current_timestamp().into())
        .filter(recoveries::Column::WalletAddress.eq(address_string(wallet)))
        .filter(recoveries::Column::RecoveryHash.eq(hash_string(recovery_hash)))
        .exec(db)
        .await?;
    Ok(())
}
