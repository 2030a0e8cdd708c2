use alloy::primitives::U256;
use anyhow::Context;
use chrono::Utc;
use multisig_indexer_entity::sea_orm_active_enums::ModuleType;
use sea_orm::DatabaseConnection;

use crate::{
    decoder::{
        abi::{IDailyLimitModule, IMultisigWallet, ISocialRecoveryModule, IWalletFactory},
        calldata::decode_proposal_calldata,
        decode_address_array, DecodedEvent, EventKind,
    },
    indexer::settings::ModuleSettings,
    repository::{
        confirmations, daily_limit, deposits, module_transactions, modules, normalize, owners,
        recovery, transactions, wallets, whitelist,
    },
    rpc::RpcClient,
};

pub(crate) struct HandlerContext<'a> {
    pub db: &'a DatabaseConnection,
    pub rpc: &'a RpcClient,
    pub modules: &'a ModuleSettings,
}

/// Projects one decoded event into the store. Duplicate ledger inserts are
/// absorbed inside the repository; any other failure aborts the caller's
/// block range.
pub(crate) async fn apply(ctx: &HandlerContext<'_>, event: &DecodedEvent) -> anyhow::Result<()> {
    match &event.kind {
        EventKind::WalletCreated(ev) => wallet_created(ctx, event, ev).await,
        EventKind::WalletRegistered(ev) => wallet_registered(ctx, event, ev).await,
        EventKind::TransactionProposed(ev) => transaction_proposed(ctx, event, ev).await,
        EventKind::TransactionApproved(ev) => {
            confirmations::insert(
                ctx.db,
                event.address,
                ev.txHash,
                ev.owner,
                event.block_number,
                event.transaction_hash,
            )
            .await
        }
        EventKind::ApprovalRevoked(ev) => {
            confirmations::revoke(
                ctx.db,
                event.address,
                ev.txHash,
                ev.owner,
                event.block_number,
                event.transaction_hash,
            )
            .await
        }
        EventKind::TransactionExecuted(ev) => {
            transactions::mark_executed(
                ctx.db,
                event.address,
                ev.txHash,
                event.block_number,
                event.transaction_hash,
            )
            .await
        }
        EventKind::TransactionCancelled(ev) => {
            transactions::mark_cancelled(
                ctx.db,
                event.address,
                ev.txHash,
                event.block_number,
                event.transaction_hash,
            )
            .await
        }
        EventKind::OwnerAdded(ev) => {
            let inserted = owners::insert(
                ctx.db,
                event.address,
                ev.owner,
                event.block_number,
                event.transaction_hash,
            )
            .await?;
            if inserted > 0 {
                wallets::adjust_owner_count(ctx.db, event.address, 1).await?;
            }
            Ok(())
        }
        EventKind::OwnerRemoved(ev) => {
            let removed = owners::deactivate(
                ctx.db,
                event.address,
                ev.owner,
                event.block_number,
                event.transaction_hash,
            )
            .await?;
            if removed > 0 {
                wallets::adjust_owner_count(ctx.db, event.address, -1).await?;
            }
            Ok(())
        }
        EventKind::ThresholdChanged(ev) => {
            wallets::update_threshold(ctx.db, event.address, to_i32(ev.threshold, "threshold")?)
                .await
        }
        EventKind::ModuleEnabled(ev) => {
            modules::enable(
                ctx.db,
                event.address,
                ev.module,
                event.block_number,
                event.transaction_hash,
            )
            .await
        }
        EventKind::ModuleDisabled(ev) => {
            modules::disable(
                ctx.db,
                event.address,
                ev.module,
                event.block_number,
                event.transaction_hash,
            )
            .await
        }
        EventKind::Received(ev) => {
            deposits::insert(
                ctx.db,
                event.address,
                ev.sender,
                ev.amount,
                event.block_number,
                event.transaction_hash,
            )
            .await
        }
        EventKind::RecoverySetup(ev) => recovery_setup(ctx, event, ev).await,
        EventKind::RecoveryInitiated(ev) => recovery_initiated(ctx, event, ev).await,
        EventKind::RecoveryApproved(ev) => {
            recovery::insert_approval(
                ctx.db,
                ev.wallet,
                ev.recoveryHash,
                ev.guardian,
                event.block_number,
                event.transaction_hash,
            )
            .await
        }
        EventKind::RecoveryApprovalRevoked(ev) => {
            recovery::revoke_approval(
                ctx.db,
                ev.wallet,
                ev.recoveryHash,
                ev.guardian,
                event.block_number,
                event.transaction_hash,
            )
            .await
        }
        EventKind::RecoveryExecuted(ev) => {
            recovery::mark_recovery_executed(
                ctx.db,
                ev.wallet,
                ev.recoveryHash,
                event.block_number,
                event.transaction_hash,
            )
            .await
        }
        EventKind::RecoveryCancelled(ev) => {
            recovery::mark_recovery_cancelled(
                ctx.db,
                ev.wallet,
                ev.recoveryHash,
                event.block_number,
                event.transaction_hash,
            )
            .await
        }
        EventKind::DailyLimitSet(ev) => {
            daily_limit::set_limit(
                ctx.db,
                ev.wallet,
                ev.dailyLimit,
                event.block_number,
                event.transaction_hash,
            )
            .await
        }
        EventKind::DailyLimitReset(ev) => {
            daily_limit::reset(ctx.db, ev.wallet, event.block_number, event.transaction_hash).await
        }
        EventKind::DailyLimitTransactionExecuted(ev) => {
            daily_limit_executed(ctx, event, ev).await
        }
        EventKind::AddressWhitelisted(ev) => {
            whitelist::add(
                ctx.db,
                ev.wallet,
                ev.whitelisted,
                ev.limit,
                event.block_number,
                event.transaction_hash,
            )
            .await
        }
        EventKind::AddressRemovedFromWhitelist(ev) => {
            whitelist::remove(
                ctx.db,
                ev.wallet,
                ev.whitelisted,
                event.block_number,
                event.transaction_hash,
            )
            .await
        }
        EventKind::WhitelistTransactionExecuted(ev) => {
            module_transactions::insert(
                ctx.db,
                ev.wallet,
                ModuleType::Whitelist,
                event.address,
                ev.to,
                ev.value,
                None,
                event.block_number,
                event.transaction_hash,
            )
            .await
        }
    }
}

async fn wallet_created(
    ctx: &HandlerContext<'_>,
    meta: &DecodedEvent,
    ev: &IWalletFactory::WalletCreated,
) -> anyhow::Result<()> {
    wallets::upsert(
        ctx.db,
        ev.wallet,
        to_i32(ev.threshold, "threshold")?,
        ev.owners.len() as i32,
        meta.block_number,
        meta.transaction_hash,
    )
    .await?;
    owners::insert_many(
        ctx.db,
        ev.wallet,
        &ev.owners,
        meta.block_number,
        meta.transaction_hash,
    )
    .await?;
    Ok(())
}

/// A registered wallet's event carries no owner set, so the contract is
/// read back over RPC and the returned ABI array decoded by hand.
async fn wallet_registered(
    ctx: &HandlerContext<'_>,
    meta: &DecodedEvent,
    ev: &IWalletFactory::WalletRegistered,
) -> anyhow::Result<()> {
    use alloy::sol_types::SolCall;

    let raw_owners = ctx
        .rpc
        .call(ev.wallet, &IMultisigWallet::getOwnersCall::SELECTOR)
        .await
        .context("getOwners() read-back failed")?;
    let wallet_owners = decode_address_array(&raw_owners)
        .with_context(|| format!("getOwners() returned a bad address array for {}", ev.wallet))?;

    let raw_threshold = ctx
        .rpc
        .call(ev.wallet, &IMultisigWallet::thresholdCall::SELECTOR)
        .await
        .context("threshold() read-back failed")?;
    let threshold = parse_u256_result(&raw_threshold, "threshold()")?;

    wallets::upsert(
        ctx.db,
        ev.wallet,
        to_i32(threshold, "threshold")?,
        wallet_owners.len() as i32,
        meta.block_number,
        meta.transaction_hash,
    )
    .await?;
    owners::insert_many(
        ctx.db,
        ev.wallet,
        &wallet_owners,
        meta.block_number,
        meta.transaction_hash,
    )
    .await?;
    Ok(())
}

async fn transaction_proposed(
    ctx: &HandlerContext<'_>,
    meta: &DecodedEvent,
    ev: &IMultisigWallet::TransactionProposed,
) -> anyhow::Result<()> {
    let call = decode_proposal_calldata(ev.to, &ev.data, ctx.modules);
    transactions::upsert_proposed(
        ctx.db,
        meta.address,
        ev.txHash,
        ev.to,
        ev.value,
        &ev.data,
        call.transaction_type,
        call.params,
        ev.proposer,
        meta.block_number,
        meta.transaction_hash,
    )
    .await
}

async fn recovery_setup(
    ctx: &HandlerContext<'_>,
    meta: &DecodedEvent,
    ev: &ISocialRecoveryModule::RecoverySetup,
) -> anyhow::Result<()> {
    recovery::upsert_config(
        ctx.db,
        ev.wallet,
        to_i32(ev.threshold, "recovery threshold")?,
        to_i64(ev.recoveryPeriod, "recovery period")?,
        meta.block_number,
        meta.transaction_hash,
    )
    .await?;
    recovery::deactivate_guardians(ctx.db, ev.wallet).await?;
    recovery::insert_guardians(
        ctx.db,
        ev.wallet,
        &ev.guardians,
        meta.block_number,
        meta.transaction_hash,
    )
    .await?;
    Ok(())
}

async fn recovery_initiated(
    ctx: &HandlerContext<'_>,
    meta: &DecodedEvent,
    ev: &ISocialRecoveryModule::RecoveryInitiated,
) -> anyhow::Result<()> {
    let config = recovery::get_config(ctx.db, ev.wallet).await?;
    let (required_threshold, recovery_period) = match &config {
        Some(config) => (config.threshold, config.recovery_period),
        None => {
            tracing::warn!(
                wallet = %normalize::address_string(ev.wallet),
                "recovery initiated for a wallet without a recovery config"
            );
            (0, 0)
        }
    };

    let execution_time = match ctx.rpc.block_timestamp(meta.block_number).await {
        Ok(timestamp) => timestamp as i64 + recovery_period,
        Err(err) => {
            tracing::warn!(
                block = meta.block_number,
                error = %err,
                "block timestamp unavailable, deriving recovery execution time from wall clock"
            );
            Utc::now().timestamp() + recovery_period
        }
    };

    recovery::upsert_recovery(
        ctx.db,
        ev.wallet,
        ev.recoveryHash,
        &ev.newOwners,
        to_i32(ev.newThreshold, "recovery new threshold")?,
        ev.initiator,
        required_threshold,
        execution_time,
        meta.block_number,
        meta.transaction_hash,
    )
    .await
}

async fn daily_limit_executed(
    ctx: &HandlerContext<'_>,
    meta: &DecodedEvent,
    ev: &IDailyLimitModule::TransactionExecuted,
) -> anyhow::Result<()> {
    // the wallet emits a TransactionExecuted of its own; this one is only
    // meaningful coming from the configured daily-limit module
    if ctx.modules.daily_limit != Some(meta.address) {
        tracing::debug!(
            emitter = %normalize::address_string(meta.address),
            "daily-limit execution from an unconfigured emitter, skipping"
        );
        return Ok(());
    }

    module_transactions::insert(
        ctx.db,
        ev.wallet,
        ModuleType::DailyLimit,
        meta.address,
        ev.to,
        ev.value,
        Some(ev.remainingLimit),
        meta.block_number,
        meta.transaction_hash,
    )
    .await?;
    daily_limit::record_spend(
        ctx.db,
        ev.wallet,
        ev.remainingLimit,
        meta.block_number,
        meta.transaction_hash,
    )
    .await?;
    Ok(())
}

fn to_i32(value: U256, what: &'static str) -> anyhow::Result<i32> {
    u32::try_from(value)
        .map(|v| v as i32)
        .map_err(|_| anyhow::anyhow!("{what} out of range: {value}"))
}

fn to_i64(value: U256, what: &'static str) -> anyhow::Result<i64> {
    u64::try_from(value)
        .map(|v| v as i64)
        .map_err(|_| anyhow::anyhow!("{what} out of range: {value}"))
}

fn parse_u256_result(raw: &str, what: &'static str) -> anyhow::Result<U256> {
    let hex = raw.strip_prefix("0x").unwrap_or(raw);
    if hex.is_empty() {
        anyhow::bail!("{what} call returned empty data");
    }
    U256::from_str_radix(hex, 16).with_context(|| format!("{what} call returned non-hex data"))
}
