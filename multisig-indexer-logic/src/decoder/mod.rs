use alloy::{
    primitives::{Address, LogData, B256},
    sol_types::SolEvent,
};

use crate::rpc::RawLog;

pub mod abi;
pub mod address_array;
pub mod calldata;

pub use abi::{
    IDailyLimitModule, IMultisigWallet, ISocialRecoveryModule, IWalletFactory, IWhitelistModule,
};
pub use address_array::{decode_address_array, AddressArrayError};
pub use calldata::{decode_proposal_calldata, ProposedCall};

/// A chain log decoded against the static signature table, with the log
/// coordinates the projection handlers need.
#[derive(Debug, Clone)]
pub struct DecodedEvent {
    pub kind: EventKind,
    /// The emitting contract: the wallet itself for wallet events, the
    /// factory or module contract otherwise.
    pub address: Address,
    pub block_number: u64,
    pub transaction_hash: B256,
    pub log_index: u64,
}

#[derive(Debug, Clone)]
pub enum EventKind {
    WalletCreated(IWalletFactory::WalletCreated),
    WalletRegistered(IWalletFactory::WalletRegistered),
    TransactionProposed(IMultisigWallet::TransactionProposed),
    TransactionApproved(IMultisigWallet::TransactionApproved),
    ApprovalRevoked(IMultisigWallet::ApprovalRevoked),
    TransactionExecuted(IMultisigWallet::TransactionExecuted),
    TransactionCancelled(IMultisigWallet::TransactionCancelled),
    OwnerAdded(IMultisigWallet::OwnerAdded),
    OwnerRemoved(IMultisigWallet::OwnerRemoved),
    ThresholdChanged(IMultisigWallet::ThresholdChanged),
    ModuleEnabled(IMultisigWallet::ModuleEnabled),
    ModuleDisabled(IMultisigWallet::ModuleDisabled),
    Received(IMultisigWallet::Received),
    RecoverySetup(ISocialRecoveryModule::RecoverySetup),
    RecoveryInitiated(ISocialRecoveryModule::RecoveryInitiated),
    RecoveryApproved(ISocialRecoveryModule::RecoveryApproved),
    RecoveryApprovalRevoked(ISocialRecoveryModule::RecoveryApprovalRevoked),
    RecoveryExecuted(ISocialRecoveryModule::RecoveryExecuted),
    RecoveryCancelled(ISocialRecoveryModule::RecoveryCancelled),
    DailyLimitSet(IDailyLimitModule::DailyLimitSet),
    DailyLimitReset(IDailyLimitModule::DailyLimitReset),
    DailyLimitTransactionExecuted(IDailyLimitModule::TransactionExecuted),
    AddressWhitelisted(IWhitelistModule::AddressWhitelisted),
    AddressRemovedFromWhitelist(IWhitelistModule::AddressRemovedFromWhitelist),
    WhitelistTransactionExecuted(IWhitelistModule::WhitelistTransactionExecuted),
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::WalletCreated(_) => "WalletCreated",
            EventKind::WalletRegistered(_) => "WalletRegistered",
            EventKind::TransactionProposed(_) => "TransactionProposed",
            EventKind::TransactionApproved(_) => "TransactionApproved",
            EventKind::ApprovalRevoked(_) => "ApprovalRevoked",
            EventKind::TransactionExecuted(_) => "TransactionExecuted",
            EventKind::TransactionCancelled(_) => "TransactionCancelled",
            EventKind::OwnerAdded(_) => "OwnerAdded",
            EventKind::OwnerRemoved(_) => "OwnerRemoved",
            EventKind::ThresholdChanged(_) => "ThresholdChanged",
            EventKind::ModuleEnabled(_) => "ModuleEnabled",
            EventKind::ModuleDisabled(_) => "ModuleDisabled",
            EventKind::Received(_) => "Received",
            EventKind::RecoverySetup(_) => "RecoverySetup",
            EventKind::RecoveryInitiated(_) => "RecoveryInitiated",
            EventKind::RecoveryApproved(_) => "RecoveryApproved",
            EventKind::RecoveryApprovalRevoked(_) => "RecoveryApprovalRevoked",
            EventKind::RecoveryExecuted(_) => "RecoveryExecuted",
            EventKind::RecoveryCancelled(_) => "RecoveryCancelled",
            EventKind::DailyLimitSet(_) => "DailyLimitSet",
            EventKind::DailyLimitReset(_) => "DailyLimitReset",
            EventKind::DailyLimitTransactionExecuted(_) => "DailyLimitTransactionExecuted",
            EventKind::AddressWhitelisted(_) => "AddressWhitelisted",
            EventKind::AddressRemovedFromWhitelist(_) => "AddressRemovedFromWhitelist",
            EventKind::WhitelistTransactionExecuted(_) => "WhitelistTransactionExecuted",
        }
    }
}

/// topic0 filter for the factory log source.
pub fn factory_topics() -> Vec<B256> {
    vec![
        IWalletFactory::WalletCreated::SIGNATURE_HASH,
        IWalletFactory::WalletRegistered::SIGNATURE_HASH,
    ]
}

/// topic0 filter for the tracked-wallet log source.
pub fn wallet_topics() -> Vec<B256> {
    vec![
        IMultisigWallet::TransactionProposed::SIGNATURE_HASH,
        IMultisigWallet::TransactionApproved::SIGNATURE_HASH,
        IMultisigWallet::ApprovalRevoked::SIGNATURE_HASH,
        IMultisigWallet::TransactionExecuted::SIGNATURE_HASH,
        IMultisigWallet::TransactionCancelled::SIGNATURE_HASH,
        IMultisigWallet::OwnerAdded::SIGNATURE_HASH,
        IMultisigWallet::OwnerRemoved::SIGNATURE_HASH,
        IMultisigWallet::ThresholdChanged::SIGNATURE_HASH,
        IMultisigWallet::ModuleEnabled::SIGNATURE_HASH,
        IMultisigWallet::ModuleDisabled::SIGNATURE_HASH,
        IMultisigWallet::Received::SIGNATURE_HASH,
    ]
}

/// topic0 filter for the configured module contracts.
pub fn module_topics() -> Vec<B256> {
    vec![
        ISocialRecoveryModule::RecoverySetup::SIGNATURE_HASH,
        ISocialRecoveryModule::RecoveryInitiated::SIGNATURE_HASH,
        ISocialRecoveryModule::RecoveryApproved::SIGNATURE_HASH,
        ISocialRecoveryModule::RecoveryApprovalRevoked::SIGNATURE_HASH,
        ISocialRecoveryModule::RecoveryExecuted::SIGNATURE_HASH,
        ISocialRecoveryModule::RecoveryCancelled::SIGNATURE_HASH,
        IDailyLimitModule::DailyLimitSet::SIGNATURE_HASH,
        IDailyLimitModule::DailyLimitReset::SIGNATURE_HASH,
        IDailyLimitModule::TransactionExecuted::SIGNATURE_HASH,
        IWhitelistModule::AddressWhitelisted::SIGNATURE_HASH,
        IWhitelistModule::AddressRemovedFromWhitelist::SIGNATURE_HASH,
        IWhitelistModule::WhitelistTransactionExecuted::SIGNATURE_HASH,
    ]
}

/// Decodes a raw log against the signature table. Unknown topic0 and
/// undecodable payloads both yield `None`; neither halts a batch.
pub fn decode_log(log: &RawLog) -> Option<DecodedEvent> {
    let topic0 = *log.topics.first()?;

    let kind = if topic0 == IWalletFactory::WalletCreated::SIGNATURE_HASH {
        EventKind::WalletCreated(parse(log)?)
    } else if topic0 == IWalletFactory::WalletRegistered::SIGNATURE_HASH {
        EventKind::WalletRegistered(parse(log)?)
    } else if topic0 == IMultisigWallet::TransactionProposed::SIGNATURE_HASH {
        EventKind::TransactionProposed(parse(log)?)
    } else if topic0 == IMultisigWallet::TransactionApproved::SIGNATURE_HASH {
        EventKind::TransactionApproved(parse(log)?)
    } else if topic0 == IMultisigWallet::ApprovalRevoked::SIGNATURE_HASH {
        EventKind::ApprovalRevoked(parse(log)?)
    } else if topic0 == IMultisigWallet::TransactionExecuted::SIGNATURE_HASH {
        EventKind::TransactionExecuted(parse(log)?)
    } else if topic0 == IMultisigWallet::TransactionCancelled::SIGNATURE_HASH {
        EventKind::TransactionCancelled(parse(log)?)
    } else if topic0 == IMultisigWallet::OwnerAdded::SIGNATURE_HASH {
        EventKind::OwnerAdded(parse(log)?)
    } else if topic0 == IMultisigWallet::OwnerRemoved::SIGNATURE_HASH {
        EventKind::OwnerRemoved(parse(log)?)
    } else if topic0 == IMultisigWallet::ThresholdChanged::SIGNATURE_HASH {
        EventKind::ThresholdChanged(parse(log)?)
    } else if topic0 == IMultisigWallet::ModuleEnabled::SIGNATURE_HASH {
        EventKind::ModuleEnabled(parse(log)?)
    } else if topic0 == IMultisigWallet::ModuleDisabled::SIGNATURE_HASH {
        EventKind::ModuleDisabled(parse(log)?)
    } else if topic0 == IMultisigWallet::Received::SIGNATURE_HASH {
        EventKind::Received(parse(log)?)
    } else if topic0 == ISocialRecoveryModule::RecoverySetup::SIGNATURE_HASH {
        EventKind::RecoverySetup(parse(log)?)
    } else if topic0 == ISocialRecoveryModule::RecoveryInitiated::SIGNATURE_HASH {
        EventKind::RecoveryInitiated(parse(log)?)
    } else if topic0 == ISocialRecoveryModule::RecoveryApproved::SIGNATURE_HASH {
        EventKind::RecoveryApproved(parse(log)?)
    } else if topic0 == ISocialRecoveryModule::RecoveryApprovalRevoked::SIGNATURE_HASH {
        EventKind::RecoveryApprovalRevoked(parse(log)?)
    } else if topic0 == ISocialRecoveryModule::RecoveryExecuted::SIGNATURE_HASH {
        EventKind::RecoveryExecuted(parse(log)?)
    } else if topic0 == ISocialRecoveryModule::RecoveryCancelled::SIGNATURE_HASH {
        EventKind::RecoveryCancelled(parse(log)?)
    } else if topic0 == IDailyLimitModule::DailyLimitSet::SIGNATURE_HASH {
        EventKind::DailyLimitSet(parse(log)?)
    } else if topic0 == IDailyLimitModule::DailyLimitReset::SIGNATURE_HASH {
        EventKind::DailyLimitReset(parse(log)?)
    } else if topic0 == IDailyLimitModule::TransactionExecuted::SIGNATURE_HASH {
        EventKind::DailyLimitTransactionExecuted(parse(log)?)
    } else if topic0 == IWhitelistModule::AddressWhitelisted::SIGNATURE_HASH {
        EventKind::AddressWhitelisted(parse(log)?)
    } else if topic0 == IWhitelistModule::AddressRemovedFromWhitelist::SIGNATURE_HASH {
        EventKind::AddressRemovedFromWhitelist(parse(log)?)
    } else if topic0 == IWhitelistModule::WhitelistTransactionExecuted::SIGNATURE_HASH {
        EventKind::WhitelistTransactionExecuted(parse(log)?)
    } else {
        tracing::debug!(%topic0, address = %log.address, "unknown event signature, skipping log");
        return None;
    };

    Some(DecodedEvent {
        kind,
        address: log.address,
        block_number: log.block_number(),
        transaction_hash: log.transaction_hash,
        log_index: log.log_index(),
    })
}

fn parse<E: SolEvent>(log: &RawLog) -> Option<E> {
    let data = LogData::new_unchecked(log.topics.clone(), log.data.clone());
    match E::decode_log_data(&data) {
        Ok(event) => Some(event),
        Err(err) => {
            tracing::debug!(
                signature = E::SIGNATURE,
                tx_hash = %log.transaction_hash,
                log_index = log.log_index(),
                error = %err,
                "failed to decode log payload, skipping"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, Bytes, U256, U64};

    fn raw_log(address: Address, data: LogData, block: u64, index: u64) -> RawLog {
        RawLog {
            address,
            topics: data.topics().to_vec(),
            data: data.data.clone(),
            block_number: U64::from(block),
            transaction_hash: B256::repeat_byte(0x11),
            log_index: U64::from(index),
        }
    }

    #[test]
    fn decodes_wallet_created() {
        let event = IWalletFactory::WalletCreated {
            wallet: address!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"),
            owners: vec![
                address!("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb"),
                address!("cccccccccccccccccccccccccccccccccccccccc"),
            ],
            threshold: U256::from(2),
            creator: address!("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb"),
            salt: B256::ZERO,
        };
        let log = raw_log(
            address!("ffffffffffffffffffffffffffffffffffffffff"),
            event.encode_log_data(),
            100,
            0,
        );

        let decoded = decode_log(&log).expect("known event must decode");
        assert_eq!(decoded.block_number, 100);
        match decoded.kind {
            EventKind::WalletCreated(ev) => {
                assert_eq!(ev.wallet, event.wallet);
                assert_eq!(ev.owners, event.owners);
                assert_eq!(ev.threshold, U256::from(2));
            }
            other => panic!("unexpected kind {}", other.name()),
        }
    }

    #[test]
    fn unknown_topic_is_skipped() {
        let log = RawLog {
            address: address!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"),
            topics: vec![B256::repeat_byte(0xde)],
            data: Bytes::new(),
            block_number: U64::from(1),
            transaction_hash: B256::ZERO,
            log_index: U64::from(0),
        };
        assert!(decode_log(&log).is_none());
    }

    #[test]
    fn truncated_payload_is_skipped() {
        let event = IMultisigWallet::ThresholdChanged {
            threshold: U256::from(3),
        };
        let data = event.encode_log_data();
        let log = RawLog {
            address: address!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"),
            topics: data.topics().to_vec(),
            data: Bytes::new(),
            block_number: U64::from(1),
            transaction_hash: B256::ZERO,
            log_index: U64::from(0),
        };
        assert!(decode_log(&log).is_none());
    }

    #[test]
    fn executed_signatures_are_distinct_per_emitter() {
        // the wallet and the daily-limit module both emit an event named
        // TransactionExecuted; the parameter lists differ, so topic0 differs
        assert_ne!(
            IMultisigWallet::TransactionExecuted::SIGNATURE_HASH,
            IDailyLimitModule::TransactionExecuted::SIGNATURE_HASH,
        );

        let module_event = IDailyLimitModule::TransactionExecuted {
            wallet: address!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"),
            to: address!("dddddddddddddddddddddddddddddddddddddddd"),
            value: U256::from(5),
            remainingLimit: U256::from(95),
        };
        let log = raw_log(
            address!("1111111111111111111111111111111111111111"),
            module_event.encode_log_data(),
            7,
            3,
        );
        let decoded = decode_log(&log).expect("module event must decode");
        assert!(matches!(
            decoded.kind,
            EventKind::DailyLimitTransactionExecuted(_)
        ));
    }
}
