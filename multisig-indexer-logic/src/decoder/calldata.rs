use alloy::{
    primitives::{Address, Bytes},
    sol_types::SolCall,
};
use multisig_indexer_entity::sea_orm_active_enums::TransactionType;
use serde_json::{json, Value};

use crate::{
    decoder::abi::{IDailyLimitModule, IMultisigWallet, ISocialRecoveryModule, IWhitelistModule},
    indexer::settings::ModuleSettings,
};

/// Classification of a proposed transaction's calldata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposedCall {
    pub transaction_type: TransactionType,
    pub function: String,
    pub params: Value,
}

/// Classifies the calldata of a `TransactionProposed` event.
///
/// Empty data is a plain value transfer. A known selector yields the
/// table's transaction type; if its arguments fail to decode the type is
/// preserved and the raw data kept. An unknown selector addressed to a
/// configured module is module configuration; anything else is an
/// external call.
pub fn decode_proposal_calldata(
    to: Address,
    data: &Bytes,
    modules: &ModuleSettings,
) -> ProposedCall {
    if data.is_empty() {
        return ProposedCall {
            transaction_type: TransactionType::Transfer,
            function: "transfer".to_string(),
            params: json!({}),
        };
    }

    if let Some(call) = decode_known_call(data) {
        return call;
    }

    let raw = json!({ "rawData": data.to_string() });
    if modules.contains(to) {
        ProposedCall {
            transaction_type: TransactionType::ModuleConfig,
            function: "unknown".to_string(),
            params: raw,
        }
    } else {
        ProposedCall {
            transaction_type: TransactionType::ExternalCall,
            function: "unknown".to_string(),
            params: raw,
        }
    }
}

fn decode_known_call(data: &Bytes) -> Option<ProposedCall> {
    let entry: (TransactionType, &'static str, Result<Value, alloy::sol_types::Error>) =
        if data.starts_with(&IMultisigWallet::addOwnerCall::SELECTOR) {
            (
                TransactionType::WalletAdmin,
                "addOwner",
                IMultisigWallet::addOwnerCall::abi_decode(data)
                    .map(|call| json!({ "owner": format!("{:#x}", call.owner) })),
            )
        } else if data.starts_with(&IMultisigWallet::removeOwnerCall::SELECTOR) {
            (
                TransactionType::WalletAdmin,
                "removeOwner",
                IMultisigWallet::removeOwnerCall::abi_decode(data)
                    .map(|call| json!({ "owner": format!("{:#x}", call.owner) })),
            )
        } else if data.starts_with(&IMultisigWallet::changeThresholdCall::SELECTOR) {
            (
                TransactionType::WalletAdmin,
                "changeThreshold",
                IMultisigWallet::changeThresholdCall::abi_decode(data)
                    .map(|call| json!({ "threshold": call.threshold.to_string() })),
            )
        } else if data.starts_with(&IMultisigWallet::enableModuleCall::SELECTOR) {
            (
                TransactionType::ModuleConfig,
                "enableModule",
                IMultisigWallet::enableModuleCall::abi_decode(data)
                    .map(|call| json!({ "module": format!("{:#x}", call.module) })),
            )
        } else if data.starts_with(&IMultisigWallet::disableModuleCall::SELECTOR) {
            (
                TransactionType::ModuleConfig,
                "disableModule",
                IMultisigWallet::disableModuleCall::abi_decode(data)
                    .map(|call| json!({ "module": format!("{:#x}", call.module) })),
            )
        } else if data.starts_with(&IDailyLimitModule::setDailyLimitCall::SELECTOR) {
            (
                TransactionType::ModuleConfig,
                "setDailyLimit",
                IDailyLimitModule::setDailyLimitCall::abi_decode(data)
                    .map(|call| json!({ "dailyLimit": call.dailyLimit.to_string() })),
            )
        } else if data.starts_with(&IWhitelistModule::addToWhitelistCall::SELECTOR) {
            (
                TransactionType::ModuleConfig,
                "addToWhitelist",
                IWhitelistModule::addToWhitelistCall::abi_decode(data).map(|call| {
                    json!({
                        "whitelisted": format!("{:#x}", call.whitelisted),
                        "limit": call.limit.to_string(),
                    })
                }),
            )
        } else if data.starts_with(&IWhitelistModule::removeFromWhitelistCall::SELECTOR) {
            (
                TransactionType::ModuleConfig,
                "removeFromWhitelist",
                IWhitelistModule::removeFromWhitelistCall::abi_decode(data)
                    .map(|call| json!({ "whitelisted": format!("{:#x}", call.whitelisted) })),
            )
        } else if data.starts_with(&ISocialRecoveryModule::setupRecoveryCall::SELECTOR) {
            (
                TransactionType::RecoverySetup,
                "setupRecovery",
                ISocialRecoveryModule::setupRecoveryCall::abi_decode(data).map(|call| {
                    json!({
                        "guardians": call
                            .guardians
                            .iter()
                            .map(|g| format!("{g:#x}"))
                            .collect::<Vec<_>>(),
                        "threshold": call.threshold.to_string(),
                        "recoveryPeriod": call.recoveryPeriod.to_string(),
                    })
                }),
            )
        } else {
            return None;
        };

    let (transaction_type, function, decoded) = entry;
    Some(match decoded {
        Ok(params) => ProposedCall {
            transaction_type,
            function: function.to_string(),
            params,
        },
        Err(err) => {
            tracing::debug!(function, error = %err, "failed to decode known calldata arguments");
            ProposedCall {
                transaction_type,
                function: "unknown".to_string(),
                params: json!({ "rawData": data.to_string() }),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, U256};

    fn modules() -> ModuleSettings {
        ModuleSettings {
            daily_limit: Some(address!("1111111111111111111111111111111111111111")),
            whitelist: Some(address!("2222222222222222222222222222222222222222")),
            social_recovery: Some(address!("3333333333333333333333333333333333333333")),
        }
    }

    #[test]
    fn empty_data_is_a_transfer() {
        let call = decode_proposal_calldata(
            address!("dddddddddddddddddddddddddddddddddddddddd"),
            &Bytes::new(),
            &modules(),
        );
        assert_eq!(call.transaction_type, TransactionType::Transfer);
        assert_eq!(call.function, "transfer");
    }

    #[test]
    fn add_owner_is_wallet_admin() {
        let owner = address!("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb");
        let data = Bytes::from(IMultisigWallet::addOwnerCall { owner }.abi_encode());
        let call = decode_proposal_calldata(
            address!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"),
            &data,
            &modules(),
        );
        assert_eq!(call.transaction_type, TransactionType::WalletAdmin);
        assert_eq!(call.function, "addOwner");
        assert_eq!(call.params["owner"], format!("{owner:#x}"));
    }

    #[test]
    fn setup_recovery_decodes_guardian_list() {
        let guardians = vec![
            address!("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb"),
            address!("cccccccccccccccccccccccccccccccccccccccc"),
        ];
        let data = Bytes::from(
            ISocialRecoveryModule::setupRecoveryCall {
                guardians: guardians.clone(),
                threshold: U256::from(2),
                recoveryPeriod: U256::from(3600),
            }
            .abi_encode(),
        );
        let call = decode_proposal_calldata(
            address!("3333333333333333333333333333333333333333"),
            &data,
            &modules(),
        );
        assert_eq!(call.transaction_type, TransactionType::RecoverySetup);
        assert_eq!(call.params["recoveryPeriod"], "3600");
        assert_eq!(call.params["guardians"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn known_selector_with_garbage_arguments_keeps_type() {
        let mut data = IMultisigWallet::changeThresholdCall {
            threshold: U256::from(2),
        }
        .abi_encode();
        data.truncate(7); // selector survives, arguments do not
        let data = Bytes::from(data);
        let call = decode_proposal_calldata(
            address!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"),
            &data,
            &modules(),
        );
        assert_eq!(call.transaction_type, TransactionType::WalletAdmin);
        assert_eq!(call.function, "unknown");
        assert_eq!(call.params["rawData"], data.to_string());
    }

    #[test]
    fn unknown_selector_to_module_is_module_config() {
        let data = Bytes::from(vec![0xde, 0xad, 0xbe, 0xef, 0x01]);
        let call = decode_proposal_calldata(
            address!("1111111111111111111111111111111111111111"),
            &data,
            &modules(),
        );
        assert_eq!(call.transaction_type, TransactionType::ModuleConfig);
        assert_eq!(call.params["rawData"], data.to_string());
    }

    #[test]
    fn unknown_selector_elsewhere_is_external_call() {
        let data = Bytes::from(vec![0xde, 0xad, 0xbe, 0xef, 0x01]);
        let call = decode_proposal_calldata(
            address!("dddddddddddddddddddddddddddddddddddddddd"),
            &data,
            &modules(),
        );
        assert_eq!(call.transaction_type, TransactionType::ExternalCall);
    }
}
