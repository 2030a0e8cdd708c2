use alloy::sol;

sol! {
    #[derive(Debug)]
    interface IWalletFactory {
        event WalletCreated(
            address indexed wallet,
            address[] owners,
            uint256 threshold,
            address creator,
            bytes32 salt
        );
        event WalletRegistered(address indexed wallet, address registrar);
    }

    #[derive(Debug)]
    interface IMultisigWallet {
        event TransactionProposed(
            bytes32 indexed txHash,
            address indexed proposer,
            address to,
            uint256 value,
            bytes data
        );
        event TransactionApproved(bytes32 indexed txHash, address indexed owner);
        event ApprovalRevoked(bytes32 indexed txHash, address indexed owner);
        event TransactionExecuted(bytes32 indexed txHash, address executor);
        event TransactionCancelled(bytes32 indexed txHash, address canceller);
        event OwnerAdded(address owner);
        event OwnerRemoved(address owner);
        event ThresholdChanged(uint256 threshold);
        event ModuleEnabled(address module);
        event ModuleDisabled(address module);
        event Received(address sender, uint256 amount);

        function addOwner(address owner) external;
        function removeOwner(address owner) external;
        function changeThreshold(uint256 threshold) external;
        function enableModule(address module) external;
        function disableModule(address module) external;
        function getOwners() external view returns (address[] memory);
        function threshold() external view returns (uint256);
    }

    #[derive(Debug)]
    interface ISocialRecoveryModule {
        event RecoverySetup(
            address indexed wallet,
            address[] guardians,
            uint256 threshold,
            uint256 recoveryPeriod
        );
        event RecoveryInitiated(
            address indexed wallet,
            bytes32 indexed recoveryHash,
            address[] newOwners,
            uint256 newThreshold,
            address initiator
        );
        event RecoveryApproved(address indexed wallet, bytes32 indexed recoveryHash, address guardian);
        event RecoveryApprovalRevoked(address indexed wallet, bytes32 indexed recoveryHash, address guardian);
        event RecoveryExecuted(address indexed wallet, bytes32 indexed recoveryHash);
        event RecoveryCancelled(address indexed wallet, bytes32 indexed recoveryHash);

        function setupRecovery(address[] memory guardians, uint256 threshold, uint256 recoveryPeriod) external;
    }

    #[derive(Debug)]
    interface IDailyLimitModule {
        event DailyLimitSet(address indexed wallet, uint256 dailyLimit);
        event DailyLimitReset(address indexed wallet);
        event TransactionExecuted(address indexed wallet, address to, uint256 value, uint256 remainingLimit);

        function setDailyLimit(uint256 dailyLimit) external;
    }

    #[derive(Debug)]
    interface IWhitelistModule {
        event AddressWhitelisted(address indexed wallet, address whitelisted, uint256 limit);
        event AddressRemovedFromWhitelist(address indexed wallet, address whitelisted);
        event WhitelistTransactionExecuted(address indexed wallet, address to, uint256 value);

        function addToWhitelist(address whitelisted, uint256 limit) external;
        function removeFromWhitelist(address whitelisted) external;
    }
}
