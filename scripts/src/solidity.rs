//! Definitions of Solidity functions called during deployment

use alloy::sol;

sol! {
    /// The share-issuing vault
    interface IBeefyVault {
        function transferOwnership(address newOwner) external;
    }

    /// The chef strategy paired with a vault
    interface IStrategy {
        function setPendingRewardsFunctionName(string calldata _pendingRewardsFunctionName) external;
    }

    /// The gas subsidy registry of the subsidy network
    interface ISubsidyRegistry {
        function register(address target) external;
    }
}
