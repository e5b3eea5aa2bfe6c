//! Solidity ABI definitions for the contracts the runner drives.
//!
//! Only the call sites are described. Contract behaviour lives on-chain.

use alloy_sol_types::sol;

sol! {
    #![sol(all_derives)]

    /// Authorized Transaction Object with generic payload/schema pairs.
    struct ATO {
        uint256 operation;
        bytes fieldsToOptimize;
        bytes fieldsToOptimizeSchema;
        uint256 chainId;
        bytes payload;
        bytes payloadSchema;
        address sender;
    }

    /// ATO variant carrying explicit token-swap bounds.
    struct SwapATO {
        uint256 operation;
        uint256 minTokenIn;
        uint256 maxTokenIn;
        uint256 minTokenOut;
        uint256 maxTokenOut;
        address tokenIn;
        address tokenOut;
        uint256 sourceChainId;
        uint256 destinationChainId;
        address sender;
    }

    /// Fee-paying wrapper around an ordered list of ATOs.
    struct UserIntent {
        address sender;
        ATO[] atos;
        uint256 nonce;
    }

    interface IIntentPlugin {
        function executeATO(address manager, address safe, ATO calldata ato) external;
        function executeSwapATO(address manager, address safe, SwapATO calldata ato) external;
        function executeUserIntent(address manager, address safe, UserIntent calldata intent) external payable;
    }

    interface ISafeProtocolRegistry {
        function addModule(address module, uint8 moduleTypes) external;
    }

    interface ISafeProtocolManager {
        function enablePlugin(address plugin, uint8 permissions) external;
    }

    /// Minimal account surface: forwards a call on behalf of the account.
    interface ISampleAccount {
        function execTransaction(address to, uint256 value, bytes calldata data) external returns (bool success);
    }
}
