use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{SolCall, SolValue};

use intent_types::{
    IIntentPlugin, ISafeProtocolManager, ISafeProtocolRegistry, ISampleAccount, SwapATO,
    UserIntent, ATO,
};

use crate::types::{AtoParams, Constructor, SwapBounds};

/// The ATO submitted by the plain execution flow: operation 1, chain id 1, empty byte fields.
pub fn sample_ato(sender: Address) -> ATO {
    build_ato(&AtoParams::default(), sender)
}

pub fn build_ato(params: &AtoParams, sender: Address) -> ATO {
    ATO {
        operation: params.operation,
        fieldsToOptimize: utf8_bytes(&params.fields_to_optimize),
        fieldsToOptimizeSchema: utf8_bytes(&params.fields_to_optimize_schema),
        chainId: params.chain_id,
        payload: utf8_bytes(&params.payload),
        payloadSchema: utf8_bytes(&params.payload_schema),
        sender,
    }
}

pub fn build_swap_ato(bounds: &SwapBounds, sender: Address) -> SwapATO {
    SwapATO {
        operation: bounds.operation,
        minTokenIn: bounds.min_token_in,
        maxTokenIn: bounds.max_token_in,
        minTokenOut: bounds.min_token_out,
        maxTokenOut: bounds.max_token_out,
        tokenIn: bounds.token_in,
        tokenOut: bounds.token_out,
        sourceChainId: bounds.source_chain_id,
        destinationChainId: bounds.destination_chain_id,
        sender,
    }
}

/// Wrap ATOs into a user intent. Order of `atos` is preserved.
pub fn build_user_intent(sender: Address, atos: Vec<ATO>, nonce: U256) -> UserIntent {
    UserIntent { sender, atos, nonce }
}

pub fn encode_execute_ato(manager: Address, safe: Address, ato: ATO) -> Bytes {
    IIntentPlugin::executeATOCall { manager, safe, ato }
        .abi_encode()
        .into()
}

pub fn encode_execute_swap_ato(manager: Address, safe: Address, ato: SwapATO) -> Bytes {
    IIntentPlugin::executeSwapATOCall { manager, safe, ato }
        .abi_encode()
        .into()
}

pub fn encode_execute_user_intent(manager: Address, safe: Address, intent: UserIntent) -> Bytes {
    IIntentPlugin::executeUserIntentCall {
        manager,
        safe,
        intent,
    }
    .abi_encode()
    .into()
}

pub fn encode_add_module(module: Address, module_types: u8) -> Bytes {
    ISafeProtocolRegistry::addModuleCall {
        module,
        moduleTypes: module_types,
    }
    .abi_encode()
    .into()
}

pub fn encode_enable_plugin(plugin: Address, permissions: u8) -> Bytes {
    ISafeProtocolManager::enablePluginCall {
        plugin,
        permissions,
    }
    .abi_encode()
    .into()
}

/// Account calldata that forwards `inner` to `to` with `value` attached.
pub fn wrap_exec_transaction(to: Address, value: U256, inner: Bytes) -> Bytes {
    ISampleAccount::execTransactionCall {
        to,
        value,
        data: inner,
    }
    .abi_encode()
    .into()
}

/// ABI-encoded constructor parameters (empty for a no-arg constructor).
pub fn encode_constructor(ctor: &Constructor) -> Vec<u8> {
    match *ctor {
        Constructor::Empty => Vec::new(),
        Constructor::Registry { initial_owner } => (initial_owner,).abi_encode_params(),
        Constructor::Manager {
            initial_owner,
            registry,
        } => (initial_owner, registry).abi_encode_params(),
        Constructor::Plugin { trusted_origin } => (trusted_origin,).abi_encode_params(),
    }
}

/// Contract creation payload: creation bytecode followed by the constructor parameters.
pub fn deploy_code(bytecode: &[u8], ctor: &Constructor) -> Bytes {
    let args = encode_constructor(ctor);
    let mut buf = Vec::with_capacity(bytecode.len() + args.len());
    buf.extend_from_slice(bytecode);
    buf.extend_from_slice(&args);
    buf.into()
}

fn utf8_bytes(s: &str) -> Bytes {
    Bytes::copy_from_slice(s.as_bytes())
}
