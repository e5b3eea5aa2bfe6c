use std::{path::PathBuf, time::Duration};

use alloy_primitives::{Address, U256};
use clap::{Args, Parser, Subcommand, ValueEnum};
use intent_types::constants::{contracts, PLUGIN_PERMISSION_EXECUTE_CALL};

use crate::config::{parse_address, parse_ether, parse_u256};

/// Deploy the intent contracts, wire them to a sample account and execute one intent.
///
/// Each run is single-shot: fresh contracts every time, then the record of what was deployed
/// is merged into a deployments JSON.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(flatten)]
    pub chain: ChainArgs,

    #[command(flatten)]
    pub run: RunArgs,

    #[command(flatten)]
    pub log: LogArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug)]
pub struct ChainArgs {
    /// JSON-RPC endpoint of the chain node.
    #[arg(long, env = "RPC_URL", default_value = "http://127.0.0.1:8545")]
    pub rpc_url: String,

    /// Private key (hex string, 0x...) of the deployer signer.
    #[arg(long, env = "PKEY", conflicts_with = "private_key_path")]
    pub private_key: Option<String>,

    /// Path to a file containing the deployer private key.
    #[arg(long, env = "PRIV_KEY_PATH", conflicts_with = "private_key")]
    pub private_key_path: Option<PathBuf>,

    /// Private key of the registry owner. Defaults to the deployer.
    #[arg(long, env = "OWNER_PKEY")]
    pub owner_private_key: Option<String>,

    /// Confirmations to wait for on every transaction.
    #[arg(long, default_value_t = 1)]
    pub confirmations: usize,

    /// Interval between receipt polls, in milliseconds.
    #[arg(long, env = "POLL_INTERVAL_MS", default_value_t = 1000)]
    pub poll_interval_ms: u64,
}

impl ChainArgs {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Root of the compiled contract artifacts (Hardhat or Foundry layout), searched recursively.
    #[arg(long, env = "ARTIFACTS_DIR", default_value = "artifacts")]
    pub artifacts_dir: PathBuf,

    /// Artifact name of the account contract.
    #[arg(long, default_value = contracts::SAMPLE_ACCOUNT)]
    pub account_contract: String,

    /// Artifact name of the intent plugin contract.
    #[arg(long, default_value = contracts::INTENT_PLUGIN)]
    pub plugin_contract: String,

    /// Path to write deployment info (eg, deployments.devnet.json).
    #[arg(long, default_value = "deployments.devnet.json")]
    pub deployments_path: PathBuf,

    /// Optional network name (eg, devnet, sepolia).
    #[arg(long, default_value = "devnet")]
    pub network: String,

    /// Skip writing the deployments JSON.
    #[arg(long)]
    pub no_record: bool,

    /// Ether sent to the account before execution.
    #[arg(long, default_value = "1.0", value_parser = parse_ether)]
    pub fund: U256,

    /// Deploy a module registry, register the plugin and enable it on the account.
    #[arg(long)]
    pub register: bool,

    /// Plugin permission flags passed to `enablePlugin` (registered runs).
    #[arg(long, default_value_t = PLUGIN_PERMISSION_EXECUTE_CALL)]
    pub permissions: u8,

    /// Constructor placeholder address for bare runs (up to two; random otherwise).
    #[arg(long = "placeholder", value_parser = parse_address, conflicts_with = "register")]
    pub placeholders: Vec<Address>,
}

#[derive(Args, Debug)]
pub struct LogArgs {
    /// Log filter used when RUST_LOG is unset.
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Execute a single ATO through the plugin.
    ExecuteAto(AtoArgs),
    /// Execute a swap ATO with explicit token bounds.
    ExecuteSwap(SwapArgs),
    /// Execute a fee-paying user intent wrapping one or more ATOs.
    ExecuteIntent(IntentArgs),
}

#[derive(Args, Debug, Clone)]
pub struct AtoArgs {
    #[arg(long, default_value = "1", value_parser = parse_u256)]
    pub operation: U256,

    /// Chain id embedded in the ATO.
    #[arg(long, default_value = "1", value_parser = parse_u256)]
    pub chain_id: U256,

    #[arg(long, default_value = "")]
    pub payload: String,

    #[arg(long, default_value = "")]
    pub payload_schema: String,

    #[arg(long, default_value = "")]
    pub fields_to_optimize: String,

    #[arg(long, default_value = "")]
    pub fields_to_optimize_schema: String,
}

#[derive(Args, Debug, Clone)]
pub struct SwapArgs {
    #[arg(long, default_value = "1", value_parser = parse_u256)]
    pub operation: U256,

    #[arg(long, value_parser = parse_address)]
    pub token_in: Address,

    #[arg(long, value_parser = parse_address)]
    pub token_out: Address,

    #[arg(long, default_value = "0", value_parser = parse_u256)]
    pub min_in: U256,

    #[arg(long, value_parser = parse_u256)]
    pub max_in: U256,

    #[arg(long, value_parser = parse_u256)]
    pub min_out: U256,

    #[arg(
        long,
        default_value = "0xffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
        value_parser = parse_u256
    )]
    pub max_out: U256,

    #[arg(long, default_value = "1", value_parser = parse_u256)]
    pub source_chain_id: U256,

    #[arg(long, default_value = "1", value_parser = parse_u256)]
    pub destination_chain_id: U256,
}

#[derive(Args, Debug, Clone)]
pub struct IntentArgs {
    #[command(flatten)]
    pub ato: AtoArgs,

    /// Number of copies of the ATO in the intent.
    #[arg(long, default_value_t = 1)]
    pub count: usize,

    #[arg(long, default_value = "0", value_parser = parse_u256)]
    pub nonce: U256,

    /// Fee in ether attached to the execution call.
    #[arg(long, default_value = "0", value_parser = parse_ether)]
    pub fee: U256,
}
