mod artifacts;
mod chain;
mod cli;
mod config;
mod deployments;
mod logging;
mod scenario;

#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use clap::Parser;
use intent_types::constants::contracts;
use tracing::{info, warn};

use crate::{
    artifacts::{Artifact, ArtifactStore},
    chain::{ChainClient, EthersChain},
    cli::Cli,
    deployments::{write_deployments_json, RecordTarget},
    scenario::{Bytecodes, ContractCode, RunReport, Runner},
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    logging::init(&cli.log)?;

    let plan = config::build_plan(&cli.run, &cli.command)?;
    let bytecodes = load_bytecodes(&cli, plan.intent.kind())?;

    let deployer_wallet = config::deployer_wallet(&cli.chain)?;
    let owner_wallet = config::owner_wallet(&cli.chain)?;

    let connect = |wallet| {
        EthersChain::connect(
            &cli.chain.rpc_url,
            wallet,
            cli.chain.confirmations,
            cli.chain.poll_interval(),
        )
    };
    let deployer = connect(deployer_wallet)
        .await
        .context("failed connecting deployer signer")?;
    // A second client for the same key would race the deployer's nonce cache.
    let owner = match owner_wallet {
        Some(wallet) => {
            let client = connect(wallet)
                .await
                .context("failed connecting owner signer")?;
            (client.address() != deployer.address()).then_some(client)
        }
        None => None,
    };
    let owner_ref: &dyn ChainClient = match owner.as_ref() {
        Some(client) => client,
        None => &deployer,
    };
    info!(
        deployer = %deployer.address(),
        owner = %owner_ref.address(),
        rpc_url = %cli.chain.rpc_url,
        "signers ready"
    );

    let report = Runner::new(&deployer, owner_ref, &bytecodes)
        .run(&plan)
        .await
        .context("intent run failed")?;

    if !cli.run.no_record {
        let target = RecordTarget {
            path: &cli.run.deployments_path,
            network: &cli.run.network,
            rpc_url: &cli.chain.rpc_url,
        };
        write_deployments_json(&target, &report)?;
        info!(path = %cli.run.deployments_path.display(), "deployments recorded");
    }

    print_summary(&report);
    Ok(())
}

fn load_bytecodes(cli: &Cli, entrypoint: &str) -> Result<Bytecodes> {
    let store = ArtifactStore::new(&cli.run.artifacts_dir);
    let load = |name: &str| {
        store
            .load(name)
            .with_context(|| format!("failed loading artifact `{name}`"))
    };

    let account = load(cli.run.account_contract.as_str())?;
    let manager = load(contracts::PROTOCOL_MANAGER)?;
    let plugin = load(cli.run.plugin_contract.as_str())?;
    let registry = if cli.run.register {
        Some(load(contracts::PROTOCOL_REGISTRY)?)
    } else {
        None
    };

    if !plugin.abi.is_empty() && !plugin.has_function(entrypoint) {
        warn!(
            contract = %plugin.name,
            artifact = %plugin.path.display(),
            function = entrypoint,
            "plugin ABI does not declare the entrypoint, the call will likely revert"
        );
    }

    let code = |artifact: Artifact| ContractCode::new(artifact.name, artifact.bytecode);
    Ok(Bytecodes {
        account: code(account),
        manager: code(manager),
        plugin: code(plugin),
        registry: registry.map(code),
    })
}

fn print_summary(report: &RunReport) {
    for contract in &report.deployments {
        println!("Deployed `{}` to {}", contract.name, contract.address);
    }
    if let Some(hash) = report.register_tx {
        println!("Registered plugin, txn hash: {hash}");
    }
    if let Some(hash) = report.enable_tx {
        println!("Enabled plugin, txn hash: {hash}");
    }
    println!("Funded account {}, txn hash: {}", report.account, report.fund_tx);
    println!("{} sent for execution, txn hash: {}", report.intent, report.execute_tx);
}
