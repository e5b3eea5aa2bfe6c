//! The run pipeline: deploy → register → enable plugin → fund → execute.
//!
//! Every step is a direct call into an external contract. A failing step aborts the run and
//! nothing after it is attempted.

use alloy_primitives::{Address, Bytes, B256, U256};
use ato_encoder::{
    build_ato, build_swap_ato, build_user_intent, deploy_code, encode_add_module,
    encode_enable_plugin, encode_execute_ato, encode_execute_swap_ato, encode_execute_user_intent,
    wrap_exec_transaction, AtoParams, Constructor, SwapBounds,
};
use intent_types::constants::{contracts, MODULE_TYPE_PLUGIN};
use thiserror::Error;
use tracing::{debug, info};

use crate::chain::{Call, ChainClient, ChainError, Deployment};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("{step} step failed")]
    Step {
        step: Step,
        #[source]
        source: ChainError,
    },

    #[error("registered runs need the `{0}` creation bytecode")]
    MissingBytecode(&'static str),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    Deploy(String),
    Register,
    EnablePlugin,
    Fund,
    Execute,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::Deploy(name) => write!(f, "deploy `{name}`"),
            Step::Register => f.write_str("register"),
            Step::EnablePlugin => f.write_str("enable-plugin"),
            Step::Fund => f.write_str("fund"),
            Step::Execute => f.write_str("execute"),
        }
    }
}

/// Creation bytecode of one contract, under the artifact name it was loaded from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContractCode {
    pub name: String,
    pub bytecode: Vec<u8>,
}

impl ContractCode {
    pub fn new(name: impl Into<String>, bytecode: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytecode,
        }
    }
}

/// Creation bytecode for every contract the run may deploy.
#[derive(Clone, Debug, Default)]
pub struct Bytecodes {
    pub account: ContractCode,
    pub manager: ContractCode,
    pub plugin: ContractCode,
    /// Only needed for registered runs.
    pub registry: Option<ContractCode>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Setup {
    /// Manager and plugin get placeholder constructor addresses; no registry is involved.
    Bare { placeholders: [Address; 2] },
    /// Registry owned by the owner signer, plugin registered and enabled on the account.
    Registered { permissions: u8 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    Ato(AtoParams),
    Swap(SwapBounds),
    /// `count` copies of `ato` wrapped in one user intent; `fee` ships as call value.
    UserIntent {
        ato: AtoParams,
        count: usize,
        nonce: U256,
        fee: U256,
    },
}

impl Intent {
    pub fn kind(&self) -> &'static str {
        match self {
            Intent::Ato(_) => "executeATO",
            Intent::Swap(_) => "executeSwapATO",
            Intent::UserIntent { .. } => "executeUserIntent",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Plan {
    pub setup: Setup,
    pub intent: Intent,
    /// Wei sent to the account before execution.
    pub fund: U256,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeployedContract {
    pub name: String,
    pub address: Address,
    pub tx_hash: B256,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunReport {
    pub intent: &'static str,
    pub account: Address,
    pub manager: Address,
    pub plugin: Address,
    pub registry: Option<Address>,
    pub deployments: Vec<DeployedContract>,
    pub register_tx: Option<B256>,
    pub enable_tx: Option<B256>,
    pub fund_tx: B256,
    pub execute_tx: B256,
}

struct Deployed {
    account: DeployedContract,
    manager: DeployedContract,
    plugin: DeployedContract,
    registry: Option<DeployedContract>,
}

pub struct Runner<'a> {
    deployer: &'a dyn ChainClient,
    owner: &'a dyn ChainClient,
    bytecodes: &'a Bytecodes,
}

impl<'a> Runner<'a> {
    pub fn new(
        deployer: &'a dyn ChainClient,
        owner: &'a dyn ChainClient,
        bytecodes: &'a Bytecodes,
    ) -> Self {
        Self {
            deployer,
            owner,
            bytecodes,
        }
    }

    pub async fn run(&self, plan: &Plan) -> Result<RunReport, RunError> {
        info!(intent = plan.intent.kind(), "deploying contracts");
        let deployed = match plan.setup {
            Setup::Bare { placeholders } => self.deploy_bare(placeholders).await?,
            Setup::Registered { .. } => self.deploy_registered().await?,
        };
        let account = deployed.account.address;
        let manager = deployed.manager.address;
        let plugin = deployed.plugin.address;

        let mut register_tx = None;
        let mut enable_tx = None;
        if let (Setup::Registered { permissions }, Some(registry)) =
            (&plan.setup, deployed.registry.as_ref())
        {
            info!(registry = %registry.address, plugin = %plugin, "registering plugin module");
            let outcome = self
                .owner
                .send(Call::new(
                    registry.address,
                    encode_add_module(plugin, MODULE_TYPE_PLUGIN),
                ))
                .await
                .map_err(at(Step::Register))?;
            register_tx = Some(outcome.hash);

            info!(manager = %manager, permissions, "enabling plugin through account");
            let enable = encode_enable_plugin(plugin, *permissions);
            let outcome = self
                .deployer
                .send(Call::new(
                    account,
                    wrap_exec_transaction(manager, U256::ZERO, enable),
                ))
                .await
                .map_err(at(Step::EnablePlugin))?;
            enable_tx = Some(outcome.hash);
        }

        info!(account = %account, wei = %plan.fund, "funding account");
        let fund = self
            .deployer
            .send(Call::new(account, Bytes::new()).with_value(plan.fund))
            .await
            .map_err(at(Step::Fund))?;
        info!(tx = %fund.hash, "account funded");

        let call = execute_call(&plan.intent, plugin, manager, account);
        info!(plugin = %plugin, intent = plan.intent.kind(), "executing intent");
        let execute = self
            .deployer
            .send(call)
            .await
            .map_err(at(Step::Execute))?;
        info!(tx = %execute.hash, block = ?execute.block_number, "intent sent for execution");

        let registry_address = deployed.registry.as_ref().map(|r| r.address);
        let mut deployments = vec![deployed.account, deployed.manager, deployed.plugin];
        deployments.extend(deployed.registry);

        Ok(RunReport {
            intent: plan.intent.kind(),
            account,
            manager,
            plugin,
            registry: registry_address,
            deployments,
            register_tx,
            enable_tx,
            fund_tx: fund.hash,
            execute_tx: execute.hash,
        })
    }

    async fn deploy_bare(&self, placeholders: [Address; 2]) -> Result<Deployed, RunError> {
        let [first, second] = placeholders;
        let (account, manager, plugin) = tokio::try_join!(
            self.deploy(&self.bytecodes.account, Constructor::Empty),
            self.deploy(
                &self.bytecodes.manager,
                Constructor::Manager {
                    initial_owner: first,
                    registry: second,
                },
            ),
            self.deploy(
                &self.bytecodes.plugin,
                Constructor::Plugin {
                    trusted_origin: first,
                },
            ),
        )?;
        Ok(Deployed {
            account,
            manager,
            plugin,
            registry: None,
        })
    }

    async fn deploy_registered(&self) -> Result<Deployed, RunError> {
        let owner = self.owner.address();
        let registry_code = self
            .bytecodes
            .registry
            .as_ref()
            .ok_or(RunError::MissingBytecode(contracts::PROTOCOL_REGISTRY))?;

        // The manager is constructed with the registry address, so the registry goes first.
        let (registry, account) = tokio::try_join!(
            self.deploy(
                registry_code,
                Constructor::Registry {
                    initial_owner: owner,
                },
            ),
            self.deploy(&self.bytecodes.account, Constructor::Empty),
        )?;
        let (manager, plugin) = tokio::try_join!(
            self.deploy(
                &self.bytecodes.manager,
                Constructor::Manager {
                    initial_owner: owner,
                    registry: registry.address,
                },
            ),
            self.deploy(
                &self.bytecodes.plugin,
                Constructor::Plugin {
                    trusted_origin: owner,
                },
            ),
        )?;
        Ok(Deployed {
            account,
            manager,
            plugin,
            registry: Some(registry),
        })
    }

    async fn deploy(
        &self,
        code: &ContractCode,
        ctor: Constructor,
    ) -> Result<DeployedContract, RunError> {
        let name = code.name.as_str();
        let Deployment { address, tx_hash } = self
            .deployer
            .deploy(name, deploy_code(&code.bytecode, &ctor))
            .await
            .map_err(at(Step::Deploy(name.to_string())))?;
        debug!(contract = name, address = %address, tx = %tx_hash, "deployed");
        Ok(DeployedContract {
            name: name.to_string(),
            address,
            tx_hash,
        })
    }
}

/// Plugin call for `intent`. The intent's sender is always the deployed account.
fn execute_call(intent: &Intent, plugin: Address, manager: Address, account: Address) -> Call {
    match intent {
        Intent::Ato(params) => {
            let ato = build_ato(params, account);
            debug!(?ato, "built ATO");
            Call::new(plugin, encode_execute_ato(manager, account, ato))
        }
        Intent::Swap(bounds) => {
            let ato = build_swap_ato(bounds, account);
            debug!(?ato, "built swap ATO");
            Call::new(plugin, encode_execute_swap_ato(manager, account, ato))
        }
        Intent::UserIntent {
            ato,
            count,
            nonce,
            fee,
        } => {
            let atos = (0..*count).map(|_| build_ato(ato, account)).collect();
            let intent = build_user_intent(account, atos, *nonce);
            debug!(?intent, "built user intent");
            Call::new(plugin, encode_execute_user_intent(manager, account, intent))
                .with_value(*fee)
        }
    }
}

fn at(step: Step) -> impl FnOnce(ChainError) -> RunError {
    move |source| RunError::Step { step, source }
}
