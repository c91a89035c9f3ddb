use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use ethers::types::{H160, U256};

use crate::{
    config::{Config, ConfigLayer},
    contracts::{ContractId, DEFAULT_JOB_MINT_FEE},
    deploy::Deploy,
    executor::ProcessExecutor,
};

/// Build, deploy and configure the JobMachine contract with foundry.
#[derive(Debug, Parser)]
#[clap(name = "jobmachine", version)]
pub struct CommandLine {
    /// JSON file with any of: account, private_key, rpc_url, contract, forge, cast, anvil.
    #[clap(long = "config", env = "JOBMACHINE_CONFIG", global = true)]
    config_file: Option<PathBuf>,

    #[clap(short, long, env = "JOBMACHINE_RPC_URL", global = true)]
    rpc_url: Option<String>,

    #[clap(
        long,
        env = "JOBMACHINE_PRIVATE_KEY",
        hide_env_values = true,
        global = true
    )]
    private_key: Option<String>,

    /// Defaults to the address of the private key.
    #[clap(short, long, env = "JOBMACHINE_ACCOUNT", global = true)]
    account: Option<H160>,

    /// Contract to deploy, as <path>:<Name>.
    #[clap(long, env = "JOBMACHINE_CONTRACT", global = true)]
    contract: Option<ContractId>,

    #[clap(subcommand)]
    task: Task,
}

#[derive(Debug, Subcommand)]
enum Task {
    /// forge build
    Build,
    /// forge test
    Test,
    /// Start a local anvil node and block until it exits.
    #[clap(alias = "start-node")]
    Anvil,
    /// Print the account balance in ETH.
    Balance,
    /// Deploy the contract and print its address.
    #[clap(alias = "deploy")]
    Create,
    /// Read-only contract call.
    Call {
        #[clap(value_name = "WHERE")]
        address: H160,
        #[clap(value_name = "WHAT")]
        signature: String,
        #[clap(allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Send a transaction to the contract.
    Send {
        #[clap(value_name = "WHERE")]
        address: H160,
        #[clap(value_name = "WHAT")]
        signature: String,
        #[clap(value_name = "WHAT2", required = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Deploy, set the job mint fee and read it back.
    Init {
        #[clap(long, default_value_t = DEFAULT_JOB_MINT_FEE)]
        fee: u64,
    },
}

impl CommandLine {
    pub async fn execute(self) -> Result<()> {
        let deploy = Deploy::new(self.config()?, ProcessExecutor);
        match self.task {
            Task::Build => deploy.build().await,
            Task::Test => deploy.test().await,
            Task::Anvil => deploy.anvil().await,
            Task::Balance => deploy.balance().await.map(|_| ()),
            Task::Create => deploy.create().await.map(|_| ()),
            Task::Call {
                address,
                signature,
                args,
            } => deploy.call(address, &signature, &args).await.map(|_| ()),
            Task::Send {
                address,
                signature,
                args,
            } => deploy.send(address, &signature, &args).await.map(|_| ()),
            Task::Init { fee } => deploy.init(U256::from(fee)).await.map(|_| ()),
        }
    }

    fn config(&self) -> Result<Config> {
        let file = match &self.config_file {
            Some(path) => ConfigLayer::from_file(path)?,
            None => ConfigLayer::default(),
        };
        let cli = ConfigLayer {
            account: self.account,
            private_key: self.private_key.clone(),
            rpc_url: self.rpc_url.clone(),
            contract: self.contract.clone(),
            ..Default::default()
        };
        Config::resolve(file.merge(cli))
    }
}
