use anyhow::{anyhow, Result};
use ethers::{
    types::{H160, U256},
    utils::to_checksum,
};

use crate::{
    config::Config,
    contracts::{JOB_MINT_FEE, SET_JOB_MINT_FEE},
    executor::Executor,
    output, tools,
};

pub struct Deploy<E> {
    config: Config,
    executor: E,
}

impl<E: Executor> Deploy<E> {
    pub fn new(config: Config, executor: E) -> Self {
        Self { config, executor }
    }

    pub async fn build(&self) -> Result<()> {
        self.executor.attach(&tools::build(&self.config)).await
    }

    pub async fn test(&self) -> Result<()> {
        self.executor.attach(&tools::test(&self.config)).await
    }

    /// Blocks until the node exits or the process is interrupted.
    pub async fn anvil(&self) -> Result<()> {
        self.executor.attach(&tools::anvil(&self.config)).await
    }

    pub async fn balance(&self) -> Result<U256> {
        let res = self.executor.capture(&tools::balance(&self.config)).await?;
        let wei = output::parse_wei(&res.stdout)?;
        println!("{} ETH", output::format_ether(wei));
        Ok(wei)
    }

    pub async fn create(&self) -> Result<H160> {
        let cmd = tools::create(&self.config);
        println!("\n{}", cmd);
        let res = self.executor.capture(&cmd).await?;
        if !res.stderr.trim().is_empty() {
            log::warn!("forge create:{}", res.stderr.trim());
        }
        let deployed_to = output::extract_deployed_address(&res.stdout)?;
        println!(
            "{} deployed to:{}",
            self.config.contract.name(),
            to_checksum(&deployed_to, None)
        );
        Ok(deployed_to)
    }

    pub async fn call(&self, address: H160, signature: &str, args: &[String]) -> Result<String> {
        let cmd = tools::call(&self.config, address, signature, args);
        println!("\n{}", cmd);
        let res = self.executor.capture(&cmd).await?;
        print!("{}", res.stdout);
        Ok(res.stdout)
    }

    pub async fn send(&self, address: H160, signature: &str, args: &[String]) -> Result<String> {
        let cmd = tools::send(&self.config, address, signature, args);
        println!("\n{}", cmd);
        let res = self.executor.capture(&cmd).await?;
        print!("{}", res.stdout);
        Ok(res.stdout)
    }

    /// Deploys the contract, sets its job mint fee and reads the fee back.
    /// Stops at the first failing step; nothing is undone.
    pub async fn init(&self, fee: U256) -> Result<H160> {
        let deployed_to = self.create().await?;

        self.send(deployed_to, SET_JOB_MINT_FEE, &[fee.to_string()]).await?;
        log::info!("job mint fee set to {}", fee);

        let res = self.call(deployed_to, JOB_MINT_FEE, &[]).await?;
        let stored = output::parse_uint(&res)?;
        if stored != fee {
            return Err(anyhow!(
                "job mint fee reads back as {} after setting {}",
                stored,
                fee
            ));
        }

        println!("job mint fee:{}", stored);
        Ok(deployed_to)
    }
}
