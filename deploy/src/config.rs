use std::{fs, path::Path};

use anyhow::{anyhow, Context, Result};
use ethers::{
    signers::{LocalWallet, Signer},
    types::H160,
    utils::hex,
};
use serde::Deserialize;

use crate::contracts::ContractId;

/// Local anvil defaults: account #0 of the dev mnemonic.
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";
pub const DEFAULT_PRIVATE_KEY: &str =
    "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const DEFAULT_CONTRACT: &str = "src/JobMachine.sol:JobMachine";

const RPC_SCHEMES: [&str; 4] = ["http://", "https://", "ws://", "wss://"];

/// Resolved settings shared by every task. Built once and handed to [`crate::deploy::Deploy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub account: H160,
    pub private_key: String,
    pub rpc_url: String,
    pub contract: ContractId,
    pub forge: String,
    pub cast: String,
    pub anvil: String,
}

/// One partial source of settings: the config file, or the command line.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    pub account: Option<H160>,
    pub private_key: Option<String>,
    pub rpc_url: Option<String>,
    pub contract: Option<ContractId>,
    pub forge: Option<String>,
    pub cast: Option<String>,
    pub anvil: Option<String>,
}

impl ConfigLayer {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Values set in `upper` win over values set in `self`.
    pub fn merge(self, upper: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            account: upper.account.or(self.account),
            private_key: upper.private_key.or(self.private_key),
            rpc_url: upper.rpc_url.or(self.rpc_url),
            contract: upper.contract.or(self.contract),
            forge: upper.forge.or(self.forge),
            cast: upper.cast.or(self.cast),
            anvil: upper.anvil.or(self.anvil),
        }
    }
}

impl Config {
    pub fn resolve(layer: ConfigLayer) -> Result<Self> {
        let private_key = layer
            .private_key
            .unwrap_or_else(|| DEFAULT_PRIVATE_KEY.to_string());
        let key_address = key_address(&private_key)?;

        let account = match layer.account {
            Some(account) => {
                if account != key_address {
                    log::warn!(
                        "account {:?} does not belong to the configured private key ({:?})",
                        account,
                        key_address
                    );
                }
                account
            }
            None => key_address,
        };

        let rpc_url = layer
            .rpc_url
            .unwrap_or_else(|| DEFAULT_RPC_URL.to_string());
        if !RPC_SCHEMES.iter().any(|scheme| rpc_url.starts_with(scheme)) {
            return Err(anyhow!("rpc url `{rpc_url}` must be an http(s) or ws(s) url"));
        }

        let contract = match layer.contract {
            Some(contract) => contract,
            None => DEFAULT_CONTRACT.parse()?,
        };

        Ok(Self {
            account,
            private_key,
            rpc_url,
            contract,
            forge: layer.forge.unwrap_or_else(|| "forge".to_string()),
            cast: layer.cast.unwrap_or_else(|| "cast".to_string()),
            anvil: layer.anvil.unwrap_or_else(|| "anvil".to_string()),
        })
    }
}

fn key_address(sk: &str) -> Result<H160> {
    let bytes = hex::decode(sk.strip_prefix("0x").unwrap_or(sk))
        .context("private key is not valid hex")?;
    if bytes.len() != 32 {
        return Err(anyhow!(
            "private key must be 32 bytes, got {}",
            bytes.len()
        ));
    }
    let wallet = LocalWallet::from_bytes(&bytes)?;
    Ok(wallet.address())
}

#[cfg(test)]
mod tests {
    use std::{io::Write, str::FromStr};

    use super::*;

    const ANVIL_ACCOUNT_0: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

    #[test]
    fn defaults_target_local_anvil() {
        let config = Config::resolve(ConfigLayer::default()).unwrap();
        assert_eq!(config.account, H160::from_str(ANVIL_ACCOUNT_0).unwrap());
        assert_eq!(config.rpc_url, DEFAULT_RPC_URL);
        assert_eq!(config.contract.to_string(), DEFAULT_CONTRACT);
        assert_eq!(config.forge, "forge");
    }

    #[test]
    fn account_is_derived_from_prefixed_key() {
        let config = Config::resolve(ConfigLayer {
            private_key: Some(format!("0x{DEFAULT_PRIVATE_KEY}")),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(config.account, H160::from_str(ANVIL_ACCOUNT_0).unwrap());
    }

    #[test]
    fn explicit_account_is_kept() {
        let other = H160::repeat_byte(0x11);
        let config = Config::resolve(ConfigLayer {
            account: Some(other),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(config.account, other);
    }

    #[test]
    fn rejects_bad_values() {
        let short_key = ConfigLayer {
            private_key: Some("abcd".to_string()),
            ..Default::default()
        };
        assert!(Config::resolve(short_key).is_err());

        let not_hex = ConfigLayer {
            private_key: Some("zz".repeat(32)),
            ..Default::default()
        };
        assert!(Config::resolve(not_hex).is_err());

        let bad_rpc = ConfigLayer {
            rpc_url: Some("127.0.0.1:8545".to_string()),
            ..Default::default()
        };
        assert!(Config::resolve(bad_rpc).is_err());
    }

    #[test]
    fn upper_layer_wins() {
        let file = ConfigLayer {
            rpc_url: Some("http://file:8545".to_string()),
            cast: Some("/opt/cast".to_string()),
            ..Default::default()
        };
        let cli = ConfigLayer {
            rpc_url: Some("http://cli:8545".to_string()),
            ..Default::default()
        };
        let merged = file.merge(cli);
        assert_eq!(merged.rpc_url.as_deref(), Some("http://cli:8545"));
        assert_eq!(merged.cast.as_deref(), Some("/opt/cast"));
    }

    #[test]
    fn reads_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "account": "0x70997970c51812dc3a010c7d01b50e0d17dc79c8",
                "rpc_url": "https://rpc.example.org",
                "contract": "src/Other.sol:Other"
            }}"#
        )
        .unwrap();

        let layer = ConfigLayer::from_file(file.path()).unwrap();
        let config = Config::resolve(layer).unwrap();
        assert_eq!(
            config.account,
            H160::from_str("0x70997970c51812dc3a010c7d01b50e0d17dc79c8").unwrap()
        );
        assert_eq!(config.rpc_url, "https://rpc.example.org");
        assert_eq!(config.contract.name(), "Other");
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "rpc": "http://x" }}"#).unwrap();
        assert!(ConfigLayer::from_file(file.path()).is_err());
    }
}
