use std::{fmt, str::FromStr};

use anyhow::{anyhow, Result};
use serde::Deserialize;

pub const SET_JOB_MINT_FEE: &str = "setJobMintFee(uint)";
pub const JOB_MINT_FEE: &str = "jobMintFee()(uint)";
pub const DEFAULT_JOB_MINT_FEE: u64 = 14;

/// A forge contract identifier, `<source path>:<contract name>`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct ContractId {
    path: String,
    name: String,
}

impl ContractId {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for ContractId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (path, name) = s
            .rsplit_once(':')
            .ok_or(anyhow!("contract id `{s}` must look like <path>:<Name>"))?;
        let (path, name) = (path.trim(), name.trim());
        if path.is_empty() || name.is_empty() {
            return Err(anyhow!("contract id `{s}` has an empty path or name"));
        }
        Ok(Self {
            path: path.to_string(),
            name: name.to_string(),
        })
    }
}

impl TryFrom<String> for ContractId {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_path_and_name() {
        let id: ContractId = "src/JobMachine.sol:JobMachine".parse().unwrap();
        assert_eq!(id.name(), "JobMachine");
        assert_eq!(id.to_string(), "src/JobMachine.sol:JobMachine");
    }

    #[test]
    fn rejects_malformed_ids() {
        assert!("src/JobMachine.sol".parse::<ContractId>().is_err());
        assert!(":JobMachine".parse::<ContractId>().is_err());
        assert!("src/JobMachine.sol:".parse::<ContractId>().is_err());
    }

    #[test]
    fn deserializes_from_string() {
        let id: ContractId = serde_json::from_str("\"a/B.sol:B\"").unwrap();
        assert_eq!(id.name(), "B");
        assert!(serde_json::from_str::<ContractId>("\"nope\"").is_err());
    }
}
