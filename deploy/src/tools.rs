//! Argument vectors for the external `forge`, `cast` and `anvil` invocations.
//!
//! Every builder is a pure function of the config and its arguments. The
//! commands are spawned directly, never through a shell, so signatures such as
//! `jobMintFee()(uint)` are passed as single arguments without quoting.

use std::fmt;

use ethers::types::H160;

use crate::config::Config;

const PRIVATE_KEY_FLAG: &str = "--private-key";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

/// Shell-like rendering for logs and terminal output. The value following
/// `--private-key` is never printed.
impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        let mut redact_next = false;
        for arg in &self.args {
            if redact_next {
                write!(f, " <redacted>")?;
                redact_next = false;
                continue;
            }
            redact_next = arg == PRIVATE_KEY_FLAG;
            if arg.is_empty() || arg.chars().any(|c| !is_shell_safe(c)) {
                write!(f, " \"{}\"", arg.replace('"', "\\\""))?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

fn is_shell_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | ':' | '=' | ',' | '@')
}

pub fn build(config: &Config) -> ToolCommand {
    ToolCommand::new(&config.forge).arg("build")
}

pub fn test(config: &Config) -> ToolCommand {
    ToolCommand::new(&config.forge).arg("test")
}

pub fn anvil(config: &Config) -> ToolCommand {
    ToolCommand::new(&config.anvil)
}

pub fn balance(config: &Config) -> ToolCommand {
    ToolCommand::new(&config.cast)
        .arg("balance")
        .arg("--rpc-url")
        .arg(&config.rpc_url)
        .arg(format!("{:?}", config.account))
}

pub fn create(config: &Config) -> ToolCommand {
    ToolCommand::new(&config.forge)
        .arg("create")
        .arg("--rpc-url")
        .arg(&config.rpc_url)
        .arg(PRIVATE_KEY_FLAG)
        .arg(&config.private_key)
        .arg(config.contract.to_string())
}

pub fn call(config: &Config, address: H160, signature: &str, args: &[String]) -> ToolCommand {
    ToolCommand::new(&config.cast)
        .arg("call")
        .arg("--rpc-url")
        .arg(&config.rpc_url)
        .arg(format!("{address:?}"))
        .arg(signature)
        .args(args)
}

pub fn send(config: &Config, address: H160, signature: &str, args: &[String]) -> ToolCommand {
    ToolCommand::new(&config.cast)
        .arg("send")
        .arg("--rpc-url")
        .arg(&config.rpc_url)
        .arg(PRIVATE_KEY_FLAG)
        .arg(&config.private_key)
        .arg(format!("{address:?}"))
        .arg(signature)
        .args(args)
}
