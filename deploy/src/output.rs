//! Scrapers for the human readable text printed by `forge` and `cast`.
//!
//! These are tied to the tools' output format; a format change shows up as an
//! extraction error rather than an empty value.

use std::{str::FromStr, sync::LazyLock};

use anyhow::{anyhow, Context, Result};
use ethers::types::{H160, U256};
use regex::Regex;

const ETHER_DECIMALS: usize = 18;

static DEPLOYED_TO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Deployed to: (0x[0-9a-fA-F]{40})\b").expect("valid regex")
});

/// Address printed by `forge create` after a successful deployment.
pub fn extract_deployed_address(stdout: &str) -> Result<H160> {
    let address = DEPLOYED_TO
        .captures(stdout)
        .and_then(|captures| captures.get(1))
        .ok_or(anyhow!(
            "no `Deployed to: 0x…` line in forge create output"
        ))?;
    H160::from_str(address.as_str())
        .with_context(|| format!("invalid deployed address {}", address.as_str()))
}

/// Wei amount printed by `cast balance`.
pub fn parse_wei(stdout: &str) -> Result<U256> {
    let text = stdout.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(anyhow!("expected a wei amount, got `{text}`"));
    }
    U256::from_dec_str(text).map_err(|e| anyhow!("wei amount `{text}` out of range: {e}"))
}

/// Leading unsigned integer of a `cast call` result, e.g. `14 [1.4e1]`.
pub fn parse_uint(stdout: &str) -> Result<U256> {
    let token = stdout
        .split_whitespace()
        .next()
        .ok_or(anyhow!("empty call output"))?;
    let value = match token.strip_prefix("0x") {
        Some(hex) => U256::from_str_radix(hex, 16).map_err(|e| anyhow!("{e}")),
        None => U256::from_dec_str(token).map_err(|e| anyhow!("{e}")),
    };
    value.with_context(|| format!("expected an unsigned integer, got `{token}`"))
}

/// Exact decimal ether amount; the fraction keeps at least one digit.
pub fn format_ether(wei: U256) -> String {
    let unit = U256::exp10(ETHER_DECIMALS);
    let whole = wei / unit;
    let fraction = format!("{:0>width$}", (wei % unit).to_string(), width = ETHER_DECIMALS);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        format!("{whole}.0")
    } else {
        format!("{whole}.{fraction}")
    }
}
