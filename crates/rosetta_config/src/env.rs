//! A thin environment-variable configuration loader (spec §6
//! "Configuration surface").
//!
//! This is explicitly out-of-core (spec §1: "environment-variable
//! parsing" is plumbing around the core), implemented only so the binary
//! has somewhere to read `MODE`, `NETWORK`, `NODE_URL`, etc. from and the
//! crate runs end-to-end. It deliberately does not attempt the richer
//! offline-config-file story spec.md alludes to; env vars plus
//! hardcoded-sane defaults is the whole of it.

use std::collections::HashMap;
use std::env;

use rosetta_types::config::{TraceFlavor, WithdrawalsStyle};
use rosetta_types::{Currency, RosettaConfig};

/// Whether the middleware may reach out to the configured node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Outbound RPC is permitted.
    Online,
    /// Any handler that would reach the node adapter fails with
    /// `UNAVAILABLE_OFFLINE` (spec §6).
    Offline,
}

/// Everything read from the process environment to construct a running
/// instance: which node to talk to, which port to serve on, and the
/// process-wide [`RosettaConfig`] policy knobs.
#[derive(Clone, Debug)]
pub struct EnvConfig {
    /// `ONLINE` or `OFFLINE` (spec §6 `mode`).
    pub mode: Mode,
    /// The chain this instance serves, e.g. `"mainnet"`.
    pub network: String,
    /// The upstream JSON-RPC endpoint. Required in [`Mode::Online`];
    /// unused in [`Mode::Offline`].
    pub node_url: Option<url::Url>,
    /// The port the REST server listens on.
    pub port: u16,
    /// The process-wide normalization/validation policy.
    pub rosetta: RosettaConfig,
}

/// An environment variable was present but couldn't be parsed into the
/// type its key expects.
#[derive(Debug, thiserror::Error)]
pub enum EnvConfigError {
    /// `NODE_URL` is required when `MODE=ONLINE`.
    #[error("NODE_URL is required when MODE=ONLINE")]
    MissingNodeUrl,
    /// A variable's value didn't parse into its expected type.
    #[error("failed to parse {key}={value:?}: {reason}")]
    InvalidValue {
        /// The variable name.
        key: &'static str,
        /// The value that failed to parse.
        value: String,
        /// Why parsing failed.
        reason: String,
    },
}

fn read_bool(key: &'static str, default: bool) -> Result<bool, EnvConfigError> {
    match env::var(key) {
        Err(_) => Ok(default),
        Ok(value) => match value.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(EnvConfigError::InvalidValue {
                key,
                value: other.to_string(),
                reason: "expected a boolean".to_string(),
            }),
        },
    }
}

impl EnvConfig {
    /// Loads configuration from the process environment, defaulting to
    /// Ethereum mainnet's policy (spec §3 `RosettaConfig`) where a flag
    /// isn't set.
    pub fn from_env() -> Result<Self, EnvConfigError> {
        let mode = match env::var("MODE").as_deref() {
            Ok("OFFLINE") => Mode::Offline,
            _ => Mode::Online,
        };

        let network = env::var("NETWORK").unwrap_or_else(|_| "mainnet".to_string());

        let node_url = match env::var("NODE_URL") {
            Ok(raw) => Some(raw.parse::<url::Url>().map_err(|error| EnvConfigError::InvalidValue {
                key: "NODE_URL",
                value: raw,
                reason: error.to_string(),
            })?),
            Err(_) => None,
        };
        if mode == Mode::Online && node_url.is_none() {
            return Err(EnvConfigError::MissingNodeUrl);
        }

        let port = match env::var("PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|error| EnvConfigError::InvalidValue {
                key: "PORT",
                value: raw,
                reason: error.to_string(),
            })?,
            Err(_) => 8080,
        };

        let trace_flavor = match env::var("TRACE_TYPE").as_deref() {
            Ok("JS") => TraceFlavor::Js,
            Ok("OPEN_ETHEREUM") => TraceFlavor::OpenEthereum,
            _ => TraceFlavor::Native,
        };

        let mut rosetta = RosettaConfig::ethereum_mainnet();
        rosetta.trace_flavor = trace_flavor;
        rosetta.supports_syncing = read_bool("SUPPORTS_SYNCING", rosetta.supports_syncing)?;
        rosetta.supports_block_author = read_bool("SUPPORTS_BLOCK_AUTHOR", rosetta.supports_block_author)?;
        rosetta.supports_reward_tx = read_bool("SUPPORTS_REWARD_TX", rosetta.supports_reward_tx)?;
        rosetta.filter_tokens = read_bool("FILTER_TOKENS", rosetta.filter_tokens)?;
        rosetta.use_whitelist_metadata = read_bool("USE_WHITELIST_METADATA", rosetta.use_whitelist_metadata)?;
        rosetta.index_unknown_tokens = read_bool("INDEX_UNKNOWN_TOKENS", rosetta.index_unknown_tokens)?;
        rosetta.trustless_block_validation =
            read_bool("ENABLE_TRUSTLESS_BLOCK_VALIDATION", rosetta.trustless_block_validation)?;
        rosetta.trustless_account_validation =
            read_bool("ENABLE_TRUSTLESS_ACCOUNT_VALIDATION", rosetta.trustless_account_validation)?;
        if read_bool("OPTIMISM_WITHDRAWALS_STYLE", false)? {
            rosetta.withdrawals_style = WithdrawalsStyle::StorageRootInWithdrawalsField;
        }
        rosetta.whitelist = load_whitelist();

        Ok(EnvConfig {
            mode,
            network,
            node_url,
            port,
            rosetta,
        })
    }
}

/// Reads `TOKEN_WHITELIST`, an optional `address:symbol:decimals,...` list,
/// used only when `filter_tokens`/`use_whitelist_metadata` are enabled
/// (spec §4.3d). Malformed entries are skipped with a warning rather than
/// failing startup, since the whitelist is supplementary policy, not core
/// config.
fn load_whitelist() -> HashMap<rosetta_primitives::Address, Currency> {
    let Ok(raw) = env::var("TOKEN_WHITELIST") else {
        return HashMap::new();
    };

    raw.split(',')
        .filter(|entry| !entry.trim().is_empty())
        .filter_map(|entry| {
            let mut parts = entry.trim().splitn(3, ':');
            let address = parts.next()?.parse::<rosetta_primitives::Address>().ok()?;
            let symbol = parts.next()?.to_string();
            let decimals = parts.next()?.parse::<u32>().ok()?;
            Some((address, Currency::native(symbol, decimals)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_bool_accepts_common_spellings() {
        std::env::set_var("ROSETTA_TEST_BOOL_TRUE", "yes");
        assert!(read_bool("ROSETTA_TEST_BOOL_TRUE", false).unwrap());
        std::env::remove_var("ROSETTA_TEST_BOOL_TRUE");
    }

    #[test]
    fn read_bool_defaults_when_unset() {
        std::env::remove_var("ROSETTA_TEST_BOOL_UNSET");
        assert!(!read_bool("ROSETTA_TEST_BOOL_UNSET", false).unwrap());
        assert!(read_bool("ROSETTA_TEST_BOOL_UNSET", true).unwrap());
    }

    #[test]
    fn whitelist_parses_address_symbol_decimals_triples() {
        std::env::set_var(
            "TOKEN_WHITELIST",
            "0x0000000000000000000000000000000000000001:USDC:6,0x0000000000000000000000000000000000000002:WBTC:8",
        );
        let whitelist = load_whitelist();
        assert_eq!(whitelist.len(), 2);
        std::env::remove_var("TOKEN_WHITELIST");
    }
}
