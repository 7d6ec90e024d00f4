#![warn(missing_docs)]
//! Per-transaction ERC-20 currency resolver (spec §4.4, component C4): an
//! LRU-cached `(symbol, decimals)` lookup backed by RPC fallback, plus an
//! optional whitelist-driven filter the operation mapper consults before
//! emitting a log operation (spec §4.3d).

mod abi;
mod resolver;

pub use resolver::{unknown, CurrencyResolver, TokenContractRpc, CACHE_CAPACITY};

use std::collections::HashMap;

use rosetta_primitives::Address;
use rosetta_types::{Currency, UNKNOWN_ERC20_SYMBOL};

/// Whether an ERC-20 log should be indexed, and with which currency (spec
/// §4.3d): "If `filterTokens` is on and `useWhitelistMetadata` is true,
/// the whitelist entry's `(symbol, decimals)` is used directly; otherwise
/// the resolver is consulted; otherwise, if the resolver returns the
/// sentinel 'unknown' symbol and `indexUnknownTokens` is false, the log
/// is skipped."
pub enum TokenDecision {
    /// Emit the log operation(s) with this currency.
    Index(Currency),
    /// Skip this log: either filtered out by the whitelist, or an
    /// unrecognized token with `index_unknown_tokens` disabled (spec §9
    /// open question (iii): defaults to "skip the log").
    Skip,
}

/// Decides how to handle one ERC-20 `Transfer`-shaped log, per spec
/// §4.3d's policy chain. Callers pass the already-resolved currency (from
/// [`CurrencyResolver::resolve`]) rather than the resolver itself, so this
/// function stays synchronous and testable in isolation from RPC.
pub fn decide(
    contract: Address,
    resolved: Currency,
    whitelist: &HashMap<Address, Currency>,
    filter_tokens: bool,
    use_whitelist_metadata: bool,
    index_unknown_tokens: bool,
) -> TokenDecision {
    if filter_tokens {
        match whitelist.get(&contract) {
            Some(entry) if use_whitelist_metadata => {
                return TokenDecision::Index(entry.clone());
            }
            Some(_) => {
                // Whitelisted, but policy says trust the resolver's
                // metadata rather than the whitelist's.
            }
            None => return TokenDecision::Skip,
        }
    }

    if resolved.symbol == UNKNOWN_ERC20_SYMBOL && !index_unknown_tokens {
        return TokenDecision::Skip;
    }

    TokenDecision::Index(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usdc() -> Currency {
        Currency {
            symbol: "USDC".to_string(),
            decimals: 6,
            metadata: None,
        }
    }

    #[test]
    fn whitelist_metadata_wins_when_enabled() {
        let contract = Address::repeat_byte(1);
        let mut whitelist = HashMap::new();
        whitelist.insert(contract, usdc());

        let decision = decide(contract, unknown(), &whitelist, true, true, false);
        match decision {
            TokenDecision::Index(currency) => assert_eq!(currency.symbol, "USDC"),
            TokenDecision::Skip => panic!("expected an indexed currency"),
        }
    }

    #[test]
    fn non_whitelisted_token_is_skipped_when_filtering() {
        let decision = decide(Address::repeat_byte(2), usdc(), &HashMap::new(), true, true, false);
        assert!(matches!(decision, TokenDecision::Skip));
    }

    #[test]
    fn unknown_token_is_skipped_unless_indexing_unknown() {
        let whitelist = HashMap::new();
        let skip = decide(Address::repeat_byte(3), unknown(), &whitelist, false, false, false);
        assert!(matches!(skip, TokenDecision::Skip));

        let index = decide(Address::repeat_byte(3), unknown(), &whitelist, false, false, true);
        assert!(matches!(index, TokenDecision::Index(_)));
    }

    #[test]
    fn resolver_is_consulted_when_whitelisted_but_metadata_not_trusted() {
        let contract = Address::repeat_byte(4);
        let mut whitelist = HashMap::new();
        whitelist.insert(contract, usdc());

        let resolved = Currency {
            symbol: "USDC.e".to_string(),
            decimals: 6,
            metadata: None,
        };
        let decision = decide(contract, resolved.clone(), &whitelist, true, false, false);
        match decision {
            TokenDecision::Index(currency) => assert_eq!(currency, resolved),
            TokenDecision::Skip => panic!("expected resolver's currency to be used"),
        }
    }
}
