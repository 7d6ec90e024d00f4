//! Immutable per-process configuration (spec §3 `RosettaConfig`, §9 design
//! notes on trace-flavor and withdrawals-style dispatch).

use std::collections::HashMap;

use rosetta_primitives::Address;

use crate::operation::Currency;

/// Which trace backend to query and how to interpret its result shape
/// (spec §4.1, §9 "Trace-flavor variation").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TraceFlavor {
    /// Geth's native `debug_traceBlockByHash`/`debug_traceTransaction` with
    /// the `callTracer` tracer.
    Native,
    /// A JS-tracer script passed to the same `debug_trace*` endpoints,
    /// for nodes whose native call tracer is unavailable or differs.
    Js,
    /// OpenEthereum/Parity's `trace_replayBlockTransactions`/
    /// `trace_replayTransaction`.
    OpenEthereum,
}

/// How a chain uses the header's `withdrawalsRoot` field (spec §9,
/// "Optimism-style withdrawals").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WithdrawalsStyle {
    /// Standard EIP-4895: the field commits to the block's validator
    /// withdrawal list.
    Standard,
    /// The chain repurposes the field to carry an L2 storage root when
    /// there are no withdrawals; in that case it's compared against a
    /// well-known sentinel instead of a trie root over an empty list.
    StorageRootInWithdrawalsField,
}

/// The well-known sentinel root OP-stack chains emit in place of an empty
/// withdrawals trie root (spec §4.5 "Withdrawals validation").
pub const KNOWN_OPTIMISM_SENTINEL_ROOT: &str =
    "0x56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421";

/// Process-wide, immutable configuration governing normalization and
/// validation behavior.
#[derive(Clone, Debug)]
pub struct RosettaConfig {
    /// Which trace backend/format to use.
    pub trace_flavor: TraceFlavor,
    /// Whether the chain has an explicit block/uncle reward to emit as a
    /// `Reward` operation.
    pub supports_reward_tx: bool,
    /// Whether the chain has a distinct "block author" concept from
    /// `coinbase` (e.g. some PoA chains).
    pub supports_block_author: bool,
    /// Whether the node exposes `eth_syncing`/`admin_peers`.
    pub supports_syncing: bool,
    /// Whether ERC-20 logs should be filtered against `whitelist`.
    pub filter_tokens: bool,
    /// Known ERC-20 contracts and their `(symbol, decimals)`, keyed by
    /// contract address.
    pub whitelist: HashMap<Address, Currency>,
    /// When `filter_tokens` is set, whether to trust the whitelist entry's
    /// currency directly rather than re-resolving via RPC.
    pub use_whitelist_metadata: bool,
    /// Whether to emit operations for ERC-20s the resolver could not
    /// identify (returned the `UNKNOWN_ERC20` sentinel).
    pub index_unknown_tokens: bool,
    /// Whether to recompute and check the block header hash, transaction
    /// trie root, receipt trie root, and withdrawals trie root.
    pub trustless_block_validation: bool,
    /// Whether `/account/balance` verifies the returned account against an
    /// independently obtained state root via a Merkle proof.
    pub trustless_account_validation: bool,
    /// How the chain uses the withdrawals-root header field.
    pub withdrawals_style: WithdrawalsStyle,
    /// The native currency, e.g. `("ETH", 18)`.
    pub native_currency: Currency,
}

impl RosettaConfig {
    /// A configuration matching Ethereum mainnet's defaults: native trace
    /// flavor, no separate block author, standard withdrawals, no
    /// block/uncle reward post-Merge, trustless validation off (callers
    /// opt in explicitly).
    pub fn ethereum_mainnet() -> Self {
        RosettaConfig {
            trace_flavor: TraceFlavor::Native,
            supports_reward_tx: false,
            supports_block_author: false,
            supports_syncing: true,
            filter_tokens: false,
            whitelist: HashMap::new(),
            use_whitelist_metadata: false,
            index_unknown_tokens: true,
            trustless_block_validation: false,
            trustless_account_validation: false,
            withdrawals_style: WithdrawalsStyle::Standard,
            native_currency: Currency::native("ETH", 18),
        }
    }
}
