#![warn(missing_docs)]
//! The orchestrator (spec §2 "Control flow"): wires C1 ([`rosetta_node_adapter`]),
//! C2 ([`rosetta_trace`]), C3 ([`rosetta_ops`]), C4 ([`rosetta_currency`]),
//! and C5 ([`rosetta_validator`]) together into the end-to-end block and
//! account-balance requests the REST layer serves. Nothing here is named
//! by spec.md directly — it's the composition root a distilled
//! component-by-component spec leaves implicit.

mod account;
mod block;
mod currency_rpc;
mod model;
mod status;

pub use model::{
    BlockIdentifier, NormalizedAccountBalance, NormalizedBlock, NormalizedNetworkStatus, NormalizedTransaction,
};

use std::sync::Arc;

use rosetta_chain_config::ChainConfig;
use rosetta_currency::CurrencyResolver;
use rosetta_node_adapter::NodeAdapter;
use rosetta_types::RosettaConfig;

/// Composes a single configured node, chain, and policy into the handlers
/// the REST layer calls per request. One instance is built at startup and
/// shared (behind an `Arc`) across every request.
pub struct BlockService {
    adapter: NodeAdapter,
    currency_resolver: Arc<CurrencyResolver>,
    chain_config: Arc<ChainConfig>,
    config: RosettaConfig,
}

impl BlockService {
    /// Builds a block service around an already-constructed adapter, chain
    /// config, and policy. The currency resolver is owned internally since
    /// nothing above this layer needs to share it with anything but this
    /// service's own requests.
    pub fn new(adapter: NodeAdapter, chain_config: Arc<ChainConfig>, config: RosettaConfig) -> Self {
        BlockService {
            adapter,
            currency_resolver: Arc::new(CurrencyResolver::new()),
            chain_config,
            config,
        }
    }
}
