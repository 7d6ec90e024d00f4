//! Adapts [`NodeAdapter::call_contract`] to the narrow
//! [`TokenContractRpc`] capability [`rosetta_currency::CurrencyResolver`]
//! needs, so that crate stays decoupled from the RPC transport (spec §9
//! "narrow capability" pattern).

use rosetta_currency::TokenContractRpc;
use rosetta_node_adapter::{NodeAdapter, NodeAdapterError};
use rosetta_primitives::Address;
use tokio_util::sync::CancellationToken;

/// Probes a token contract's `symbol()`/`decimals()` at a fixed block
/// number, against a borrowed [`NodeAdapter`]. Constructed fresh per
/// block-service call since the block number and cancellation token it
/// closes over are request-scoped.
pub struct NodeCurrencyRpc<'a> {
    adapter: &'a NodeAdapter,
    block_number: u64,
    cancellation: CancellationToken,
}

impl<'a> NodeCurrencyRpc<'a> {
    /// Builds a probe pinned to `block_number`, propagating `cancellation`
    /// into every `eth_call` it issues.
    pub fn new(adapter: &'a NodeAdapter, block_number: u64, cancellation: CancellationToken) -> Self {
        NodeCurrencyRpc {
            adapter,
            block_number,
            cancellation,
        }
    }
}

#[async_trait::async_trait]
impl<'a> TokenContractRpc for NodeCurrencyRpc<'a> {
    type Error = NodeAdapterError;

    async fn call(&self, address: Address, calldata: [u8; 4]) -> Result<Vec<u8>, Self::Error> {
        self.adapter
            .call_contract(address, calldata.to_vec(), self.block_number, &self.cancellation)
            .await
            .map(|bytes| bytes.to_vec())
    }
}
