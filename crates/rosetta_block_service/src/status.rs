//! `/network/status` (spec §4.1 `status`, §6): chain tip, sync progress,
//! and connected peers.

use tokio_util::sync::CancellationToken;

use crate::model::{BlockIdentifier, NormalizedNetworkStatus};
use crate::BlockService;
use rosetta_config::RosettaError;
use rosetta_node_adapter::BlockId;

impl BlockService {
    /// Reports the chain's current tip and sync state (spec §4.1
    /// `status`). Peers/sync status are empty/`None` unless
    /// `supports_syncing` is set, matching the node adapter's own
    /// capability gating.
    #[tracing::instrument(level = "debug", skip(self, cancellation))]
    pub async fn network_status(
        &self,
        cancellation: CancellationToken,
    ) -> Result<NormalizedNetworkStatus, RosettaError> {
        let (current_number, _current_time, sync_status, peers) = self.adapter.status(&cancellation).await?;

        let current_block = self.adapter.get_block(BlockId::Number(current_number), &cancellation).await?;
        let genesis_block = self.adapter.get_block(BlockId::Number(0), &cancellation).await?;

        let (sync_status, peers) = if self.config.supports_syncing {
            (sync_status, peers)
        } else {
            (None, Vec::new())
        };

        Ok(NormalizedNetworkStatus {
            current_block_identifier: BlockIdentifier {
                index: current_block.header.number,
                hash: current_block.hash,
            },
            current_block_timestamp_millis: current_block.header.timestamp.saturating_mul(1000),
            genesis_block_identifier: BlockIdentifier {
                index: genesis_block.header.number,
                hash: genesis_block.hash,
            },
            sync_status,
            peers,
        })
    }
}
