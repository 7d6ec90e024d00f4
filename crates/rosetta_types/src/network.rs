//! Network-identification value types used by the `/network/*` endpoints
//! (spec §6). Routing itself is out of core scope; these shapes exist so
//! the status/options responses the block service feeds into it have
//! somewhere to live.

use serde::{Deserialize, Serialize};

/// Identifies a blockchain network, e.g. `{"ethereum", "mainnet"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkIdentifier {
    /// The blockchain's canonical name, e.g. `"ethereum"`.
    pub blockchain: String,
    /// The network within that blockchain, e.g. `"mainnet"`, `"sepolia"`.
    pub network: String,
    /// Further disambiguation for chains that shard by sub-network.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_network_identifier: Option<String>,
}

/// Node sync progress, mirroring `eth_syncing`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStatus {
    /// The most recently processed block.
    pub current_index: u64,
    /// The block the node is syncing toward.
    pub target_index: Option<u64>,
    /// A human-readable description of the current sync stage.
    pub stage: Option<String>,
    /// Whether the node considers itself caught up.
    pub synced: bool,
}

/// A connected peer, mirroring `admin_peers`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peer {
    /// The peer's node id.
    pub peer_id: String,
    /// Arbitrary peer metadata the node reports (client version, network
    /// address, …).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}
