//! Request/response shapes for the routes in spec §6. Only `/account/balance`
//! and `/block` carry real data; the rest wrap the block service's output
//! (or a placeholder) in the envelope Rosetta clients expect.

use rosetta_block_service::NormalizedBlock;
use rosetta_types::{NetworkIdentifier, Peer, SyncStatus};
use serde::{Deserialize, Serialize};

/// A block reference: by index, by hash, or (absent both) "the tip".
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PartialBlockIdentifier {
    /// The block height.
    pub index: Option<u64>,
    /// The block hash, `0x`-prefixed hex.
    pub hash: Option<String>,
}

/// Common envelope every Rosetta request carries: which network the
/// request targets.
#[derive(Clone, Debug, Deserialize)]
pub struct NetworkRequest {
    /// The network this request targets.
    pub network_identifier: NetworkIdentifier,
}

/// `/block` request body.
#[derive(Clone, Debug, Deserialize)]
pub struct BlockRequest {
    /// The network this request targets.
    pub network_identifier: NetworkIdentifier,
    /// Which block to fetch.
    pub block_identifier: PartialBlockIdentifier,
}

/// An account reference: just an address, since this middleware has no
/// sub-account support.
#[derive(Clone, Debug, Deserialize)]
pub struct AccountIdentifierDto {
    /// The account's address, `0x`-prefixed hex.
    pub address: String,
}

/// `/account/balance` request body.
#[derive(Clone, Debug, Deserialize)]
pub struct AccountBalanceRequest {
    /// The network this request targets.
    pub network_identifier: NetworkIdentifier,
    /// Which account to look up.
    pub account_identifier: AccountIdentifierDto,
    /// Which block to evaluate the balance at. `None` means the current tip.
    #[serde(default)]
    pub block_identifier: Option<PartialBlockIdentifier>,
}

/// `/network/list` response: every network this instance serves (always
/// exactly one, since a process is configured for a single chain).
#[derive(Clone, Debug, Serialize)]
pub struct NetworkListResponse {
    /// The networks this instance can answer requests for.
    pub network_identifiers: Vec<NetworkIdentifier>,
}

/// `/block` response.
#[derive(Clone, Debug, Serialize)]
pub struct BlockResponse {
    /// The normalized block.
    pub block: NormalizedBlock,
}

/// A balance paired with the block it was evaluated at.
#[derive(Clone, Debug, Serialize)]
pub struct AccountBalanceResponse {
    /// The block the balance was read at.
    pub block_identifier: rosetta_block_service::BlockIdentifier,
    /// The account's balance in each currency this middleware tracks (just
    /// the native currency; this service does not index per-token
    /// balances).
    pub balances: Vec<rosetta_types::Amount>,
}

/// `/network/status` response.
#[derive(Clone, Debug, Serialize)]
pub struct NetworkStatusResponse {
    /// The chain's current tip.
    pub current_block_identifier: rosetta_block_service::BlockIdentifier,
    /// The tip's timestamp, in milliseconds since the epoch.
    pub current_block_timestamp: u64,
    /// The chain's genesis block.
    pub genesis_block_identifier: rosetta_block_service::BlockIdentifier,
    /// Sync progress, when the node reports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_status: Option<SyncStatus>,
    /// Connected peers.
    pub peers: Vec<Peer>,
}

/// `/network/options` response: the fixed set of operation types/statuses
/// and error codes this middleware can produce (spec §6).
#[derive(Clone, Debug, Serialize)]
pub struct NetworkOptionsResponse {
    /// The middleware's version metadata.
    pub version: VersionInfo,
    /// What this middleware can report: operation types/statuses and
    /// error codes.
    pub allow: Allow,
}

/// Version metadata reported by `/network/options`.
#[derive(Clone, Debug, Serialize)]
pub struct VersionInfo {
    /// The Rosetta API specification version this server implements.
    pub rosetta_version: String,
    /// This server's own version.
    pub node_version: String,
}

/// The fixed capability set `/network/options` reports.
#[derive(Clone, Debug, Serialize)]
pub struct Allow {
    /// Every operation type this middleware can emit.
    pub operation_types: Vec<rosetta_types::OperationType>,
    /// Every status an operation can carry.
    pub operation_statuses: Vec<rosetta_types::OperationStatus>,
    /// Every error code this middleware can return, with its retriable flag.
    pub errors: Vec<rosetta_config::WireError>,
}
