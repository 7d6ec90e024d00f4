//! The orchestrator's output shapes: block.md and spec.md don't name these
//! directly, so they're modelled after the Rosetta `/block` response body
//! these operations are destined for — just enough structure for
//! `rosetta-server` to serialize, nothing the REST layer itself should own.

use rosetta_primitives::{Address, B256};
use rosetta_types::{Operation, SyncStatus};

/// A block's position: both its height and its hash, since Rosetta
/// responses key on the pair rather than either alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct BlockIdentifier {
    /// The block's height.
    pub index: u64,
    /// The block's hash.
    pub hash: B256,
}

/// One transaction's normalized operations, keyed by its hash. The
/// block-level reward credit (spec §4.3b) is carried as a transaction
/// whose hash is the block's own hash, conventionally first in
/// [`NormalizedBlock::transactions`] — mirroring the "coinbase
/// transaction" convention most Rosetta implementations use for
/// block-level events that aren't really transactions.
#[derive(Clone, Debug, serde::Serialize)]
pub struct NormalizedTransaction {
    /// The transaction's hash (or the block's hash, for the reward
    /// pseudo-transaction).
    pub hash: B256,
    /// This transaction's operations, densely indexed from zero
    /// (invariant P1).
    pub operations: Vec<Operation>,
}

/// A fully normalized block: identifiers plus every transaction's
/// operations, ready for the REST layer to serialize as a Rosetta
/// `/block` response.
#[derive(Clone, Debug, serde::Serialize)]
pub struct NormalizedBlock {
    /// This block's identifier.
    pub block_identifier: BlockIdentifier,
    /// The parent block's identifier.
    pub parent_block_identifier: BlockIdentifier,
    /// Milliseconds since the Unix epoch (Rosetta convention; the node
    /// reports seconds).
    pub timestamp_millis: u64,
    /// Every transaction in the block, plus the reward pseudo-transaction
    /// if one was produced.
    pub transactions: Vec<NormalizedTransaction>,
}

/// The result of `/account/balance`: the account's current balance in the
/// chain's native currency, at the block it was actually read at (which
/// may differ from the block requested if the caller asked for
/// `"latest"`).
#[derive(Clone, Debug, serde::Serialize)]
pub struct NormalizedAccountBalance {
    /// The account queried.
    pub account: Address,
    /// The block the balance was read at.
    pub block_identifier: BlockIdentifier,
    /// The balance, in wei, as a decimal string (Rosetta convention).
    pub balance: String,
}

/// The result of `/network/status`: chain tip plus sync/peering state.
#[derive(Clone, Debug, serde::Serialize)]
pub struct NormalizedNetworkStatus {
    /// The chain's current tip.
    pub current_block_identifier: BlockIdentifier,
    /// The tip's timestamp, in milliseconds since the Unix epoch.
    pub current_block_timestamp_millis: u64,
    /// The genesis block's identifier.
    pub genesis_block_identifier: BlockIdentifier,
    /// Sync progress, if the node reports one and `supports_syncing` is set.
    pub sync_status: Option<SyncStatus>,
    /// Connected peers, empty unless `supports_syncing` is set and the node
    /// exposes `admin_peers`.
    pub peers: Vec<rosetta_types::Peer>,
}
