//! The validator's error taxonomy: one named variant per tamper class the
//! validator can detect, plus the invariant-violation and aggregate-failure
//! shapes around them.

use rosetta_primitives::{Address, B256, U256};

/// Everything that can go wrong while trustlessly validating a block or an
/// account proof.
#[derive(Debug, thiserror::Error)]
pub enum ValidatorError {
    /// `keccak256(rlp(header)) != claimedHash`.
    #[error("block hash mismatch: expected {expected}, node claimed {claimed}")]
    InvalidBlockHash {
        /// The locally recomputed hash.
        expected: B256,
        /// The hash the node reported.
        claimed: B256,
    },
    /// The recomputed transactions trie root doesn't match `header.txRoot`.
    #[error("transactions root mismatch: expected {expected}, computed {computed}")]
    InvalidTransactionsHash {
        /// `header.transactions_root`.
        expected: B256,
        /// The locally recomputed root.
        computed: B256,
    },
    /// The recomputed receipts trie root doesn't match `header.receiptRoot`.
    #[error("receipts root mismatch: expected {expected}, computed {computed}")]
    InvalidReceiptsHash {
        /// `header.receipts_root`.
        expected: B256,
        /// The locally recomputed root.
        computed: B256,
    },
    /// The recomputed withdrawals trie root doesn't match
    /// `header.withdrawalsRoot`.
    #[error("withdrawals root mismatch: expected {expected}, computed {computed}")]
    InvalidWithdrawalsHash {
        /// `header.withdrawals_root`.
        expected: B256,
        /// The locally recomputed root.
        computed: B256,
    },
    /// A transaction's signature-recovered sender doesn't match the `from`
    /// field the node reported.
    #[error("transaction {transaction_hash} claims sender {claimed} but recovers to {recovered}")]
    InvalidFromField {
        /// The transaction's hash.
        transaction_hash: B256,
        /// The `from` field the node reported.
        claimed: Address,
        /// The address recovered from `(v, r, s)`.
        recovered: Address,
    },
    /// A transaction's EIP-2718 type id is not yet active under the
    /// signer rules in effect at its own block number (spec §4.5: "pick
    /// the correct signer per chain config … by chain id and fork
    /// schedule") — a node reporting an impossible transaction type for
    /// the block it claims to be included in.
    #[error(
        "transaction {transaction_hash} has type {type_id:#04x}, not yet active at block {block_number:?}"
    )]
    TransactionTypeNotYetActive {
        /// The transaction's hash.
        transaction_hash: B256,
        /// The EIP-2718 type byte the node reported.
        type_id: u8,
        /// The block number the transaction claims to be included in.
        block_number: Option<u64>,
    },
    /// The proven account's nonce doesn't match the expected value.
    #[error("account {address} nonce mismatch: expected {expected}, proven {proven}")]
    AccountNonceMismatch {
        /// The account being checked.
        address: Address,
        /// The value the caller expected.
        expected: u64,
        /// The value the proof attests to.
        proven: u64,
    },
    /// The proven account's balance doesn't match the expected value.
    #[error("account {address} balance mismatch: expected {expected}, proven {proven}")]
    AccountBalanceMismatch {
        /// The account being checked.
        address: Address,
        /// The value the caller expected.
        expected: U256,
        /// The value the proof attests to.
        proven: U256,
    },
    /// The proven account's storage root doesn't match the expected value.
    #[error("account {address} storage hash mismatch: expected {expected}, proven {proven}")]
    AccountStorageHashMismatch {
        /// The account being checked.
        address: Address,
        /// The value the caller expected.
        expected: B256,
        /// The value the proof attests to.
        proven: B256,
    },
    /// The proven account's code hash doesn't match the expected value.
    #[error("account {address} code hash mismatch: expected {expected}, proven {proven}")]
    AccountCodeHashMismatch {
        /// The account being checked.
        address: Address,
        /// The value the caller expected.
        expected: B256,
        /// The value the proof attests to.
        proven: B256,
    },
    /// The proof itself doesn't walk to a valid, internally consistent leaf
    /// under the claimed state root (malformed node, hash mismatch along
    /// the path, or a path that runs out before reaching a value).
    #[error("account {address} proof verification failed: {reason}")]
    AccountVerifyProofFailure {
        /// The account being checked.
        address: Address,
        /// A human-readable description of where the walk failed.
        reason: String,
    },
    /// One or more transactions in a block failed signer recovery or
    /// verification; the per-transaction errors are preserved rather than
    /// collapsed into the first one (spec §4.5: "Aggregate per-transaction
    /// errors; return a combined error if any worker reported failure").
    #[error("{} transaction(s) failed signer verification", .0.len())]
    SignerRecoveryFailures(Vec<ValidatorError>),
    /// An internal invariant was violated, independent of any specific
    /// tamper class (e.g. a malformed RLP node the decoder itself rejects).
    #[error("internal error: {0}")]
    Internal(String),
    /// The validation run was cancelled before it completed.
    #[error("validation cancelled")]
    Cancelled,
}
