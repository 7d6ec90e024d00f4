//! Block header and body types.
//!
//! Mirrors the consensus encoding of an Ethereum block header closely enough
//! that `keccak256(rlp(header)) == block.hash` can be checked directly by
//! [`rosetta_validator`](../rosetta_validator/index.html) (spec invariant:
//! untampered blocks always satisfy this equality).

use alloy_rlp::{RlpDecodable, RlpEncodable};
use rosetta_primitives::{keccak256, Address, Bloom, Bytes, B256, B64, U256};

use crate::{transaction::Transaction, withdrawal::Withdrawal};

/// A consensus block header.
///
/// Field order is encoding order: this type derives `RlpEncodable`, so
/// reordering fields changes the wire format.
#[derive(Clone, Debug, Default, PartialEq, Eq, RlpEncodable, RlpDecodable)]
#[derive(serde::Serialize, serde::Deserialize)]
#[rlp(trailing)]
pub struct Header {
    /// Hash of the parent block's header.
    pub parent_hash: B256,
    /// Keccak-256 hash of the uncle list (`ommersHash`).
    pub ommers_hash: B256,
    /// The block's beneficiary address (`coinbase`/`miner`).
    pub beneficiary: Address,
    /// Root hash of the state trie after this block.
    pub state_root: B256,
    /// Root hash of the transactions trie.
    pub transactions_root: B256,
    /// Root hash of the receipts trie.
    pub receipts_root: B256,
    /// Bloom filter over all transaction logs in the block.
    pub logs_bloom: Bloom,
    /// Proof-of-work difficulty. Zero post-Merge.
    pub difficulty: U256,
    /// Block number.
    pub number: u64,
    /// Maximum gas allowed in this block.
    pub gas_limit: u64,
    /// Total gas used by all transactions in this block.
    pub gas_used: u64,
    /// Unix timestamp at which the block was collated.
    pub timestamp: u64,
    /// Arbitrary extra data.
    pub extra_data: Bytes,
    /// Mix-hash, for PoW verification (or the post-Merge `prevRandao`).
    pub mix_hash: B256,
    /// PoW nonce. Zero post-Merge.
    pub nonce: B64,
    /// Base fee per gas, present from the London hard fork (EIP-1559)
    /// onward.
    pub base_fee_per_gas: Option<u128>,
    /// Root hash of the withdrawals trie, present from the Shanghai hard
    /// fork (EIP-4895) onward. Some L2s repurpose this field; see
    /// [`crate::config::WithdrawalsStyle`].
    pub withdrawals_root: Option<B256>,
    /// Total blob gas used, present from the Cancun hard fork (EIP-4844)
    /// onward.
    pub blob_gas_used: Option<u64>,
    /// Running total of excess blob gas, present from Cancun onward.
    pub excess_blob_gas: Option<u64>,
    /// Root of the beacon chain's parent block, present from Cancun onward.
    pub parent_beacon_block_root: Option<B256>,
    /// Commitment hash of EIP-7685 execution layer requests, present from
    /// the Prague hard fork onward.
    pub requests_hash: Option<B256>,
}

impl Header {
    /// Computes `keccak256(rlp(self))`, the value a correct node must report
    /// as this block's hash.
    pub fn hash(&self) -> B256 {
        keccak256(alloy_rlp::encode(self))
    }
}

/// A full block: header plus body.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Block {
    /// The block's header.
    pub header: Header,
    /// The block's hash, as reported by the node. Validated against
    /// `header.hash()` when trustless block validation is enabled.
    pub hash: B256,
    /// Ordered transactions included in this block.
    pub transactions: Vec<Transaction>,
    /// Uncle ("ommer") headers, non-empty only pre-Merge.
    pub uncles: Vec<Header>,
    /// Withdrawals processed in this block, present from Shanghai onward.
    pub withdrawals: Vec<Withdrawal>,
}

impl Block {
    /// Whether this is the genesis block. Genesis blocks are never traced
    /// (spec §4.2).
    pub fn is_genesis(&self) -> bool {
        self.header.number == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_header_hash_is_deterministic() {
        let header = Header::default();
        assert_eq!(header.hash(), header.hash());
    }
}
