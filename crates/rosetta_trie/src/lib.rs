// Part of this code was adapted from foundry and is distributed under their
// licenses:
// - https://github.com/foundry-rs/foundry/blob/01b16238ff87dc7ca8ee3f5f13e389888c2a2ee4/LICENSE-APACHE
// - https://github.com/foundry-rs/foundry/blob/01b16238ff87dc7ca8ee3f5f13e389888c2a2ee4/LICENSE-MIT
// For the original context see: https://github.com/foundry-rs/foundry/blob/01b16238ff87dc7ca8ee3f5f13e389888c2a2ee4/anvil/core/src/eth/trie.rs

#![warn(missing_docs)]
//! Keccak256 Merkle-Patricia trie root computation.
//!
//! Used to recompute `transactionsRoot`, `receiptsRoot`, and
//! `withdrawalsRoot` from a block's body so they can be compared against
//! the claimed header fields (see `rosetta_validator`).

use rosetta_primitives::B256;
use hash256_std_hasher::Hash256StdHasher;
use sha3::{
    digest::generic_array::{typenum::consts::U32, GenericArray},
    Digest, Keccak256,
};

/// Generates a trie root hash for a vector of key-value tuples.
pub fn trie_root<I, K, V>(input: I) -> B256
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<[u8]> + Ord,
    V: AsRef<[u8]>,
{
    B256::from_slice(triehash::trie_root::<KeccakHasher, _, _, _>(input).as_ref())
}

/// Generates a key-hashed (secure) trie root hash for a vector of key-value
/// tuples.
pub fn sec_trie_root<I, K, V>(input: I) -> B256
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<[u8]>,
    V: AsRef<[u8]>,
{
    B256::from_slice(triehash::sec_trie_root::<KeccakHasher, _, _, _>(input).as_ref())
}

/// Generates a trie root hash for an ordered sequence of values, keyed by
/// their RLP-encoded index. This is how `transactionsRoot`,
/// `receiptsRoot`, and `withdrawalsRoot` are all computed: the key at each
/// position is `rlp(index)`, not the item's hash.
pub fn ordered_trie_root<I, V>(input: I) -> B256
where
    I: IntoIterator<Item = V>,
    V: AsRef<[u8]>,
{
    B256::from_slice(triehash::ordered_trie_root::<KeccakHasher, I>(input).as_ref())
}

struct KeccakHasher;

impl hash_db::Hasher for KeccakHasher {
    type Out = GenericArray<u8, U32>;

    type StdHasher = Hash256StdHasher;

    const LENGTH: usize = 32;

    fn hash(x: &[u8]) -> Self::Out {
        Keccak256::digest(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_trie_root_of_empty_is_keccak_null_rlp() {
        let root = ordered_trie_root(Vec::<Vec<u8>>::new());
        assert_eq!(root, rosetta_primitives::KECCAK_NULL_RLP);
    }

    #[test]
    fn ordered_trie_root_single_item_matches_manual_trie() {
        let items = vec![vec![0xde, 0xad, 0xbe, 0xef]];
        let root = ordered_trie_root(items.clone());

        // `rlp(0u64)` is the single byte `0x80` (RLP encodes the integer zero
        // as an empty string).
        let manual = trie_root(vec![(vec![0x80u8], items[0].clone())]);
        assert_eq!(root, manual);
    }
}
