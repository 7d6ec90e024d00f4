//! Shared scalar types, re-exported from `alloy-primitives` so every crate in
//! the workspace agrees on a single `Address`/`B256`/`U256` representation.

#![warn(missing_docs)]

pub use alloy_primitives::{
    b256, hex, keccak256, Address, Bloom, BloomInput, Bytes, B256, B64, U256, U64,
};

/// Keccak-256 hash of the RLP encoding of an empty string (`0x80`).
///
/// This is the code hash of an externally-owned account and the storage root
/// of an account with no storage.
pub const KECCAK_EMPTY: B256 = b256!("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470");

/// Keccak-256 hash of the RLP encoding of an empty byte string (`0x80`).
///
/// This is the storage root of an account with no storage and the state
/// root of an empty trie.
pub const KECCAK_NULL_RLP: B256 = b256!("56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421");

/// Keccak-256 hash of the RLP encoding of an empty list, `rlp([])`.
///
/// This is the `ommersHash` of a block with no uncles.
pub const KECCAK_RLP_EMPTY_ARRAY: B256 = b256!("1dcc4de8dec75d7aab85b567b6ccd41ad312451b948a7413f0a142fd40d49347");
