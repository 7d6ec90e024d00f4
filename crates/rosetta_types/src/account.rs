//! State account and Merkle-Patricia inclusion-proof types (spec §3, §4.5).

use alloy_rlp::{RlpDecodable, RlpEncodable};
use rosetta_primitives::{Address, Bytes, B256, U256};

/// An `eth_getProof` response: an account's state plus the trie nodes that
/// witness its inclusion under a state root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountProof {
    /// The account being proven.
    pub address: Address,
    /// The account's balance, in wei.
    pub balance: U256,
    /// The account's transaction count.
    pub nonce: u64,
    /// Root of the account's storage trie.
    pub storage_hash: B256,
    /// Hash of the account's contract code (`KECCAK_EMPTY` for an EOA).
    pub code_hash: B256,
    /// Ordered RLP-encoded trie nodes from the state root to the account's
    /// leaf node.
    pub account_proof: Vec<Bytes>,
}

/// The RLP-encoded leaf value of an account in the state trie.
///
/// Field order is encoding order, matching consensus `StateAccount`
/// encoding: `[nonce, balance, storageRoot, codeHash]`.
#[derive(Clone, Debug, Default, PartialEq, Eq, RlpEncodable, RlpDecodable)]
pub struct StateAccount {
    /// Transaction count.
    pub nonce: u64,
    /// Balance, in wei.
    pub balance: U256,
    /// Root of the account's storage trie.
    pub storage_root: B256,
    /// Hash of the account's contract code.
    pub code_hash: B256,
}

#[cfg(test)]
mod tests {
    use alloy_rlp::Decodable;

    use super::*;

    #[test]
    fn state_account_roundtrips_through_rlp() {
        let account = StateAccount {
            nonce: 7,
            balance: U256::from(1_000_000u64),
            storage_root: rosetta_primitives::KECCAK_NULL_RLP,
            code_hash: rosetta_primitives::KECCAK_EMPTY,
        };

        let encoded = alloy_rlp::encode(&account);
        let decoded = StateAccount::decode(&mut encoded.as_slice()).unwrap();
        assert_eq!(account, decoded);
    }
}
