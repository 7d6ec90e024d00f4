//! Account-state Merkle-Patricia inclusion-proof verification (spec §4.5
//! "Account proof verification", used by `/account/balance` when
//! `trustlessAccountValidation` is enabled).
//!
//! `eth_getProof` returns the proof as a list of RLP-encoded trie nodes, root
//! first, each one hashing to the pointer its parent referenced. Walking it
//! is a synchronous, purely local replay of the trie lookup a full node
//! would do: no network access, no concurrency.
//!
//! Nibble paths and hex-prefix (HP) decoding follow the branch/leaf/extension
//! node shapes used throughout Ethereum's Merkle-Patricia trie
//! implementations (`rlp([v0..v15, value])` for a 17-element branch,
//! `rlp([encoded_path, value_or_pointer])` for a 2-element leaf/extension).

use alloy_rlp::Decodable;
use rosetta_primitives::{keccak256, Address, Bytes, B256, U256};
use rosetta_types::{AccountProof, StateAccount};

use crate::errors::ValidatorError;

const PREFIX_EXTENSION_EVEN: u8 = 0;
const PREFIX_EXTENSION_ODD: u8 = 1;
const PREFIX_LEAF_EVEN: u8 = 2;
const PREFIX_LEAF_ODD: u8 = 3;

#[derive(Debug)]
enum TrieNode {
    Branch { children: Vec<NodeElement> },
    Leaf { nibbles: Vec<u8>, value: Bytes },
    Extension { nibbles: Vec<u8>, pointer: Bytes },
}

#[derive(Debug, Clone)]
enum NodeElement {
    Hash(B256),
    Inline(Bytes),
    Empty,
}

fn decode_node(raw: &[u8]) -> Result<TrieNode, ValidatorError> {
    let mut buf = raw;
    let items = Vec::<Bytes>::decode(&mut buf)
        .map_err(|error| ValidatorError::Internal(format!("malformed trie node RLP: {error}")))?;

    match items.len() {
        17 => {
            let children = items
                .into_iter()
                .map(|item| {
                    if item.is_empty() {
                        NodeElement::Empty
                    } else if item.len() == 32 {
                        NodeElement::Hash(B256::from_slice(&item))
                    } else {
                        NodeElement::Inline(item)
                    }
                })
                .collect();
            Ok(TrieNode::Branch { children })
        }
        2 => {
            let path = &items[0];
            let (is_leaf, nibbles) = decode_hex_prefix(path)?;
            if is_leaf {
                Ok(TrieNode::Leaf {
                    nibbles,
                    value: items[1].clone(),
                })
            } else {
                Ok(TrieNode::Extension {
                    nibbles,
                    pointer: items[1].clone(),
                })
            }
        }
        other => Err(ValidatorError::Internal(format!(
            "trie node has unexpected arity {other}, expected 2 or 17"
        ))),
    }
}

/// Decodes a hex-prefix-encoded path into `(is_leaf, nibbles)`.
fn decode_hex_prefix(path: &[u8]) -> Result<(bool, Vec<u8>), ValidatorError> {
    let Some(&first) = path.first() else {
        return Err(ValidatorError::Internal("empty hex-prefix path".to_string()));
    };

    let prefix = first >> 4;
    let is_odd = match prefix {
        PREFIX_EXTENSION_EVEN | PREFIX_LEAF_EVEN => false,
        PREFIX_EXTENSION_ODD | PREFIX_LEAF_ODD => true,
        other => {
            return Err(ValidatorError::Internal(format!(
                "invalid hex-prefix marker nibble {other}"
            )))
        }
    };
    let is_leaf = matches!(prefix, PREFIX_LEAF_EVEN | PREFIX_LEAF_ODD);

    let mut nibbles = Vec::with_capacity(path.len() * 2);
    if is_odd {
        nibbles.push(first & 0x0f);
    }
    for &byte in &path[1..] {
        nibbles.push(byte >> 4);
        nibbles.push(byte & 0x0f);
    }
    Ok((is_leaf, nibbles))
}

fn address_nibbles(address: Address) -> Vec<u8> {
    let hash = keccak256(address.as_slice());
    hash.iter().flat_map(|byte| [byte >> 4, byte & 0x0f]).collect()
}

/// Walks `proof.account_proof` against `state_root`, decodes the leaf value
/// as a [`StateAccount`], and checks it against the expected field values.
/// `expected_*` come from whatever the caller already believes about the
/// account (e.g. values returned by the node alongside the proof); this
/// function's job is to confirm those values are the ones actually committed
/// to by `state_root`, not to source them.
pub fn validate_account_proof(
    proof: &AccountProof,
    state_root: B256,
    expected_nonce: u64,
    expected_balance: U256,
    expected_storage_hash: B256,
    expected_code_hash: B256,
) -> Result<(), ValidatorError> {
    let account = walk_proof(proof, state_root)?;

    if account.nonce != expected_nonce {
        return Err(ValidatorError::AccountNonceMismatch {
            address: proof.address,
            expected: expected_nonce,
            proven: account.nonce,
        });
    }
    if account.balance != expected_balance {
        return Err(ValidatorError::AccountBalanceMismatch {
            address: proof.address,
            expected: expected_balance,
            proven: account.balance,
        });
    }
    if account.storage_root != expected_storage_hash {
        return Err(ValidatorError::AccountStorageHashMismatch {
            address: proof.address,
            expected: expected_storage_hash,
            proven: account.storage_root,
        });
    }
    if account.code_hash != expected_code_hash {
        return Err(ValidatorError::AccountCodeHashMismatch {
            address: proof.address,
            expected: expected_code_hash,
            proven: account.code_hash,
        });
    }
    Ok(())
}

fn walk_proof(proof: &AccountProof, state_root: B256) -> Result<StateAccount, ValidatorError> {
    let fail = |reason: String| ValidatorError::AccountVerifyProofFailure {
        address: proof.address,
        reason,
    };

    let mut nibbles = address_nibbles(proof.address);
    let mut expected_hash = state_root;

    let mut nodes = proof.account_proof.iter().peekable();
    while let Some(raw) = nodes.next() {
        let actual_hash = keccak256(raw.as_ref());
        if actual_hash != expected_hash {
            return Err(fail(format!(
                "node hash {actual_hash} does not match expected pointer {expected_hash}"
            )));
        }

        let node = decode_node(raw)?;
        match node {
            TrieNode::Branch { children } => {
                match nibbles.first() {
                    None => {
                        // Path exhausted at a branch: the 17th slot holds the value.
                        return decode_leaf_value(&children[16]);
                    }
                    Some(&nibble) => {
                        nibbles.remove(0);
                        match &children[nibble as usize] {
                            NodeElement::Empty => {
                                return Err(fail("path not found: empty branch slot".to_string()))
                            }
                            NodeElement::Hash(hash) => expected_hash = *hash,
                            NodeElement::Inline(bytes) => {
                                return decode_inline_node(bytes, &nibbles, &fail)
                            }
                        }
                    }
                }
            }
            TrieNode::Leaf { nibbles: leaf_nibbles, value } => {
                if leaf_nibbles != nibbles {
                    return Err(fail("leaf path does not match remaining address nibbles".to_string()));
                }
                return StateAccount::decode(&mut value.as_ref())
                    .map_err(|error| fail(format!("malformed account RLP: {error}")));
            }
            TrieNode::Extension { nibbles: ext_nibbles, pointer } => {
                if nibbles.len() < ext_nibbles.len() || nibbles[..ext_nibbles.len()] != ext_nibbles[..] {
                    return Err(fail("extension path does not share remaining address nibbles".to_string()));
                }
                nibbles.drain(..ext_nibbles.len());
                if pointer.len() == 32 {
                    expected_hash = B256::from_slice(&pointer);
                } else {
                    return decode_inline_node(&pointer, &nibbles, &fail);
                }
            }
        }

        if nodes.peek().is_none() {
            return Err(fail("proof ended before reaching a leaf".to_string()));
        }
    }

    Err(fail("empty proof".to_string()))
}

fn decode_inline_node(
    bytes: &[u8],
    remaining_nibbles: &[u8],
    fail: &dyn Fn(String) -> ValidatorError,
) -> Result<StateAccount, ValidatorError> {
    let node = decode_node(bytes)?;
    match node {
        TrieNode::Leaf { nibbles, value } => {
            if nibbles != remaining_nibbles {
                return Err(fail("inline leaf path mismatch".to_string()));
            }
            StateAccount::decode(&mut value.as_ref())
                .map_err(|error| fail(format!("malformed account RLP: {error}")))
        }
        _ => Err(fail("only inline leaf nodes are supported at proof termination".to_string())),
    }
}

fn decode_leaf_value(element: &NodeElement) -> Result<StateAccount, ValidatorError> {
    let bytes = match element {
        NodeElement::Inline(bytes) => bytes.clone(),
        _ => {
            return Err(ValidatorError::Internal(
                "branch value slot is not an inline RLP string".to_string(),
            ))
        }
    };
    StateAccount::decode(&mut bytes.as_ref())
        .map_err(|error| ValidatorError::Internal(format!("malformed account RLP: {error}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_rlp::Encodable;

    fn leaf_node_for(address: Address, account: &StateAccount) -> (Bytes, B256) {
        let nibbles = address_nibbles(address);
        let mut path = vec![0x20u8]; // PREFIX_LEAF_EVEN << 4
        for chunk in nibbles.chunks(2) {
            path.push((chunk[0] << 4) | chunk.get(1).copied().unwrap_or(0));
        }

        let mut value_buf = Vec::new();
        account.encode(&mut value_buf);

        let mut items = Vec::new();
        Bytes::from(path).encode(&mut items);
        items.extend_from_slice(&value_buf);

        let header = alloy_rlp::Header {
            list: true,
            payload_length: items.len(),
        };
        let mut out = Vec::new();
        header.encode(&mut out);
        out.extend_from_slice(&items);

        let hash = keccak256(&out);
        (Bytes::from(out), hash)
    }

    #[test]
    fn single_leaf_proof_round_trips() {
        let address = Address::repeat_byte(0x42);
        let account = StateAccount {
            nonce: 7,
            balance: U256::from(1000u64),
            storage_root: B256::repeat_byte(0x11),
            code_hash: B256::repeat_byte(0x22),
        };
        let (node_bytes, root) = leaf_node_for(address, &account);

        let proof = AccountProof {
            address,
            balance: account.balance,
            nonce: account.nonce,
            storage_hash: account.storage_root,
            code_hash: account.code_hash,
            account_proof: vec![node_bytes],
        };

        assert!(validate_account_proof(
            &proof,
            root,
            account.nonce,
            account.balance,
            account.storage_root,
            account.code_hash,
        )
        .is_ok());
    }

    #[test]
    fn tampered_balance_is_rejected() {
        let address = Address::repeat_byte(0x42);
        let account = StateAccount {
            nonce: 7,
            balance: U256::from(1000u64),
            storage_root: B256::repeat_byte(0x11),
            code_hash: B256::repeat_byte(0x22),
        };
        let (node_bytes, root) = leaf_node_for(address, &account);

        let proof = AccountProof {
            address,
            balance: account.balance,
            nonce: account.nonce,
            storage_hash: account.storage_root,
            code_hash: account.code_hash,
            account_proof: vec![node_bytes],
        };

        let result = validate_account_proof(
            &proof,
            root,
            account.nonce,
            U256::from(999_999u64),
            account.storage_root,
            account.code_hash,
        );
        assert!(matches!(result, Err(ValidatorError::AccountBalanceMismatch { .. })));
    }

    #[test]
    fn wrong_root_is_rejected() {
        let address = Address::repeat_byte(0x42);
        let account = StateAccount {
            nonce: 7,
            balance: U256::from(1000u64),
            storage_root: B256::repeat_byte(0x11),
            code_hash: B256::repeat_byte(0x22),
        };
        let (node_bytes, _root) = leaf_node_for(address, &account);

        let proof = AccountProof {
            address,
            balance: account.balance,
            nonce: account.nonce,
            storage_hash: account.storage_root,
            code_hash: account.code_hash,
            account_proof: vec![node_bytes],
        };

        let wrong_root = B256::repeat_byte(0xFF);
        let result = validate_account_proof(
            &proof,
            wrong_root,
            account.nonce,
            account.balance,
            account.storage_root,
            account.code_hash,
        );
        assert!(matches!(result, Err(ValidatorError::AccountVerifyProofFailure { .. })));
    }
}
