//! Polymorphic transaction representation.
//!
//! Ethereum transactions come in five wire formats (legacy, EIP-2930 access
//! list, EIP-1559 dynamic fee, EIP-4844 blob, EIP-7702 set-code). Rather than
//! modelling this with inheritance, [`TxVariant`] is a tagged enum; the
//! sender is *never* stored directly (spec §3) — it is always either the
//! `from` field the node reported (used for comparison) or the address
//! recovered from `(v, r, s)` by [`rosetta_validator`].

use alloy_rlp::{BufMut, Encodable, Header as RlpHeader};
use rosetta_primitives::{Address, Bytes, B256, U256};
use rosetta_signer::{SignatureWithRecoveryId, SignatureWithYParity};

/// Destination of a transaction: an existing account, or contract creation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TxKind {
    /// Contract creation: the `to` field is empty.
    #[default]
    Create,
    /// A call into an existing (or not-yet-existing, for CREATE2 proxies)
    /// account.
    Call(Address),
}

impl TxKind {
    /// The destination address, or `None` for contract creation.
    pub fn to(&self) -> Option<Address> {
        match self {
            TxKind::Create => None,
            TxKind::Call(address) => Some(*address),
        }
    }
}

impl From<Option<Address>> for TxKind {
    fn from(value: Option<Address>) -> Self {
        match value {
            Some(address) => TxKind::Call(address),
            None => TxKind::Create,
        }
    }
}

impl Encodable for TxKind {
    fn encode(&self, out: &mut dyn BufMut) {
        match self {
            TxKind::Call(address) => address.encode(out),
            TxKind::Create => out.put_u8(alloy_rlp::EMPTY_STRING_CODE),
        }
    }

    fn length(&self) -> usize {
        match self {
            TxKind::Call(address) => address.length(),
            TxKind::Create => 1,
        }
    }
}

/// An access list entry: a contract address plus the storage slots a
/// transaction pre-declares it will touch (EIP-2930).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccessListItem {
    /// The account address.
    pub address: Address,
    /// Storage slots within `address` that are pre-declared.
    pub storage_keys: Vec<B256>,
}

/// An EIP-7702 authorization tuple: a signed delegation from an EOA to a
/// piece of contract code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Authorization {
    /// Chain id the authorization is valid on, or zero for any chain.
    pub chain_id: u64,
    /// The address whose code the EOA delegates to.
    pub address: Address,
    /// The authorizing account's nonce.
    pub nonce: u64,
    /// The authorization's own signature, separate from the transaction's.
    pub signature: SignatureWithYParity,
}

/// The five transaction wire formats, tagged by EIP.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TxVariant {
    /// Pre-EIP-2930. `chain_id` is `Some` for EIP-155 replay-protected
    /// transactions, `None` for the original pre-155 form.
    Legacy {
        /// EIP-155 chain id, if replay protection is in use.
        chain_id: Option<u64>,
        gas_price: u128,
        signature: SignatureWithRecoveryId,
    },
    /// EIP-2930: legacy fee model plus an access list.
    AccessList {
        chain_id: u64,
        gas_price: u128,
        access_list: Vec<AccessListItem>,
        signature: SignatureWithYParity,
    },
    /// EIP-1559: priority-fee/max-fee model plus an access list.
    DynamicFee {
        chain_id: u64,
        max_priority_fee_per_gas: u128,
        max_fee_per_gas: u128,
        access_list: Vec<AccessListItem>,
        signature: SignatureWithYParity,
    },
    /// EIP-4844: dynamic fee plus a blob fee cap and versioned hashes.
    /// Contract creation is disallowed for this type.
    Blob {
        chain_id: u64,
        max_priority_fee_per_gas: u128,
        max_fee_per_gas: u128,
        access_list: Vec<AccessListItem>,
        max_fee_per_blob_gas: u128,
        blob_versioned_hashes: Vec<B256>,
        signature: SignatureWithYParity,
    },
    /// EIP-7702: dynamic fee plus a list of delegation authorizations.
    /// Unsupported by the signer (spec §4.5): skipped during sender
    /// recovery.
    SetCode {
        chain_id: u64,
        max_priority_fee_per_gas: u128,
        max_fee_per_gas: u128,
        access_list: Vec<AccessListItem>,
        authorization_list: Vec<Authorization>,
        signature: SignatureWithYParity,
    },
}

impl TxVariant {
    /// The EIP-2718 type byte; legacy transactions have no envelope and no
    /// type byte on the wire, but are conventionally assigned `0`.
    pub fn type_id(&self) -> u8 {
        match self {
            TxVariant::Legacy { .. } => 0x00,
            TxVariant::AccessList { .. } => 0x01,
            TxVariant::DynamicFee { .. } => 0x02,
            TxVariant::Blob { .. } => 0x03,
            TxVariant::SetCode { .. } => 0x04,
        }
    }

    /// The gas price a sender effectively signed, relevant for fee
    /// accounting pre-EIP-1559.
    pub fn gas_price(&self) -> Option<u128> {
        match self {
            TxVariant::Legacy { gas_price, .. } | TxVariant::AccessList { gas_price, .. } => {
                Some(*gas_price)
            }
            _ => None,
        }
    }

    /// `(max_fee_per_gas, max_priority_fee_per_gas)` for EIP-1559+
    /// transactions.
    pub fn fee_cap(&self) -> Option<(u128, u128)> {
        match self {
            TxVariant::DynamicFee {
                max_fee_per_gas,
                max_priority_fee_per_gas,
                ..
            }
            | TxVariant::Blob {
                max_fee_per_gas,
                max_priority_fee_per_gas,
                ..
            }
            | TxVariant::SetCode {
                max_fee_per_gas,
                max_priority_fee_per_gas,
                ..
            } => Some((*max_fee_per_gas, *max_priority_fee_per_gas)),
            _ => None,
        }
    }

    /// The chain id this transaction was signed for, if replay-protected.
    pub fn chain_id(&self) -> Option<u64> {
        match self {
            TxVariant::Legacy { chain_id, .. } => *chain_id,
            TxVariant::AccessList { chain_id, .. }
            | TxVariant::DynamicFee { chain_id, .. }
            | TxVariant::Blob { chain_id, .. }
            | TxVariant::SetCode { chain_id, .. } => Some(*chain_id),
        }
    }
}

fn rlp_list(build: impl FnOnce(&mut Vec<u8>)) -> Vec<u8> {
    let mut fields = Vec::new();
    build(&mut fields);

    let header = RlpHeader {
        list: true,
        payload_length: fields.len(),
    };

    let mut out = Vec::with_capacity(header.length() + fields.len());
    header.encode(&mut out);
    out.extend_from_slice(&fields);
    out
}

fn encode_access_list(list: &[AccessListItem], out: &mut Vec<u8>) {
    let items: Vec<Vec<u8>> = list
        .iter()
        .map(|item| {
            rlp_list(|f| {
                item.address.encode(f);
                let keys = rlp_list(|kf| {
                    for key in &item.storage_keys {
                        key.encode(kf);
                    }
                });
                f.extend_from_slice(&keys);
            })
        })
        .collect();

    let payload_length: usize = items.iter().map(Vec::len).sum();
    let header = RlpHeader {
        list: true,
        payload_length,
    };
    header.encode(out);
    for item in items {
        out.extend_from_slice(&item);
    }
}

/// A fully normalized transaction: node-reported envelope fields plus the
/// variant-specific payload needed to reconstruct its exact consensus RLP
/// encoding for trie-root and signature checks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    /// The transaction hash, as reported by the node.
    pub hash: B256,
    pub nonce: u64,
    /// Hash of the block this transaction was included in, if mined.
    pub block_hash: Option<B256>,
    pub block_number: Option<u64>,
    /// Zero-based position within the block's transaction list.
    pub transaction_index: Option<u64>,
    /// The sender, as reported by the node. Compared against the
    /// signature-recovered address by the trustless validator.
    pub from: Address,
    pub to: Option<Address>,
    pub value: U256,
    pub gas: u64,
    pub input: Bytes,
    pub variant: TxVariant,
}

impl Transaction {
    /// The RLP encoding used as the trie value when computing
    /// `transactionsRoot`: the legacy list encoding for legacy transactions,
    /// or `type_id || rlp(fields)` for typed transactions (EIP-2718).
    pub fn rlp_encoding(&self) -> Bytes {
        let body = match &self.variant {
            TxVariant::Legacy {
                chain_id,
                gas_price,
                signature,
            } => rlp_list(|f| {
                self.nonce.encode(f);
                gas_price.encode(f);
                self.gas.encode(f);
                TxKind::from(self.to).encode(f);
                self.value.encode(f);
                self.input.encode(f);
                signature.v.encode(f);
                signature.r.encode(f);
                signature.s.encode(f);
                let _ = chain_id;
            }),
            TxVariant::AccessList {
                chain_id,
                gas_price,
                access_list,
                signature,
            } => {
                let mut body = vec![self.variant.type_id()];
                body.extend(rlp_list(|f| {
                    chain_id.encode(f);
                    self.nonce.encode(f);
                    gas_price.encode(f);
                    self.gas.encode(f);
                    TxKind::from(self.to).encode(f);
                    self.value.encode(f);
                    self.input.encode(f);
                    encode_access_list(access_list, f);
                    (signature.y_parity as u8).encode(f);
                    signature.r.encode(f);
                    signature.s.encode(f);
                }));
                body
            }
            TxVariant::DynamicFee {
                chain_id,
                max_priority_fee_per_gas,
                max_fee_per_gas,
                access_list,
                signature,
            } => {
                let mut body = vec![self.variant.type_id()];
                body.extend(rlp_list(|f| {
                    chain_id.encode(f);
                    self.nonce.encode(f);
                    max_priority_fee_per_gas.encode(f);
                    max_fee_per_gas.encode(f);
                    self.gas.encode(f);
                    TxKind::from(self.to).encode(f);
                    self.value.encode(f);
                    self.input.encode(f);
                    encode_access_list(access_list, f);
                    (signature.y_parity as u8).encode(f);
                    signature.r.encode(f);
                    signature.s.encode(f);
                }));
                body
            }
            TxVariant::Blob {
                chain_id,
                max_priority_fee_per_gas,
                max_fee_per_gas,
                access_list,
                max_fee_per_blob_gas,
                blob_versioned_hashes,
                signature,
            } => {
                let mut body = vec![self.variant.type_id()];
                body.extend(rlp_list(|f| {
                    chain_id.encode(f);
                    self.nonce.encode(f);
                    max_priority_fee_per_gas.encode(f);
                    max_fee_per_gas.encode(f);
                    self.gas.encode(f);
                    self.to.unwrap_or_default().encode(f);
                    self.value.encode(f);
                    self.input.encode(f);
                    encode_access_list(access_list, f);
                    max_fee_per_blob_gas.encode(f);
                    let hashes = rlp_list(|hf| {
                        for hash in blob_versioned_hashes {
                            hash.encode(hf);
                        }
                    });
                    f.extend_from_slice(&hashes);
                    (signature.y_parity as u8).encode(f);
                    signature.r.encode(f);
                    signature.s.encode(f);
                }));
                body
            }
            TxVariant::SetCode {
                chain_id,
                max_priority_fee_per_gas,
                max_fee_per_gas,
                access_list,
                authorization_list,
                signature,
            } => {
                let mut body = vec![self.variant.type_id()];
                body.extend(rlp_list(|f| {
                    chain_id.encode(f);
                    self.nonce.encode(f);
                    max_priority_fee_per_gas.encode(f);
                    max_fee_per_gas.encode(f);
                    self.gas.encode(f);
                    self.to.unwrap_or_default().encode(f);
                    self.value.encode(f);
                    self.input.encode(f);
                    encode_access_list(access_list, f);
                    let auths: Vec<Vec<u8>> = authorization_list
                        .iter()
                        .map(|auth| {
                            rlp_list(|af| {
                                auth.chain_id.encode(af);
                                auth.address.encode(af);
                                auth.nonce.encode(af);
                                (auth.signature.y_parity as u8).encode(af);
                                auth.signature.r.encode(af);
                                auth.signature.s.encode(af);
                            })
                        })
                        .collect();
                    let payload_length: usize = auths.iter().map(Vec::len).sum();
                    RlpHeader {
                        list: true,
                        payload_length,
                    }
                    .encode(f);
                    for auth in auths {
                        f.extend_from_slice(&auth);
                    }
                    (signature.y_parity as u8).encode(f);
                    signature.r.encode(f);
                    signature.s.encode(f);
                }));
                body
            }
        };

        Bytes::from(body)
    }

    /// The payload a correctly-behaving signer hashed to produce this
    /// transaction's signature: the same fields as [`Self::rlp_encoding`]
    /// minus the signature (plus `chain_id, 0, 0` appended for EIP-155
    /// legacy transactions).
    pub fn signing_payload(&self) -> Bytes {
        let body = match &self.variant {
            TxVariant::Legacy {
                chain_id, gas_price, ..
            } => rlp_list(|f| {
                self.nonce.encode(f);
                gas_price.encode(f);
                self.gas.encode(f);
                TxKind::from(self.to).encode(f);
                self.value.encode(f);
                self.input.encode(f);
                if let Some(chain_id) = chain_id {
                    chain_id.encode(f);
                    0u8.encode(f);
                    0u8.encode(f);
                }
            }),
            TxVariant::AccessList {
                chain_id,
                gas_price,
                access_list,
                ..
            } => {
                let mut body = vec![self.variant.type_id()];
                body.extend(rlp_list(|f| {
                    chain_id.encode(f);
                    self.nonce.encode(f);
                    gas_price.encode(f);
                    self.gas.encode(f);
                    TxKind::from(self.to).encode(f);
                    self.value.encode(f);
                    self.input.encode(f);
                    encode_access_list(access_list, f);
                }));
                body
            }
            TxVariant::DynamicFee {
                chain_id,
                max_priority_fee_per_gas,
                max_fee_per_gas,
                access_list,
                ..
            } => {
                let mut body = vec![self.variant.type_id()];
                body.extend(rlp_list(|f| {
                    chain_id.encode(f);
                    self.nonce.encode(f);
                    max_priority_fee_per_gas.encode(f);
                    max_fee_per_gas.encode(f);
                    self.gas.encode(f);
                    TxKind::from(self.to).encode(f);
                    self.value.encode(f);
                    self.input.encode(f);
                    encode_access_list(access_list, f);
                }));
                body
            }
            TxVariant::Blob {
                chain_id,
                max_priority_fee_per_gas,
                max_fee_per_gas,
                access_list,
                max_fee_per_blob_gas,
                blob_versioned_hashes,
                ..
            } => {
                let mut body = vec![self.variant.type_id()];
                body.extend(rlp_list(|f| {
                    chain_id.encode(f);
                    self.nonce.encode(f);
                    max_priority_fee_per_gas.encode(f);
                    max_fee_per_gas.encode(f);
                    self.gas.encode(f);
                    self.to.unwrap_or_default().encode(f);
                    self.value.encode(f);
                    self.input.encode(f);
                    encode_access_list(access_list, f);
                    max_fee_per_blob_gas.encode(f);
                    let hashes = rlp_list(|hf| {
                        for hash in blob_versioned_hashes {
                            hash.encode(hf);
                        }
                    });
                    f.extend_from_slice(&hashes);
                }));
                body
            }
            TxVariant::SetCode {
                chain_id,
                max_priority_fee_per_gas,
                max_fee_per_gas,
                access_list,
                authorization_list,
                ..
            } => {
                let mut body = vec![self.variant.type_id()];
                body.extend(rlp_list(|f| {
                    chain_id.encode(f);
                    self.nonce.encode(f);
                    max_priority_fee_per_gas.encode(f);
                    max_fee_per_gas.encode(f);
                    self.gas.encode(f);
                    self.to.unwrap_or_default().encode(f);
                    self.value.encode(f);
                    self.input.encode(f);
                    encode_access_list(access_list, f);
                    let auths: Vec<Vec<u8>> = authorization_list
                        .iter()
                        .map(|auth| {
                            rlp_list(|af| {
                                auth.chain_id.encode(af);
                                auth.address.encode(af);
                                auth.nonce.encode(af);
                                (auth.signature.y_parity as u8).encode(af);
                                auth.signature.r.encode(af);
                                auth.signature.s.encode(af);
                            })
                        })
                        .collect();
                    let payload_length: usize = auths.iter().map(Vec::len).sum();
                    RlpHeader {
                        list: true,
                        payload_length,
                    }
                    .encode(f);
                    for auth in auths {
                        f.extend_from_slice(&auth);
                    }
                }));
                body
            }
        };

        Bytes::from(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Transaction {
        Transaction {
            hash: B256::ZERO,
            nonce: 9,
            block_hash: None,
            block_number: None,
            transaction_index: None,
            from: Address::ZERO,
            to: Some(Address::ZERO),
            value: U256::from(1000u64),
            gas: 21000,
            input: Bytes::new(),
            variant: TxVariant::Legacy {
                chain_id: Some(1),
                gas_price: 20_000_000_000,
                signature: SignatureWithRecoveryId {
                    r: U256::from(1u8),
                    s: U256::from(1u8),
                    v: 37,
                },
            },
        }
    }

    #[test]
    fn legacy_rlp_encoding_is_a_list() {
        let tx = sample();
        let encoded = tx.rlp_encoding();
        assert!(!encoded.is_empty());
        assert_eq!(encoded[0] & 0xf8, 0xf8.min(encoded[0] & 0xf8));
    }

    #[test]
    fn signing_payload_differs_from_full_encoding() {
        let tx = sample();
        assert_ne!(tx.signing_payload(), tx.rlp_encoding());
    }

    #[test]
    fn type_id_matches_variant() {
        assert_eq!(sample().variant.type_id(), 0);
    }
}
