//! Raw JSON-RPC response shapes and their conversion into
//! [`rosetta_types`]. Kept separate from the normalized types so a
//! decoding quirk in one node implementation doesn't leak into the
//! chain-agnostic model.

use rosetta_primitives::{Address, Bloom, Bytes, B256, B64, U256, U64};
use rosetta_signer::{SignatureWithRecoveryId, SignatureWithYParity};
use rosetta_types::{
    AccessListItem, AccountProof, Authorization, Block, Header, Log, Receipt, ReceiptStatus,
    Transaction, TxVariant, Withdrawal,
};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAccessListItem {
    address: Address,
    #[serde(default)]
    storage_keys: Vec<B256>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAuthorization {
    chain_id: U64,
    address: Address,
    nonce: U64,
    #[serde(default)]
    y_parity: U64,
    r: U256,
    s: U256,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    hash: B256,
    nonce: U64,
    block_hash: Option<B256>,
    block_number: Option<U64>,
    transaction_index: Option<U64>,
    from: Address,
    to: Option<Address>,
    value: U256,
    gas: U64,
    input: Bytes,
    #[serde(rename = "type", default)]
    transaction_type: Option<U64>,
    #[serde(default)]
    chain_id: Option<U64>,
    #[serde(default)]
    gas_price: Option<U64>,
    #[serde(default)]
    max_priority_fee_per_gas: Option<U64>,
    #[serde(default)]
    max_fee_per_gas: Option<U64>,
    #[serde(default)]
    max_fee_per_blob_gas: Option<U64>,
    #[serde(default)]
    blob_versioned_hashes: Vec<B256>,
    #[serde(default)]
    access_list: Vec<RawAccessListItem>,
    #[serde(default)]
    authorization_list: Vec<RawAuthorization>,
    v: U64,
    r: U256,
    s: U256,
    #[serde(default)]
    y_parity: Option<U64>,
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("transaction is missing required field `{0}` for its type")]
    MissingField(&'static str),
}

fn access_list(items: Vec<RawAccessListItem>) -> Vec<AccessListItem> {
    items
        .into_iter()
        .map(|item| AccessListItem {
            address: item.address,
            storage_keys: item.storage_keys,
        })
        .collect()
}

impl RawTransaction {
    pub fn into_transaction(self) -> Result<Transaction, DecodeError> {
        let type_id = self.transaction_type.map(|t| t.to::<u8>()).unwrap_or(0);
        let y_parity = self
            .y_parity
            .map(|p| p.to::<u64>() != 0)
            .unwrap_or(self.v.to::<u64>() % 2 == 0);

        let variant = match type_id {
            0 => TxVariant::Legacy {
                chain_id: self.chain_id.map(U64::to::<u64>),
                gas_price: self
                    .gas_price
                    .map(U64::to::<u64>)
                    .ok_or(DecodeError::MissingField("gasPrice"))? as u128,
                signature: SignatureWithRecoveryId {
                    r: self.r,
                    s: self.s,
                    v: self.v.to::<u64>(),
                },
            },
            1 => TxVariant::AccessList {
                chain_id: self
                    .chain_id
                    .map(U64::to::<u64>)
                    .ok_or(DecodeError::MissingField("chainId"))?,
                gas_price: self
                    .gas_price
                    .map(U64::to::<u64>)
                    .ok_or(DecodeError::MissingField("gasPrice"))? as u128,
                access_list: access_list(self.access_list),
                signature: SignatureWithYParity {
                    r: self.r,
                    s: self.s,
                    y_parity,
                },
            },
            2 => TxVariant::DynamicFee {
                chain_id: self
                    .chain_id
                    .map(U64::to::<u64>)
                    .ok_or(DecodeError::MissingField("chainId"))?,
                max_priority_fee_per_gas: self
                    .max_priority_fee_per_gas
                    .map(U64::to::<u64>)
                    .ok_or(DecodeError::MissingField("maxPriorityFeePerGas"))?
                    as u128,
                max_fee_per_gas: self
                    .max_fee_per_gas
                    .map(U64::to::<u64>)
                    .ok_or(DecodeError::MissingField("maxFeePerGas"))? as u128,
                access_list: access_list(self.access_list),
                signature: SignatureWithYParity {
                    r: self.r,
                    s: self.s,
                    y_parity,
                },
            },
            3 => TxVariant::Blob {
                chain_id: self
                    .chain_id
                    .map(U64::to::<u64>)
                    .ok_or(DecodeError::MissingField("chainId"))?,
                max_priority_fee_per_gas: self
                    .max_priority_fee_per_gas
                    .map(U64::to::<u64>)
                    .ok_or(DecodeError::MissingField("maxPriorityFeePerGas"))?
                    as u128,
                max_fee_per_gas: self
                    .max_fee_per_gas
                    .map(U64::to::<u64>)
                    .ok_or(DecodeError::MissingField("maxFeePerGas"))? as u128,
                access_list: access_list(self.access_list),
                max_fee_per_blob_gas: self
                    .max_fee_per_blob_gas
                    .map(U64::to::<u64>)
                    .ok_or(DecodeError::MissingField("maxFeePerBlobGas"))?
                    as u128,
                blob_versioned_hashes: self.blob_versioned_hashes,
                signature: SignatureWithYParity {
                    r: self.r,
                    s: self.s,
                    y_parity,
                },
            },
            _ => TxVariant::SetCode {
                chain_id: self
                    .chain_id
                    .map(U64::to::<u64>)
                    .ok_or(DecodeError::MissingField("chainId"))?,
                max_priority_fee_per_gas: self
                    .max_priority_fee_per_gas
                    .map(U64::to::<u64>)
                    .ok_or(DecodeError::MissingField("maxPriorityFeePerGas"))?
                    as u128,
                max_fee_per_gas: self
                    .max_fee_per_gas
                    .map(U64::to::<u64>)
                    .ok_or(DecodeError::MissingField("maxFeePerGas"))? as u128,
                access_list: access_list(self.access_list),
                authorization_list: self
                    .authorization_list
                    .into_iter()
                    .map(|auth| Authorization {
                        chain_id: auth.chain_id.to(),
                        address: auth.address,
                        nonce: auth.nonce.to(),
                        signature: SignatureWithYParity {
                            r: auth.r,
                            s: auth.s,
                            y_parity: auth.y_parity.to::<u64>() != 0,
                        },
                    })
                    .collect(),
                signature: SignatureWithYParity {
                    r: self.r,
                    s: self.s,
                    y_parity,
                },
            },
        };

        Ok(Transaction {
            hash: self.hash,
            nonce: self.nonce.to(),
            block_hash: self.block_hash,
            block_number: self.block_number.map(U64::to),
            transaction_index: self.transaction_index.map(U64::to),
            from: self.from,
            to: self.to,
            value: self.value,
            gas: self.gas.to(),
            input: self.input,
            variant,
        })
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawWithdrawal {
    index: U64,
    validator_index: U64,
    address: Address,
    amount: U256,
}

impl From<RawWithdrawal> for Withdrawal {
    fn from(raw: RawWithdrawal) -> Self {
        Withdrawal {
            index: raw.index.to(),
            validator_index: raw.validator_index.to(),
            address: raw.address,
            amount: raw.amount,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBlock {
    parent_hash: B256,
    sha3_uncles: B256,
    miner: Address,
    state_root: B256,
    transactions_root: B256,
    receipts_root: B256,
    logs_bloom: Bloom,
    #[serde(default)]
    difficulty: U256,
    number: U64,
    gas_limit: U64,
    gas_used: U64,
    timestamp: U64,
    extra_data: Bytes,
    mix_hash: B256,
    nonce: B64,
    #[serde(default)]
    base_fee_per_gas: Option<U64>,
    #[serde(default)]
    withdrawals_root: Option<B256>,
    #[serde(default)]
    blob_gas_used: Option<U64>,
    #[serde(default)]
    excess_blob_gas: Option<U64>,
    #[serde(default)]
    parent_beacon_block_root: Option<B256>,
    #[serde(default)]
    requests_hash: Option<B256>,
    hash: B256,
    transactions: Vec<RawTransaction>,
    /// Uncle hashes; the headers themselves are fetched separately via
    /// `eth_getUncleByBlockHashAndIndex` (spec §4.1 `getUncles`).
    #[serde(default)]
    pub uncles: Vec<B256>,
    #[serde(default)]
    withdrawals: Vec<RawWithdrawal>,
}

impl RawBlock {
    pub fn into_block(self) -> Result<Block, DecodeError> {
        let header = Header {
            parent_hash: self.parent_hash,
            ommers_hash: self.sha3_uncles,
            beneficiary: self.miner,
            state_root: self.state_root,
            transactions_root: self.transactions_root,
            receipts_root: self.receipts_root,
            logs_bloom: self.logs_bloom,
            difficulty: self.difficulty,
            number: self.number.to(),
            gas_limit: self.gas_limit.to(),
            gas_used: self.gas_used.to(),
            timestamp: self.timestamp.to(),
            extra_data: self.extra_data,
            mix_hash: self.mix_hash,
            nonce: self.nonce,
            base_fee_per_gas: self.base_fee_per_gas.map(|v| v.to::<u128>()),
            withdrawals_root: self.withdrawals_root,
            blob_gas_used: self.blob_gas_used.map(U64::to),
            excess_blob_gas: self.excess_blob_gas.map(U64::to),
            parent_beacon_block_root: self.parent_beacon_block_root,
            requests_hash: self.requests_hash,
        };

        let transactions = self
            .transactions
            .into_iter()
            .map(RawTransaction::into_transaction)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Block {
            header,
            hash: self.hash,
            transactions,
            uncles: Vec::new(),
            withdrawals: self.withdrawals.into_iter().map(Withdrawal::from).collect(),
        })
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLog {
    address: Address,
    topics: Vec<B256>,
    data: Bytes,
}

impl From<RawLog> for Log {
    fn from(raw: RawLog) -> Self {
        Log {
            address: raw.address,
            topics: raw.topics,
            data: raw.data,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReceipt {
    #[serde(rename = "type", default)]
    transaction_type: Option<U64>,
    status: U64,
    cumulative_gas_used: U64,
    logs_bloom: Bloom,
    logs: Vec<RawLog>,
    transaction_hash: B256,
    block_hash: B256,
    block_number: U64,
    transaction_index: U64,
    #[serde(default)]
    contract_address: Option<Address>,
    gas_used: U64,
    effective_gas_price: U64,
    from: Address,
    to: Option<Address>,
}

impl From<RawReceipt> for Receipt {
    fn from(raw: RawReceipt) -> Self {
        Receipt {
            transaction_type: raw.transaction_type.map(|t| t.to::<u8>()).unwrap_or(0),
            status: if raw.status.to::<u64>() == 1 {
                ReceiptStatus::Success
            } else {
                ReceiptStatus::Failure
            },
            cumulative_gas_used: raw.cumulative_gas_used.to(),
            logs_bloom: raw.logs_bloom,
            logs: raw.logs.into_iter().map(Log::from).collect(),
            transaction_hash: raw.transaction_hash,
            block_hash: raw.block_hash,
            block_number: raw.block_number.to(),
            transaction_index: raw.transaction_index.to(),
            contract_address: raw.contract_address,
            gas_used: raw.gas_used.to(),
            effective_gas_price: raw.effective_gas_price.to::<u128>(),
            from: raw.from,
            to: raw.to,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAccountProof {
    address: Address,
    balance: U256,
    nonce: U64,
    storage_hash: B256,
    code_hash: B256,
    account_proof: Vec<Bytes>,
}

impl From<RawAccountProof> for AccountProof {
    fn from(raw: RawAccountProof) -> Self {
        AccountProof {
            address: raw.address,
            balance: raw.balance,
            nonce: raw.nonce.to(),
            storage_hash: raw.storage_hash,
            code_hash: raw.code_hash,
            account_proof: raw.account_proof,
        }
    }
}
