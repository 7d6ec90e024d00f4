//! Transaction receipts, split into consensus and implementation fields.
//!
//! `ReceiptsRoot` only ever commits to the consensus fields (spec §3); the
//! remaining implementation fields (tx hash, block hash, contract address,
//! …) are supplied by the node for convenience and excluded from the trie
//! hash, mirroring `edr_eth::receipt`'s `ExecutionReceipt`/`BlockReceipt`
//! split.

use alloy_rlp::{BufMut, Encodable, Header as RlpHeader};
use rosetta_primitives::{Address, Bloom, Bytes, B256};

/// A single EVM log entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Log {
    /// The contract that emitted the log.
    pub address: Address,
    /// Indexed event topics; `topics[0]` is conventionally the event
    /// signature hash.
    pub topics: Vec<B256>,
    /// Non-indexed event data.
    pub data: Bytes,
}

impl Encodable for Log {
    fn encode(&self, out: &mut dyn BufMut) {
        let mut fields = Vec::new();
        self.address.encode(&mut fields);
        let topics = {
            let mut inner = Vec::new();
            for topic in &self.topics {
                topic.encode(&mut inner);
            }
            let header = RlpHeader {
                list: true,
                payload_length: inner.len(),
            };
            let mut out = Vec::with_capacity(header.length() + inner.len());
            header.encode(&mut out);
            out.extend_from_slice(&inner);
            out
        };
        fields.extend_from_slice(&topics);
        self.data.encode(&mut fields);

        let header = RlpHeader {
            list: true,
            payload_length: fields.len(),
        };
        header.encode(out);
        out.put_slice(&fields);
    }

    fn length(&self) -> usize {
        let mut fields = 0usize;
        fields += self.address.length();
        let topics_len: usize = self.topics.iter().map(Encodable::length).sum();
        fields += RlpHeader {
            list: true,
            payload_length: topics_len,
        }
        .length()
            + topics_len;
        fields += self.data.length();

        RlpHeader {
            list: true,
            payload_length: fields,
        }
        .length()
            + fields
    }
}

/// A transaction's execution status, post EIP-658. Pre-658 receipts carried
/// an intermediate state root instead; this codebase targets post-658
/// chains exclusively, matching the node adapters it is written against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReceiptStatus {
    /// The transaction executed to completion without reverting.
    Success,
    /// The transaction reverted.
    Failure,
}

impl ReceiptStatus {
    /// The consensus encoding: `1` for success, `0` for failure.
    pub fn as_u8(self) -> u8 {
        match self {
            ReceiptStatus::Success => 1,
            ReceiptStatus::Failure => 0,
        }
    }
}

/// A transaction receipt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    /// EIP-2718 transaction type.
    pub transaction_type: u8,
    /// Execution status.
    pub status: ReceiptStatus,
    /// Gas used by this transaction plus all prior transactions in the
    /// block.
    pub cumulative_gas_used: u64,
    /// Bloom filter over this transaction's logs.
    pub logs_bloom: Bloom,
    /// Logs emitted during execution.
    pub logs: Vec<Log>,

    // --- implementation fields: excluded from `receiptsRoot` ---
    /// Hash of the transaction this receipt belongs to.
    pub transaction_hash: B256,
    /// Hash of the block this receipt was included in.
    pub block_hash: B256,
    /// Block number.
    pub block_number: u64,
    /// Index of the transaction within the block.
    pub transaction_index: u64,
    /// Address of the contract created by this transaction, if any.
    pub contract_address: Option<Address>,
    /// Gas used by this transaction alone (not cumulative).
    pub gas_used: u64,
    /// The gas price actually paid per unit of gas.
    pub effective_gas_price: u128,
    /// The transaction's sender, echoed back for convenience.
    pub from: Address,
    /// The transaction's recipient, `None` for contract creation.
    pub to: Option<Address>,
}

impl Receipt {
    /// The RLP encoding used as the trie value when computing
    /// `receiptsRoot`: `type_id || rlp([status, cumulativeGasUsed,
    /// logsBloom, logs])` for typed transactions, or the bare list for
    /// legacy ones. Implementation fields never enter this encoding.
    pub fn rlp_encoding(&self) -> Bytes {
        let mut fields = Vec::new();
        self.status.as_u8().encode(&mut fields);
        self.cumulative_gas_used.encode(&mut fields);
        self.logs_bloom.encode(&mut fields);

        let logs = {
            let mut inner = Vec::new();
            for log in &self.logs {
                log.encode(&mut inner);
            }
            let header = RlpHeader {
                list: true,
                payload_length: inner.len(),
            };
            let mut out = Vec::with_capacity(header.length() + inner.len());
            header.encode(&mut out);
            out.extend_from_slice(&inner);
            out
        };
        fields.extend_from_slice(&logs);

        let body = {
            let header = RlpHeader {
                list: true,
                payload_length: fields.len(),
            };
            let mut out = Vec::with_capacity(header.length() + fields.len());
            header.encode(&mut out);
            out.extend_from_slice(&fields);
            out
        };

        if self.transaction_type == 0 {
            Bytes::from(body)
        } else {
            let mut out = Vec::with_capacity(1 + body.len());
            out.push(self.transaction_type);
            out.extend_from_slice(&body);
            Bytes::from(out)
        }
    }
}

/// `Transfer(address indexed from, address indexed to, uint256 value)`.
pub const ERC20_TRANSFER_TOPIC0: &str =
    "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";

/// `Deposit(address indexed to, uint256 value)` (WETH-style wrapped-native
/// tokens).
pub const ERC20_DEPOSIT_TOPIC0: &str =
    "0xe1fffcc4923d04b559f4d29a8bfc6cda04eb5b0d3c460751c2402c5c5cc9109c";

/// `Withdrawal(address indexed src, uint256 value)` (WETH-style wrapped
/// native tokens).
pub const ERC20_WITHDRAWAL_TOPIC0: &str =
    "0x7fcf532c15f0a6db0bd6d0e038bea71d30d808c7d98cb3bf7268a95bf5081b65";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_receipt_encoding_has_no_type_prefix() {
        let receipt = Receipt {
            transaction_type: 0,
            status: ReceiptStatus::Success,
            cumulative_gas_used: 21000,
            logs_bloom: Bloom::ZERO,
            logs: vec![],
            transaction_hash: B256::ZERO,
            block_hash: B256::ZERO,
            block_number: 1,
            transaction_index: 0,
            contract_address: None,
            gas_used: 21000,
            effective_gas_price: 0,
            from: Address::ZERO,
            to: None,
        };
        let encoded = receipt.rlp_encoding();
        // A list header byte, not the type byte `0x00`.
        assert!(encoded[0] >= 0xc0);
    }

    #[test]
    fn typed_receipt_encoding_is_prefixed_with_type_id() {
        let mut receipt = Receipt {
            transaction_type: 2,
            status: ReceiptStatus::Success,
            cumulative_gas_used: 21000,
            logs_bloom: Bloom::ZERO,
            logs: vec![],
            transaction_hash: B256::ZERO,
            block_hash: B256::ZERO,
            block_number: 1,
            transaction_index: 0,
            contract_address: None,
            gas_used: 21000,
            effective_gas_price: 0,
            from: Address::ZERO,
            to: None,
        };
        assert_eq!(receipt.rlp_encoding()[0], 2);
        receipt.transaction_type = 0;
        assert_ne!(receipt.rlp_encoding()[0], 2);
    }
}
