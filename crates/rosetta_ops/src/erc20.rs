//! ERC-20 `Transfer`/`Deposit`/`Withdrawal` log operations.

use rosetta_currency::TokenDecision;
use rosetta_primitives::{Address, B256, U256};
use rosetta_types::{
    is_zero_address, AccountIdentifier, Amount, Log, Operation, OperationStatus, OperationType,
    ERC20_DEPOSIT_TOPIC0, ERC20_TRANSFER_TOPIC0, ERC20_WITHDRAWAL_TOPIC0,
};

fn topic0(hex: &str) -> B256 {
    hex.parse().expect("topic0 constants are well-formed hex")
}

/// The `(from, to, value)` a recognized ERC-20 event log carries, decoded
/// from its topics and data.
struct TransferLike {
    from: Address,
    to: Address,
    value: U256,
}

/// Recognizes one of the three ERC-20 event shapes this middleware indexes,
/// returning `None` for any log whose topic0 doesn't match, or whose topic
/// count doesn't match the expected shape.
fn recognize(log: &Log) -> Option<TransferLike> {
    let first = *log.topics.first()?;

    let value = if log.data.len() >= 32 {
        U256::from_be_slice(&log.data[log.data.len() - 32..])
    } else {
        U256::ZERO
    };

    if first == topic0(ERC20_TRANSFER_TOPIC0) && log.topics.len() == 3 {
        Some(TransferLike {
            from: Address::from_word(log.topics[1]),
            to: Address::from_word(log.topics[2]),
            value,
        })
    } else if first == topic0(ERC20_DEPOSIT_TOPIC0) && log.topics.len() == 2 {
        Some(TransferLike {
            from: Address::ZERO,
            to: Address::from_word(log.topics[1]),
            value,
        })
    } else if first == topic0(ERC20_WITHDRAWAL_TOPIC0) && log.topics.len() == 2 {
        Some(TransferLike {
            from: Address::from_word(log.topics[1]),
            to: Address::ZERO,
            value,
        })
    } else {
        None
    }
}

/// Builds the operations for one log entry, given the token-policy decision
/// already made for its emitting contract (spec §4.3d). Returns `None` if
/// the log isn't a recognized ERC-20 event shape, or the decision was to
/// skip it.
pub fn build_log_ops(log: &Log, decision: TokenDecision, start_index: u64) -> Vec<Operation> {
    let Some(transfer) = recognize(log) else {
        return Vec::new();
    };
    let TokenDecision::Index(currency) = decision else {
        return Vec::new();
    };

    // `transfer.value` is a full `uint256`; format it straight into the
    // `Amount` decimal string rather than narrowing through `i128`, which
    // panics above `u128::MAX` and wraps to the wrong sign above
    // `i128::MAX` (both reachable for a large-supply or high-decimal
    // token's valid `Transfer` event).
    let value = transfer.value;

    if is_zero_address(transfer.from) {
        return vec![Operation {
            index: start_index,
            related_indices: Vec::new(),
            op_type: OperationType::Erc20Mint,
            status: OperationStatus::Success,
            account: AccountIdentifier::from(transfer.to),
            amount: Amount::signed(false, value, currency),
            metadata: None,
        }];
    }

    if is_zero_address(transfer.to) {
        return vec![Operation {
            index: start_index,
            related_indices: Vec::new(),
            op_type: OperationType::Erc20Burn,
            status: OperationStatus::Success,
            account: AccountIdentifier::from(transfer.from),
            amount: Amount::signed(true, value, currency),
            metadata: None,
        }];
    }

    let debit_index = start_index;
    let credit_index = start_index + 1;
    vec![
        Operation {
            index: debit_index,
            related_indices: Vec::new(),
            op_type: OperationType::Erc20Transfer,
            status: OperationStatus::Success,
            account: AccountIdentifier::from(transfer.from),
            amount: Amount::signed(true, value, currency.clone()),
            metadata: None,
        },
        Operation {
            index: credit_index,
            related_indices: vec![debit_index],
            op_type: OperationType::Erc20Transfer,
            status: OperationStatus::Success,
            account: AccountIdentifier::from(transfer.to),
            amount: Amount::signed(false, value, currency),
            metadata: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rosetta_primitives::{Bytes, B256};
    use rosetta_types::Currency;

    fn topic(hex: &str) -> B256 {
        hex.parse().unwrap()
    }

    fn address_topic(address: Address) -> B256 {
        B256::left_padding_from(address.as_slice())
    }

    fn value_data(value: u128) -> Bytes {
        Bytes::from(U256::from(value).to_be_bytes::<32>().to_vec())
    }

    fn usdc() -> rosetta_types::Currency {
        Currency {
            symbol: "USDC".to_string(),
            decimals: 6,
            metadata: None,
        }
    }

    #[test]
    fn mint_when_from_is_zero_address() {
        let log = Log {
            address: Address::repeat_byte(9),
            topics: vec![
                topic(ERC20_TRANSFER_TOPIC0),
                address_topic(Address::ZERO),
                address_topic(Address::repeat_byte(1)),
            ],
            data: value_data(500),
        };
        let ops = build_log_ops(&log, TokenDecision::Index(usdc()), 0);
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].op_type, OperationType::Erc20Mint);
        assert_eq!(ops[0].amount.value, "500");
    }

    #[test]
    fn burn_when_to_is_zero_address() {
        let log = Log {
            address: Address::repeat_byte(9),
            topics: vec![
                topic(ERC20_TRANSFER_TOPIC0),
                address_topic(Address::repeat_byte(1)),
                address_topic(Address::ZERO),
            ],
            data: value_data(500),
        };
        let ops = build_log_ops(&log, TokenDecision::Index(usdc()), 0);
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].op_type, OperationType::Erc20Burn);
        assert_eq!(ops[0].amount.value, "-500");
    }

    #[test]
    fn ordinary_transfer_emits_cross_linked_pair() {
        let log = Log {
            address: Address::repeat_byte(9),
            topics: vec![
                topic(ERC20_TRANSFER_TOPIC0),
                address_topic(Address::repeat_byte(1)),
                address_topic(Address::repeat_byte(2)),
            ],
            data: value_data(42),
        };
        let ops = build_log_ops(&log, TokenDecision::Index(usdc()), 7);
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[1].related_indices, vec![7]);
    }

    #[test]
    fn skip_decision_suppresses_emission() {
        let log = Log {
            address: Address::repeat_byte(9),
            topics: vec![
                topic(ERC20_TRANSFER_TOPIC0),
                address_topic(Address::repeat_byte(1)),
                address_topic(Address::repeat_byte(2)),
            ],
            data: value_data(42),
        };
        let ops = build_log_ops(&log, TokenDecision::Skip, 0);
        assert!(ops.is_empty());
    }

    #[test]
    fn transfer_value_beyond_u128_does_not_panic() {
        let huge = U256::MAX;
        let log = Log {
            address: Address::repeat_byte(9),
            topics: vec![
                topic(ERC20_TRANSFER_TOPIC0),
                address_topic(Address::repeat_byte(1)),
                address_topic(Address::repeat_byte(2)),
            ],
            data: Bytes::from(huge.to_be_bytes::<32>().to_vec()),
        };
        let ops = build_log_ops(&log, TokenDecision::Index(usdc()), 0);
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].amount.value, format!("-{huge}"));
        assert_eq!(ops[1].amount.value, huge.to_string());
    }

    #[test]
    fn unrecognized_topic_is_ignored() {
        let log = Log {
            address: Address::repeat_byte(9),
            topics: vec![B256::repeat_byte(0xAB), address_topic(Address::repeat_byte(1))],
            data: value_data(1),
        };
        let ops = build_log_ops(&log, TokenDecision::Index(usdc()), 0);
        assert!(ops.is_empty());
    }
}
