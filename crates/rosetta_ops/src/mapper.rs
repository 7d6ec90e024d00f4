//! Composes the four operation kinds into one fixed-order, contiguously
//! indexed operation list per transaction, plus the block-level reward
//! pseudo-transaction.

use rosetta_currency::TokenDecision;
use rosetta_primitives::Address;
use rosetta_trace::FlatCall;
use rosetta_types::{Currency, Log, Operation};

use crate::fee::{fee_operations, FeeBreakdown};
use crate::erc20::build_log_ops;
use crate::reward::reward_operation;
use crate::trace_ops::build_trace_ops;
use crate::OpsError;

/// Everything [`map_transaction`] needs about one transaction to build its
/// operations; assembled by the block service from the node adapter's,
/// trace flattener's, and currency resolver's outputs.
pub struct TransactionOps<'a> {
    /// The transaction's sender.
    pub sender: Address,
    /// The block author (or coinbase) credited by the fee operations.
    pub author: Address,
    /// Gas consumed by this transaction alone.
    pub gas_used: u64,
    /// The gas price actually paid.
    pub effective_gas_price: u128,
    /// The block's base fee, `None` pre-EIP-1559.
    pub base_fee_per_gas: Option<u128>,
    /// This transaction's flattened execution trace.
    pub flat_calls: &'a [FlatCall],
    /// This transaction's receipt logs, each paired with the token-policy
    /// decision already made for its emitting contract.
    pub logs: &'a [(Log, TokenDecision)],
}

/// Builds one transaction's operations: fee, trace, then ERC-20 log
/// operations, concatenated in that fixed order with contiguous indices
/// starting at `start_index`.
#[tracing::instrument(level = "debug", skip(input, native_currency), fields(sender = %input.sender, start_index))]
pub fn map_transaction(
    input: TransactionOps<'_>,
    start_index: u64,
    native_currency: &Currency,
) -> Result<Vec<Operation>, OpsError> {
    let mut ops = Vec::new();

    let breakdown = FeeBreakdown::compute(input.gas_used, input.effective_gas_price, input.base_fee_per_gas);
    ops.extend(fee_operations(
        start_index,
        input.sender,
        input.author,
        breakdown,
        native_currency,
    ));

    let trace_start = start_index + ops.len() as u64;
    ops.extend(build_trace_ops(trace_start, input.flat_calls, native_currency)?);

    let mut next_index = start_index + ops.len() as u64;
    for (log, decision) in input.logs {
        let log_ops = build_log_ops(log, decision.clone(), next_index);
        next_index += log_ops.len() as u64;
        ops.extend(log_ops);
    }

    Ok(ops)
}

/// Builds the operations for the block-level reward pseudo-transaction
/// (spec §4.3b): one credit to the author, plus one per uncle, each its own
/// index space starting at 0. Callers attach these to a synthetic
/// transaction distinct from the block's real transactions. Returns an
/// empty vector when reward operations aren't enabled for this network.
pub fn map_block_rewards(
    author_reward: Option<(Address, u128)>,
    uncle_rewards: &[(Address, u128)],
    native_currency: &Currency,
) -> Vec<Operation> {
    let mut ops = Vec::new();
    if let Some((author, reward_wei)) = author_reward {
        ops.push(reward_operation(ops.len() as u64, author, reward_wei, native_currency));
    }
    for (uncle_author, reward_wei) in uncle_rewards {
        ops.push(reward_operation(ops.len() as u64, *uncle_author, *reward_wei, native_currency));
    }
    ops
}

#[cfg(test)]
mod tests {
    use super::*;
    use rosetta_primitives::U256;
    use rosetta_types::CallType;

    #[test]
    fn transaction_ops_are_contiguous_across_all_four_kinds() {
        let sender = Address::repeat_byte(1);
        let author = Address::repeat_byte(2);
        let contract = Address::repeat_byte(3);

        let flat_calls = vec![FlatCall {
            index: 0,
            depth: 0,
            call_type: CallType::Call,
            from: sender,
            to: contract,
            value: U256::from(10u64),
            gas_used: 21_000,
            revert: false,
            error_message: None,
            before_transfers: Vec::new(),
            after_transfers: Vec::new(),
        }];

        let log = Log {
            address: contract,
            topics: vec![
                rosetta_types::ERC20_TRANSFER_TOPIC0.parse().unwrap(),
                rosetta_primitives::B256::left_padding_from(sender.as_slice()),
                rosetta_primitives::B256::left_padding_from(author.as_slice()),
            ],
            data: rosetta_primitives::Bytes::from(U256::from(7u64).to_be_bytes::<32>().to_vec()),
        };
        let currency = Currency::native("USDC", 6);
        let logs = vec![(log, TokenDecision::Index(currency))];

        let input = TransactionOps {
            sender,
            author,
            gas_used: 21_000,
            effective_gas_price: 10,
            base_fee_per_gas: None,
            flat_calls: &flat_calls,
            logs: &logs,
        };

        let ops = map_transaction(input, 100, &Currency::native("ETH", 18)).unwrap();
        let indices: Vec<u64> = ops.iter().map(|op| op.index).collect();
        let expected: Vec<u64> = (100..100 + ops.len() as u64).collect();
        assert_eq!(indices, expected);
    }

    #[test]
    fn block_reward_includes_uncles() {
        let author = Address::repeat_byte(1);
        let uncle = Address::repeat_byte(2);
        let ops = map_block_rewards(
            Some((author, 2_000_000_000_000_000_000)),
            &[(uncle, 1_750_000_000_000_000_000)],
            &Currency::native("ETH", 18),
        );
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].index, 0);
        assert_eq!(ops[1].index, 1);
    }

    #[test]
    fn no_reward_when_author_reward_absent() {
        let ops = map_block_rewards(None, &[], &Currency::native("ETH", 18));
        assert!(ops.is_empty());
    }
}
