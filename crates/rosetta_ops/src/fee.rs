//! Fee operations (spec §4.3a).

use rosetta_primitives::Address;
use rosetta_types::{AccountIdentifier, Amount, Currency, Operation, OperationStatus, OperationType};

/// The result of computing one transaction's gas economics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeeBreakdown {
    /// Total fee paid by the sender: `gasUsed * effectiveGasPrice`.
    pub total_fee: u128,
    /// The portion burned (EIP-1559): `gasUsed * baseFee`, `0` pre-London
    /// or when `baseFee` is absent (spec §9 open question (i): "treat as
    /// 0").
    pub fee_burned: u128,
    /// `total_fee - fee_burned`: what the block author actually earns.
    pub miner_earned: u128,
}

impl FeeBreakdown {
    /// Computes the breakdown for a transaction that used `gas_used` gas
    /// at `effective_gas_price`, under a block with `base_fee_per_gas`.
    pub fn compute(gas_used: u64, effective_gas_price: u128, base_fee_per_gas: Option<u128>) -> Self {
        let total_fee = u128::from(gas_used).saturating_mul(effective_gas_price);
        let fee_burned = base_fee_per_gas
            .map(|base_fee| u128::from(gas_used).saturating_mul(base_fee))
            .unwrap_or(0);
        // `fee_burned` should never exceed `total_fee` on a well-formed
        // chain (base fee <= effective gas price by EIP-1559 construction);
        // saturate rather than underflow if a misconfigured L2 violates
        // that.
        let miner_earned = total_fee.saturating_sub(fee_burned);

        FeeBreakdown {
            total_fee,
            fee_burned,
            miner_earned,
        }
    }
}

/// Builds the fee operations for one transaction (spec §4.3a), starting at
/// `start_index`. `sender` pays, `author` (the block author if
/// `supports_block_author`, else the coinbase/miner) is credited.
///
/// Invariant P2: operations `[0]` and `[1]` (debit/credit of
/// `miner_earned`) always carry equal magnitude with opposite sign.
pub fn fee_operations(
    start_index: u64,
    sender: Address,
    author: Address,
    breakdown: FeeBreakdown,
    native_currency: &Currency,
) -> Vec<Operation> {
    let mut ops = Vec::with_capacity(3);
    let miner_earned = breakdown.miner_earned as i128;

    ops.push(Operation {
        index: start_index,
        related_indices: Vec::new(),
        op_type: OperationType::Fee,
        status: OperationStatus::Success,
        account: AccountIdentifier::from(sender),
        amount: Amount::new(-miner_earned, native_currency.clone()),
        metadata: None,
    });

    ops.push(Operation {
        index: start_index + 1,
        related_indices: vec![start_index],
        op_type: OperationType::Fee,
        status: OperationStatus::Success,
        account: AccountIdentifier::from(author),
        amount: Amount::new(miner_earned, native_currency.clone()),
        metadata: None,
    });

    if breakdown.fee_burned > 0 {
        ops.push(Operation {
            index: start_index + 2,
            related_indices: Vec::new(),
            op_type: OperationType::Fee,
            status: OperationStatus::Success,
            account: AccountIdentifier::from(sender),
            amount: Amount::new(-(breakdown.fee_burned as i128), native_currency.clone()),
            metadata: None,
        });
    }

    ops
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pre_1559_block_burns_nothing() {
        let breakdown = FeeBreakdown::compute(21_000, 20_000_000_000, None);
        assert_eq!(breakdown.fee_burned, 0);
        assert_eq!(breakdown.miner_earned, breakdown.total_fee);
    }

    #[test]
    fn post_1559_block_splits_fee_between_burn_and_miner() {
        let breakdown = FeeBreakdown::compute(21_000, 100, Some(60));
        assert_eq!(breakdown.total_fee, 2_100_000);
        assert_eq!(breakdown.fee_burned, 1_260_000);
        assert_eq!(breakdown.miner_earned, 840_000);
    }

    #[test]
    fn fee_op_pair_has_matched_magnitude_opposite_sign() {
        let breakdown = FeeBreakdown::compute(21_000, 100, Some(60));
        let ops = fee_operations(
            10,
            Address::repeat_byte(1),
            Address::repeat_byte(2),
            breakdown,
            &Currency::native("ETH", 18),
        );

        assert_eq!(ops.len(), 3);
        assert_eq!(ops[0].amount.value, "-840000");
        assert_eq!(ops[1].amount.value, "840000");
        assert_eq!(ops[2].amount.value, "-1260000");
        assert_eq!(ops[0].index, 10);
        assert_eq!(ops[1].index, 11);
        assert_eq!(ops[2].index, 12);
    }

    #[test]
    fn zero_burn_omits_third_operation() {
        let breakdown = FeeBreakdown::compute(21_000, 1, None);
        let ops = fee_operations(
            0,
            Address::repeat_byte(1),
            Address::repeat_byte(1),
            breakdown,
            &Currency::native("ETH", 18),
        );
        assert_eq!(ops.len(), 2);
    }
}
