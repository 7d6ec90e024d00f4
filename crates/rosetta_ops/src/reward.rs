//! Block and uncle reward operations.

use rosetta_primitives::Address;
use rosetta_types::{AccountIdentifier, Amount, Currency, Operation, OperationStatus, OperationType};

/// Builds a single reward credit to `recipient` for `reward_wei`. Used both
/// for the block reward (credited to the author) and each uncle reward
/// (credited to the uncle's own coinbase), when the network's
/// `supports_reward_tx` flag is enabled and still issues a static reward
/// (pre-merge).
pub fn reward_operation(
    index: u64,
    recipient: Address,
    reward_wei: u128,
    native_currency: &Currency,
) -> Operation {
    Operation {
        index,
        related_indices: Vec::new(),
        op_type: OperationType::Reward,
        status: OperationStatus::Success,
        account: AccountIdentifier::from(recipient),
        amount: Amount::new(reward_wei as i128, native_currency.clone()),
        metadata: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reward_op_credits_recipient() {
        let op = reward_operation(0, Address::repeat_byte(1), 2_000_000_000_000_000_000, &Currency::native("ETH", 18));
        assert_eq!(op.amount.value, "2000000000000000000");
        assert_eq!(op.op_type, OperationType::Reward);
    }
}
