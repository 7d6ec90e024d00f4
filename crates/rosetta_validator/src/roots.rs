//! Transactions/receipts/withdrawals trie root validation (spec §4.5).

use rosetta_primitives::B256;
use rosetta_types::{Receipt, Transaction, Withdrawal};

use crate::errors::ValidatorError;

/// Recomputes the transactions trie root and compares it against
/// `header.transactions_root`.
pub fn validate_transactions_root(
    transactions: &[Transaction],
    expected: B256,
) -> Result<(), ValidatorError> {
    let encodings: Vec<_> = transactions.iter().map(Transaction::rlp_encoding).collect();
    let computed = rosetta_trie::ordered_trie_root(encodings);
    if computed != expected {
        return Err(ValidatorError::InvalidTransactionsHash { expected, computed });
    }
    Ok(())
}

/// Recomputes the receipts trie root over consensus fields only and
/// compares it against `header.receipts_root`.
pub fn validate_receipts_root(receipts: &[Receipt], expected: B256) -> Result<(), ValidatorError> {
    let encodings: Vec<_> = receipts.iter().map(Receipt::rlp_encoding).collect();
    let computed = rosetta_trie::ordered_trie_root(encodings);
    if computed != expected {
        return Err(ValidatorError::InvalidReceiptsHash { expected, computed });
    }
    Ok(())
}

/// Recomputes the withdrawals trie root and compares it against
/// `header.withdrawals_root`, when present. Pre-Shanghai blocks (and chains
/// that repurpose the field, see [`rosetta_types::config::WithdrawalsStyle`])
/// have no withdrawals root to check, so callers should only invoke this
/// when `expected` is `Some`.
pub fn validate_withdrawals_root(withdrawals: &[Withdrawal], expected: B256) -> Result<(), ValidatorError> {
    let encodings: Vec<_> = withdrawals.iter().map(alloy_rlp::encode).collect();
    let computed = rosetta_trie::ordered_trie_root(encodings);
    if computed != expected {
        return Err(ValidatorError::InvalidWithdrawalsHash { expected, computed });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_transactions_root_is_keccak_null_rlp() {
        assert!(validate_transactions_root(&[], rosetta_primitives::KECCAK_NULL_RLP).is_ok());
    }

    #[test]
    fn empty_receipts_root_is_keccak_null_rlp() {
        assert!(validate_receipts_root(&[], rosetta_primitives::KECCAK_NULL_RLP).is_ok());
    }

    #[test]
    fn empty_withdrawals_root_is_keccak_null_rlp() {
        assert!(validate_withdrawals_root(&[], rosetta_primitives::KECCAK_NULL_RLP).is_ok());
    }

    #[test]
    fn mismatched_root_is_reported() {
        let wrong = rosetta_primitives::B256::repeat_byte(0x11);
        assert!(matches!(
            validate_transactions_root(&[], wrong),
            Err(ValidatorError::InvalidTransactionsHash { .. })
        ));
    }
}
