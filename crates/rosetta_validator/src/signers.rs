//! Parallel signer recovery (spec §4.5 "Transactions validation"): checks
//! each transaction's reported EIP-2718 type against the signer rules
//! active at its own block number (`ChainConfig::signer_at`), then
//! recovers its sender from `(v, r, s)` and compares it against the `from`
//! field the node reported — bounded by a counting semaphore so a large
//! block doesn't spawn unbounded concurrent ECDSA recoveries.

use std::sync::Arc;

use rosetta_chain_config::ChainConfig;
use rosetta_primitives::keccak256;
use rosetta_signer::{Recoverable, RecoveryMessage};
use rosetta_types::{Transaction, TxVariant};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::errors::ValidatorError;

/// Bound on concurrent signer-recovery workers per validation call (spec
/// §4.5/§5: `maxFromValidationRoutines = 10`).
pub const MAX_FROM_VALIDATION_ROUTINES: usize = 10;

/// Recovers and checks the sender of every transaction in `transactions`,
/// up to [`MAX_FROM_VALIDATION_ROUTINES`] at a time. `SET_CODE` transactions
/// are skipped (unsupported by the signer). Returns
/// [`ValidatorError::SignerRecoveryFailures`] aggregating every mismatch if
/// any transaction fails; `Ok(())` otherwise.
pub async fn validate_signers(
    transactions: &[Transaction],
    chain_config: Arc<ChainConfig>,
    cancellation: CancellationToken,
) -> Result<(), ValidatorError> {
    let semaphore = Arc::new(Semaphore::new(MAX_FROM_VALIDATION_ROUTINES));
    let mut tasks = Vec::with_capacity(transactions.len());

    for transaction in transactions {
        if !ChainConfig::is_signer_supported(&transaction.variant) {
            continue;
        }

        let semaphore = Arc::clone(&semaphore);
        let chain_config = Arc::clone(&chain_config);
        let cancellation = cancellation.clone();
        let transaction = transaction.clone();

        tasks.push(tokio::spawn(async move {
            let _permit = tokio::select! {
                biased;
                () = cancellation.cancelled() => return Err(ValidatorError::Cancelled),
                permit = semaphore.acquire_owned() => permit.expect("semaphore never closed"),
            };
            verify_one(&transaction, &chain_config)
        }));
    }

    let mut failures = Vec::new();
    for task in tasks {
        match task.await {
            Ok(Ok(())) => {}
            Ok(Err(error)) => failures.push(error),
            Err(join_error) => {
                return Err(ValidatorError::Internal(format!("signer worker panicked: {join_error}")));
            }
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(ValidatorError::SignerRecoveryFailures(failures))
    }
}

fn verify_one(transaction: &Transaction, chain_config: &ChainConfig) -> Result<(), ValidatorError> {
    let signer_kind = chain_config.signer_at(transaction.block_number.unwrap_or(u64::MAX), 0);
    let type_id = transaction.variant.type_id();
    if !signer_kind.supports_type_id(type_id) {
        return Err(ValidatorError::TransactionTypeNotYetActive {
            transaction_hash: transaction.hash,
            type_id,
            block_number: transaction.block_number,
        });
    }

    let signing_hash = keccak256(transaction.signing_payload());
    let message = RecoveryMessage::Hash(signing_hash);

    let recovered = match &transaction.variant {
        TxVariant::Legacy { signature, .. } => signature.recover_address(message),
        TxVariant::AccessList { signature, .. }
        | TxVariant::DynamicFee { signature, .. }
        | TxVariant::Blob { signature, .. } => signature.recover_address(message),
        TxVariant::SetCode { .. } => {
            return Err(ValidatorError::Internal(
                "set-code transactions are skipped before reaching verify_one".to_string(),
            ))
        }
    }
    .map_err(|error| {
        ValidatorError::Internal(format!(
            "transaction {} failed signature recovery: {error}",
            transaction.hash
        ))
    })?;

    if recovered != transaction.from {
        return Err(ValidatorError::InvalidFromField {
            transaction_hash: transaction.hash,
            claimed: transaction.from,
            recovered,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rosetta_primitives::{Address, Bytes, B256, U256};
    use rosetta_signer::{SignatureWithRecoveryId, SignatureWithYParity};

    fn legacy_tx(from: Address, signature: SignatureWithRecoveryId) -> Transaction {
        Transaction {
            hash: B256::ZERO,
            nonce: 0,
            block_hash: None,
            block_number: Some(1),
            transaction_index: None,
            from,
            to: Some(Address::repeat_byte(9)),
            value: U256::ZERO,
            gas: 21_000,
            input: Bytes::new(),
            variant: TxVariant::Legacy {
                chain_id: None,
                gas_price: 1,
                signature,
            },
        }
    }

    #[tokio::test]
    async fn set_code_transactions_are_skipped() {
        let tx = Transaction {
            variant: TxVariant::SetCode {
                chain_id: 1,
                max_priority_fee_per_gas: 0,
                max_fee_per_gas: 0,
                access_list: vec![],
                authorization_list: vec![],
                signature: SignatureWithYParity {
                    r: U256::from(1u8),
                    s: U256::from(1u8),
                    y_parity: false,
                },
            },
            ..legacy_tx(Address::ZERO, SignatureWithRecoveryId { r: U256::from(1u8), s: U256::from(1u8), v: 27 })
        };

        let result = validate_signers(&[tx], Arc::new(ChainConfig::mainnet()), CancellationToken::new()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn mismatched_sender_is_reported() {
        let tx = legacy_tx(
            Address::repeat_byte(0xAA),
            SignatureWithRecoveryId { r: U256::from(1u8), s: U256::from(1u8), v: 27 },
        );

        let result = validate_signers(&[tx], Arc::new(ChainConfig::mainnet()), CancellationToken::new()).await;
        assert!(matches!(result, Err(ValidatorError::SignerRecoveryFailures(_))));
    }

    #[tokio::test]
    async fn access_list_type_before_its_fork_activation_is_rejected() {
        let tx = Transaction {
            block_number: Some(1),
            variant: TxVariant::AccessList {
                chain_id: 1,
                gas_price: 1,
                access_list: vec![],
                signature: SignatureWithYParity {
                    r: U256::from(1u8),
                    s: U256::from(1u8),
                    y_parity: false,
                },
            },
            ..legacy_tx(Address::ZERO, SignatureWithRecoveryId { r: U256::from(1u8), s: U256::from(1u8), v: 27 })
        };

        let result = validate_signers(&[tx], Arc::new(ChainConfig::mainnet()), CancellationToken::new()).await;
        match result {
            Err(ValidatorError::SignerRecoveryFailures(failures)) => {
                assert!(matches!(failures[0], ValidatorError::TransactionTypeNotYetActive { .. }));
            }
            other => panic!("expected a signer recovery failure, got {other:?}"),
        }
    }
}
