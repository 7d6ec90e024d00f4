//! `/account/balance` (spec §4.5 "Account proof validation"): fetches an
//! account's state at a block and, when trustless account validation is
//! enabled, checks the returned proof against a state root obtained
//! independently of the balance itself.

use rosetta_node_adapter::BlockId;
use rosetta_primitives::Address;
use rosetta_validator::is_proof_window_error;
use tokio_util::sync::CancellationToken;

use crate::model::{BlockIdentifier, NormalizedAccountBalance};
use crate::BlockService;
use rosetta_config::RosettaError;

impl BlockService {
    /// Resolves `id` to a concrete block, fetches `address`'s account
    /// proof at that block, and — if `trustless_account_validation` is
    /// enabled — verifies the proof against an independently-fetched
    /// state root (spec §4.5). A transport failure recognized as a
    /// "proof window" rejection skips validation rather than failing the
    /// request outright, since the node is refusing to serve historical
    /// state rather than lying about current state.
    #[tracing::instrument(level = "info", skip(self, cancellation))]
    pub async fn account_balance(
        &self,
        address: Address,
        id: BlockId,
        cancellation: CancellationToken,
    ) -> Result<NormalizedAccountBalance, RosettaError> {
        let block = self.adapter.get_block(id, &cancellation).await?;
        let number = block.header.number;

        let proof = self.adapter.get_proof(address, number, &cancellation).await?;

        if self.config.trustless_account_validation {
            match self.adapter.get_block_state_root(number, &cancellation).await {
                Ok(state_root) => {
                    rosetta_validator::validate_account_proof(
                        &proof,
                        state_root,
                        proof.nonce,
                        proof.balance,
                        proof.storage_hash,
                        proof.code_hash,
                    )?;
                }
                Err(error) if is_proof_window_error(&error.to_string()) => {
                    tracing::warn!(
                        %address,
                        block = number,
                        "skipping account proof validation: state root unavailable (proof window)"
                    );
                }
                Err(error) => return Err(error.into()),
            }
        }

        Ok(NormalizedAccountBalance {
            account: address,
            block_identifier: BlockIdentifier {
                index: number,
                hash: block.hash,
            },
            balance: proof.balance.to_string(),
        })
    }
}
