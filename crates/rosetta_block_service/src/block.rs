//! The block pipeline (spec §2): fans out C1's block/receipts/trace
//! fetches, resolves ERC-20 currencies (C4), runs C5's trustless checks
//! when enabled, and folds everything through C3's operation mapper into
//! a [`NormalizedBlock`].

use std::collections::{HashMap, HashSet};

use rosetta_currency::{decide, TokenDecision};
use rosetta_ops::{map_block_rewards, map_transaction, TransactionOps};
use rosetta_primitives::{Address, B256};
use rosetta_types::{
    Block, Currency, Header, Log, Receipt, ERC20_DEPOSIT_TOPIC0, ERC20_TRANSFER_TOPIC0, ERC20_WITHDRAWAL_TOPIC0,
};
use tokio_util::sync::CancellationToken;

use crate::currency_rpc::NodeCurrencyRpc;
use crate::model::{BlockIdentifier, NormalizedBlock, NormalizedTransaction};
use crate::BlockService;
use rosetta_config::RosettaError;

fn erc20_topic0s() -> [B256; 3] {
    [
        ERC20_TRANSFER_TOPIC0.parse().expect("well-formed hex"),
        ERC20_DEPOSIT_TOPIC0.parse().expect("well-formed hex"),
        ERC20_WITHDRAWAL_TOPIC0.parse().expect("well-formed hex"),
    ]
}

fn is_erc20_shaped(log: &Log, recognized: &[B256; 3]) -> bool {
    matches!(log.topics.first(), Some(topic) if recognized.contains(topic))
}

impl BlockService {
    /// Fetches, validates (if enabled), and normalizes one block (spec §2,
    /// §4.1-§4.5).
    #[tracing::instrument(level = "info", skip(self, cancellation))]
    pub async fn block(
        &self,
        id: rosetta_node_adapter::BlockId,
        cancellation: CancellationToken,
    ) -> Result<NormalizedBlock, RosettaError> {
        let block = self.adapter.get_block(id, &cancellation).await?;
        let receipts = self
            .adapter
            .get_receipts(block.hash, &tx_hashes(&block), &cancellation)
            .await?;

        if self.config.trustless_block_validation {
            rosetta_validator::validate_block_commitments(&block, &receipts, self.config.withdrawals_style)?;
            rosetta_validator::validate_signers(
                &block.transactions,
                self.chain_config.clone(),
                cancellation.clone(),
            )
            .await?;
        }

        let flat_calls = if block.is_genesis() {
            HashMap::new()
        } else {
            self.adapter
                .trace_block(block.hash, &tx_hashes(&block), &cancellation)
                .await?
        };

        let author = self.block_author(&block.header, &cancellation).await?;
        let currencies = self.resolve_log_currencies(&block, &receipts, &cancellation).await;

        let mut transactions = Vec::with_capacity(block.transactions.len() + 1);

        if let Some(reward_tx) = self.reward_transaction(&block, author, &cancellation).await? {
            transactions.push(reward_tx);
        }

        for (index, transaction) in block.transactions.iter().enumerate() {
            let receipt = receipts
                .get(index)
                .ok_or_else(|| RosettaError::InternalError(format!("missing receipt for tx {}", transaction.hash)))?;

            let logs: Vec<(Log, TokenDecision)> = receipt
                .logs
                .iter()
                .cloned()
                .map(|log| {
                    let resolved = currencies.get(&log.address).cloned();
                    let decision = match resolved {
                        Some(currency) => decide(
                            log.address,
                            currency,
                            &self.config.whitelist,
                            self.config.filter_tokens,
                            self.config.use_whitelist_metadata,
                            self.config.index_unknown_tokens,
                        ),
                        None => TokenDecision::Skip,
                    };
                    (log, decision)
                })
                .collect();

            let flat = flat_calls.get(&transaction.hash).cloned().unwrap_or_default();
            let input = TransactionOps {
                sender: transaction.from,
                author,
                gas_used: receipt.gas_used,
                effective_gas_price: receipt.effective_gas_price,
                base_fee_per_gas: block.header.base_fee_per_gas,
                flat_calls: &flat,
                logs: &logs,
            };

            let operations = map_transaction(input, 0, &self.config.native_currency)?;
            transactions.push(NormalizedTransaction {
                hash: transaction.hash,
                operations,
            });
        }

        Ok(NormalizedBlock {
            block_identifier: BlockIdentifier {
                index: block.header.number,
                hash: block.hash,
            },
            parent_block_identifier: BlockIdentifier {
                index: block.header.number.saturating_sub(1),
                hash: block.header.parent_hash,
            },
            timestamp_millis: block.header.timestamp.saturating_mul(1000),
            transactions,
        })
    }

    async fn block_author(
        &self,
        header: &Header,
        cancellation: &CancellationToken,
    ) -> Result<Address, RosettaError> {
        if self.config.supports_block_author {
            Ok(self.adapter.get_block_author(header.number, cancellation).await?)
        } else {
            Ok(header.beneficiary)
        }
    }

    /// Builds the block-level reward pseudo-transaction (spec §4.3b),
    /// crediting the author the static block reward plus one nephew bonus
    /// per uncle, and crediting each uncle author its own diminished
    /// reward. Returns `None` when reward operations aren't enabled or the
    /// schedule yields nothing to credit (e.g. post-Merge).
    async fn reward_transaction(
        &self,
        block: &Block,
        author: Address,
        cancellation: &CancellationToken,
    ) -> Result<Option<NormalizedTransaction>, RosettaError> {
        if !self.config.supports_reward_tx || block.is_genesis() {
            return Ok(None);
        }

        let uncles = if block.header.ommers_hash != rosetta_primitives::KECCAK_NULL_RLP {
            self.adapter.get_uncles(&block.header, cancellation).await?
        } else {
            Vec::new()
        };

        let number = block.header.number;

        let base_reward = self.chain_config.block_reward_at(number);
        let nephew_bonus = self.chain_config.nephew_reward_at(number) * uncles.len() as u128;
        let author_total = base_reward + nephew_bonus;

        let author_reward = (author_total > 0).then_some((author, author_total));
        let uncle_rewards: Vec<(Address, u128)> = uncles
            .iter()
            .map(|uncle| (uncle.beneficiary, self.chain_config.uncle_reward_at(number, uncle.number)))
            .filter(|(_, reward)| *reward > 0)
            .collect();

        let operations = map_block_rewards(author_reward, &uncle_rewards, &self.config.native_currency);
        if operations.is_empty() {
            return Ok(None);
        }

        Ok(Some(NormalizedTransaction {
            hash: block.hash,
            operations,
        }))
    }

    /// Resolves `(symbol, decimals)` for every distinct contract that
    /// emitted a recognized ERC-20-shaped log in this block, concurrently
    /// (spec §4.4 caching makes repeat/duplicate resolution cheap, but a
    /// block with many distinct tokens still benefits from fanning the
    /// misses out rather than probing one at a time).
    async fn resolve_log_currencies(
        &self,
        block: &Block,
        receipts: &[Receipt],
        cancellation: &CancellationToken,
    ) -> HashMap<Address, Currency> {
        let recognized = erc20_topic0s();
        let addresses: HashSet<Address> = receipts
            .iter()
            .flat_map(|receipt| receipt.logs.iter())
            .filter(|log| is_erc20_shaped(log, &recognized))
            .map(|log| log.address)
            .collect();

        let rpc = NodeCurrencyRpc::new(&self.adapter, block.header.number, cancellation.clone());
        let resolved = futures::future::join_all(
            addresses
                .iter()
                .map(|address| async { (*address, self.currency_resolver.resolve(*address, &rpc).await) }),
        )
        .await;

        resolved.into_iter().collect()
    }
}

fn tx_hashes(block: &Block) -> Vec<B256> {
    block.transactions.iter().map(|tx| tx.hash).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn erc20_topic_recognition_matches_transfer_deposit_withdrawal() {
        let recognized = erc20_topic0s();
        let transfer_log = Log {
            address: Address::ZERO,
            topics: vec![recognized[0]],
            data: Default::default(),
        };
        assert!(is_erc20_shaped(&transfer_log, &recognized));

        let other_log = Log {
            address: Address::ZERO,
            topics: vec![B256::repeat_byte(0xAB)],
            data: Default::default(),
        };
        assert!(!is_erc20_shaped(&other_log, &recognized));
    }
}
