//! Block/uncle reward schedule (spec §4.3b "Block reward": "per the
//! chain's reward schedule (incl. uncles)").
//!
//! Ethereum's static block reward dropped twice by hard fork before the
//! Merge replaced it with validator issuance entirely; post-Merge blocks
//! pay no block reward through this path; transaction fees are covered by
//! the existing `FEE` operations. Expressed as fork-schedule data, the
//! same pattern [`crate::ChainConfig::signer_at`] uses for signer rules.
use crate::{ActivationPoint, ChainConfig};

/// A single reward-schedule entry: the static block reward (wei) paid to
/// the author from `at` onward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RewardActivation {
    /// When this reward amount takes effect.
    pub at: ActivationPoint,
    /// The static block reward, in wei.
    pub reward_wei: u128,
}

const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

/// Ethereum mainnet's static block reward schedule: 5 ETH (Frontier), 3
/// ETH (Byzantium, block 4,370,000), 2 ETH (Constantinople, block
/// 7,280,000), 0 from the Merge (block 15,537,394) onward.
pub const MAINNET_BLOCK_REWARDS: &[RewardActivation] = &[
    RewardActivation {
        at: ActivationPoint::Block(0),
        reward_wei: 5 * WEI_PER_ETHER,
    },
    RewardActivation {
        at: ActivationPoint::Block(4_370_000),
        reward_wei: 3 * WEI_PER_ETHER,
    },
    RewardActivation {
        at: ActivationPoint::Block(7_280_000),
        reward_wei: 2 * WEI_PER_ETHER,
    },
    RewardActivation {
        at: ActivationPoint::Block(15_537_394),
        reward_wei: 0,
    },
];

impl ChainConfig {
    /// The static block reward in effect at `block_number` (0 post-Merge).
    /// Callers should only credit this when
    /// [`rosetta_types::config::RosettaConfig::supports_reward_tx`] is set
    /// (spec §4.3b).
    pub fn block_reward_at(&self, block_number: u64) -> u128 {
        let idx = MAINNET_BLOCK_REWARDS
            .iter()
            .rposition(|activation| match activation.at {
                ActivationPoint::Block(b) => b <= block_number,
                ActivationPoint::Time(_) => false,
            });
        idx.map(|i| MAINNET_BLOCK_REWARDS[i].reward_wei).unwrap_or(0)
    }

    /// The reward an uncle author receives for an uncle included at
    /// `nephew_number` that was itself mined at `uncle_number`:
    /// `reward * (uncle_number + 8 - nephew_number) / 8`, per the
    /// original Ethereum Yellow Paper formula. Zero once the base block
    /// reward itself is zero (post-Merge).
    pub fn uncle_reward_at(&self, nephew_number: u64, uncle_number: u64) -> u128 {
        let base = self.block_reward_at(nephew_number);
        if base == 0 {
            return 0;
        }
        let numerator = (uncle_number + 8).saturating_sub(nephew_number);
        base.saturating_mul(numerator as u128) / 8
    }

    /// The bonus an including block's author receives per uncle referenced:
    /// `reward / 32`.
    pub fn nephew_reward_at(&self, nephew_number: u64) -> u128 {
        self.block_reward_at(nephew_number) / 32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frontier_reward_is_five_ether() {
        let config = ChainConfig::mainnet();
        assert_eq!(config.block_reward_at(1), 5 * WEI_PER_ETHER);
    }

    #[test]
    fn byzantium_drops_to_three_ether() {
        let config = ChainConfig::mainnet();
        assert_eq!(config.block_reward_at(4_370_000), 3 * WEI_PER_ETHER);
        assert_eq!(config.block_reward_at(4_369_999), 5 * WEI_PER_ETHER);
    }

    #[test]
    fn post_merge_reward_is_zero() {
        let config = ChainConfig::mainnet();
        assert_eq!(config.block_reward_at(16_000_000), 0);
    }

    #[test]
    fn uncle_one_block_behind_gets_seven_eighths() {
        let config = ChainConfig::mainnet();
        // nephew included the uncle one block after it was mined.
        let reward = config.uncle_reward_at(101, 100);
        assert_eq!(reward, 3 * WEI_PER_ETHER * 7 / 8);
    }

    #[test]
    fn nephew_reward_is_one_thirty_second() {
        let config = ChainConfig::mainnet();
        assert_eq!(config.nephew_reward_at(1), 5 * WEI_PER_ETHER / 32);
    }
}
