//! Validator withdrawal type (EIP-4895).

use alloy_rlp::{RlpDecodable, RlpEncodable};
use rosetta_primitives::{Address, U256};

/// A single validator withdrawal processed in a block.
#[derive(Clone, Debug, Default, PartialEq, Eq, RlpDecodable, RlpEncodable)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Withdrawal {
    /// Monotonically increasing global withdrawal index.
    pub index: u64,
    /// Index of the validator that generated this withdrawal.
    pub validator_index: u64,
    /// Recipient of the withdrawn amount.
    pub address: Address,
    /// Amount withdrawn, denominated in Gwei.
    pub amount: U256,
}
