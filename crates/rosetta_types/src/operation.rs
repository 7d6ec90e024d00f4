//! The normalized Rosetta operation: the single unit every block/transaction
//! response is built from (spec §3, §4.3).

use rosetta_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// The kind of event an [`Operation`] represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationType {
    /// Gas fee debit/credit (spec §4.3a): sender debit, author/miner
    /// credit, and (post EIP-1559) a burn debit.
    Fee,
    /// Block/uncle reward credit to the block author (spec §4.3b).
    Reward,
    /// A `CALL` trace operation.
    Call,
    /// A `CALLCODE` trace operation.
    CallCode,
    /// A `DELEGATECALL` trace operation.
    DelegateCall,
    /// A `STATICCALL` trace operation.
    StaticCall,
    /// A `CREATE` trace operation.
    Create,
    /// A `CREATE2` trace operation.
    Create2,
    /// A `SELFDESTRUCT` trace operation.
    SelfDestruct,
    /// Zeroes out a previously self-destructed account's residual positive
    /// balance at the end of a transaction (spec §4.3, "destroyed-account
    /// accounting").
    Destruct,
    /// An ERC-20 `Transfer` from the zero address: token creation.
    Erc20Mint,
    /// An ERC-20 `Transfer` to the zero address: token destruction.
    Erc20Burn,
    /// An ordinary ERC-20 `Transfer` between two non-zero addresses.
    Erc20Transfer,
}

impl OperationType {
    /// All operation types the middleware can produce, for
    /// `/network/options`.
    pub const ALL: &'static [OperationType] = &[
        OperationType::Fee,
        OperationType::Reward,
        OperationType::Call,
        OperationType::CallCode,
        OperationType::DelegateCall,
        OperationType::StaticCall,
        OperationType::Create,
        OperationType::Create2,
        OperationType::SelfDestruct,
        OperationType::Destruct,
        OperationType::Erc20Mint,
        OperationType::Erc20Burn,
        OperationType::Erc20Transfer,
    ];
}

/// Whether an operation succeeded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationStatus {
    /// The operation's underlying call/transfer completed successfully.
    Success,
    /// The operation's underlying call reverted or otherwise failed.
    Failure,
}

impl OperationStatus {
    /// All statuses the middleware can produce, for `/network/options`.
    pub const ALL: &'static [OperationStatus] = &[OperationStatus::Success, OperationStatus::Failure];

    /// Whether this status should be treated as a successful outcome by
    /// clients reconciling balances.
    pub fn is_successful(self) -> bool {
        matches!(self, OperationStatus::Success)
    }
}

/// An account identifier: just an address for this middleware (no
/// sub-account support).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountIdentifier {
    /// The account's address.
    pub address: Address,
}

impl From<Address> for AccountIdentifier {
    fn from(address: Address) -> Self {
        AccountIdentifier { address }
    }
}

/// A currency: symbol, decimal precision, and optional metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    /// The ticker symbol, e.g. `"ETH"` or `"USDC"`.
    pub symbol: String,
    /// Number of decimal places, e.g. `18` for ETH or `6` for USDC.
    pub decimals: u32,
    /// Optional metadata, e.g. the ERC-20 contract address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl Currency {
    /// The chain's native currency. Callers configure the symbol/decimals
    /// per network (e.g. `("ETH", 18)`, `("MATIC", 18)`).
    pub fn native(symbol: impl Into<String>, decimals: u32) -> Self {
        Currency {
            symbol: symbol.into(),
            decimals,
            metadata: None,
        }
    }
}

/// A signed amount of a currency.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    /// The amount, as a decimal-string-encoded signed integer (Rosetta
    /// convention: arbitrary precision, no floating point). Negative for
    /// debits, positive for credits.
    pub value: String,
    /// The currency this amount is denominated in.
    pub currency: Currency,
}

impl Amount {
    /// Constructs an amount from a signed `i128` value. Only safe for
    /// values known to fit an `i128` (e.g. wei amounts derived from gas
    /// arithmetic); a full `uint256` (an ERC-20 `value`, or a value taken
    /// verbatim from a trace) must go through [`Amount::signed`] instead,
    /// since narrowing it here would panic or wrap on valid input.
    pub fn new(value: i128, currency: Currency) -> Self {
        Amount {
            value: value.to_string(),
            currency,
        }
    }

    /// Constructs an amount from a sign and an arbitrary-precision `U256`
    /// magnitude, without narrowing through a fixed-width signed integer.
    /// `magnitude` is the full `uint256` a trace or an ERC-20 log carries;
    /// narrowing it to `i128` first (`to::<u128>() as i128`) panics once
    /// `magnitude` exceeds `u128::MAX` and silently produces the wrong sign
    /// once it exceeds `i128::MAX`, both reachable on a valid (if unusual)
    /// high-decimal or high-supply token transfer.
    pub fn signed(negative: bool, magnitude: U256, currency: Currency) -> Self {
        let value = if negative && !magnitude.is_zero() {
            format!("-{magnitude}")
        } else {
            magnitude.to_string()
        };
        Amount { value, currency }
    }
}

/// A single normalized debit or credit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Dense, monotonically increasing index within the transaction (spec
    /// §3, §4.3 "Indexing guarantee", invariant P1).
    pub index: u64,
    /// Indices of other operations in the same transaction this operation
    /// is cross-referenced with (e.g. a credit references its paired
    /// debit), invariant P3. Always references earlier operations.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub related_indices: Vec<u64>,
    /// The kind of operation.
    #[serde(rename = "type")]
    pub op_type: OperationType,
    /// Whether the underlying call/transfer succeeded.
    pub status: OperationStatus,
    /// The affected account.
    pub account: AccountIdentifier,
    /// The signed amount affecting `account`.
    pub amount: Amount,
    /// Additional operation-specific metadata, e.g. `{"error": "..."}` for
    /// reverted trace operations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_formats_negative_values_without_exponent() {
        let amount = Amount::new(-900_000, Currency::native("ETH", 18));
        assert_eq!(amount.value, "-900000");
    }

    #[test]
    fn signed_formats_values_beyond_i128_without_panicking() {
        let magnitude = U256::MAX;
        let amount = Amount::signed(true, magnitude, Currency::native("TOKEN", 0));
        assert_eq!(amount.value, format!("-{}", U256::MAX));

        let amount = Amount::signed(false, magnitude, Currency::native("TOKEN", 0));
        assert_eq!(amount.value, U256::MAX.to_string());
    }

    #[test]
    fn signed_zero_has_no_sign_regardless_of_negative_flag() {
        let amount = Amount::signed(true, U256::ZERO, Currency::native("ETH", 18));
        assert_eq!(amount.value, "0");
    }
}
