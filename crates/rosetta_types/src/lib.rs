//! Chain-agnostic data model for the Rosetta-style indexing middleware:
//! blocks, transactions, receipts, flattened traces, normalized operations,
//! account proofs, and process configuration (spec §3).

#![warn(missing_docs)]

mod account;
mod block;
/// Immutable per-process configuration.
pub mod config;
mod network;
mod operation;
mod receipt;
mod trace;
mod transaction;
mod withdrawal;

pub use self::{
    account::{AccountProof, StateAccount},
    block::{Block, Header},
    config::RosettaConfig,
    network::{NetworkIdentifier, Peer, SyncStatus},
    operation::{AccountIdentifier, Amount, Currency, Operation, OperationStatus, OperationType},
    receipt::{Log, Receipt, ReceiptStatus, ERC20_DEPOSIT_TOPIC0, ERC20_TRANSFER_TOPIC0, ERC20_WITHDRAWAL_TOPIC0},
    trace::{CallType, FlatCall},
    transaction::{AccessListItem, Authorization, Transaction, TxKind, TxVariant},
    withdrawal::Withdrawal,
};

/// The sentinel symbol returned by the currency resolver when a contract's
/// `symbol()`/`decimals()` calls fail to decode or revert (spec §4.4).
pub const UNKNOWN_ERC20_SYMBOL: &str = "UNKNOWN_ERC20";

/// The zero address, used to detect ERC-20 mint/burn transfers (spec
/// §4.3d).
pub fn is_zero_address(address: rosetta_primitives::Address) -> bool {
    address == rosetta_primitives::Address::ZERO
}
