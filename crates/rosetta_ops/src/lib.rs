#![warn(missing_docs)]
//! The operation mapper (spec §4.3, component C3): turns a transaction's
//! gas economics, flattened execution trace, and receipt logs into the
//! normalized [`rosetta_types::Operation`] list the downstream REST API
//! serves.

mod erc20;
mod fee;
mod mapper;
mod reward;
mod trace_ops;

pub use fee::{fee_operations, FeeBreakdown};
pub use mapper::{map_block_rewards, map_transaction, TransactionOps};
pub use reward::reward_operation;
pub use trace_ops::build_trace_ops;

use rosetta_primitives::{Address, U256};

/// Errors the operation mapper can raise. Unlike transport or validation
/// errors, these are all invariant violations: something the mapper assumed
/// about trace data turned out false.
#[derive(Debug, thiserror::Error)]
pub enum OpsError {
    /// A self-destructed account's tracked delta went negative: more value
    /// left it after destruction than it received, which the EVM's
    /// accounting rules make impossible on an honest trace (spec §4.3c,
    /// invariant P4).
    #[error("destroyed account {address} has a negative delta of -{delta}")]
    NegativeDestroyedBalance {
        /// The account whose delta went negative.
        address: Address,
        /// The magnitude of the offending (negative) delta.
        delta: U256,
    },
}
