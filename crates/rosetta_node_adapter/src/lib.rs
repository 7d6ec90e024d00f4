#![warn(missing_docs)]
//! Opaque transport to a JSON-RPC node (spec §4.1, component C1): typed
//! calls for blocks, receipts, traces, proofs, and state roots. Everything
//! above this layer works with [`rosetta_types`] values, never raw JSON.

mod adapter;
mod methods;
mod wire;

pub use adapter::{NodeAdapter, NodeAdapterError};
pub use methods::{BlockId, Method};
