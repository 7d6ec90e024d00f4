#![warn(missing_docs)]
//! Ethereum JSON-RPC 2.0 transport, shared by the node adapter.

mod client;
/// JSON-RPC envelope types.
pub mod jsonrpc;

pub use self::client::{RpcClient, RpcClientError, RpcMethod};
