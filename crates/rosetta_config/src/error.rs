//! The fixed error-code taxonomy served to REST clients (spec §6 "Error
//! codes", §7 "Error handling design").
//!
//! Every code carries a `retriable` flag so a client knows whether to
//! simply re-issue the request (a transient transport failure, an
//! orphaned block from a reorg racing the request) or give up (a
//! malformed request, a detected tampering attempt).

use serde::Serialize;

use rosetta_node_adapter::NodeAdapterError;
use rosetta_ops::OpsError;
use rosetta_validator::ValidatorError;

/// One of the fixed error codes from spec §6. Numeric values are stable
/// across releases since clients match on them.
#[derive(Debug, thiserror::Error)]
pub enum RosettaError {
    /// `mode = OFFLINE` rejected a request that would reach the node
    /// adapter.
    #[error("this endpoint is unavailable while running in offline mode")]
    UnavailableOffline,
    /// A request field was malformed or internally inconsistent.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A request carried a malformed address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    /// The node returned a block whose hash didn't match the one
    /// requested (spec §4.1 `BlockOrphaned`): a reorg raced the request.
    #[error("block orphaned: requested {requested}, node returned {returned}")]
    BlockOrphaned {
        /// The hash the caller asked for.
        requested: String,
        /// The hash the node actually returned.
        returned: String,
    },
    /// A transport-level failure talking to the configured node.
    #[error("node error: {0}")]
    GethError(String),
    /// An invariant was violated independent of node tampering (spec §7
    /// kind 1), or an otherwise-unclassified internal failure.
    #[error("internal error: {0}")]
    InternalError(String),
    /// The validator detected the node's response was tampered with
    /// (spec §7 kind 2): a header, trie root, sender, or account-proof
    /// mismatch.
    #[error("trustless validation failed: {0}")]
    ValidationFailed(#[source] ValidatorError),
    /// The requested endpoint/feature isn't implemented (construction
    /// endpoints, per spec §1 "Non-goals").
    #[error("not implemented: {0}")]
    Unimplemented(String),
    /// The node reported it is still syncing and cannot serve the
    /// request yet.
    #[error("node is not yet ready: {0}")]
    GethNotReady(String),
}

impl RosettaError {
    /// The fixed numeric code a client matches on (spec §6).
    pub fn code(&self) -> i32 {
        match self {
            RosettaError::UnavailableOffline => 1,
            RosettaError::InvalidInput(_) => 2,
            RosettaError::InvalidAddress(_) => 3,
            RosettaError::BlockOrphaned { .. } => 4,
            RosettaError::GethError(_) => 5,
            RosettaError::InternalError(_) => 6,
            RosettaError::ValidationFailed(_) => 6,
            RosettaError::Unimplemented(_) => 7,
            RosettaError::GethNotReady(_) => 8,
        }
    }

    /// Whether a client should expect a retry (with no other change) to
    /// plausibly succeed.
    pub fn retriable(&self) -> bool {
        matches!(
            self,
            RosettaError::BlockOrphaned { .. } | RosettaError::GethError(_) | RosettaError::GethNotReady(_)
        )
    }

    /// Serializes this error as the wire shape spec §6 defines:
    /// `{code, message, retriable}`.
    pub fn to_wire(&self) -> WireError {
        WireError {
            code: self.code(),
            message: self.to_string(),
            retriable: self.retriable(),
        }
    }
}

/// The `{code, message, retriable}` shape served over the REST API (spec
/// §6).
#[derive(Debug, Clone, Serialize)]
pub struct WireError {
    /// The fixed numeric error code.
    pub code: i32,
    /// A human-readable description.
    pub message: String,
    /// Whether the client should expect retrying to help.
    pub retriable: bool,
}

impl From<NodeAdapterError> for RosettaError {
    fn from(error: NodeAdapterError) -> Self {
        match error {
            NodeAdapterError::NotFound => RosettaError::InvalidInput("not found".to_string()),
            NodeAdapterError::BlockOrphaned { requested, returned } => RosettaError::BlockOrphaned {
                requested: requested.to_string(),
                returned: returned.to_string(),
            },
            NodeAdapterError::Transport(transport) => RosettaError::GethError(transport.to_string()),
            NodeAdapterError::Decode(decode) => RosettaError::InternalError(decode.to_string()),
        }
    }
}

impl From<ValidatorError> for RosettaError {
    fn from(error: ValidatorError) -> Self {
        if matches!(error, ValidatorError::Internal(_) | ValidatorError::Cancelled) {
            RosettaError::InternalError(error.to_string())
        } else {
            RosettaError::ValidationFailed(error)
        }
    }
}

impl From<OpsError> for RosettaError {
    fn from(error: OpsError) -> Self {
        RosettaError::InternalError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_error_is_not_retriable() {
        assert!(!RosettaError::UnavailableOffline.retriable());
    }

    #[test]
    fn orphaned_block_is_retriable() {
        let error = RosettaError::BlockOrphaned {
            requested: "0xaa".to_string(),
            returned: "0xbb".to_string(),
        };
        assert!(error.retriable());
        assert_eq!(error.code(), 4);
    }

    #[test]
    fn wire_shape_matches_spec_fields() {
        let wire = RosettaError::InvalidAddress("not 20 bytes".to_string()).to_wire();
        assert_eq!(wire.code, 3);
        assert!(!wire.retriable);
    }
}
