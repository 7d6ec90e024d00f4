//! Flattened execution trace types, produced by
//! [`rosetta_trace`](../rosetta_trace/index.html) from a node's nested
//! call-tree trace.

use rosetta_primitives::{Address, U256};

/// The EVM opcode (or pseudo-opcode, for the top-level call) that produced a
/// [`FlatCall`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallType {
    /// A regular message call.
    Call,
    /// `CALLCODE`: executes the callee's code in the caller's context.
    CallCode,
    /// `DELEGATECALL`: like `CALLCODE` but also forwards `msg.sender`/
    /// `msg.value`.
    DelegateCall,
    /// `STATICCALL`: a call that may not modify state.
    StaticCall,
    /// Contract creation via `CREATE`.
    Create,
    /// Contract creation via `CREATE2`, at a deterministic address.
    Create2,
    /// `SELFDESTRUCT`: the contract destroys itself, sending its remaining
    /// balance to the given address.
    SelfDestruct,
}

impl CallType {
    /// Whether this is one of the three "message call" types, as opposed to
    /// a contract-creation or self-destruct type.
    pub fn is_call(self) -> bool {
        matches!(
            self,
            CallType::Call | CallType::CallCode | CallType::DelegateCall | CallType::StaticCall
        )
    }
}

/// A single node in the depth-first-flattened call tree of a transaction's
/// execution trace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlatCall {
    /// This call's depth-first pre-order index within the transaction
    /// (spec §4.2: flattening assigns indices matching DFS position).
    pub index: usize,
    /// Nesting depth, `0` for the top-level call.
    pub depth: u32,
    /// The opcode/pseudo-opcode that produced this call.
    pub call_type: CallType,
    /// The calling address.
    pub from: Address,
    /// The called (or, for `CREATE`/`CREATE2`, the created) address.
    pub to: Address,
    /// Value transferred by this call, in wei.
    pub value: U256,
    /// Gas consumed by this call.
    pub gas_used: u64,
    /// Whether this call (or an ancestor call) reverted. Inner calls of a
    /// reverted outer call are still emitted, marked `revert = true`, and
    /// inherit the outer error message (spec §4.2).
    pub revert: bool,
    /// The revert reason, if any.
    pub error_message: Option<String>,
    /// Value transfers observed immediately before this call executed
    /// (used for destroyed-account delta accounting).
    pub before_transfers: Vec<(Address, U256)>,
    /// Value transfers observed immediately after this call executed.
    pub after_transfers: Vec<(Address, U256)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_call_partitions_call_types() {
        assert!(CallType::Call.is_call());
        assert!(CallType::StaticCall.is_call());
        assert!(!CallType::Create.is_call());
        assert!(!CallType::SelfDestruct.is_call());
    }
}
