#![warn(missing_docs)]
//! Flattens a node's nested execution-trace tree into the linear
//! [`FlatCall`] sequence the operation mapper consumes (spec §4.2).
//!
//! A node is queried with one of three trace "flavors" (spec §9
//! "Trace-flavor variation"): Geth's native `callTracer`, a JS-tracer
//! script producing the same call-tree shape, or OpenEthereum/Parity's
//! already-flat `trace_address`-keyed array. [`rosetta_node_adapter`]
//! picks the wire format to request; this crate turns either shape into
//! the same [`FlatCall`] sequence.

mod native;
mod parity;

pub use native::{NativeCallFrame, flatten_native};
pub use parity::{ParityActionType, ParityTrace, flatten_parity};

pub use rosetta_types::{CallType, FlatCall};

#[cfg(test)]
mod tests {
    use rosetta_primitives::{Address, U256};

    use super::*;

    fn addr(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    #[test]
    fn native_and_parity_agree_on_a_simple_two_level_trace() {
        let native = NativeCallFrame {
            call_type: "CALL".to_string(),
            from: addr(1),
            to: addr(2),
            value: Some(U256::from(100u64)),
            gas_used: 21000,
            error: None,
            revert_reason: None,
            calls: vec![NativeCallFrame {
                call_type: "CALL".to_string(),
                from: addr(2),
                to: addr(3),
                value: Some(U256::from(50u64)),
                gas_used: 5000,
                error: None,
                revert_reason: None,
                calls: vec![],
            }],
        };

        let flat = flatten_native(&native);
        assert_eq!(flat.len(), 2);
        assert_eq!(flat[0].index, 0);
        assert_eq!(flat[0].depth, 0);
        assert_eq!(flat[1].index, 1);
        assert_eq!(flat[1].depth, 1);
        assert!(!flat[0].revert);
        assert!(!flat[1].revert);
    }

    #[test]
    fn reverted_outer_call_marks_inner_calls_reverted_and_inherits_message() {
        let native = NativeCallFrame {
            call_type: "CALL".to_string(),
            from: addr(1),
            to: addr(2),
            value: Some(U256::ZERO),
            gas_used: 21000,
            error: Some("execution reverted".to_string()),
            revert_reason: Some("insufficient balance".to_string()),
            calls: vec![NativeCallFrame {
                call_type: "CALL".to_string(),
                from: addr(2),
                to: addr(3),
                value: Some(U256::from(1u64)),
                gas_used: 1000,
                error: None,
                revert_reason: None,
                calls: vec![],
            }],
        };

        let flat = flatten_native(&native);
        assert!(flat[0].revert);
        assert!(flat[1].revert);
        assert_eq!(flat[1].error_message.as_deref(), Some("insufficient balance"));
    }
}
