//! Geth's native `callTracer` shape: a nested call tree, one JSON object
//! per frame with a `calls` array of children.

use rosetta_primitives::{Address, U256};
use rosetta_types::{CallType, FlatCall};
use serde::Deserialize;

/// A single frame of a `debug_traceTransaction`/`debug_traceBlockByHash`
/// response with `tracer: "callTracer"`.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeCallFrame {
    /// `"CALL"`, `"CALLCODE"`, `"DELEGATECALL"`, `"STATICCALL"`,
    /// `"CREATE"`, `"CREATE2"`, or `"SELFDESTRUCT"`.
    #[serde(rename = "type")]
    pub call_type: String,
    /// The calling address.
    pub from: Address,
    /// The called (or created, or self-destruct beneficiary) address.
    pub to: Address,
    /// Value transferred, absent (treated as zero) for calls that transfer
    /// nothing.
    #[serde(default)]
    pub value: Option<U256>,
    /// Gas consumed by this frame alone.
    pub gas_used: u64,
    /// Present when this frame's execution reverted or otherwise failed.
    #[serde(default)]
    pub error: Option<String>,
    /// The decoded Solidity revert reason, when available; falls back to
    /// `error` when absent.
    #[serde(default)]
    pub revert_reason: Option<String>,
    /// Child calls, in execution order.
    #[serde(default)]
    pub calls: Vec<NativeCallFrame>,
}

fn parse_call_type(raw: &str) -> CallType {
    match raw {
        "CALLCODE" => CallType::CallCode,
        "DELEGATECALL" => CallType::DelegateCall,
        "STATICCALL" => CallType::StaticCall,
        "CREATE" => CallType::Create,
        "CREATE2" => CallType::Create2,
        "SELFDESTRUCT" | "SUICIDE" => CallType::SelfDestruct,
        _ => CallType::Call,
    }
}

/// Flattens a `callTracer` frame tree into depth-first pre-order
/// [`FlatCall`]s (spec §4.2).
///
/// Each frame's index matches its DFS visitation order. A reverted frame
/// propagates `revert = true` and its error message to every descendant,
/// even if the descendant frame itself reports no error (EVM semantics:
/// state changes from an inner call are rolled back along with everything
/// above it, spec §4.2).
pub fn flatten_native(root: &NativeCallFrame) -> Vec<FlatCall> {
    let mut out = Vec::new();
    visit(root, 0, false, None, &mut out);
    out
}

fn visit(
    frame: &NativeCallFrame,
    depth: u32,
    inherited_revert: bool,
    inherited_error: Option<&str>,
    out: &mut Vec<FlatCall>,
) {
    let own_error = frame.revert_reason.as_deref().or(frame.error.as_deref());
    let revert = inherited_revert || own_error.is_some();
    let error_message = own_error
        .or(inherited_error)
        .map(std::string::ToString::to_string);

    let value = frame.value.unwrap_or(U256::ZERO);
    let index = out.len();

    out.push(FlatCall {
        index,
        depth,
        call_type: parse_call_type(&frame.call_type),
        from: frame.from,
        to: frame.to,
        value,
        gas_used: frame.gas_used,
        revert,
        error_message: error_message.clone(),
        before_transfers: Vec::new(),
        after_transfers: if value.is_zero() {
            Vec::new()
        } else {
            vec![(frame.to, value)]
        },
    });

    for child in &frame.calls {
        visit(child, depth + 1, revert, error_message.as_deref(), out);
    }
}
