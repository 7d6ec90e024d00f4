//! OpenEthereum/Parity's `trace_replayBlockTransactions`/
//! `trace_replayTransaction` shape: an already-flat array of trace entries,
//! each carrying a `trace_address` giving its path from the root.

use rosetta_primitives::{Address, U256};
use rosetta_types::{CallType, FlatCall};
use serde::Deserialize;

/// The `action.callType`/`type` discriminant of a Parity-style trace entry.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ParityActionType {
    /// A message call; the specific call kind lives in `action.call_type`.
    Call,
    /// Contract creation.
    Create,
    /// `SELFDESTRUCT`.
    Suicide,
    /// A synthetic reward entry (block/uncle reward); not a [`FlatCall`].
    Reward,
}

/// One entry of a `trace_replay*` result's `trace` array.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParityTrace {
    /// The entry's kind.
    #[serde(rename = "type")]
    pub entry_type: ParityActionType,
    /// The specific call kind (`"call"`, `"callcode"`, `"delegatecall"`,
    /// `"staticcall"`), present only when `entry_type == Call`.
    #[serde(default)]
    pub call_type: Option<String>,
    /// The calling/self-destructing address.
    #[serde(default)]
    pub from: Address,
    /// The called/created/beneficiary address.
    #[serde(default)]
    pub to: Address,
    /// Value transferred.
    #[serde(default)]
    pub value: U256,
    /// Gas consumed, from the `result` object; absent on a failed call.
    #[serde(default)]
    pub gas_used: u64,
    /// Present when this call reverted or otherwise failed.
    #[serde(default)]
    pub error: Option<String>,
    /// This entry's path from the root call, e.g. `[0, 2]` is the third
    /// child of the first child of the root.
    pub trace_address: Vec<usize>,
}

fn parse_call_type(entry: &ParityTrace) -> CallType {
    match entry.entry_type {
        ParityActionType::Create => CallType::Create,
        ParityActionType::Suicide => CallType::SelfDestruct,
        ParityActionType::Reward => CallType::Call,
        ParityActionType::Call => match entry.call_type.as_deref() {
            Some("callcode") => CallType::CallCode,
            Some("delegatecall") => CallType::DelegateCall,
            Some("staticcall") => CallType::StaticCall,
            _ => CallType::Call,
        },
    }
}

/// Flattens a `trace_replay*` response's trace array into [`FlatCall`]s.
///
/// Parity's array is already emitted in depth-first pre-order (each
/// entry's `trace_address` is lexicographically non-decreasing); reward
/// entries are dropped (spec §4.3b handles block rewards separately, not
/// as a trace operation) and depth is simply `trace_address.len()`.
///
/// Revert inheritance mirrors [`crate::flatten_native`]: an ancestor
/// entry's error, once set, propagates to every descendant even if Parity
/// did not itself mark the descendant as failed.
pub fn flatten_parity(entries: &[ParityTrace]) -> Vec<FlatCall> {
    let mut out = Vec::new();
    // (trace_address, revert, error_message) for every ancestor seen so far,
    // used to look up the nearest ancestor of the current entry.
    let mut ancestors: Vec<(Vec<usize>, bool, Option<String>)> = Vec::new();

    for entry in entries {
        if entry.entry_type == ParityActionType::Reward {
            continue;
        }

        ancestors.retain(|(addr, _, _)| is_prefix_of(addr, &entry.trace_address));

        let (inherited_revert, inherited_error) = ancestors
            .last()
            .map(|(_, revert, error)| (*revert, error.clone()))
            .unwrap_or((false, None));

        let own_error = entry.error.clone();
        let revert = inherited_revert || own_error.is_some();
        let error_message = own_error.or(inherited_error);

        let index = out.len();
        out.push(FlatCall {
            index,
            depth: entry.trace_address.len() as u32,
            call_type: parse_call_type(entry),
            from: entry.from,
            to: entry.to,
            value: entry.value,
            gas_used: entry.gas_used,
            revert,
            error_message: error_message.clone(),
            before_transfers: Vec::new(),
            after_transfers: if entry.value.is_zero() {
                Vec::new()
            } else {
                vec![(entry.to, entry.value)]
            },
        });

        ancestors.push((entry.trace_address.clone(), revert, error_message));
    }

    out
}

fn is_prefix_of(prefix: &[usize], path: &[usize]) -> bool {
    prefix.len() < path.len() && path[..prefix.len()] == *prefix
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_reward_entries_and_computes_depth_from_trace_address() {
        let entries = vec![
            ParityTrace {
                entry_type: ParityActionType::Call,
                call_type: Some("call".to_string()),
                from: Address::repeat_byte(1),
                to: Address::repeat_byte(2),
                value: U256::from(10u64),
                gas_used: 100,
                error: None,
                trace_address: vec![],
            },
            ParityTrace {
                entry_type: ParityActionType::Call,
                call_type: Some("call".to_string()),
                from: Address::repeat_byte(2),
                to: Address::repeat_byte(3),
                value: U256::from(5u64),
                gas_used: 50,
                error: None,
                trace_address: vec![0],
            },
            ParityTrace {
                entry_type: ParityActionType::Reward,
                call_type: None,
                from: Address::ZERO,
                to: Address::repeat_byte(9),
                value: U256::from(2_000_000u64),
                gas_used: 0,
                error: None,
                trace_address: vec![],
            },
        ];

        let flat = flatten_parity(&entries);
        assert_eq!(flat.len(), 2);
        assert_eq!(flat[0].depth, 0);
        assert_eq!(flat[1].depth, 1);
    }
}
