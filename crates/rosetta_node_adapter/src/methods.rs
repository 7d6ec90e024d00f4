//! `eth_*`/`debug_*`/`trace_*`/`admin_*` request shapes (spec §4.1, §6).

use rosetta_primitives::{Address, B256};
use rosetta_rpc_client::RpcMethod;
use rosetta_types::config::TraceFlavor;
use serde_json::{json, Value};

/// A block identifier accepted by `eth_getBlockBy*`.
#[derive(Clone, Debug)]
pub enum BlockId {
    /// `eth_getBlockByHash`.
    Hash(B256),
    /// `eth_getBlockByNumber` with an explicit number.
    Number(u64),
    /// `eth_getBlockByNumber` with the `"latest"` tag.
    Latest,
}

/// A typed JSON-RPC request this adapter can issue.
#[derive(Clone, Debug)]
pub enum Method {
    /// `eth_getBlockByHash`/`eth_getBlockByNumber`.
    GetBlock(BlockId),
    /// `eth_getBlockReceipts`, batched receipt fetch for a whole block.
    GetBlockReceipts(B256),
    /// `eth_getTransactionReceipt`, the per-transaction fallback.
    GetTransactionReceipt(B256),
    /// `debug_traceBlockByHash` with the `callTracer`/JS tracer.
    DebugTraceBlockByHash(B256),
    /// `debug_traceTransaction` with the `callTracer`/JS tracer.
    DebugTraceTransaction(B256),
    /// `trace_replayBlockTransactions` (OpenEthereum flavor).
    TraceReplayBlockTransactions(B256),
    /// `trace_replayTransaction` (OpenEthereum flavor).
    TraceReplayTransaction(B256),
    /// `eth_getProof`.
    GetProof(Address, u64),
    /// `eth_getBlockByNumber`, used to read only the state root.
    GetBlockStateRoot(u64),
    /// `eth_call`, used by the currency resolver to probe `symbol()`/
    /// `decimals()`.
    Call {
        /// The contract being called.
        to: Address,
        /// ABI-encoded calldata.
        data: Vec<u8>,
        /// The block to call against.
        block: BlockId,
    },
    /// `eth_syncing`.
    Syncing,
    /// `admin_peers`.
    AdminPeers,
    /// `eth_blockNumber`.
    BlockNumber,
    /// `eth_getUncleByBlockHashAndIndex`.
    GetUncleByIndex(B256, u64),
    /// `parity_getBlockAuthor`, for chains with a separate author concept
    /// from `coinbase` (spec §3 "block author").
    BlockAuthor(u64),
}

fn block_id_json(id: &BlockId) -> Value {
    match id {
        BlockId::Number(n) => json!(format!("0x{n:x}")),
        BlockId::Latest => json!("latest"),
        BlockId::Hash(hash) => json!(hash),
    }
}

impl Method {
    /// Which tracer-specific method this is, selected by [`TraceFlavor`]
    /// (spec §9 "Trace-flavor variation").
    pub fn trace_block(hash: B256, flavor: TraceFlavor) -> Method {
        match flavor {
            TraceFlavor::Native | TraceFlavor::Js => Method::DebugTraceBlockByHash(hash),
            TraceFlavor::OpenEthereum => Method::TraceReplayBlockTransactions(hash),
        }
    }

    /// As [`Self::trace_block`], for a single transaction.
    pub fn trace_transaction(hash: B256, flavor: TraceFlavor) -> Method {
        match flavor {
            TraceFlavor::Native | TraceFlavor::Js => Method::DebugTraceTransaction(hash),
            TraceFlavor::OpenEthereum => Method::TraceReplayTransaction(hash),
        }
    }
}

impl RpcMethod for Method {
    fn method_name(&self) -> &'static str {
        match self {
            Method::GetBlock(BlockId::Hash(_)) => "eth_getBlockByHash",
            Method::GetBlock(_) => "eth_getBlockByNumber",
            Method::GetBlockReceipts(_) => "eth_getBlockReceipts",
            Method::GetTransactionReceipt(_) => "eth_getTransactionReceipt",
            Method::DebugTraceBlockByHash(_) => "debug_traceBlockByHash",
            Method::DebugTraceTransaction(_) => "debug_traceTransaction",
            Method::TraceReplayBlockTransactions(_) => "trace_replayBlockTransactions",
            Method::TraceReplayTransaction(_) => "trace_replayTransaction",
            Method::GetProof(..) => "eth_getProof",
            Method::GetBlockStateRoot(_) => "eth_getBlockByNumber",
            Method::Call { .. } => "eth_call",
            Method::Syncing => "eth_syncing",
            Method::AdminPeers => "admin_peers",
            Method::BlockNumber => "eth_blockNumber",
            Method::GetUncleByIndex(..) => "eth_getUncleByBlockHashAndIndex",
            Method::BlockAuthor(_) => "parity_getBlockAuthor",
        }
    }

    fn params(&self) -> Value {
        match self {
            Method::GetBlock(id) => json!([block_id_json(id), true]),
            Method::GetBlockReceipts(hash) => json!([hash]),
            Method::GetTransactionReceipt(hash) => json!([hash]),
            Method::DebugTraceBlockByHash(hash) => {
                json!([hash, { "tracer": "callTracer" }])
            }
            Method::DebugTraceTransaction(hash) => {
                json!([hash, { "tracer": "callTracer" }])
            }
            Method::TraceReplayBlockTransactions(hash) => {
                json!([hash, ["trace"]])
            }
            Method::TraceReplayTransaction(hash) => {
                json!([hash, ["trace"]])
            }
            Method::GetProof(address, block_number) => {
                json!([address, Vec::<B256>::new(), format!("0x{block_number:x}")])
            }
            Method::GetBlockStateRoot(number) => json!([format!("0x{number:x}"), false]),
            Method::Call { to, data, block } => {
                json!([{ "to": to, "data": rosetta_primitives::hex::encode_prefixed(data) }, block_id_json(block)])
            }
            Method::Syncing | Method::AdminPeers | Method::BlockNumber => json!([]),
            Method::GetUncleByIndex(hash, index) => json!([hash, format!("0x{index:x}")]),
            Method::BlockAuthor(number) => json!([format!("0x{number:x}")]),
        }
    }
}
