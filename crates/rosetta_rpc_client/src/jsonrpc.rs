//! JSON-RPC 2.0 envelope types (spec §6: "All follow standard JSON-RPC 2.0
//! framing").

use serde::{Deserialize, Serialize};

/// A JSON-RPC request id. The client always sends a number; this also
/// accepts strings and null so arbitrary server responses still parse.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    /// A numeric id, as produced by [`crate::client::RpcClient`].
    Num(u64),
    /// A string id.
    Str(String),
    /// No id (notifications only; unused by this client).
    None,
}

/// A JSON-RPC 2.0 request envelope.
#[derive(Clone, Debug, Serialize)]
pub struct Request<'a, Params> {
    /// Always `"2.0"`.
    pub jsonrpc: &'a str,
    /// The RPC method name, e.g. `"eth_getBlockByHash"`.
    pub method: &'a str,
    /// The method's positional parameters.
    pub params: Params,
    /// The request id, echoed back in the response.
    pub id: Id,
}

/// A JSON-RPC 2.0 error object.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Error {
    /// The JSON-RPC error code.
    pub code: i64,
    /// A human-readable error message.
    pub message: String,
    /// Optional additional error data.
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JSON-RPC error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for Error {}

/// A JSON-RPC 2.0 response envelope, generic over the expected result type.
#[derive(Clone, Debug, Deserialize)]
pub struct Response<T> {
    /// The id echoed back from the request.
    #[serde(default)]
    pub id: Id,
    /// The successful result, if the call did not error.
    #[serde(default)]
    pub result: Option<T>,
    /// The error, if the call failed.
    #[serde(default)]
    pub error: Option<Error>,
}

impl Default for Id {
    fn default() -> Self {
        Id::None
    }
}
