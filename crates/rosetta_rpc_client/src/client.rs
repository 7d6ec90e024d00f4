//! A minimal JSON-RPC 2.0 HTTP client for talking to an Ethereum-style node.
//!
//! Grounded in `edr_rpc_client`'s `RpcClient<MethodT>`: a
//! `reqwest_middleware` client wrapped with `reqwest-retry`'s
//! `ExponentialBackoff`, a monotonic request id, and a narrow `RpcMethod`
//! trait. Unlike the teacher, this client does not maintain an on-disk
//! response cache — that existed to support Hardhat's chain-forking use
//! case, which doesn't apply to a stateless indexing middleware (recorded
//! in `DESIGN.md`).

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use reqwest::Client as HttpClient;
use reqwest_middleware::{ClientBuilder as HttpClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::jsonrpc::{self, Id};

const EXPONENT_BASE: u32 = 2;
const MIN_RETRY_INTERVAL: Duration = Duration::from_millis(250);
const MAX_RETRY_INTERVAL: Duration = Duration::from_secs(8);
const MAX_RETRIES: u32 = 5;

/// A method a [`RpcClient`] can invoke: a name plus already-serialized
/// parameters.
pub trait RpcMethod {
    /// The JSON-RPC method name, e.g. `"eth_getBlockByHash"`.
    fn method_name(&self) -> &'static str;

    /// The method's positional parameters, as a JSON array value.
    fn params(&self) -> serde_json::Value;
}

/// Errors a [`RpcClient`] call can fail with.
#[derive(Debug, thiserror::Error)]
pub enum RpcClientError {
    /// The request could not be sent (connection refused, DNS failure,
    /// TLS error, …).
    #[error("failed to send request: {0}")]
    FailedToSend(#[from] reqwest_middleware::Error),

    /// The server returned a non-success HTTP status.
    #[error("node returned HTTP status {0}")]
    HttpStatus(reqwest::StatusCode),

    /// The response body was not valid JSON, or didn't decode into the
    /// expected JSON-RPC envelope/result shape.
    #[error("failed to parse response as '{expected_type}': {error}")]
    InvalidResponse {
        /// The statically-known type the caller expected to decode.
        expected_type: &'static str,
        /// The underlying decode error.
        error: serde_json::Error,
    },

    /// The node returned a JSON-RPC error object.
    #[error(transparent)]
    JsonRpcError(#[from] jsonrpc::Error),

    /// The node returned an empty (`null`) result where a value was
    /// required.
    #[error("not found")]
    NotFound,

    /// The request's cancellation token fired before the response arrived.
    #[error("request cancelled")]
    Cancelled,

    /// The response body could not be read from the wire.
    #[error("failed to read response body: {0}")]
    TransportError(String),
}

/// A client for executing JSON-RPC methods against a remote Ethereum node.
#[derive(Debug)]
pub struct RpcClient {
    url: url::Url,
    client: ClientWithMiddleware,
    next_id: AtomicU64,
}

impl RpcClient {
    /// Constructs a client pointed at `url`, with exponential-backoff
    /// retry on transient failures.
    pub fn new(url: url::Url) -> Self {
        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(MIN_RETRY_INTERVAL, MAX_RETRY_INTERVAL)
            .base(EXPONENT_BASE)
            .build_with_max_retries(MAX_RETRIES);

        let client = HttpClientBuilder::new(HttpClient::new())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        RpcClient {
            url,
            client,
            next_id: AtomicU64::new(0),
        }
    }

    /// Invokes `method`, decoding the result as `T`. Aborts early if
    /// `cancellation` fires before the response arrives (spec §5:
    /// "Cancellation... Propagated into every RPC").
    #[tracing::instrument(level = "debug", skip(self, cancellation), fields(method = method.method_name()))]
    pub async fn call<M, T>(
        &self,
        method: &M,
        cancellation: &CancellationToken,
    ) -> Result<T, RpcClientError>
    where
        M: RpcMethod,
        T: DeserializeOwned,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = jsonrpc::Request {
            jsonrpc: "2.0",
            method: method.method_name(),
            params: method.params(),
            id: Id::Num(id),
        };

        let send = self
            .client
            .post(self.url.clone())
            .json(&request)
            .send();

        let response = tokio::select! {
            biased;
            () = cancellation.cancelled() => return Err(RpcClientError::Cancelled),
            result = send => result?,
        };

        if !response.status().is_success() {
            return Err(RpcClientError::HttpStatus(response.status()));
        }

        let body = response
            .text()
            .await
            .map_err(|error| RpcClientError::TransportError(error.to_string()))?;

        let envelope: jsonrpc::Response<T> =
            serde_json::from_str(&body).map_err(|error| RpcClientError::InvalidResponse {
                expected_type: std::any::type_name::<T>(),
                error,
            })?;

        if let Some(error) = envelope.error {
            tracing::debug!(code = error.code, message = %error.message, "node returned JSON-RPC error");
            return Err(RpcClientError::JsonRpcError(error));
        }

        envelope.result.ok_or(RpcClientError::NotFound)
    }
}
