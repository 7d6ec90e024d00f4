#![warn(missing_docs)]
//! The REST surface (spec §6 "External interfaces"): an `axum` router over
//! [`rosetta_block_service::BlockService`]. Only `/account/balance` and
//! `/block` reach the node; every other route returns a fixed or
//! placeholder shape, and any handler that would reach the node fails
//! fast with `UNAVAILABLE_OFFLINE` while `mode = OFFLINE`.

mod dto;
mod error;
mod handlers;
mod state;

pub use dto::{
    AccountBalanceRequest, AccountBalanceResponse, AccountIdentifierDto, Allow, BlockRequest, BlockResponse,
    NetworkListResponse, NetworkOptionsResponse, NetworkRequest, NetworkStatusResponse, PartialBlockIdentifier,
    VersionInfo,
};
pub use error::ApiError;
pub use state::AppState;

use axum::routing::post;
use axum::Router;
use tower_http::trace::TraceLayer;

/// Builds the full router, wired to `state`. Kept separate from any
/// `tokio::main`/listener setup so the binary crate and tests can both
/// construct a router without binding a socket.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/network/list", post(handlers::network_list))
        .route("/network/options", post(handlers::network_options))
        .route("/network/status", post(handlers::network_status))
        .route("/block", post(handlers::block))
        .route("/block/transaction", post(handlers::block_transaction))
        .route("/account/balance", post(handlers::account_balance))
        .route("/construction/derive", post(handlers::construction_unimplemented))
        .route("/construction/preprocess", post(handlers::construction_unimplemented))
        .route("/construction/metadata", post(handlers::construction_unimplemented))
        .route("/construction/payloads", post(handlers::construction_unimplemented))
        .route("/construction/combine", post(handlers::construction_unimplemented))
        .route("/construction/parse", post(handlers::construction_unimplemented))
        .route("/construction/hash", post(handlers::construction_unimplemented))
        .route("/construction/submit", post(handlers::construction_unimplemented))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use rosetta_chain_config::ChainConfig;
    use rosetta_config::Mode;
    use rosetta_node_adapter::NodeAdapter;
    use rosetta_types::{NetworkIdentifier, RosettaConfig};
    use tower::ServiceExt;

    use super::*;

    fn offline_state() -> AppState {
        let chain_config = Arc::new(ChainConfig::mainnet());
        let rosetta_config = RosettaConfig::ethereum_mainnet();
        let adapter = NodeAdapter::new("http://localhost:8545".parse().unwrap(), rosetta_config.trace_flavor);
        let block_service = rosetta_block_service::BlockService::new(adapter, chain_config, rosetta_config.clone());
        AppState {
            block_service: Arc::new(block_service),
            network_identifier: NetworkIdentifier {
                blockchain: "ethereum".to_string(),
                network: "mainnet".to_string(),
                sub_network_identifier: None,
            },
            native_currency: rosetta_config.native_currency,
            mode: Mode::Offline,
        }
    }

    #[tokio::test]
    async fn network_list_does_not_require_online_mode() {
        let app = router(offline_state());
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/network/list")
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn block_rejects_with_unavailable_offline_in_offline_mode() {
        let app = router(offline_state());
        let body = serde_json::json!({
            "network_identifier": {"blockchain": "ethereum", "network": "mainnet"},
            "block_identifier": {}
        });
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/block")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn construction_routes_are_unimplemented() {
        let app = router(offline_state());
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/construction/submit")
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    }
}
