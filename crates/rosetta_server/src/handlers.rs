//! Route handlers (spec §6). `/account/balance` and `/block` call through
//! to the real [`rosetta_block_service::BlockService`]; the rest return
//! the minimal shape a Rosetta client expects.

use std::str::FromStr;

use axum::extract::State;
use axum::Json;
use tokio_util::sync::CancellationToken;

use rosetta_config::RosettaError;
use rosetta_node_adapter::BlockId;
use rosetta_primitives::{Address, B256};
use rosetta_types::{Amount, OperationStatus, OperationType, WireError};

use crate::dto::{
    AccountBalanceRequest, AccountBalanceResponse, Allow, BlockRequest, BlockResponse, NetworkListResponse,
    NetworkOptionsResponse, NetworkStatusResponse, PartialBlockIdentifier, VersionInfo,
};
use crate::error::ApiError;
use crate::state::AppState;

fn resolve_block_id(partial: &PartialBlockIdentifier) -> Result<BlockId, ApiError> {
    match (&partial.hash, partial.index) {
        (Some(hash), _) => B256::from_str(hash)
            .map(BlockId::Hash)
            .map_err(|error| ApiError(RosettaError::InvalidInput(format!("malformed block hash: {error}")))),
        (None, Some(index)) => Ok(BlockId::Number(index)),
        (None, None) => Ok(BlockId::Latest),
    }
}

fn resolve_address(raw: &str) -> Result<Address, ApiError> {
    Address::from_str(raw).map_err(|error| ApiError(RosettaError::InvalidAddress(format!("{raw}: {error}"))))
}

/// `POST /network/list`: this instance's single configured network.
pub async fn network_list(State(state): State<AppState>) -> Json<NetworkListResponse> {
    Json(NetworkListResponse {
        network_identifiers: vec![state.network_identifier.clone()],
    })
}

/// `POST /network/options`: the fixed operation/status/error taxonomy this
/// middleware can produce (spec §6).
pub async fn network_options() -> Json<NetworkOptionsResponse> {
    let errors = [
        RosettaError::UnavailableOffline,
        RosettaError::InvalidInput(String::new()),
        RosettaError::InvalidAddress(String::new()),
        RosettaError::BlockOrphaned {
            requested: String::new(),
            returned: String::new(),
        },
        RosettaError::GethError(String::new()),
        RosettaError::InternalError(String::new()),
        RosettaError::Unimplemented(String::new()),
        RosettaError::GethNotReady(String::new()),
    ]
    .iter()
    .map(RosettaError::to_wire)
    .collect::<Vec<WireError>>();

    Json(NetworkOptionsResponse {
        version: VersionInfo {
            rosetta_version: "1.4.13".to_string(),
            node_version: env!("CARGO_PKG_VERSION").to_string(),
        },
        allow: Allow {
            operation_types: OperationType::ALL.to_vec(),
            operation_statuses: OperationStatus::ALL.to_vec(),
            errors,
        },
    })
}

/// `POST /network/status`: the chain's current tip, genesis, and sync
/// state.
pub async fn network_status(State(state): State<AppState>) -> Result<Json<NetworkStatusResponse>, ApiError> {
    state.require_online()?;
    let status = state.block_service.network_status(CancellationToken::new()).await?;
    Ok(Json(NetworkStatusResponse {
        current_block_identifier: status.current_block_identifier,
        current_block_timestamp: status.current_block_timestamp_millis,
        genesis_block_identifier: status.genesis_block_identifier,
        sync_status: status.sync_status,
        peers: status.peers,
    }))
}

/// `POST /block`: the normalized block at the requested index/hash (tip if
/// neither is given).
pub async fn block(State(state): State<AppState>, Json(request): Json<BlockRequest>) -> Result<Json<BlockResponse>, ApiError> {
    state.require_online()?;
    let id = resolve_block_id(&request.block_identifier)?;
    let block = state.block_service.block(id, CancellationToken::new()).await?;
    Ok(Json(BlockResponse { block }))
}

/// `POST /block/transaction`: not offered as a separate fetch, since
/// `/block` already returns every transaction in the block (spec §6).
pub async fn block_transaction() -> ApiError {
    ApiError(RosettaError::Unimplemented(
        "transactions are only served inline via /block".to_string(),
    ))
}

/// `POST /account/balance`: the requested account's native-currency
/// balance at the requested block (tip if unspecified).
pub async fn account_balance(
    State(state): State<AppState>,
    Json(request): Json<AccountBalanceRequest>,
) -> Result<Json<AccountBalanceResponse>, ApiError> {
    state.require_online()?;
    let address = resolve_address(&request.account_identifier.address)?;
    let id = match request.block_identifier {
        Some(partial) => resolve_block_id(&partial)?,
        None => BlockId::Latest,
    };

    let balance = state.block_service.account_balance(address, id, CancellationToken::new()).await?;

    Ok(Json(AccountBalanceResponse {
        block_identifier: balance.block_identifier,
        balances: vec![Amount {
            value: balance.balance,
            currency: state.native_currency.clone(),
        }],
    }))
}

/// Every `/construction/*` endpoint: out of scope (spec §1 Non-goals).
pub async fn construction_unimplemented() -> ApiError {
    ApiError(RosettaError::Unimplemented(
        "transaction construction is not served by this instance".to_string(),
    ))
}
