//! Shared state every handler reads from (spec §6 "Configuration surface").

use std::sync::Arc;

use rosetta_block_service::BlockService;
use rosetta_config::Mode;
use rosetta_types::{Currency, NetworkIdentifier};

/// Everything a request handler needs beyond its own arguments: the
/// orchestrator, which network this instance serves, and whether it may
/// reach the node at all.
#[derive(Clone)]
pub struct AppState {
    /// The orchestrator composing C1-C5 into block/account/status requests.
    pub block_service: Arc<BlockService>,
    /// The single network this process answers requests for.
    pub network_identifier: NetworkIdentifier,
    /// The chain's native currency (spec §3), used to tag
    /// `/account/balance` amounts.
    pub native_currency: Currency,
    /// `Offline` rejects any handler that would reach the node adapter.
    pub mode: Mode,
}

impl AppState {
    /// Fails with [`rosetta_config::RosettaError::UnavailableOffline`]
    /// unless this instance is running in [`Mode::Online`].
    pub fn require_online(&self) -> Result<(), rosetta_config::RosettaError> {
        match self.mode {
            Mode::Online => Ok(()),
            Mode::Offline => Err(rosetta_config::RosettaError::UnavailableOffline),
        }
    }
}
