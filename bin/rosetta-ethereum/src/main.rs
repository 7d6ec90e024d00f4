//! Entry point: loads configuration from the environment, wires a node
//! adapter and chain config into a [`rosetta_block_service::BlockService`],
//! and serves the Rosetta REST surface (spec §6).

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use rosetta_block_service::BlockService;
use rosetta_chain_config::ChainConfig;
use rosetta_config::EnvConfig;
use rosetta_node_adapter::NodeAdapter;
use rosetta_server::AppState;
use rosetta_types::NetworkIdentifier;

/// A Rosetta-style indexing middleware for Ethereum-compatible chains.
/// All configuration is read from the environment; see `EnvConfig` for
/// the recognized variables.
#[derive(Parser)]
struct CliArgs {
    /// Logs one line per request in addition to the usual span events.
    #[clap(short, long, takes_value = false)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    let env = EnvConfig::from_env().context("failed to load configuration from the environment")?;
    tracing::info!(network = %env.network, mode = ?env.mode, port = env.port, "starting rosetta-ethereum");

    let chain_config = Arc::new(ChainConfig::mainnet());
    let adapter = match &env.node_url {
        Some(url) => NodeAdapter::new(url.clone(), env.rosetta.trace_flavor),
        None => NodeAdapter::new(
            "http://127.0.0.1:8545".parse().expect("well-formed placeholder url"),
            env.rosetta.trace_flavor,
        ),
    };

    let native_currency = env.rosetta.native_currency.clone();
    let block_service = BlockService::new(adapter, chain_config, env.rosetta);

    let state = AppState {
        block_service: Arc::new(block_service),
        network_identifier: NetworkIdentifier {
            blockchain: "ethereum".to_string(),
            network: env.network,
            sub_network_identifier: None,
        },
        native_currency,
        mode: env.mode,
    };

    let router = rosetta_server::router(state);
    let address = format!("0.0.0.0:{}", env.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

    tracing::info!(%address, "listening");
    axum::serve(listener, router).await.context("server exited with an error")
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
