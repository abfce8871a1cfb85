#[path = "xidd/cli.rs"]
mod cli;

use crate::cli::Cli;
use log::info;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use xid_core::domain::validation::EcdsaMessageVerifier;
use xid_core::infrastructure::config::{load_config, load_config_from_file, AppConfig};
use xid_core::infrastructure::logging::init_logger;
use xid_core::infrastructure::storage::RocksStateStore;
use xid_service::api::router::{run_json_rpc_server, run_rest_server};
use xid_service::api::state::RpcState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse_args();

    let data_dir = args.data_dir.clone().unwrap_or_else(|| PathBuf::from(".xid"));
    std::fs::create_dir_all(&data_dir)?;

    let mut config = match &args.config {
        Some(path) => load_config_from_file(path, &data_dir)?,
        None => load_config(&data_dir)?,
    };
    apply_overrides(&mut config, &args);

    init_logger(config.log.dir.as_deref(), &config.log.filters);
    info!("xidd starting data_dir={}", data_dir.display());

    let rpc_addr: SocketAddr = config.rpc.listen.parse()?;
    let rest_addr = if config.rest.enabled { Some(config.rest.listen.parse::<SocketAddr>()?) } else { None };
    if args.validate_only {
        info!("configuration ok rpc={} rest={:?} unsafe_methods={}", rpc_addr, rest_addr, config.rpc.unsafe_methods);
        return Ok(());
    }

    let store = RocksStateStore::open(data_dir.join("state"))?;
    let verifier = EcdsaMessageVerifier::new();
    let (state, shutdown_rx) = RpcState::new(Arc::new(store), Arc::new(verifier), config.rpc.unsafe_methods);

    let shutdown_tx = state.shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, shutting down");
            let _ = shutdown_tx.send(true);
        }
    });

    let rpc_server = tokio::spawn(run_json_rpc_server(rpc_addr, state.clone(), shutdown_rx.clone()));
    let rest_server = rest_addr.map(|addr| tokio::spawn(run_rest_server(addr, state.clone(), shutdown_rx.clone())));

    rpc_server.await??;
    if let Some(rest_server) = rest_server {
        rest_server.await??;
    }

    info!("xidd stopped");
    Ok(())
}

fn apply_overrides(config: &mut AppConfig, args: &Cli) {
    if let Some(listen) = &args.rpc_listen {
        config.rpc.listen = listen.clone();
    }
    if let Some(listen) = &args.rest_listen {
        config.rest.listen = listen.clone();
    }
    if args.unsafe_rpc {
        config.rpc.unsafe_methods = true;
    }
    if let Some(filters) = &args.log_level {
        config.log.filters = filters.clone();
    }
}
