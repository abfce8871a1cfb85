use crate::api::handlers::rpc::handle_rpc;
use crate::api::rest::build_rest_router;
use crate::api::state::RpcState;
use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;
use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use xid_core::XidError;

pub fn build_rpc_router(state: Arc<RpcState>) -> Router {
    Router::new().route("/rpc", post(handle_rpc)).layer(DefaultBodyLimit::max(1024 * 1024)).with_state(state)
}

pub async fn run_json_rpc_server(addr: SocketAddr, state: Arc<RpcState>, shutdown: watch::Receiver<bool>) -> Result<(), XidError> {
    info!("binding json-rpc server addr={}", addr);
    serve(addr, build_rpc_router(state), shutdown).await
}

pub async fn run_rest_server(addr: SocketAddr, state: Arc<RpcState>, shutdown: watch::Receiver<bool>) -> Result<(), XidError> {
    info!("binding rest server addr={}", addr);
    serve(addr, build_rest_router(state), shutdown).await
}

async fn serve(addr: SocketAddr, app: Router, shutdown: watch::Receiver<bool>) -> Result<(), XidError> {
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server ready and accepting connections addr={}", addr);
    axum::serve(listener, app).with_graceful_shutdown(wait_for_shutdown(shutdown)).await.map_err(|err| {
        error!("HTTP server terminated unexpectedly addr={} error={}", addr, err);
        XidError::Message(err.to_string())
    })
}

async fn wait_for_shutdown(mut shutdown: watch::Receiver<bool>) {
    while !*shutdown.borrow_and_update() {
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}
