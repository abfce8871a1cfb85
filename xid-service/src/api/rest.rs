//! Read-only REST surface over the indexed state.
//!
//! `GET /state` returns the full state, `GET /name/{name}` the state of a
//! single name.  The method is checked before any path dispatch: non-GET
//! requests are a 405 no matter what they address, and unknown paths are
//! a 404.

use crate::api::state::RpcState;
use axum::extract::{Path, Request, State};
use axum::http::{Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use log::{info, warn};
use std::sync::Arc;
use xid_core::application::{full_state, name_state};
use xid_core::foundation::Name;

pub fn build_rest_router(state: Arc<RpcState>) -> Router {
    Router::new()
        .route("/state", get(handle_state))
        .route("/name/{name}", get(handle_name))
        .fallback(handle_not_found)
        .layer(axum::middleware::from_fn(require_get))
        .with_state(state)
}

async fn require_get(request: Request, next: Next) -> Response {
    if request.method() != Method::GET {
        warn!("REST server: {} request to {} rejected", request.method(), request.uri().path());
        return (StatusCode::METHOD_NOT_ALLOWED, "only GET is supported").into_response();
    }
    next.run(request).await
}

async fn handle_state(State(state): State<Arc<RpcState>>) -> Response {
    info!("REST request: /state");
    match full_state(&*state.store) {
        Ok(result) => axum::Json(result).into_response(),
        Err(err) => internal_error(err),
    }
}

async fn handle_name(State(state): State<Arc<RpcState>>, Path(name): Path<String>) -> Response {
    info!("REST request: /name/{}", name);
    match name_state(&*state.store, &Name::from(name)) {
        Ok(result) => axum::Json(result).into_response(),
        Err(err) => internal_error(err),
    }
}

async fn handle_not_found() -> Response {
    (StatusCode::NOT_FOUND, "invalid API endpoint").into_response()
}

fn internal_error(err: xid_core::XidError) -> Response {
    warn!("REST request failed: {}", err);
    (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
}
