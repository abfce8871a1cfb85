//! The JSON-RPC 2.0 dispatcher, handling single and batch requests.

use crate::api::errors::{json_err, JsonRpcRequest, RpcErrorCode};
use crate::api::state::RpcState;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use log::{debug, info};
use serde::de::DeserializeOwned;
use std::sync::Arc;

pub async fn handle_rpc(State(state): State<Arc<RpcState>>, body: String) -> Response {
    let parsed = serde_json::from_str::<serde_json::Value>(&body);
    let Ok(value) = parsed else {
        debug!("rpc parse error body_len={}", body.len());
        return axum::Json(json_err(serde_json::Value::Null, RpcErrorCode::ParseError as i64, "parse error")).into_response();
    };

    match value {
        serde_json::Value::Array(batch) => {
            if batch.is_empty() {
                return axum::Json(json_err(serde_json::Value::Null, RpcErrorCode::InvalidRequest as i64, "empty batch"))
                    .into_response();
            }
            debug!("rpc batch request batch_size={}", batch.len());
            let mut out = Vec::with_capacity(batch.len());
            for item in batch {
                match serde_json::from_value::<JsonRpcRequest>(item) {
                    Ok(req) => out.push(handle_single(&state, req).await),
                    Err(err) => out.push(json_err(serde_json::Value::Null, RpcErrorCode::InvalidRequest as i64, err.to_string())),
                }
            }
            axum::Json(serde_json::Value::Array(out)).into_response()
        }
        other => match serde_json::from_value::<JsonRpcRequest>(other) {
            Ok(req) => axum::Json(handle_single(&state, req).await).into_response(),
            Err(err) => {
                axum::Json(json_err(serde_json::Value::Null, RpcErrorCode::InvalidRequest as i64, err.to_string())).into_response()
            }
        },
    }
}

async fn handle_single(state: &RpcState, req: JsonRpcRequest) -> serde_json::Value {
    let id = req.id.clone();
    debug!("rpc request method={}", req.method);

    if let Some(version) = req.jsonrpc.as_deref() {
        if version != "2.0" {
            return json_err(id, RpcErrorCode::InvalidRequest as i64, "jsonrpc must be '2.0'");
        }
    }

    match req.method.as_str() {
        "getnamestate" => super::state::get_name_state(state, id, req.params),
        "getnullstate" => super::state::get_null_state(id),
        "getcurrentstate" => super::state::get_current_state(state, id),
        "verifyauth" => super::auth::verify_auth(state, id, req.params),
        "getauthmessage" => super::auth::get_auth_message(id, req.params),
        "setauthsignature" => super::auth::set_auth_signature(id, req.params),
        "stop" => stop(state, id),
        _ => {
            debug!("rpc method not found method={}", req.method);
            json_err(id, RpcErrorCode::MethodNotFound as i64, "method not found")
        }
    }
}

fn stop(state: &RpcState, id: serde_json::Value) -> serde_json::Value {
    info!("RPC method called: stop");
    if let Err(err) = state.ensure_unsafe_allowed("stop") {
        return crate::api::errors::json_app_err(id, &err);
    }
    state.request_stop();
    crate::api::errors::json_ok(id, serde_json::Value::Null)
}

/// Deserialises the named params of a request, treating absent params as
/// the empty object.
pub fn parse_params<T: DeserializeOwned>(params: Option<serde_json::Value>) -> Result<T, String> {
    let params = params.unwrap_or_else(|| serde_json::Value::Object(Default::default()));
    serde_json::from_value(params).map_err(|err| err.to_string())
}
