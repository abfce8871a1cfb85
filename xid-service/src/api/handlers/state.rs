//! Handlers reading the indexed state.

use super::rpc::parse_params;
use crate::api::errors::{json_app_err, json_err, json_ok, RpcErrorCode};
use crate::api::state::RpcState;
use log::info;
use serde::Deserialize;
use serde_json::Value;
use xid_core::application::{full_state, name_state};
use xid_core::foundation::Name;

#[derive(Debug, Deserialize)]
struct NameStateParams {
    name: String,
}

pub fn get_name_state(state: &RpcState, id: Value, params: Option<Value>) -> Value {
    let params: NameStateParams = match parse_params(params) {
        Ok(params) => params,
        Err(err) => return json_err(id, RpcErrorCode::InvalidParams as i64, err),
    };
    info!("RPC method called: getnamestate {}", params.name);

    match name_state(&*state.store, &Name::from(params.name)) {
        Ok(result) => json_ok(id, result),
        Err(err) => json_app_err(id, &err),
    }
}

pub fn get_null_state(id: Value) -> Value {
    info!("RPC method called: getnullstate");
    // Chain metadata (height, block hash) lives with the chain indexer
    // driving this process; there is nothing to report from here.
    json_ok(id, Value::Null)
}

pub fn get_current_state(state: &RpcState, id: Value) -> Value {
    info!("RPC method called: getcurrentstate");
    if let Err(err) = state.ensure_unsafe_allowed("getcurrentstate") {
        return json_app_err(id, &err);
    }
    match full_state(&*state.store) {
        Ok(result) => json_ok(id, result),
        Err(err) => json_app_err(id, &err),
    }
}
