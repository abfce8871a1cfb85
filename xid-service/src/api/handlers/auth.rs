//! Handlers for credential verification and the non-state auth methods.

use super::rpc::parse_params;
use crate::api::errors::{json_app_err, json_err, json_ok, RpcErrorCode};
use crate::api::state::RpcState;
use log::info;
use serde::Deserialize;
use serde_json::Value;
use xid_core::application::{nonstate, AuthVerifier};

#[derive(Debug, Deserialize)]
struct VerifyAuthParams {
    application: String,
    name: String,
    password: String,
}

pub fn verify_auth(state: &RpcState, id: Value, params: Option<Value>) -> Value {
    let params: VerifyAuthParams = match parse_params(params) {
        Ok(params) => params,
        Err(err) => return json_err(id, RpcErrorCode::InvalidParams as i64, err),
    };
    info!("RPC method called: verifyauth name={} application={}", params.name, params.application);

    let verifier = AuthVerifier::new(&*state.store, &*state.verifier);
    match verifier.verify(&params.application, &params.name, &params.password) {
        Ok(verdict) => json_ok(id, verdict),
        Err(err) => json_app_err(id, &err),
    }
}

#[derive(Debug, Deserialize)]
struct GetAuthMessageParams {
    application: String,
    data: Value,
    name: String,
}

pub fn get_auth_message(id: Value, params: Option<Value>) -> Value {
    let params: GetAuthMessageParams = match parse_params(params) {
        Ok(params) => params,
        Err(err) => return json_err(id, RpcErrorCode::InvalidParams as i64, err),
    };

    match nonstate::get_auth_message(&params.application, &params.data, &params.name) {
        Ok(result) => json_ok(id, result),
        Err(err) => json_app_err(id, &err),
    }
}

#[derive(Debug, Deserialize)]
struct SetAuthSignatureParams {
    password: String,
    signature: String,
}

pub fn set_auth_signature(id: Value, params: Option<Value>) -> Value {
    let params: SetAuthSignatureParams = match parse_params(params) {
        Ok(params) => params,
        Err(err) => return json_err(id, RpcErrorCode::InvalidParams as i64, err),
    };

    match nonstate::set_auth_signature(&params.password, &params.signature) {
        Ok(password) => json_ok(id, password),
        Err(err) => json_app_err(id, &err),
    }
}
