use serde::{Deserialize, Serialize};
use xid_core::XidError;

/// Application error codes of the Xid RPC protocol.  All values are
/// explicit integers because they define the protocol for clients that
/// only ever see the numbers.
#[repr(i64)]
#[derive(Clone, Copy, Debug)]
pub enum AppErrorCode {
    /// Invalid values for arguments (e.g. a malformed JSON value for an
    /// object parameter or an out-of-range integer).
    InvalidArgument = -1,
    /// The wallet would be needed but is not enabled.
    WalletNotEnabled = -2,
    /// The wallet is locked.
    WalletLocked = -3,
    /// This method is considered unsafe and not enabled in the server.
    UnsafeMethod = -4,

    /// The provided data (name, application, extra) is invalid while
    /// constructing an auth message (not while validating a password).
    AuthInvalidData = 1,
    /// An invalid password string was provided that could not be decoded
    /// into an auth claim.  Only thrown when modifying a password, not
    /// when validating one.
    AuthInvalidPassword = 2,
    /// The wallet does not hold any key allowed to sign the credentials.
    AuthNoKey = 3,
    /// The signature passed to setauthsignature is not valid base64.
    AuthInvalidSignature = 4,
}

/// Standard JSON-RPC 2.0 error codes for transport-level failures.
#[repr(i64)]
#[derive(Clone, Copy, Debug)]
pub enum RpcErrorCode {
    ParseError = -32700,
    InvalidRequest = -32600,
    MethodNotFound = -32601,
    InvalidParams = -32602,
    InternalError = -32603,
}

/// Maps a core error to its protocol error code.  Everything that is not a
/// typed client-facing failure is an internal error.
pub fn app_error_code(err: &XidError) -> i64 {
    match err {
        XidError::InvalidArgument(_) => AppErrorCode::InvalidArgument as i64,
        XidError::UnsafeMethod => AppErrorCode::UnsafeMethod as i64,
        XidError::AuthInvalidData => AppErrorCode::AuthInvalidData as i64,
        XidError::MalformedCredential => AppErrorCode::AuthInvalidPassword as i64,
        XidError::AuthInvalidSignature => AppErrorCode::AuthInvalidSignature as i64,
        _ => RpcErrorCode::InternalError as i64,
    }
}

#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: Option<String>,
    pub id: serde_json::Value,
    pub method: String,
    pub params: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcResponse<T> {
    pub jsonrpc: &'static str,
    pub id: serde_json::Value,
    pub result: T,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub jsonrpc: &'static str,
    pub id: serde_json::Value,
    pub error: JsonRpcErrorBody,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcErrorBody {
    pub code: i64,
    pub message: String,
}

pub fn json_ok<T: Serialize>(id: serde_json::Value, result: T) -> serde_json::Value {
    serde_json::to_value(JsonRpcResponse { jsonrpc: "2.0", id, result }).unwrap_or(serde_json::Value::Null)
}

pub fn json_err(id: serde_json::Value, code: i64, message: impl Into<String>) -> serde_json::Value {
    serde_json::to_value(JsonRpcError { jsonrpc: "2.0", id, error: JsonRpcErrorBody { code, message: message.into() } })
        .unwrap_or(serde_json::Value::Null)
}

/// Error frame for a failed core operation.
pub fn json_app_err(id: serde_json::Value, err: &XidError) -> serde_json::Value {
    json_err(id, app_error_code(err), err.to_string())
}
