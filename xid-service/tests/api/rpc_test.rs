use super::{call_rpc, call_rpc_raw, test_state};
use serde_json::json;
use xid_core::domain::SignerScope;
use xid_core::foundation::Name;
use xid_core::infrastructure::storage::StateStore;
use xid_service::api::router::build_rpc_router;

#[tokio::test]
async fn getnamestate_returns_the_indexed_state() {
    let (state, _shutdown) = test_state(false);
    state.store.replace_signers(&Name::from("domob"), &SignerScope::Global, &["addr".to_string()]).expect("replace");
    let router = build_rpc_router(state);

    let (status, body) = call_rpc(
        &router,
        json!({"jsonrpc": "2.0", "method": "getnamestate", "params": {"name": "domob"}, "id": 1}),
    )
    .await;

    assert!(status.is_success());
    assert_eq!(body["result"], json!({"name": "domob", "signers": [{"addresses": ["addr"]}], "addresses": {}}));
}

#[tokio::test]
async fn getnamestate_requires_the_name_param() {
    let (state, _shutdown) = test_state(false);
    let router = build_rpc_router(state);

    let (_, body) = call_rpc(&router, json!({"jsonrpc": "2.0", "method": "getnamestate", "params": {}, "id": 1})).await;
    assert_eq!(body["error"]["code"], -32602);
}

#[tokio::test]
async fn getnullstate_returns_null() {
    let (state, _shutdown) = test_state(false);
    let router = build_rpc_router(state);

    let (_, body) = call_rpc(&router, json!({"jsonrpc": "2.0", "method": "getnullstate", "id": 1})).await;
    assert!(body["result"].is_null());
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn unknown_method_is_reported() {
    let (state, _shutdown) = test_state(false);
    let router = build_rpc_router(state);

    let (_, body) = call_rpc(&router, json!({"jsonrpc": "2.0", "method": "does.not.exist", "id": 7})).await;
    assert_eq!(body["error"]["code"], -32601);
    assert_eq!(body["id"], 7);
}

#[tokio::test]
async fn parse_errors_are_reported() {
    let (state, _shutdown) = test_state(false);
    let router = build_rpc_router(state);

    let (_, body) = call_rpc_raw(&router, "{ not json".to_string()).await;
    assert_eq!(body["error"]["code"], -32700);
}

#[tokio::test]
async fn batch_requests_return_an_array() {
    let (state, _shutdown) = test_state(false);
    let router = build_rpc_router(state);

    let (_, body) = call_rpc(
        &router,
        json!([
            {"jsonrpc": "2.0", "method": "getnullstate", "id": 1},
            {"jsonrpc": "2.0", "method": "does.not.exist", "id": 2}
        ]),
    )
    .await;

    let arr = body.as_array().expect("array response");
    assert_eq!(arr.len(), 2);
    assert!(arr[0]["result"].is_null());
    assert_eq!(arr[1]["error"]["code"], -32601);
}

#[tokio::test]
async fn empty_batches_are_invalid() {
    let (state, _shutdown) = test_state(false);
    let router = build_rpc_router(state);

    let (_, body) = call_rpc(&router, json!([])).await;
    assert_eq!(body["error"]["code"], -32600);
}

#[tokio::test]
async fn unsafe_methods_are_gated() {
    let (state, _shutdown) = test_state(false);
    let router = build_rpc_router(state);

    for method in ["stop", "getcurrentstate"] {
        let (_, body) = call_rpc(&router, json!({"jsonrpc": "2.0", "method": method, "id": 1})).await;
        assert_eq!(body["error"]["code"], -4, "method {}", method);
    }
}

#[tokio::test]
async fn getcurrentstate_works_when_unsafe_methods_are_enabled() {
    let (state, _shutdown) = test_state(true);
    state.store.upsert_address(&Name::from("domob"), "btc", "1domob").expect("upsert");
    let router = build_rpc_router(state);

    let (_, body) = call_rpc(&router, json!({"jsonrpc": "2.0", "method": "getcurrentstate", "id": 1})).await;
    assert_eq!(body["result"]["names"]["domob"]["addresses"], json!({"btc": "1domob"}));
}

#[tokio::test]
async fn stop_triggers_the_shutdown_signal() {
    let (state, mut shutdown) = test_state(true);
    let router = build_rpc_router(state);

    assert!(!*shutdown.borrow_and_update());
    let (_, body) = call_rpc(&router, json!({"jsonrpc": "2.0", "method": "stop", "id": 1})).await;
    assert!(body.get("error").is_none());
    assert!(*shutdown.borrow_and_update());
}

#[tokio::test]
async fn wrong_jsonrpc_version_is_rejected() {
    let (state, _shutdown) = test_state(false);
    let router = build_rpc_router(state);

    let (_, body) = call_rpc(&router, json!({"jsonrpc": "1.0", "method": "getnullstate", "id": 1})).await;
    assert_eq!(body["error"]["code"], -32600);
}
