use log::warn;
use std::sync::Arc;
use tokio::sync::watch;
use xid_core::domain::validation::MessageVerifier;
use xid_core::infrastructure::storage::StateStore;
use xid_core::{Result, XidError};

/// Shared state of the RPC and REST servers.
pub struct RpcState {
    pub store: Arc<dyn StateStore>,
    pub verifier: Arc<dyn MessageVerifier>,
    /// Whether disruptive methods (`stop`, `getcurrentstate`) are enabled.
    pub unsafe_methods: bool,
    /// Signalled to shut the servers down (the `stop` RPC, ctrl-c).
    pub shutdown: watch::Sender<bool>,
}

impl RpcState {
    pub fn new(store: Arc<dyn StateStore>, verifier: Arc<dyn MessageVerifier>, unsafe_methods: bool) -> (Arc<Self>, watch::Receiver<bool>) {
        let (shutdown, shutdown_rx) = watch::channel(false);
        (Arc::new(Self { store, verifier, unsafe_methods, shutdown }), shutdown_rx)
    }

    pub fn ensure_unsafe_allowed(&self, method: &str) -> Result<()> {
        if !self.unsafe_methods {
            warn!("blocked unsafe '{}' call", method);
            return Err(XidError::UnsafeMethod);
        }
        Ok(())
    }

    pub fn request_stop(&self) {
        let _ = self.shutdown.send(true);
    }
}
