//! Signature verification seam.
//!
//! Verifying a credential means recovering the address that signed the auth
//! message and looking it up in the signer index.  The recovery primitive
//! is behind a trait so that deployments can plug in whatever address
//! scheme their chain uses; the bundled implementation recovers a
//! secp256k1 key from a compact recoverable signature.

mod ecdsa;

pub use ecdsa::{sign_auth_message, EcdsaMessageVerifier};

use crate::foundation::Result;
use std::sync::Mutex;

/// Recovers the signing address for a message.  Implementations must be
/// pure functions safe to call from many reader threads.
pub trait MessageVerifier: Send + Sync {
    fn recover_signer(&self, message: &str, signature: &[u8]) -> Result<String>;
}

/// Verifier backend that may not be shareable across threads, e.g. an RPC
/// client holding a connection.
pub trait RecoverClient: Send {
    fn recover_signer(&mut self, message: &str, signature: &[u8]) -> Result<String>;
}

/// Serialises calls to a [`RecoverClient`] through a mutex, turning it into
/// a [`MessageVerifier`].  While one recovery is in flight, other verifier
/// calls block.
pub struct MutexedVerifier<C> {
    inner: Mutex<C>,
}

impl<C: RecoverClient> MutexedVerifier<C> {
    pub fn new(inner: C) -> Self {
        Self { inner: Mutex::new(inner) }
    }
}

impl<C: RecoverClient> MessageVerifier for MutexedVerifier<C> {
    fn recover_signer(&self, message: &str, signature: &[u8]) -> Result<String> {
        let mut client = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        client.recover_signer(message, signature)
    }
}
