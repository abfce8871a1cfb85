//! Shared helpers for the unit tests.

use serde_json::Value;
use std::collections::HashMap;
use xid_core::application::MoveProcessor;
use xid_core::domain::validation::MessageVerifier;
use xid_core::domain::SignerScope;
use xid_core::foundation::{Name, Result, XidError};
use xid_core::infrastructure::storage::{MemoryStateStore, StateStore};

pub fn store() -> MemoryStateStore {
    MemoryStateStore::new()
}

/// Runs the given string (parsed as JSON) through the move processor.
pub fn process(store: &dyn StateStore, moves: &str) {
    let moves: Value = serde_json::from_str(moves).expect("moves json");
    MoveProcessor::new(store).process_block(&moves).expect("process block");
}

/// Adds one signer row on top of whatever the scope already holds.
pub fn add_signer(store: &dyn StateStore, name: &str, scope: &SignerScope, address: &str) {
    let name = Name::from(name);
    let mut addresses: Vec<String> = store
        .signers_for(&name)
        .expect("signers_for")
        .into_iter()
        .filter(|(row_scope, _)| row_scope == scope)
        .map(|(_, address)| address)
        .collect();
    addresses.push(address.to_string());
    store.replace_signers(&name, scope, &addresses).expect("replace_signers");
}

/// The `signers` portion of a name's state view.
pub fn signers_json(store: &dyn StateStore, name: &str) -> Value {
    xid_core::application::name_state(store, &Name::from(name)).expect("name_state")["signers"].clone()
}

/// The `addresses` portion of a name's state view.
pub fn addresses_json(store: &dyn StateStore, name: &str) -> Value {
    xid_core::application::name_state(store, &Name::from(name)).expect("name_state")["addresses"].clone()
}

/// Message verifier answering from a fixed table of (message, signature)
/// pairs, failing recovery for everything else.
#[derive(Default)]
pub struct FakeVerifier {
    responses: HashMap<(String, Vec<u8>), String>,
}

impl FakeVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, message: &str, signature: &[u8], address: &str) {
        self.responses.insert((message.to_string(), signature.to_vec()), address.to_string());
    }
}

impl MessageVerifier for FakeVerifier {
    fn recover_signer(&self, message: &str, signature: &[u8]) -> Result<String> {
        self.responses
            .get(&(message.to_string(), signature.to_vec()))
            .cloned()
            .ok_or_else(|| XidError::SignatureRecovery("unknown message/signature pair".to_string()))
    }
}
