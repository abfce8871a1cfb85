//! The deterministic state transition from per-block move lists.
//!
//! The outer shape of the block data (array of objects, each with a string
//! `name` and a `move` value) is guaranteed by the chain indexer driving
//! us; violations are driver bugs and abort.  Everything inside `move` is
//! adversarial chain data and must never be able to abort a block: bad
//! pieces are logged and skipped, the rest of the entry still applies.

use crate::domain::SignerScope;
use crate::foundation::{Name, Result};
use crate::infrastructure::storage::StateStore;
use log::{debug, info, warn};
use serde_json::Value;

pub struct MoveProcessor<'a> {
    store: &'a dyn StateStore,
}

/// Applies one block worth of chain data to the store.  The block data
/// must carry the move list under the `moves` key.
pub fn apply_block(store: &dyn StateStore, block_data: &Value) -> Result<()> {
    let moves = block_data.get("moves").expect("block data must carry a moves value");
    MoveProcessor::new(store).process_block(moves)
}

impl<'a> MoveProcessor<'a> {
    pub fn new(store: &'a dyn StateStore) -> Self {
        Self { store }
    }

    /// Processes all moves of one block, in block order.
    pub fn process_block(&self, moves: &Value) -> Result<()> {
        let entries = moves.as_array().expect("block moves must be an array");
        info!("processing {} moves", entries.len());

        for entry in entries {
            self.process_one(entry)?;
        }
        Ok(())
    }

    /// Processes a single move entry.
    pub fn process_one(&self, entry: &Value) -> Result<()> {
        let obj = entry.as_object().expect("move entry must be an object");
        debug!("processing move: {}", entry);

        let name: Name = obj.get("name").and_then(Value::as_str).expect("move entry must carry a string name").into();

        let mv = obj.get("move").expect("move entry must carry a move value");
        if !mv.is_object() {
            warn!("move by {} is not an object: {}", name, mv);
            return Ok(());
        }

        self.handle_signer_update(&name, mv.get("s"))?;
        self.handle_address_update(&name, mv.get("ca"))
    }

    fn handle_signer_update(&self, name: &Name, value: Option<&Value>) -> Result<()> {
        let Some(Value::Object(obj)) = value else {
            return Ok(());
        };

        if let Some(Value::Array(global)) = obj.get("g") {
            self.set_signer_list(name, &SignerScope::Global, global)?;
        }

        if let Some(Value::Object(apps)) = obj.get("a") {
            for (application, signers) in apps {
                let Value::Array(signers) = signers else {
                    warn!("signer update for {} and application {} is not an array", name, application);
                    continue;
                };
                self.set_signer_list(name, &SignerScope::app(application.as_str()), signers)?;
            }
        }
        Ok(())
    }

    /// Replaces the signer list of one scope with the string elements of
    /// the given array.  Non-string elements are skipped but do not abort
    /// the replacement.
    fn set_signer_list(&self, name: &Name, scope: &SignerScope, signers: &[Value]) -> Result<()> {
        debug!("setting signers of {} for scope {} to: {:?}", name, scope, signers);

        let mut addresses = Vec::with_capacity(signers.len());
        for signer in signers {
            match signer.as_str() {
                Some(address) => addresses.push(address.to_string()),
                None => warn!("signer value in update for {} is not a string: {}", name, signer),
            }
        }
        self.store.replace_signers(name, scope, &addresses)
    }

    fn handle_address_update(&self, name: &Name, value: Option<&Value>) -> Result<()> {
        let Some(Value::Object(obj)) = value else {
            return Ok(());
        };

        for (key, entry) in obj {
            match entry {
                Value::Null => {
                    self.store.delete_address(name, key)?;
                    debug!("deleted address association for {} and {}", name, key);
                }
                Value::String(address) => {
                    self.store.upsert_address(name, key, address)?;
                    debug!("new address for {} and {}: {}", name, key, address);
                }
                _ => warn!("invalid address association for {} and {}: {}", name, key, entry),
            }
        }
        Ok(())
    }
}
