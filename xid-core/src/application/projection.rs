//! JSON views over the signer and address index.

use crate::foundation::{Name, Result};
use crate::infrastructure::storage::StateStore;
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// The full state of one name.
///
/// `signers` is an array with the global entry (if any) first, then one
/// entry per application in lexicographic order; address lists are sorted
/// and deduplicated.  `addresses` maps address keys to addresses.  Unknown
/// names yield the empty shape.
pub fn name_state(store: &dyn StateStore, name: &Name) -> Result<Value> {
    use crate::domain::SignerScope;

    let mut by_scope: BTreeMap<SignerScope, BTreeSet<String>> = BTreeMap::new();
    for (scope, address) in store.signers_for(name)? {
        by_scope.entry(scope).or_default().insert(address);
    }

    let mut signers = Vec::with_capacity(by_scope.len());
    for (scope, addresses) in by_scope {
        let mut entry = Map::new();
        if let Some(application) = scope.application() {
            entry.insert("application".to_string(), json!(application));
        }
        entry.insert("addresses".to_string(), json!(addresses));
        signers.push(Value::Object(entry));
    }

    let mut addresses = Map::new();
    for (key, address) in store.addresses_for(name)? {
        addresses.insert(key, Value::String(address));
    }

    Ok(json!({
        "name": name,
        "signers": signers,
        "addresses": addresses,
    }))
}

/// The state of every name with any signer or address row.
pub fn full_state(store: &dyn StateStore) -> Result<Value> {
    let mut names = Map::new();
    for name in store.all_names()? {
        let state = name_state(store, &name)?;
        names.insert(name.as_str().to_string(), state);
    }
    Ok(json!({ "names": names }))
}
