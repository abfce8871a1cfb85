use crate::domain::SignerScope;
use crate::foundation::{Name, Result, XidError};
use crate::infrastructure::storage::StateStore;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

struct MemoryInner {
    signers: BTreeMap<Name, BTreeMap<SignerScope, BTreeSet<String>>>,
    addresses: BTreeMap<Name, BTreeMap<String, String>>,
}

impl MemoryInner {
    fn new() -> Self {
        Self { signers: BTreeMap::new(), addresses: BTreeMap::new() }
    }
}

/// In-memory state store used by tests and light deployments.
pub struct MemoryStateStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self { inner: Mutex::new(MemoryInner::new()) }
    }

    fn lock_inner(&self) -> Result<MutexGuard<'_, MemoryInner>> {
        self.inner.lock().map_err(|_| XidError::Storage("memory store lock poisoned".to_string()))
    }
}

impl Default for MemoryStateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore for MemoryStateStore {
    fn replace_signers(&self, name: &Name, scope: &SignerScope, addresses: &[String]) -> Result<()> {
        let mut inner = self.lock_inner()?;
        let scopes = inner.signers.entry(name.clone()).or_default();
        if addresses.is_empty() {
            scopes.remove(scope);
        } else {
            scopes.insert(scope.clone(), addresses.iter().cloned().collect());
        }
        if scopes.is_empty() {
            inner.signers.remove(name);
        }
        Ok(())
    }

    fn upsert_address(&self, name: &Name, key: &str, address: &str) -> Result<()> {
        self.lock_inner()?.addresses.entry(name.clone()).or_default().insert(key.to_string(), address.to_string());
        Ok(())
    }

    fn delete_address(&self, name: &Name, key: &str) -> Result<()> {
        let mut inner = self.lock_inner()?;
        if let Some(map) = inner.addresses.get_mut(name) {
            map.remove(key);
            if map.is_empty() {
                inner.addresses.remove(name);
            }
        }
        Ok(())
    }

    fn scopes_for(&self, name: &Name, address: &str) -> Result<Vec<SignerScope>> {
        let inner = self.lock_inner()?;
        let Some(scopes) = inner.signers.get(name) else {
            return Ok(Vec::new());
        };
        Ok(scopes.iter().filter(|(_, addresses)| addresses.contains(address)).map(|(scope, _)| scope.clone()).collect())
    }

    fn signers_for(&self, name: &Name) -> Result<Vec<(SignerScope, String)>> {
        let inner = self.lock_inner()?;
        let Some(scopes) = inner.signers.get(name) else {
            return Ok(Vec::new());
        };
        let mut rows = Vec::new();
        for (scope, addresses) in scopes {
            for address in addresses {
                rows.push((scope.clone(), address.clone()));
            }
        }
        Ok(rows)
    }

    fn addresses_for(&self, name: &Name) -> Result<Vec<(String, String)>> {
        let inner = self.lock_inner()?;
        let Some(map) = inner.addresses.get(name) else {
            return Ok(Vec::new());
        };
        Ok(map.iter().map(|(key, address)| (key.clone(), address.clone())).collect())
    }

    fn all_names(&self) -> Result<Vec<Name>> {
        let inner = self.lock_inner()?;
        let mut names: BTreeSet<Name> = inner.signers.keys().cloned().collect();
        names.extend(inner.addresses.keys().cloned());
        Ok(names.into_iter().collect())
    }
}
