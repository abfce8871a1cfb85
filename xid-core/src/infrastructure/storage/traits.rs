use crate::domain::SignerScope;
use crate::foundation::{Name, Result};

/// The signer and address index.
///
/// Two logical relations: `signers(name, scope, address)` with the triple
/// as primary key, and `addresses(name, key) -> address` unique per
/// `(name, key)`.  Handles are not shared across writer threads; the chain
/// driver serialises all mutations.
pub trait StateStore: Send + Sync {
    /// Atomically replaces the signer set of `(name, scope)`.  Addresses
    /// are deduplicated; an empty set clears the scope.  Rows of other
    /// scopes and names, and the address relation, are untouched.
    fn replace_signers(&self, name: &Name, scope: &SignerScope, addresses: &[String]) -> Result<()>;

    /// Sets or replaces the address stored under `(name, key)`.
    fn upsert_address(&self, name: &Name, key: &str, address: &str) -> Result<()>;

    /// Removes the address stored under `(name, key)`; no-op when absent.
    fn delete_address(&self, name: &Name, key: &str) -> Result<()>;

    /// All scopes under which `address` is a recognised signer for `name`.
    fn scopes_for(&self, name: &Name, address: &str) -> Result<Vec<SignerScope>>;

    /// All signer rows of a name, ordered by scope (global first, then
    /// applications lexicographically) and address.
    fn signers_for(&self, name: &Name) -> Result<Vec<(SignerScope, String)>>;

    /// All address-map rows of a name, ordered by key.
    fn addresses_for(&self, name: &Name) -> Result<Vec<(String, String)>>;

    /// Distinct names with at least one row in either relation, sorted.
    fn all_names(&self) -> Result<Vec<Name>>;
}
