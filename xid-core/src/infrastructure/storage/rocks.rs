use crate::domain::SignerScope;
use crate::foundation::{Name, Result, XidError};
use crate::infrastructure::storage::StateStore;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, Direction, IteratorMode, Options as RocksOptions, WriteBatch, DB};
use std::collections::BTreeSet;
use std::path::Path;

const CF_SIGNERS: &str = "signers";
const CF_ADDRESSES: &str = "addresses";

const SCOPE_GLOBAL: u8 = 0;
const SCOPE_APP: u8 = 1;

/// RocksDB-backed state store.
///
/// Keys are built from length-prefixed components so that names,
/// applications and address keys containing arbitrary bytes can never
/// collide with each other.  Component layout:
///
///   signers:   lp(name) scope-tag [lp(application)] lp(address) -> ()
///   addresses: lp(name) lp(key) -> address
///
/// where `lp(x)` is a u32-be length followed by the raw bytes and the scope
/// tag is one byte (0 global, 1 application).
pub struct RocksStateStore {
    db: DB,
}

/// Helper to build storage keys consistently.
struct KeyBuilder {
    buf: Vec<u8>,
}

impl KeyBuilder {
    fn with_capacity(cap: usize) -> Self {
        Self { buf: Vec::with_capacity(cap) }
    }

    fn lp(mut self, value: &[u8]) -> Self {
        self.buf.extend_from_slice(&(value.len() as u32).to_be_bytes());
        self.buf.extend_from_slice(value);
        self
    }

    fn tag(mut self, value: u8) -> Self {
        self.buf.push(value);
        self
    }

    fn build(self) -> Vec<u8> {
        self.buf
    }
}

fn scope_prefix(name: &Name, scope: &SignerScope) -> Vec<u8> {
    let builder = KeyBuilder::with_capacity(64).lp(name.as_bytes());
    match scope {
        SignerScope::Global => builder.tag(SCOPE_GLOBAL).build(),
        SignerScope::App(application) => builder.tag(SCOPE_APP).lp(application.as_bytes()).build(),
    }
}

fn signer_key(name: &Name, scope: &SignerScope, address: &str) -> Vec<u8> {
    let mut key = scope_prefix(name, scope);
    key.extend_from_slice(&(address.len() as u32).to_be_bytes());
    key.extend_from_slice(address.as_bytes());
    key
}

fn address_key(name: &Name, key: &str) -> Vec<u8> {
    KeyBuilder::with_capacity(64).lp(name.as_bytes()).lp(key.as_bytes()).build()
}

fn name_prefix(name: &Name) -> Vec<u8> {
    KeyBuilder::with_capacity(36).lp(name.as_bytes()).build()
}

fn read_lp<'a>(buf: &'a [u8], pos: &mut usize) -> Result<&'a [u8]> {
    let corrupt = || XidError::Storage("corrupt storage key".to_string());
    let len_end = pos.checked_add(4).ok_or_else(corrupt)?;
    let len_bytes: [u8; 4] = buf.get(*pos..len_end).ok_or_else(corrupt)?.try_into().map_err(|_| corrupt())?;
    let len = u32::from_be_bytes(len_bytes) as usize;
    let end = len_end.checked_add(len).ok_or_else(corrupt)?;
    let value = buf.get(len_end..end).ok_or_else(corrupt)?;
    *pos = end;
    Ok(value)
}

fn read_utf8(bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec()).map_err(|_| XidError::Storage("corrupt storage key (not utf-8)".to_string()))
}

/// Parses the scope and address components of a signer key, after the name.
fn parse_signer_suffix(key: &[u8], mut pos: usize) -> Result<(SignerScope, String)> {
    let corrupt = || XidError::Storage("corrupt signer key".to_string());
    let tag = *key.get(pos).ok_or_else(corrupt)?;
    pos += 1;
    let scope = match tag {
        SCOPE_GLOBAL => SignerScope::Global,
        SCOPE_APP => SignerScope::App(read_utf8(read_lp(key, &mut pos)?)?.into()),
        _ => return Err(corrupt()),
    };
    let address = read_utf8(read_lp(key, &mut pos)?)?;
    Ok((scope, address))
}

impl RocksStateStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut options = RocksOptions::default();
        options.create_if_missing(true);
        options.create_missing_column_families(true);

        let cfs = vec![
            ColumnFamilyDescriptor::new(CF_SIGNERS, RocksOptions::default()),
            ColumnFamilyDescriptor::new(CF_ADDRESSES, RocksOptions::default()),
        ];

        let db = DB::open_cf_descriptors(&options, path, cfs).map_err(|err| XidError::Storage(err.to_string()))?;
        Ok(Self { db })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| XidError::Storage(format!("missing column family {}", name)))
    }

    /// Collects all keys of a column family starting with `prefix`.
    fn keys_with_prefix(&self, cf: &ColumnFamily, prefix: &[u8]) -> Result<Vec<Box<[u8]>>> {
        let mut keys = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::From(prefix, Direction::Forward)) {
            let (key, _) = item.map_err(|err| XidError::Storage(err.to_string()))?;
            if !key.starts_with(prefix) {
                break;
            }
            keys.push(key);
        }
        Ok(keys)
    }
}

impl StateStore for RocksStateStore {
    fn replace_signers(&self, name: &Name, scope: &SignerScope, addresses: &[String]) -> Result<()> {
        let cf = self.cf(CF_SIGNERS)?;
        let prefix = scope_prefix(name, scope);

        let mut batch = WriteBatch::default();
        for key in self.keys_with_prefix(cf, &prefix)? {
            batch.delete_cf(cf, key);
        }
        for address in addresses {
            batch.put_cf(cf, signer_key(name, scope, address), []);
        }
        self.db.write(batch).map_err(|err| XidError::Storage(err.to_string()))
    }

    fn upsert_address(&self, name: &Name, key: &str, address: &str) -> Result<()> {
        let cf = self.cf(CF_ADDRESSES)?;
        self.db.put_cf(cf, address_key(name, key), address.as_bytes()).map_err(|err| XidError::Storage(err.to_string()))
    }

    fn delete_address(&self, name: &Name, key: &str) -> Result<()> {
        let cf = self.cf(CF_ADDRESSES)?;
        self.db.delete_cf(cf, address_key(name, key)).map_err(|err| XidError::Storage(err.to_string()))
    }

    fn scopes_for(&self, name: &Name, address: &str) -> Result<Vec<SignerScope>> {
        let mut scopes: Vec<SignerScope> = self
            .signers_for(name)?
            .into_iter()
            .filter(|(_, row_address)| row_address == address)
            .map(|(scope, _)| scope)
            .collect();
        scopes.sort();
        Ok(scopes)
    }

    fn signers_for(&self, name: &Name) -> Result<Vec<(SignerScope, String)>> {
        let cf = self.cf(CF_SIGNERS)?;
        let prefix = name_prefix(name);

        let mut rows = Vec::new();
        for key in self.keys_with_prefix(cf, &prefix)? {
            rows.push(parse_signer_suffix(&key, prefix.len())?);
        }
        // Length-prefixed keys do not sort lexicographically by component;
        // restore the canonical (scope, address) order here.
        rows.sort();
        Ok(rows)
    }

    fn addresses_for(&self, name: &Name) -> Result<Vec<(String, String)>> {
        let cf = self.cf(CF_ADDRESSES)?;
        let prefix = name_prefix(name);

        let mut rows = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::From(prefix.as_slice(), Direction::Forward)) {
            let (key, value) = item.map_err(|err| XidError::Storage(err.to_string()))?;
            if !key.starts_with(&prefix) {
                break;
            }
            let mut pos = prefix.len();
            let address_key = read_utf8(read_lp(&key, &mut pos)?)?;
            rows.push((address_key, read_utf8(&value)?));
        }
        rows.sort();
        Ok(rows)
    }

    fn all_names(&self) -> Result<Vec<Name>> {
        let mut names = BTreeSet::new();
        for cf_name in [CF_SIGNERS, CF_ADDRESSES] {
            let cf = self.cf(cf_name)?;
            for item in self.db.iterator_cf(cf, IteratorMode::Start) {
                let (key, _) = item.map_err(|err| XidError::Storage(err.to_string()))?;
                let mut pos = 0;
                names.insert(Name::from(read_utf8(read_lp(&key, &mut pos)?)?));
            }
        }
        Ok(names.into_iter().collect())
    }
}
