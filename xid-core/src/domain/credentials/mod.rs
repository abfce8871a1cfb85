//! Xid authentication credentials and their password form.
//!
//! A credential is always bound to a username/application context, but the
//! password string only carries the claim data; the context re-enters
//! through the auth message, which is what actually gets signed.

mod claim;

pub use claim::{AuthClaim, Protocol};

use crate::foundation::util::base64;
use crate::foundation::util::time::unix_now;
use crate::foundation::{Result, XidError};
use log::error;
use std::collections::BTreeMap;

/// A set of Xid authentication credentials.
///
/// Credentials can be built up directly (when constructing a password) or
/// filled in from an existing password string and then validated.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Credentials {
    username: String,
    application: String,
    claim: AuthClaim,
}

impl Credentials {
    pub fn new(username: impl Into<String>, application: impl Into<String>) -> Self {
        Self { username: username.into(), application: application.into(), claim: AuthClaim::default() }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn application(&self) -> &str {
        &self.application
    }

    /// Parses a password string and replaces the claim data with the parsed
    /// content.  The parsed data is not validated beyond its binary
    /// structure, so a successful parse may still fail `validate_format`.
    pub fn from_password(&mut self, password: &str) -> Result<()> {
        let decoded = base64::decode(password).map_err(|_| XidError::MalformedCredential)?;
        let claim = AuthClaim::decode(&decoded).inspect_err(|_| {
            error!("failed to parse auth claim from decoded password");
        })?;
        self.claim = claim;
        Ok(())
    }

    /// Serialises the claim into a password string.
    ///
    /// Must only be called when `validate_format` holds.
    pub fn to_password(&self) -> String {
        assert!(self.validate_format(), "credentials must be valid to build a password");
        base64::encode(&self.claim.encode())
    }

    /// Checks username, application and extras against the format rules.
    /// Does not check expiry or the signature.
    pub fn validate_format(&self) -> bool {
        if self.username.contains('\n') {
            error!("invalid username (contains newline): {}", self.username);
            return false;
        }
        if !self.application.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '/') {
            error!("invalid application name: {}", self.application);
            return false;
        }
        for (key, value) in &self.claim.extra {
            if !is_extra_word(key) {
                error!("invalid extra key: {}", key);
                return false;
            }
            if !is_extra_word(value) {
                error!("invalid extra value: {}", value);
                return false;
            }
        }
        true
    }

    /// Returns the canonical message that has to be signed by an authorised
    /// address for these credentials to verify.
    ///
    /// Must only be called when `validate_format` holds.
    pub fn auth_message(&self) -> String {
        assert!(self.validate_format(), "credentials must be valid to build the auth message");

        let mut out = String::new();
        out.push_str("Xid login\n");
        out.push_str(&self.username);
        out.push('\n');
        out.push_str("at: ");
        out.push_str(&self.application);
        out.push('\n');
        match self.claim.expiry {
            Some(expiry) => out.push_str(&format!("expires: {}\n", expiry)),
            None => out.push_str("expires: never\n"),
        }
        out.push_str("extra:\n");
        for (key, value) in &self.claim.extra {
            out.push_str(&format!("{}={}\n", key, value));
        }
        out
    }

    /// Returns true if the credentials are expired at the given time.
    pub fn is_expired_at(&self, at: u64) -> bool {
        match self.claim.expiry {
            Some(expiry) => at > expiry,
            None => false,
        }
    }

    /// Returns true if the credentials are expired now.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(unix_now())
    }

    pub fn expiry(&self) -> Option<u64> {
        self.claim.expiry
    }

    pub fn set_expiry(&mut self, expiry: u64) {
        self.claim.expiry = Some(expiry);
    }

    /// The signature bytes, base64-encoded; empty string when unset.
    pub fn signature(&self) -> String {
        match &self.claim.signature {
            Some(bytes) => base64::encode(bytes),
            None => String::new(),
        }
    }

    /// Sets the signature from its base64 text form.
    pub fn set_signature(&mut self, signature: &str) -> Result<()> {
        self.claim.signature = Some(base64::decode(signature)?);
        Ok(())
    }

    pub fn raw_signature(&self) -> Option<&[u8]> {
        self.claim.signature.as_deref()
    }

    pub fn set_raw_signature(&mut self, signature: Vec<u8>) {
        self.claim.signature = Some(signature);
    }

    /// The protocol the credentials apply to; absent means the default.
    pub fn protocol(&self) -> Protocol {
        self.claim.protocol.unwrap_or(Protocol::XidGsp)
    }

    pub fn set_protocol(&mut self, protocol: Protocol) {
        self.claim.protocol = Some(protocol);
    }

    /// Adds an extra key/value pair.  A duplicate key is a programming
    /// error and aborts.
    pub fn add_extra(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        assert!(!self.claim.extra.contains_key(&key), "duplicate extra key: {}", key);
        self.claim.extra.insert(key, value.into());
    }

    /// All extra pairs, iterated in lexicographic key order.
    pub fn extras(&self) -> &BTreeMap<String, String> {
        &self.claim.extra
    }

    pub fn claim(&self) -> &AuthClaim {
        &self.claim
    }
}

fn is_extra_word(value: &str) -> bool {
    value.chars().all(|c| c.is_ascii_alphanumeric() || c == '.')
}
