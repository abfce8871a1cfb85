//! The read-side composition of the credential codec, the signer index and
//! the signature-recovery primitive.

use crate::domain::validation::MessageVerifier;
use crate::domain::{Credentials, SignerScope};
use crate::foundation::util::encoding::encode_hex_short;
use crate::foundation::util::time::unix_now;
use crate::foundation::{Name, Result};
use crate::infrastructure::storage::StateStore;
use log::debug;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;

/// Outcome of verifying a submitted credential.
///
/// The states form a ladder: `Expired` means every other check passed and
/// only the expiry time has lapsed, so that clients holding a better clock
/// can still re-evaluate expiry themselves against the reported value.
/// The claim's expiry and extras are only disclosed from
/// `InvalidSignature` onward, i.e. once the password itself was
/// well-formed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Verdict {
    Malformed,
    InvalidData,
    InvalidSignature { expiry: Option<u64>, extra: BTreeMap<String, String> },
    Expired { expiry: Option<u64>, extra: BTreeMap<String, String> },
    Valid { expiry: Option<u64>, extra: BTreeMap<String, String> },
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    pub fn state(&self) -> &'static str {
        match self {
            Self::Malformed => "malformed",
            Self::InvalidData => "invalid-data",
            Self::InvalidSignature { .. } => "invalid-signature",
            Self::Expired { .. } => "expired",
            Self::Valid { .. } => "valid",
        }
    }

    fn claim_fields(&self) -> Option<(&Option<u64>, &BTreeMap<String, String>)> {
        match self {
            Self::Malformed | Self::InvalidData => None,
            Self::InvalidSignature { expiry, extra } | Self::Expired { expiry, extra } | Self::Valid { expiry, extra } => {
                Some((expiry, extra))
            }
        }
    }
}

impl Serialize for Verdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("valid", &self.is_valid())?;
        map.serialize_entry("state", self.state())?;
        if let Some((expiry, extra)) = self.claim_fields() {
            map.serialize_entry("expiry", expiry)?;
            map.serialize_entry("extra", extra)?;
        }
        map.end()
    }
}

pub struct AuthVerifier<'a> {
    store: &'a dyn StateStore,
    verifier: &'a dyn MessageVerifier,
}

impl<'a> AuthVerifier<'a> {
    pub fn new(store: &'a dyn StateStore, verifier: &'a dyn MessageVerifier) -> Self {
        Self { store, verifier }
    }

    /// Verifies a password for the given name and application against the
    /// current wall clock.
    pub fn verify(&self, application: &str, name: &str, password: &str) -> Result<Verdict> {
        self.verify_at(application, name, password, unix_now())
    }

    pub fn verify_at(&self, application: &str, name: &str, password: &str, now: u64) -> Result<Verdict> {
        let mut credentials = Credentials::new(name, application);
        if credentials.from_password(password).is_err() {
            return Ok(Verdict::Malformed);
        }
        if !credentials.validate_format() {
            return Ok(Verdict::InvalidData);
        }

        let expiry = credentials.expiry();
        let extra = credentials.extras().clone();

        if !self.signed_by_authorised_key(&credentials)? {
            return Ok(Verdict::InvalidSignature { expiry, extra });
        }

        // Expiry is checked last: an "expired" verdict means everything
        // else is good and the credentials are ok except for expiry.
        if credentials.is_expired_at(now) {
            return Ok(Verdict::Expired { expiry, extra });
        }
        Ok(Verdict::Valid { expiry, extra })
    }

    fn signed_by_authorised_key(&self, credentials: &Credentials) -> Result<bool> {
        let Some(signature) = credentials.raw_signature() else {
            return Ok(false);
        };
        let message = credentials.auth_message();
        let address = match self.verifier.recover_signer(&message, signature) {
            Ok(address) => address,
            Err(err) => {
                debug!("signature recovery failed sig={}: {}", encode_hex_short(signature), err);
                return Ok(false);
            }
        };

        let name = Name::from(credentials.username());
        for scope in self.store.scopes_for(&name, &address)? {
            match scope {
                SignerScope::Global => return Ok(true),
                SignerScope::App(application) if application.as_str() == credentials.application() => return Ok(true),
                SignerScope::App(_) => {}
            }
        }
        debug!("not a valid signer address: {}", address);
        Ok(false)
    }
}
