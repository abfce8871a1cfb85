//! The RPC operations that work on credentials alone, without touching the
//! indexed state.  Both are pure functions of their inputs.

use crate::domain::{Credentials, Protocol};
use crate::foundation::{Result, XidError};
use log::info;
use serde::Serialize;
use serde_json::Value;

/// Result of building an unsigned credential.
#[derive(Clone, Debug, Serialize)]
pub struct AuthMessage {
    pub authmessage: String,
    pub password: String,
}

/// Builds an unsigned credential for `name` and `application`, applying the
/// recognised keys of `data` (`expiry`, `extra`, `protocol`).  Returns the
/// message that has to be signed together with the unsigned password.
pub fn get_auth_message(application: &str, data: &Value, name: &str) -> Result<AuthMessage> {
    info!("RPC method called: getauthmessage name={} application={} data={}", name, application, data);

    let mut credentials = Credentials::new(name, application);
    apply_auth_data(data, &mut credentials)?;

    if !credentials.validate_format() {
        return Err(XidError::AuthInvalidData);
    }

    Ok(AuthMessage { authmessage: credentials.auth_message(), password: credentials.to_password() })
}

/// Stores a base64 signature inside an existing password string and
/// re-emits the password.
pub fn set_auth_signature(password: &str, signature: &str) -> Result<String> {
    info!("RPC method called: setauthsignature password={} signature={}", password, signature);

    // The name and application are not part of the password string, so
    // dummy values suffice here.
    let mut credentials = Credentials::new("dummy", "dummy");

    credentials.from_password(password)?;
    if !credentials.validate_format() {
        return Err(XidError::AuthInvalidData);
    }
    credentials.set_signature(signature).map_err(|_| XidError::AuthInvalidSignature)?;

    Ok(credentials.to_password())
}

fn apply_auth_data(data: &Value, credentials: &mut Credentials) -> Result<()> {
    let obj = data.as_object().ok_or_else(|| XidError::InvalidArgument("data must be an object".to_string()))?;

    for (key, value) in obj {
        if value.is_null() {
            continue;
        }
        match key.as_str() {
            "expiry" => {
                let expiry = value.as_u64().ok_or_else(|| XidError::InvalidArgument("expiry must be an integer".to_string()))?;
                credentials.set_expiry(expiry);
            }
            "extra" => {
                let extra = value.as_object().ok_or_else(|| XidError::InvalidArgument("extra must be an object".to_string()))?;
                for (extra_key, extra_value) in extra {
                    let extra_value = extra_value
                        .as_str()
                        .ok_or_else(|| XidError::InvalidArgument("extra value must be a string".to_string()))?;
                    credentials.add_extra(extra_key, extra_value);
                }
            }
            "protocol" => {
                let protocol =
                    value.as_str().ok_or_else(|| XidError::InvalidArgument("protocol must be a string".to_string()))?;
                match protocol {
                    "xid-gsp" => credentials.set_protocol(Protocol::XidGsp),
                    "delegation-contract" => credentials.set_protocol(Protocol::DelegationContract),
                    _ => return Err(XidError::InvalidArgument("invalid protocol value".to_string())),
                }
            }
            _ => return Err(XidError::InvalidArgument(format!("unknown auth data field: {}", key))),
        }
    }
    Ok(())
}
