//! Base64 codec for the password wire format.
//!
//! Passwords use the standard alphabet with padding on encode.  Decoding is
//! lenient about padding (both padded and unpadded input is accepted) but
//! rejects any character outside the alphabet and any truncated input.

use crate::foundation::XidError;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, Engine, GeneralPurpose, GeneralPurposeConfig};

const PASSWORD_ENGINE: GeneralPurpose =
    GeneralPurpose::new(&alphabet::STANDARD, GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent));

/// Encodes bytes to padded standard base64.
pub fn encode(data: &[u8]) -> String {
    PASSWORD_ENGINE.encode(data)
}

/// Decodes standard base64, with or without padding.
pub fn decode(encoded: &str) -> Result<Vec<u8>, XidError> {
    PASSWORD_ENGINE.decode(encoded).map_err(|err| XidError::InvalidBase64(err.to_string()))
}
