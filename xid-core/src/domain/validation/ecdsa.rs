use super::MessageVerifier;
use crate::foundation::util::encoding::encode_hex;
use crate::foundation::{Result, XidError};
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey, VerifyOnly};

/// Domain-separation context for hashing auth messages before signing.
const MESSAGE_HASH_CONTEXT: &str = "xid auth message v1";

/// Compact recoverable signatures are one header byte (27 + recovery id,
/// optionally offset by 4 for compressed-key signers) followed by the
/// 64-byte signature.
const SIGNATURE_LEN: usize = 65;

/// Recovers the signer address from a secp256k1 compact recoverable
/// signature over the hashed auth message.
pub struct EcdsaMessageVerifier {
    secp: Secp256k1<VerifyOnly>,
}

impl EcdsaMessageVerifier {
    pub fn new() -> Self {
        Self { secp: Secp256k1::verification_only() }
    }

    /// The printable address form of a public key.
    pub fn address_of(key: &PublicKey) -> String {
        let digest = blake3::hash(&key.serialize());
        encode_hex(&digest.as_bytes()[..20])
    }
}

impl Default for EcdsaMessageVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageVerifier for EcdsaMessageVerifier {
    fn recover_signer(&self, message: &str, signature: &[u8]) -> Result<String> {
        if signature.len() != SIGNATURE_LEN {
            return Err(XidError::SignatureRecovery(format!("signature must be {} bytes, got {}", SIGNATURE_LEN, signature.len())));
        }
        let header = signature[0];
        if !(27..27 + 8).contains(&header) {
            return Err(XidError::SignatureRecovery(format!("invalid signature header byte {}", header)));
        }
        let rec_id = RecoveryId::from_i32(i32::from((header - 27) & 0x03))
            .map_err(|err| XidError::SignatureRecovery(err.to_string()))?;
        let sig = RecoverableSignature::from_compact(&signature[1..], rec_id)
            .map_err(|err| XidError::SignatureRecovery(err.to_string()))?;

        let digest = Message::from_digest(message_digest(message));
        let key = self.secp.recover_ecdsa(&digest, &sig).map_err(|err| XidError::SignatureRecovery(err.to_string()))?;
        Ok(Self::address_of(&key))
    }
}

/// Signs an auth message, producing the compact recoverable form that
/// [`EcdsaMessageVerifier`] accepts.
pub fn sign_auth_message(secret: &SecretKey, message: &str) -> Vec<u8> {
    let secp = Secp256k1::signing_only();
    let digest = Message::from_digest(message_digest(message));
    let (rec_id, compact) = secp.sign_ecdsa_recoverable(&digest, secret).serialize_compact();

    let mut out = Vec::with_capacity(SIGNATURE_LEN);
    out.push(27 + rec_id.to_i32() as u8);
    out.extend_from_slice(&compact);
    out
}

fn message_digest(message: &str) -> [u8; 32] {
    blake3::derive_key(MESSAGE_HASH_CONTEXT, message.as_bytes())
}
