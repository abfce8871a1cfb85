use thiserror::Error;

#[derive(Debug, Error)]
pub enum XidError {
    /// A password string could not be decoded into an auth claim.  This is
    /// never fatal; it maps to the "malformed" verdict state on the verify
    /// path and to `AuthInvalidPassword` on the mutating RPC path.
    #[error("failed to parse the password string")]
    MalformedCredential,

    /// Credential data (username, application, extras) violates the
    /// format restrictions.
    #[error("the authentication data is invalid")]
    AuthInvalidData,

    /// A signature string handed to the RPC surface is not valid base64.
    #[error("the signature is not base64")]
    AuthInvalidSignature,

    /// A client passed a structurally wrong RPC argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An unsafe RPC method was called while unsafe methods are disabled.
    #[error("unsafe RPC methods are disabled in the server")]
    UnsafeMethod,

    #[error("invalid base64: {0}")]
    InvalidBase64(String),

    #[error("signature recovery failed: {0}")]
    SignatureRecovery(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Message(String),
}
