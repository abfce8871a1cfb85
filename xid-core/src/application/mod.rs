pub mod nonstate;
pub mod processor;
pub mod projection;
pub mod verifier;

pub use nonstate::{get_auth_message, set_auth_signature, AuthMessage};
pub use processor::{apply_block, MoveProcessor};
pub use projection::{full_state, name_state};
pub use verifier::{AuthVerifier, Verdict};
