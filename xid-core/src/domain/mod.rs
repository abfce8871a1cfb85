pub mod credentials;
pub mod model;
pub mod validation;

pub use credentials::{AuthClaim, Credentials, Protocol};
pub use model::SignerScope;
