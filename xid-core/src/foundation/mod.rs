pub mod error;
pub mod types;
pub mod util;

pub use error::XidError;
pub use types::{Application, Name};

pub type Result<T> = std::result::Result<T, XidError>;
