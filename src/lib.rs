pub mod error;
pub mod optional;

pub use error::BadOptionalAccess;
pub use optional::Optional;
