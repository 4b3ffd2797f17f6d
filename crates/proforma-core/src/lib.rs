pub mod development;
pub mod error;
pub mod scenarios;
pub mod time_value;
pub mod types;

#[cfg(feature = "validation")]
pub mod validation;

pub use development::pro_forma::{calculate, calculate_with, ProFormaOutput};
pub use error::ProFormaError;
pub use types::*;

/// Standard result type for fallible pro-forma operations
pub type ProFormaResult<T> = Result<T, ProFormaError>;
