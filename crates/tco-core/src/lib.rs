pub mod error;
pub mod format;
pub mod time_value;
pub mod types;

pub mod tco;

#[cfg(feature = "scenarios")]
pub mod scenarios;

pub use error::TcoError;
pub use types::*;

/// Standard result type for all asset-tco operations
pub type TcoResult<T> = Result<T, TcoError>;
