pub mod error;
pub mod solver;
pub mod time_value;
pub mod types;

#[cfg(feature = "fixed_income")]
pub mod fixed_income;

#[cfg(feature = "dividend_discount")]
pub mod dividend_discount;

#[cfg(feature = "portfolio_optimization")]
pub mod portfolio_optimization;

pub use error::FinCalcError;
pub use types::*;

/// Standard result type for all fincalc operations
pub type FinCalcResult<T> = Result<T, FinCalcError>;
