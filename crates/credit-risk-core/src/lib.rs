pub mod config;
pub mod error;
pub mod types;

#[cfg(feature = "altman")]
pub mod altman;

#[cfg(feature = "structural")]
pub mod pricing;

#[cfg(feature = "structural")]
pub mod structural;

#[cfg(feature = "volatility")]
pub mod volatility;

#[cfg(feature = "evaluation")]
pub mod evaluation;

#[cfg(feature = "analysis")]
pub mod analysis;

pub use error::CreditRiskError;
pub use types::*;

/// Standard result type for all credit-risk operations
pub type CreditRiskResult<T> = Result<T, CreditRiskError>;
