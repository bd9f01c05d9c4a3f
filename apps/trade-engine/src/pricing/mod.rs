//! Option pricing.
//!
//! This module provides:
//! - Black-Scholes price and Greeks with a reproducible normal CDF
//! - Implied volatility (Newton-Raphson, fail-fast on degenerate steps)
//! - Greeks aggregation over virtual legs
//! - Contract enrichment with a historical-volatility fallback
//!
//! # Example
//!
//! ```
//! use trade_engine::pricing::{OptionKind, implied_volatility, price_and_greeks};
//!
//! let quote = price_and_greeks(OptionKind::Call, 100.0, 100.0, 0.02, 0.25, 0.3)?;
//! let iv = implied_volatility(OptionKind::Call, 100.0, 100.0, 0.02, 0.25, quote.price)?;
//! assert!((iv - 0.3).abs() < 1e-4);
//! # Ok::<(), trade_engine::pricing::PricingError>(())
//! ```

mod black_scholes;
mod enrich;
mod error;
mod greeks;
mod iv;

pub use black_scholes::{AS_B, AS_P, OptionKind, PriceGreeks, norm_cdf, norm_pdf, price_and_greeks};
pub use enrich::{ContractPricer, OptionAnalytics, VolatilitySource};
pub use error::PricingError;
pub use greeks::{DAYS_PER_YEAR, Greeks, GreeksModel, position_greeks, years_to_expiry};
pub use iv::{IvSolver, IvSolverConfig, implied_volatility};
