//! Historical volatility from daily closing prices.
//!
//! sigma_annual = stdev(simple daily returns) * sqrt(252), using the sample
//! (n - 1) standard deviation. Unusable input falls back to 0.3 so the
//! structural model always receives a positive sigma; the fallback is a
//! sentinel, not an estimate, and [`VolatilityEstimate::fallback_used`]
//! reports it.

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::types::Rate;

pub const TRADING_DAYS_PER_YEAR: u32 = 252;
pub const FALLBACK_VOLATILITY: Rate = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolatilityEstimate {
    pub annualized: Rate,
    /// Sample standard deviation of daily returns; `None` when unusable.
    pub daily_std_dev: Option<f64>,
    /// Number of daily returns used.
    pub observations: usize,
    pub fallback_used: bool,
}

/// Annualized volatility, or 0.3 when the series is unusable. Never fails.
pub fn estimate_volatility(prices: &[f64]) -> Rate {
    estimate_volatility_detailed(prices).annualized
}

pub fn estimate_volatility_detailed(prices: &[f64]) -> VolatilityEstimate {
    estimate_with(prices, TRADING_DAYS_PER_YEAR, FALLBACK_VOLATILITY)
}

/// Same as [`estimate_volatility_detailed`] with a configurable annualisation
/// factor and fallback.
pub fn estimate_with(prices: &[f64], trading_days: u32, fallback: Rate) -> VolatilityEstimate {
    let returns = daily_returns(prices);

    let daily_std_dev = if returns.len() >= 2 {
        Some(returns.iter().std_dev())
    } else {
        None
    };

    match daily_std_dev {
        Some(sd) if sd.is_finite() && sd > 0.0 => VolatilityEstimate {
            annualized: sd * f64::from(trading_days).sqrt(),
            daily_std_dev: Some(sd),
            observations: returns.len(),
            fallback_used: false,
        },
        _ => {
            tracing::warn!(
                prices = prices.len(),
                returns = returns.len(),
                fallback,
                "price history unusable for volatility, using fallback"
            );
            VolatilityEstimate {
                annualized: fallback,
                daily_std_dev: daily_std_dev.filter(|sd| sd.is_finite()),
                observations: returns.len(),
                fallback_used: true,
            }
        }
    }
}

/// Simple returns p_t / p_{t-1} - 1. Pairs with a non-finite or
/// non-positive price are dropped.
fn daily_returns(prices: &[f64]) -> Vec<f64> {
    prices
        .windows(2)
        .filter(|w| is_valid_price(w[0]) && is_valid_price(w[1]))
        .map(|w| w[1] / w[0] - 1.0)
        .collect()
}

fn is_valid_price(p: f64) -> bool {
    p.is_finite() && p > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_series_fallback() {
        assert_eq!(estimate_volatility(&[]), 0.3);
        assert_eq!(estimate_volatility(&[100.0]), 0.3);
    }

    #[test]
    fn test_single_return_fallback() {
        // One return has no sample standard deviation.
        let est = estimate_volatility_detailed(&[100.0, 101.0]);
        assert!(est.fallback_used);
        assert_eq!(est.annualized, 0.3);
        assert_eq!(est.observations, 1);
    }

    #[test]
    fn test_flat_prices_fallback() {
        let est = estimate_volatility_detailed(&[50.0; 10]);
        assert!(est.fallback_used);
        assert_eq!(est.daily_std_dev, Some(0.0));
    }

    #[test]
    fn test_known_series() {
        // Returns: +10%, -10%, +10% -> mean 0.0333, sample sd = 0.11547
        let prices = [100.0, 110.0, 99.0, 108.9];
        let est = estimate_volatility_detailed(&prices);
        assert!(!est.fallback_used);
        assert_eq!(est.observations, 3);
        let sd = est.daily_std_dev.unwrap();
        assert!((sd - 0.115_470_053_837_925_15).abs() < 1e-9, "sd {sd}");
        assert!((est.annualized - sd * 252f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_prices_dropped() {
        let clean = estimate_volatility(&[100.0, 110.0, 99.0, 108.9]);
        let noisy = estimate_volatility(&[100.0, 110.0, 99.0, 108.9, f64::NAN]);
        assert!((clean - noisy).abs() < 1e-12);
    }

    #[test]
    fn test_custom_annualisation() {
        let prices = [100.0, 110.0, 99.0, 108.9];
        let est = estimate_with(&prices, 365, 0.25);
        let sd = est.daily_std_dev.unwrap();
        assert!((est.annualized - sd * 365f64.sqrt()).abs() < 1e-12);
        assert_eq!(estimate_with(&[], 365, 0.25).annualized, 0.25);
    }
}
