//! Standard normal distribution helpers.
//!
//! Phi(x) = erfc(-x / sqrt(2)) / 2, which stays accurate in both tails
//! (no `1 - small` cancellation for negative x).

use statrs::function::erf::erfc;
use std::f64::consts::{FRAC_1_SQRT_2, PI};

/// Standard normal CDF.
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x * FRAC_1_SQRT_2)
}

/// Standard normal PDF: phi(x) = exp(-x^2/2) / sqrt(2*pi)
pub fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cdf_at_zero() {
        assert!((norm_cdf(0.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_cdf_reference_values() {
        // Values from standard normal tables (15 significant digits).
        let cases = [
            (1.0, 0.841344746068543),
            (-1.0, 0.158655253931457),
            (1.96, 0.975002104851780),
            (2.0, 0.977249868051821),
            (-3.0, 0.001349898031630),
            (0.5, 0.691462461274013),
        ];
        for (x, expected) in cases {
            let got = norm_cdf(x);
            assert!(
                (got - expected).abs() < 1e-10,
                "Phi({x}) = {got}, expected {expected}"
            );
        }
    }

    #[test]
    fn test_cdf_tail_values() {
        let cases = [
            (-5.0, 2.866515718791939e-7),
            (-8.0, 6.220960574271784e-16),
            (-9.5, 1.049451507536273e-21),
            (5.0, 0.9999997133484281),
            (8.0, 0.9999999999999993),
        ];
        for (x, expected) in cases {
            let got = norm_cdf(x);
            assert!(
                (got - expected).abs() < 1e-10,
                "Phi({x}) = {got}, expected {expected}"
            );
            // Left tail must not collapse to zero.
            if x < 0.0 {
                assert!(
                    ((got - expected) / expected).abs() < 1e-9,
                    "Phi({x}) relative error too large: {got}"
                );
            }
        }
    }

    #[test]
    fn test_cdf_symmetry() {
        let mut x = -9.5;
        while x <= 9.5 {
            let sum = norm_cdf(x) + norm_cdf(-x);
            assert!((sum - 1.0).abs() < 1e-12, "Phi({x}) + Phi(-{x}) = {sum}");
            x += 0.25;
        }
    }

    #[test]
    fn test_cdf_monotone_and_bounded() {
        let mut prev = 0.0;
        let mut x = -10.0;
        while x <= 10.0 {
            let p = norm_cdf(x);
            assert!((0.0..=1.0).contains(&p));
            assert!(p >= prev);
            prev = p;
            x += 0.1;
        }
    }

    #[test]
    fn test_pdf_peak() {
        assert!((norm_pdf(0.0) - 0.398942280401433).abs() < 1e-12);
        assert!((norm_pdf(1.0) - norm_pdf(-1.0)).abs() < 1e-15);
    }
}
