//! Internal Rate of Return (IRR) calculation
//!
//! Cash flows are evenly spaced; index 0 is time 0 (typically the equity outlay).

use crate::error::{ProjectionError, Result};

const LOWER_BOUND: f64 = -0.99;
const UPPER_BOUND: f64 = 10.0;
const MAX_ITERATIONS: usize = 1000;
const RATE_TOLERANCE: f64 = 1e-12;

/// Net present value of `cashflows` at a periodic `rate`, first flow undiscounted
pub fn npv(rate: f64, cashflows: &[f64]) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}

/// Calculate NPV and its derivative with respect to rate
fn npv_and_derivative(cashflows: &[f64], rate: f64) -> (f64, f64) {
    let mut npv = 0.0;
    let mut dnpv = 0.0;

    for (t, &cf) in cashflows.iter().enumerate() {
        let discount = (1.0 + rate).powi(t as i32);
        npv += cf / discount;
        if t > 0 {
            dnpv -= (t as f64) * cf / ((1.0 + rate).powi(t as i32 + 1));
        }
    }

    (npv, dnpv)
}

/// Largest absolute cash flow, used to scale the residual check
fn magnitude(cashflows: &[f64]) -> f64 {
    cashflows.iter().fold(1.0_f64, |m, cf| m.max(cf.abs()))
}

/// Periodic IRR using Newton-Raphson, falling back to bisection
///
/// Returns `None` when the flows never change sign (all inflows, all outflows
/// or all zero) or no root lies in the search range.
pub fn periodic_irr(cashflows: &[f64]) -> Option<f64> {
    if cashflows.is_empty() {
        return None;
    }

    // At least one sign change is required for a root to exist
    let has_positive = cashflows.iter().any(|&cf| cf > 1e-10);
    let has_negative = cashflows.iter().any(|&cf| cf < -1e-10);
    if !has_positive || !has_negative {
        return None;
    }

    let residual_limit = 1e-9 * magnitude(cashflows);
    let mut rate = 0.1;

    for _ in 0..MAX_ITERATIONS {
        let (value, slope) = npv_and_derivative(cashflows, rate);

        if slope.abs() < 1e-20 {
            // Derivative too small, try bisection instead
            return irr_bisection(cashflows);
        }

        let new_rate = (rate - value / slope).clamp(LOWER_BOUND, UPPER_BOUND);

        if (new_rate - rate).abs() < RATE_TOLERANCE {
            // A clamped fixed point on the boundary is not a root
            if npv(new_rate, cashflows).abs() <= residual_limit {
                return Some(new_rate);
            }
            break;
        }

        rate = new_rate;
    }

    // Newton-Raphson didn't converge, try bisection
    irr_bisection(cashflows)
}

/// Fallback IRR calculation using bisection
fn irr_bisection(cashflows: &[f64]) -> Option<f64> {
    let mut low = LOWER_BOUND;
    let mut high = UPPER_BOUND;

    let mut npv_low = npv(low, cashflows);
    let npv_high = npv(high, cashflows);

    // Check that we have a root in this interval
    if npv_low * npv_high > 0.0 {
        return None;
    }

    for _ in 0..MAX_ITERATIONS {
        let mid = (low + high) / 2.0;
        let npv_mid = npv(mid, cashflows);

        if npv_mid == 0.0 || (high - low) / 2.0 < 1e-15 {
            return Some(mid);
        }

        if npv_mid * npv_low < 0.0 {
            high = mid;
        } else {
            low = mid;
            npv_low = npv_mid;
        }
    }

    None
}

/// IRR expressed as an annual rate for flows spaced `periods_per_year` apart
pub fn calculate_irr(cashflows: &[f64], periods_per_year: u32) -> Option<f64> {
    periodic_irr(cashflows).map(|r| (1.0 + r).powi(periods_per_year as i32) - 1.0)
}

/// IRR of annual cash flows, failing with `IrrNotFound` rather than guessing
pub fn solve_irr(cashflows: &[f64], context: &str) -> Result<f64> {
    calculate_irr(cashflows, 1).ok_or_else(|| ProjectionError::IrrNotFound {
        context: context.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_simple_irr() {
        // Investment of $1000, returns $1100 after 1 year (monthly)
        let mut cashflows = vec![-1000.0];
        cashflows.extend(vec![0.0; 11]);
        cashflows.push(1100.0);

        let irr = calculate_irr(&cashflows, 12).unwrap();
        assert!((irr - 0.10).abs() < 0.001, "Expected ~10% IRR, got {}", irr);
    }

    #[test]
    fn test_level_cashflows() {
        // Loan of $10000, 12 monthly payments of $900
        let mut cashflows = vec![10000.0];
        cashflows.extend(vec![-900.0; 12]);

        let irr = calculate_irr(&cashflows, 12);
        assert!(irr.is_some());
    }

    #[test]
    fn test_annual_irr_round_trip() {
        let cashflows = [-270_000.0, 12_000.0, 12_500.0, 13_000.0, 13_400.0, 360_000.0];
        let irr = solve_irr(&cashflows, "test").unwrap();

        assert!(irr > 0.0 && irr < 0.2);
        assert_abs_diff_eq!(npv(irr, &cashflows), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_negative_irr() {
        let cashflows = [-100_000.0, -5_000.0, -5_000.0, 80_000.0];
        let irr = solve_irr(&cashflows, "loss").unwrap();

        assert!(irr < 0.0);
        assert_abs_diff_eq!(npv(irr, &cashflows), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_no_sign_change_is_an_error() {
        assert!(matches!(
            solve_irr(&[100.0, 200.0, 300.0], "all positive"),
            Err(ProjectionError::IrrNotFound { .. })
        ));
        assert!(matches!(
            solve_irr(&[-100.0, -200.0], "all negative"),
            Err(ProjectionError::IrrNotFound { .. })
        ));
        assert!(solve_irr(&[0.0, 0.0, 0.0], "all zero").is_err());
        assert!(solve_irr(&[], "empty").is_err());
    }

    #[test]
    fn test_npv_at_zero_is_sum() {
        assert_abs_diff_eq!(npv(0.0, &[-100.0, 60.0, 60.0]), 20.0, epsilon = 1e-12);
    }
}
