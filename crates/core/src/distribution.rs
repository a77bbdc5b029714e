//! Monthly profit-to-point distribution: constants, types, and pure logic.
//!
//! Each calendar month an administrator records the company's total profit
//! and the percentage of it allocated to the points pool. The pool divided by
//! the points already awarded that month gives the monetary value of one
//! point, which in turn prices each employee's payout.

use serde::Serialize;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Defaults & limits
// ---------------------------------------------------------------------------

/// Percentage pre-filled for a month with no saved setting.
pub const DEFAULT_PROFIT_PERCENTAGE: f64 = 25.0;

/// Inclusive bounds for the profit percentage input.
pub const MIN_PROFIT_PERCENTAGE: f64 = 0.0;
pub const MAX_PROFIT_PERCENTAGE: f64 = 100.0;

/// Decimal places kept when persisting a point value.
pub const POINT_VALUE_DECIMALS: u32 = 4;
/// Decimal places kept for per-user salary amounts.
pub const SALARY_DECIMALS: u32 = 2;

// ---------------------------------------------------------------------------
// Derived state
// ---------------------------------------------------------------------------

/// Values derived from a month's inputs. Computed on demand, never persisted
/// by the client; the server stores only the rounded point value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedDistribution {
    /// Money allocated to the points pool: `total_profit * percentage / 100`.
    pub distribution_amount: f64,
    /// Monetary worth of one point, `0.0` when no points were awarded.
    pub point_value: f64,
}

impl DerivedDistribution {
    /// The all-zero distribution (empty month, or inputs not yet entered).
    pub const ZERO: Self = Self {
        distribution_amount: 0.0,
        point_value: 0.0,
    };
}

/// Compute the distribution pool and point value for one month.
///
/// Pure and total: any numeric input produces a result. A month with zero
/// points awarded yields `point_value = 0.0` rather than dividing by zero.
/// Range enforcement belongs at the save boundary ([`validate_setting`]),
/// not here.
pub fn recompute(
    total_profit: f64,
    profit_percentage: f64,
    total_points: i64,
) -> DerivedDistribution {
    let distribution_amount = total_profit * (profit_percentage / 100.0);
    let point_value = if total_points > 0 {
        distribution_amount / total_points as f64
    } else {
        0.0
    };
    DerivedDistribution {
        distribution_amount,
        point_value,
    }
}

/// [`recompute`] over form-style inputs where a field may be empty.
///
/// Missing values are treated as zero so a half-filled form still renders a
/// (zero) preview instead of erroring.
pub fn recompute_partial(
    total_profit: Option<f64>,
    profit_percentage: Option<f64>,
    total_points: Option<i64>,
) -> DerivedDistribution {
    recompute(
        total_profit.unwrap_or(0.0),
        profit_percentage.unwrap_or(0.0),
        total_points.unwrap_or(0),
    )
}

// ---------------------------------------------------------------------------
// Save-time validation
// ---------------------------------------------------------------------------

/// Validate a monthly setting before it is persisted.
///
/// The calculator itself tolerates any numbers; this gate runs before any
/// network or database write. Rejects negative profit, a percentage outside
/// `[0, 100]`, non-finite values, and an out-of-range month.
pub fn validate_setting(
    month: u32,
    total_profit: f64,
    profit_percentage: f64,
) -> Result<(), CoreError> {
    if !(1..=12).contains(&month) {
        return Err(CoreError::Validation(format!(
            "Month must be between 1 and 12, got {month}"
        )));
    }
    if !total_profit.is_finite() || total_profit < 0.0 {
        return Err(CoreError::Validation(
            "Total profit must be a non-negative number".into(),
        ));
    }
    if !profit_percentage.is_finite()
        || profit_percentage < MIN_PROFIT_PERCENTAGE
        || profit_percentage > MAX_PROFIT_PERCENTAGE
    {
        return Err(CoreError::Validation(
            "Profit percentage must be between 0 and 100".into(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Rounding
// ---------------------------------------------------------------------------

/// Round to `decimals` places, half away from zero.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// An employee's payout for the month: points held times point value,
/// rounded to currency precision.
pub fn user_salary(points: i64, point_value: f64) -> f64 {
    round_to(points as f64 * point_value, SALARY_DECIMALS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_recompute_reference_values() {
        let d = recompute(10_000.0, 25.0, 1_000);
        assert_eq!(d.distribution_amount, 2_500.0);
        assert_eq!(d.point_value, 2.5);
    }

    #[test]
    fn test_recompute_zero_profit() {
        let d = recompute(0.0, 25.0, 500);
        assert_eq!(d.distribution_amount, 0.0);
        assert_eq!(d.point_value, 0.0);
    }

    #[test]
    fn test_recompute_zero_points_never_divides() {
        let d = recompute(10_000.0, 25.0, 0);
        assert_eq!(d.distribution_amount, 2_500.0);
        assert_eq!(d.point_value, 0.0);
    }

    #[test]
    fn test_point_value_times_points_recovers_pool() {
        // pool = value * points must hold (within float tolerance) whenever
        // points > 0, across a spread of inputs.
        let cases = [
            (10_000.0, 25.0, 1_000i64),
            (9_999.99, 33.3, 7),
            (0.01, 100.0, 3),
            (123_456.78, 1.5, 991),
        ];
        for (profit, pct, points) in cases {
            let d = recompute(profit, pct, points);
            let recovered = d.point_value * points as f64;
            assert!(
                (recovered - d.distribution_amount).abs() < 1e-9,
                "pool not recovered for ({profit}, {pct}, {points}): \
                 {recovered} vs {}",
                d.distribution_amount
            );
        }
    }

    #[test]
    fn test_recompute_partial_treats_missing_as_zero() {
        assert_eq!(
            recompute_partial(None, Some(25.0), Some(500)),
            DerivedDistribution::ZERO
        );
        assert_eq!(recompute_partial(Some(10_000.0), None, Some(500)).point_value, 0.0);
        assert_eq!(
            recompute_partial(Some(10_000.0), Some(25.0), None),
            recompute(10_000.0, 25.0, 0)
        );
    }

    #[test]
    fn test_validate_rejects_out_of_range_percentage() {
        assert_matches!(
            validate_setting(6, 1_000.0, 150.0),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            validate_setting(6, 1_000.0, -5.0),
            Err(CoreError::Validation(_))
        );
        assert_matches!(validate_setting(6, 1_000.0, 0.0), Ok(()));
        assert_matches!(validate_setting(6, 1_000.0, 100.0), Ok(()));
    }

    #[test]
    fn test_validate_rejects_negative_profit() {
        assert_matches!(
            validate_setting(6, -0.01, 25.0),
            Err(CoreError::Validation(_))
        );
        assert_matches!(validate_setting(6, 0.0, 25.0), Ok(()));
    }

    #[test]
    fn test_validate_rejects_bad_month_and_non_finite() {
        assert_matches!(validate_setting(0, 1.0, 25.0), Err(CoreError::Validation(_)));
        assert_matches!(validate_setting(13, 1.0, 25.0), Err(CoreError::Validation(_)));
        assert_matches!(
            validate_setting(6, f64::NAN, 25.0),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            validate_setting(6, 1.0, f64::INFINITY),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round_to(2.500049, 4), 2.5);
        assert_eq!(round_to(2.50005, 4), 2.5001);
        assert_eq!(user_salary(37, 2.6667), 98.67);
        assert_eq!(user_salary(0, 2.5), 0.0);
    }
}
