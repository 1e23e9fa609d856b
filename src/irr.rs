//! Return calculation: present values and a closed-form two-point IRR.
//!
//! Terms are converted to years as `days / 365`. The IRR is the unique
//! periodic rate that equates the single cost cashflow to the single
//! benefit cashflow:
//!
//! ```text
//! cost_pv    = cost / (1 + rate)^(cost_term / 365)
//! benefit_pv = benefit / (1 + rate)^(benefit_term / 365)
//! npv        = benefit_pv - cost_pv
//! value      = (cost / benefit)^(-1 / (benefit_term/365 - cost_term/365)) - 1
//! ```
//!
//! A zero cost or benefit is not special-cased: the IEEE-754 result
//! (`inf`, `-1`, or `NaN`) is carried through to the report.

use crate::model::{ComputedResult, Directive};

/// Degenerate financial inputs.
#[derive(Debug, thiserror::Error)]
pub enum IrrError {
    #[error("cost and benefit fall on the same term ({term} days); IRR is undefined")]
    DivisionByZero { term: f64 },

    #[error("discount rate must be a finite number greater than -1, got {0}")]
    InvalidRate(f64),
}

pub type Result<T> = core::result::Result<T, IrrError>;

const DAYS_PER_YEAR: f64 = 365.0;

/// Reject rates for which `(1 + rate)` is not positive or not finite.
pub fn validate_rate(rate: f64) -> Result<()> {
    if rate.is_finite() && rate > -1.0 {
        Ok(())
    } else {
        Err(IrrError::InvalidRate(rate))
    }
}

/// Compute present values and IRR for a directive at a discount rate.
///
/// `report` is the number of the aggregate report issue, carried along
/// so the rewritten comment can link back to it.
pub fn compute(rate: f64, directive: &Directive, report: u64) -> Result<ComputedResult> {
    validate_rate(rate)?;

    let cost_years = directive.cost_term / DAYS_PER_YEAR;
    let benefit_years = directive.benefit_term / DAYS_PER_YEAR;
    let span = benefit_years - cost_years;
    if span == 0.0 {
        return Err(IrrError::DivisionByZero {
            term: directive.cost_term,
        });
    }

    let discount = 1.0 + rate;
    let cost_pv = directive.cost / discount.powf(cost_years);
    let benefit_pv = directive.benefit / discount.powf(benefit_years);
    let value = (directive.cost / directive.benefit).powf(-1.0 / span) - 1.0;

    Ok(ComputedResult {
        rate,
        directive: directive.clone(),
        cost_pv,
        benefit_pv,
        npv: benefit_pv - cost_pv,
        value,
        label: label(value),
        report,
    })
}

/// Short tag for a return: `irr` plus the percentage truncated toward zero.
///
/// Non-finite returns keep their float spelling (`irrinf`, `irrNaN`).
pub fn label(value: f64) -> String {
    let percent = value * 100.0;
    if percent.is_finite() {
        // Saturating cast; truncation toward zero is the point.
        #[allow(clippy::cast_possible_truncation)]
        let whole = percent as i64;
        format!("irr{whole}")
    } else {
        format!("irr{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directive(cost: f64, cost_term: f64, benefit: f64, benefit_term: f64) -> Directive {
        Directive {
            cost,
            cost_term,
            benefit,
            benefit_term,
            notes: String::new(),
        }
    }

    #[test]
    fn one_year_fifty_percent() {
        let result = compute(0.08, &directive(100.0, 0.0, 150.0, 365.0), 9).unwrap();
        assert!((result.value - 0.5).abs() < 1e-12);
        assert_eq!(result.label, "irr50");
        assert_eq!(result.cost_pv, 100.0);
        assert!((result.benefit_pv - 150.0 / 1.08).abs() < 1e-9);
        assert!((result.npv - (150.0 / 1.08 - 100.0)).abs() < 1e-9);
        assert_eq!(result.report, 9);
    }

    #[test]
    fn two_year_horizon() {
        // 100 now, 144 in two years: 20% a year.
        let result = compute(0.0, &directive(100.0, 0.0, 144.0, 730.0), 1).unwrap();
        assert!((result.value - 0.2).abs() < 1e-12);
        assert_eq!(result.cost_pv, 100.0);
        assert_eq!(result.benefit_pv, 144.0);
    }

    #[test]
    fn deterministic() {
        let d = directive(37.5, 12.0, 91.25, 500.0);
        let a = compute(0.07, &d, 1).unwrap();
        let b = compute(0.07, &d, 1).unwrap();
        assert_eq!(a.value.to_bits(), b.value.to_bits());
        assert_eq!(a, b);
    }

    #[test]
    fn equal_terms_is_division_by_zero() {
        let err = compute(0.08, &directive(100.0, 30.0, 150.0, 30.0), 1).unwrap_err();
        assert!(matches!(err, IrrError::DivisionByZero { .. }));
    }

    #[test]
    fn rate_at_or_below_minus_one_is_invalid() {
        let d = directive(100.0, 0.0, 150.0, 365.0);
        assert!(matches!(compute(-1.0, &d, 1), Err(IrrError::InvalidRate(_))));
        assert!(matches!(compute(-2.5, &d, 1), Err(IrrError::InvalidRate(_))));
        assert!(matches!(compute(f64::NAN, &d, 1), Err(IrrError::InvalidRate(_))));
        assert!(matches!(
            compute(f64::INFINITY, &d, 1),
            Err(IrrError::InvalidRate(_))
        ));
    }

    #[test]
    fn zero_cost_is_infinite_return() {
        let result = compute(0.08, &directive(0.0, 0.0, 150.0, 365.0), 1).unwrap();
        assert_eq!(result.value, f64::INFINITY);
        assert_eq!(result.label, "irrinf");
    }

    #[test]
    fn zero_benefit_is_total_loss() {
        let result = compute(0.08, &directive(100.0, 0.0, 0.0, 365.0), 1).unwrap();
        assert_eq!(result.value, -1.0);
        assert_eq!(result.label, "irr-100");
    }

    #[test]
    fn zero_cost_and_benefit_is_nan() {
        let result = compute(0.08, &directive(0.0, 0.0, 0.0, 365.0), 1).unwrap();
        assert!(result.value.is_nan());
        assert_eq!(result.label, "irrNaN");
    }

    #[test]
    fn label_truncates_toward_zero() {
        assert_eq!(label(0.499), "irr49");
        assert_eq!(label(-0.335), "irr-33");
        assert_eq!(label(-0.003), "irr0");
        assert_eq!(label(f64::NEG_INFINITY), "irr-inf");
    }
}
