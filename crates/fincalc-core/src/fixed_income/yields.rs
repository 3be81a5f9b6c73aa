use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinCalcError;
use crate::fixed_income::bonds::{bond_value, premium_label, validate_terms};
use crate::solver::{solve_root, SolverConfig, SolverResult};
use crate::time_value::{effective_annual_rate, out_of_range};
use crate::types::{with_metadata, ComputationOutput, Money, PaymentFrequency, Rate};
use crate::FinCalcResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Starting point for the YTM solve when the caller gives none.
pub const DEFAULT_YTM_GUESS: Rate = dec!(0.05);

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// Input for yield-to-maturity calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YtmInput {
    /// Observed market price of the bond.
    pub bond_price: Money,
    /// Face (par) value of the bond.
    pub face_value: Money,
    /// Annual coupon rate as a decimal (e.g. 0.05 = 5%).
    pub coupon_rate: Rate,
    /// Whole years remaining until maturity.
    pub years_to_maturity: u32,
    /// `annual` or `semi-annual`.
    pub frequency: PaymentFrequency,
    /// Starting yield for the solver. Defaults to 5%.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_guess: Option<Rate>,
    /// Solver tolerances. Defaults to [`SolverConfig::default`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solver: Option<SolverConfig>,
}

/// Output of yield-to-maturity calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YtmOutput {
    /// Annual yield to maturity (periodic yield x periods per year).
    pub ytm: Rate,
    /// Yield per coupon period.
    pub periodic_yield: Rate,
    /// Effective annual yield = (1 + periodic)^freq - 1.
    pub effective_annual_yield: Rate,
    /// Current yield = annual coupon / price.
    pub current_yield: Rate,
    /// Whether the bond trades at premium, discount, or par.
    pub discount_or_premium: String,
    /// Secant iterations used.
    pub iterations: u32,
    /// Price error at the returned yield.
    pub residual: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Solve for the annual yield that prices the bond at `bond_price`.
///
/// Fails with `ConvergenceFailure` when the solver does not settle on a
/// root; no unconverged estimate is ever returned.
pub fn calculate_ytm(
    bond_price: Money,
    face_value: Money,
    coupon_rate: Rate,
    years_to_maturity: u32,
    frequency: PaymentFrequency,
    initial_guess: Rate,
) -> FinCalcResult<Rate> {
    solve_ytm(
        bond_price,
        face_value,
        coupon_rate,
        years_to_maturity,
        frequency,
        initial_guess,
        &SolverConfig::default(),
    )
    .map(|solved| solved.root)
}

/// [`calculate_ytm`] with explicit solver settings and iteration statistics.
pub fn solve_ytm(
    bond_price: Money,
    face_value: Money,
    coupon_rate: Rate,
    years_to_maturity: u32,
    frequency: PaymentFrequency,
    initial_guess: Rate,
    config: &SolverConfig,
) -> FinCalcResult<SolverResult> {
    frequency.bond_periods_per_year()?;
    validate_terms(face_value, coupon_rate)?;
    if bond_price <= Decimal::ZERO {
        return Err(FinCalcError::InvalidInput {
            field: "bond_price".into(),
            reason: "Bond price must be positive".into(),
        });
    }
    if years_to_maturity == 0 {
        return Err(FinCalcError::InvalidInput {
            field: "years_to_maturity".into(),
            reason: "A matured bond has no yield to solve for".into(),
        });
    }

    let residual = |y: Rate| -> FinCalcResult<Money> {
        let model_price = bond_value(face_value, coupon_rate, years_to_maturity, y, frequency)?;
        bond_price
            .checked_sub(model_price)
            .ok_or_else(|| out_of_range(format!("YTM pricing error at yield {y}")))
    };

    solve_root("YTM", residual, initial_guess, config)
}

/// Calculate yield to maturity along with periodic, effective annual and
/// current yields.
pub fn calculate_bond_yield(input: &YtmInput) -> FinCalcResult<ComputationOutput<YtmOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let periods_per_year = input.frequency.bond_periods_per_year()?;
    let guess = input.initial_guess.unwrap_or(DEFAULT_YTM_GUESS);
    let config = input.solver.unwrap_or_default();

    let solved = solve_ytm(
        input.bond_price,
        input.face_value,
        input.coupon_rate,
        input.years_to_maturity,
        input.frequency,
        guess,
        &config,
    )?;

    let ytm = solved.root;
    let periodic_yield = ytm / Decimal::from(periods_per_year);
    let effective_annual_yield = effective_annual_rate(periodic_yield, periods_per_year)?;
    let current_yield = input
        .face_value
        .checked_mul(input.coupon_rate)
        .and_then(|annual_coupon| annual_coupon.checked_div(input.bond_price))
        .ok_or_else(|| out_of_range("current yield"))?;

    if ytm < Decimal::ZERO {
        warnings.push(format!("Solved yield is negative ({ytm})"));
    }

    let output = YtmOutput {
        ytm,
        periodic_yield,
        effective_annual_yield,
        current_yield,
        discount_or_premium: premium_label(input.bond_price, input.face_value),
        iterations: solved.iterations,
        residual: solved.residual,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "ytm_method": "Secant",
        "initial_guess": guess.to_string(),
        "max_iterations": config.max_iterations,
        "tolerance": config.tolerance.to_string(),
        "frequency": input.frequency.as_str(),
    });

    Ok(with_metadata(
        "Yield to Maturity — secant inversion of flat-yield bond price",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Decimal, b: Decimal, eps: Decimal) -> bool {
        (a - b).abs() < eps
    }

    fn reference_input() -> YtmInput {
        YtmInput {
            bond_price: dec!(774.85),
            face_value: dec!(1000),
            coupon_rate: dec!(0.12),
            years_to_maturity: 15,
            frequency: PaymentFrequency::SemiAnnual,
            initial_guess: None,
            solver: None,
        }
    }

    #[test]
    fn test_reference_ytm() {
        let ytm = calculate_ytm(
            dec!(774.85),
            dec!(1000),
            dec!(0.12),
            15,
            PaymentFrequency::SemiAnnual,
            DEFAULT_YTM_GUESS,
        )
        .unwrap();
        assert!(approx_eq(ytm, dec!(0.159999), dec!(0.00001)));
    }

    #[test]
    fn test_par_bond_yield_equals_coupon() {
        let ytm = calculate_ytm(
            dec!(1000),
            dec!(1000),
            dec!(0.07),
            8,
            PaymentFrequency::Annual,
            DEFAULT_YTM_GUESS,
        )
        .unwrap();
        assert!(approx_eq(ytm, dec!(0.07), dec!(0.0000001)));
    }

    #[test]
    fn test_round_trip_recovers_yield() {
        let cases = [
            (dec!(0.05), 10, dec!(0.03), PaymentFrequency::Annual),
            (dec!(0.08), 30, dec!(0.115), PaymentFrequency::SemiAnnual),
            (Decimal::ZERO, 5, dec!(0.04), PaymentFrequency::SemiAnnual),
            (dec!(0.02), 7, dec!(-0.005), PaymentFrequency::Annual),
            (dec!(0.10), 1, dec!(0.20), PaymentFrequency::SemiAnnual),
        ];
        for (coupon, years, y0, freq) in cases {
            let price = bond_value(dec!(1000), coupon, years, y0, freq).unwrap();
            let solved =
                calculate_ytm(price, dec!(1000), coupon, years, freq, DEFAULT_YTM_GUESS).unwrap();
            assert!(
                approx_eq(solved, y0, dec!(0.000001)),
                "expected {y0}, solved {solved}"
            );
        }
    }

    #[test]
    fn test_custom_initial_guess() {
        let ytm = calculate_ytm(
            dec!(774.85),
            dec!(1000),
            dec!(0.12),
            15,
            PaymentFrequency::SemiAnnual,
            dec!(0.20),
        )
        .unwrap();
        assert!(approx_eq(ytm, dec!(0.159999), dec!(0.00001)));
    }

    #[test]
    fn test_iteration_budget_surfaces_failure() {
        let input = YtmInput {
            solver: Some(SolverConfig {
                max_iterations: 1,
                ..SolverConfig::default()
            }),
            ..reference_input()
        };
        let err = calculate_bond_yield(&input).unwrap_err();
        assert!(matches!(err, FinCalcError::ConvergenceFailure { .. }));
    }

    #[test]
    fn test_quarter_frequency_rejected() {
        let err = calculate_ytm(
            dec!(950),
            dec!(1000),
            dec!(0.05),
            5,
            PaymentFrequency::Quarter,
            DEFAULT_YTM_GUESS,
        )
        .unwrap_err();
        assert!(matches!(err, FinCalcError::InvalidInput { .. }));
    }

    #[test]
    fn test_reject_non_positive_price() {
        assert!(calculate_ytm(
            Decimal::ZERO,
            dec!(1000),
            dec!(0.05),
            5,
            PaymentFrequency::Annual,
            DEFAULT_YTM_GUESS,
        )
        .is_err());
    }

    #[test]
    fn test_reject_matured_bond() {
        assert!(calculate_ytm(
            dec!(1000),
            dec!(1000),
            dec!(0.05),
            0,
            PaymentFrequency::Annual,
            DEFAULT_YTM_GUESS,
        )
        .is_err());
    }

    #[test]
    fn test_bond_yield_output() {
        let out = calculate_bond_yield(&reference_input()).unwrap();
        let r = &out.result;
        assert!(approx_eq(r.ytm, dec!(0.159999), dec!(0.00001)));
        assert_eq!(r.periodic_yield, r.ytm / dec!(2));
        assert!(approx_eq(r.effective_annual_yield, dec!(0.166399), dec!(0.00001)));
        assert_eq!(r.discount_or_premium, "discount");
        assert!(r.residual.abs() < dec!(0.0000000001));
        assert!(r.iterations > 0);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let out = calculate_bond_yield(&reference_input()).unwrap();
        let json = serde_json::to_string(&out.result).unwrap();
        let back: YtmOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(back.ytm, out.result.ytm);
    }

    #[test]
    fn test_out_of_range_guess_is_error() {
        // Pricing at -100% a year overflows the cash flow sum
        let err = calculate_ytm(
            dec!(950),
            dec!(1000),
            dec!(0.12),
            45,
            PaymentFrequency::SemiAnnual,
            dec!(-1),
        )
        .unwrap_err();
        assert!(matches!(err, FinCalcError::DivisionByZero { .. }));
    }

    #[test]
    fn test_reject_period_count_overflow() {
        let err = calculate_ytm(
            dec!(950),
            dec!(1000),
            dec!(0.05),
            u32::MAX,
            PaymentFrequency::SemiAnnual,
            DEFAULT_YTM_GUESS,
        )
        .unwrap_err();
        assert!(matches!(err, FinCalcError::InvalidInput { .. }));
    }
}
