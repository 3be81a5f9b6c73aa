//! Realized (horizon) yield on a bond bought at one yield and sold before
//! maturity at another.
//!
//! The purchase price and the sale price both come from the flat-yield bond
//! pricer. The realized yield is the single annual rate that discounts the
//! coupons received while holding, plus the sale proceeds, back to the
//! purchase price.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinCalcError;
use crate::fixed_income::bonds::{bond_value, coupon_payment, coupon_periods, validate_terms};
use crate::solver::{solve_root, SolverConfig, SolverResult};
use crate::time_value::{effective_annual_rate, out_of_range, pv_level_cash_flows};
use crate::types::{with_metadata, ComputationOutput, Money, PaymentFrequency, Rate};
use crate::FinCalcResult;

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

/// Input for realized yield calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealizedYieldInput {
    /// Face (par) value of the bond.
    pub face_value: Money,
    /// Annual coupon rate as a decimal.
    pub coupon_rate: Rate,
    /// Yield to maturity at purchase.
    pub current_ytm: Rate,
    /// Whole years to maturity at purchase.
    pub years_to_maturity: u32,
    /// Whole years the bond is held before sale.
    pub holding_period: u32,
    /// Yield to maturity at which the bond is sold.
    pub future_ytm: Rate,
    /// `annual` or `semi-annual`.
    pub frequency: PaymentFrequency,
    /// Solver tolerances. Defaults to [`SolverConfig::default`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solver: Option<SolverConfig>,
}

/// Output of realized yield calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealizedYieldOutput {
    /// Annual realized yield over the holding period.
    pub realized_yield: Rate,
    /// (1 + realized / freq)^freq - 1.
    pub effective_annual_realized_yield: Rate,
    /// Price paid at `current_ytm`.
    pub initial_price: Money,
    /// Price received at `future_ytm` for the remaining maturity.
    pub sale_price: Money,
    /// Sale price minus initial price.
    pub capital_gain: Money,
    /// Coupon received each period.
    pub coupon_payment: Money,
    /// Undiscounted coupons received while holding.
    pub total_coupon_income: Money,
    /// Coupon periods in the holding period.
    pub holding_periods: u32,
    /// Years left to maturity at sale.
    pub remaining_years: u32,
    pub iterations: u32,
}

/// Intermediate values shared by the plain and the enveloped entry points.
struct RealizedYieldSolution {
    initial_price: Money,
    sale_price: Money,
    coupon: Money,
    holding_periods: u32,
    remaining_years: u32,
    solved: SolverResult,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Annual holding-period return of a bond bought at `current_ytm` and sold
/// after `holding_period` years at `future_ytm`.
///
/// The solve is seeded at `current_ytm` and carries the same convergence
/// contract as [`crate::fixed_income::yields::calculate_ytm`].
#[allow(clippy::too_many_arguments)]
pub fn calculate_realized_yield(
    face_value: Money,
    coupon_rate: Rate,
    current_ytm: Rate,
    years_to_maturity: u32,
    holding_period: u32,
    future_ytm: Rate,
    frequency: PaymentFrequency,
) -> FinCalcResult<Rate> {
    let input = RealizedYieldInput {
        face_value,
        coupon_rate,
        current_ytm,
        years_to_maturity,
        holding_period,
        future_ytm,
        frequency,
        solver: None,
    };
    solve(&input, &SolverConfig::default()).map(|s| s.solved.root)
}

/// Realized yield with purchase/sale prices and coupon income.
pub fn analyze_realized_yield(
    input: &RealizedYieldInput,
) -> FinCalcResult<ComputationOutput<RealizedYieldOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let config = input.solver.unwrap_or_default();
    let solution = solve(input, &config)?;
    let periods_per_year = input.frequency.periods_per_year();

    let realized_yield = solution.solved.root;
    let effective_annual_realized_yield =
        effective_annual_rate(realized_yield / Decimal::from(periods_per_year), periods_per_year)?;

    if solution.remaining_years == 0 {
        warnings.push("Bond held to maturity; sale price is the face value".into());
    }
    if realized_yield < Decimal::ZERO {
        warnings.push(format!("Realized yield is negative ({realized_yield})"));
    }

    let capital_gain = solution
        .sale_price
        .checked_sub(solution.initial_price)
        .ok_or_else(|| out_of_range("capital gain"))?;
    let total_coupon_income = solution
        .coupon
        .checked_mul(Decimal::from(solution.holding_periods))
        .ok_or_else(|| out_of_range("total coupon income"))?;

    let output = RealizedYieldOutput {
        realized_yield,
        effective_annual_realized_yield,
        initial_price: solution.initial_price,
        sale_price: solution.sale_price,
        capital_gain,
        coupon_payment: solution.coupon,
        total_coupon_income,
        holding_periods: solution.holding_periods,
        remaining_years: solution.remaining_years,
        iterations: solution.solved.iterations,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Realized Yield — horizon return from purchase yield, sale yield and interim coupons",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Core
// ---------------------------------------------------------------------------

fn solve(input: &RealizedYieldInput, config: &SolverConfig) -> FinCalcResult<RealizedYieldSolution> {
    let periods_per_year = input.frequency.bond_periods_per_year()?;
    validate_input(input)?;

    let initial_price = bond_value(
        input.face_value,
        input.coupon_rate,
        input.years_to_maturity,
        input.current_ytm,
        input.frequency,
    )?;

    let remaining_years = input.years_to_maturity - input.holding_period;
    let sale_price = bond_value(
        input.face_value,
        input.coupon_rate,
        remaining_years,
        input.future_ytm,
        input.frequency,
    )?;

    let holding_periods = coupon_periods(input.holding_period, periods_per_year, "holding_period")?;
    let coupon = coupon_payment(input.face_value, input.coupon_rate, periods_per_year)?;
    let freq = Decimal::from(periods_per_year);

    let residual = |r: Rate| -> FinCalcResult<Money> {
        let horizon_value = pv_level_cash_flows(coupon, r / freq, holding_periods, sale_price)?;
        initial_price
            .checked_sub(horizon_value)
            .ok_or_else(|| out_of_range(format!("realized yield pricing error at rate {r}")))
    };

    let solved = solve_root("Realized yield", residual, input.current_ytm, config)?;

    Ok(RealizedYieldSolution {
        initial_price,
        sale_price,
        coupon,
        holding_periods,
        remaining_years,
        solved,
    })
}

fn validate_input(input: &RealizedYieldInput) -> FinCalcResult<()> {
    validate_terms(input.face_value, input.coupon_rate)?;
    if input.holding_period == 0 {
        return Err(FinCalcError::InvalidInput {
            field: "holding_period".into(),
            reason: "Holding period must be at least one year".into(),
        });
    }
    if input.holding_period > input.years_to_maturity {
        return Err(FinCalcError::InvalidInput {
            field: "holding_period".into(),
            reason: "Holding period cannot exceed years to maturity".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
