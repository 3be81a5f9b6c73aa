//! Plain-vanilla bond pricing under a flat discount rate.
//!
//! The bond pays a level coupon every period and returns its face value with
//! the final coupon. Periods are whole years times the payment frequency, so
//! there is no accrued interest or day count to deal with.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinCalcError;
use crate::time_value::{out_of_range, present_value, pv_level_cash_flows};
use crate::types::{with_metadata, ComputationOutput, Money, PaymentFrequency, Rate};
use crate::FinCalcResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Largest number of coupon periods a bond may have.
pub const MAX_COUPON_PERIODS: u32 = 2_400;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A single bond cashflow entry (coupon, principal, or both).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondCashflow {
    /// Period index, 1-based.
    pub period: u32,
    pub amount: Money,
    /// Amount discounted at the period yield.
    pub present_value: Money,
    pub cashflow_type: String,
}

/// Input parameters for bond pricing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BondValueInput {
    /// Par / face value (typically 1000)
    pub face_value: Money,
    /// Annual coupon rate as a decimal (e.g. 0.05 = 5%)
    pub coupon_rate: Rate,
    /// Whole years remaining until maturity
    pub years_to_maturity: u32,
    /// Annual yield to maturity as a decimal
    pub ytm: Rate,
    /// `annual` or `semi-annual`
    pub frequency: PaymentFrequency,
}

/// Output of bond pricing computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BondValueOutput {
    /// Present value of all remaining cashflows
    pub price: Money,
    /// Coupon paid each period
    pub coupon_payment: Money,
    /// Number of coupon periods to maturity
    pub total_periods: u32,
    /// Yield per coupon period
    pub rate_per_period: Rate,
    /// Annual coupon / price
    pub current_yield: Rate,
    /// "premium", "discount" or "par" relative to face value
    pub discount_or_premium: String,
    /// Full schedule of future cashflows (coupons + principal)
    pub cashflows: Vec<BondCashflow>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Present value of a bond's coupons and principal at a flat annual `ytm`.
///
/// A zero-year bond is worth exactly its face value. A per-period rate of
/// -100% has no present value and is reported as `DivisionByZero`.
pub fn bond_value(
    face_value: Money,
    coupon_rate: Rate,
    years_to_maturity: u32,
    ytm: Rate,
    frequency: PaymentFrequency,
) -> FinCalcResult<Money> {
    let periods_per_year = frequency.bond_periods_per_year()?;
    validate_terms(face_value, coupon_rate)?;

    let total_periods = coupon_periods(years_to_maturity, periods_per_year, "years_to_maturity")?;
    let rate_per_period = ytm / Decimal::from(periods_per_year);
    let coupon = coupon_payment(face_value, coupon_rate, periods_per_year)?;

    pv_level_cash_flows(coupon, rate_per_period, total_periods, face_value)
}

/// Price a bond and report its coupon, current yield and cashflow schedule.
pub fn price_bond(input: &BondValueInput) -> FinCalcResult<ComputationOutput<BondValueOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let periods_per_year = input.frequency.bond_periods_per_year()?;
    validate_terms(input.face_value, input.coupon_rate)?;

    let price = bond_value(
        input.face_value,
        input.coupon_rate,
        input.years_to_maturity,
        input.ytm,
        input.frequency,
    )?;

    let total_periods =
        coupon_periods(input.years_to_maturity, periods_per_year, "years_to_maturity")?;
    let rate_per_period = input.ytm / Decimal::from(periods_per_year);
    let coupon = coupon_payment(input.face_value, input.coupon_rate, periods_per_year)?;

    let cashflows = build_cashflow_schedule(
        total_periods,
        coupon,
        input.face_value,
        rate_per_period,
    )?;

    let annual_coupon = input
        .face_value
        .checked_mul(input.coupon_rate)
        .ok_or_else(|| out_of_range("annual coupon"))?;
    let current_yield = if price > Decimal::ZERO {
        annual_coupon
            .checked_div(price)
            .ok_or_else(|| out_of_range("current yield"))?
    } else {
        warnings.push("Price is zero or negative; current yield undefined".into());
        Decimal::ZERO
    };

    if input.ytm < Decimal::ZERO {
        warnings.push(format!("Negative yield to maturity ({})", input.ytm));
    }
    if input.years_to_maturity == 0 {
        warnings.push("Bond has matured; price equals face value".into());
    }

    let output = BondValueOutput {
        price,
        coupon_payment: coupon,
        total_periods,
        rate_per_period,
        current_yield,
        discount_or_premium: premium_label(price, input.face_value),
        cashflows,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Bond Pricing — PV of level coupons and principal at a flat yield",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Coupon paid each period.
pub(crate) fn coupon_payment(
    face_value: Money,
    coupon_rate: Rate,
    periods_per_year: u32,
) -> FinCalcResult<Money> {
    coupon_rate
        .checked_mul(face_value)
        .map(|annual| annual / Decimal::from(periods_per_year))
        .ok_or_else(|| out_of_range("coupon payment"))
}

/// Coupon periods in `years` whole years, capped at [`MAX_COUPON_PERIODS`].
pub(crate) fn coupon_periods(years: u32, periods_per_year: u32, field: &str) -> FinCalcResult<u32> {
    years
        .checked_mul(periods_per_year)
        .filter(|periods| *periods <= MAX_COUPON_PERIODS)
        .ok_or_else(|| FinCalcError::InvalidInput {
            field: field.into(),
            reason: format!(
                "{years} years at {periods_per_year} payments per year exceeds {MAX_COUPON_PERIODS} coupon periods"
            ),
        })
}

/// Classify a price relative to face value.
pub(crate) fn premium_label(price: Money, face_value: Money) -> String {
    if price > face_value {
        "premium".to_string()
    } else if price < face_value {
        "discount".to_string()
    } else {
        "par".to_string()
    }
}

pub(crate) fn validate_terms(face_value: Money, coupon_rate: Rate) -> FinCalcResult<()> {
    if face_value <= Decimal::ZERO {
        return Err(FinCalcError::InvalidInput {
            field: "face_value".into(),
            reason: "Face value must be positive".into(),
        });
    }
    if coupon_rate < Decimal::ZERO {
        return Err(FinCalcError::InvalidInput {
            field: "coupon_rate".into(),
            reason: "Coupon rate cannot be negative".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Cashflow schedule
// ---------------------------------------------------------------------------

fn build_cashflow_schedule(
    total_periods: u32,
    coupon: Money,
    face_value: Money,
    rate_per_period: Rate,
) -> FinCalcResult<Vec<BondCashflow>> {
    let mut cashflows = Vec::with_capacity(total_periods as usize);

    for period in 1..=total_periods {
        let (amount, cashflow_type) = if period == total_periods {
            let final_payment = coupon
                .checked_add(face_value)
                .ok_or_else(|| out_of_range("final coupon and principal"))?;
            (final_payment, "coupon+principal")
        } else {
            (coupon, "coupon")
        };
        cashflows.push(BondCashflow {
            period,
            amount,
            present_value: present_value(amount, rate_per_period, period)?,
            cashflow_type: cashflow_type.into(),
        });
    }

    Ok(cashflows)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
