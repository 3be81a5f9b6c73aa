//! Gordon Growth (constant perpetual growth) dividend discount model.
//!
//! Annual growth and discount rates are split evenly across the payment
//! periods of the year, so a quarterly payer is valued with quarterly rates.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinCalcError;
use crate::time_value::out_of_range;
use crate::types::{with_metadata, ComputationOutput, Money, PaymentFrequency, Rate};
use crate::FinCalcResult;

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

/// Input for the constant-growth DDM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstantGrowthInput {
    /// Dividend per share for one payment period.
    pub dividend: Money,
    /// Annual dividend growth rate.
    pub annual_growth_rate: Rate,
    /// Annual required rate of return.
    pub annual_discount_rate: Rate,
    /// If true, `dividend` has just been paid and the next one is grown by
    /// one period first.
    #[serde(default)]
    pub pay_now: bool,
    /// `annual`, `semi-annual` or `quarter`.
    pub payment_frequency: PaymentFrequency,
}

/// Output of the constant-growth DDM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstantGrowthOutput {
    /// Present value per share.
    pub price: Money,
    pub periods_per_year: u32,
    /// Growth per payment period.
    pub period_growth_rate: Rate,
    /// Discount rate per payment period.
    pub period_discount_rate: Rate,
    /// Dividend in the numerator of the perpetuity.
    pub next_dividend: Money,
    /// Next dividend / price.
    pub dividend_yield: Rate,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Present value of a dividend growing at a constant rate forever.
///
/// `pay_now` values `dividend x (1 + g) / (d - g)`; otherwise
/// `dividend / (d - g)`. Equal growth and discount rates have no finite value
/// and return `DivisionByZero`.
pub fn pv_constant_growth(
    dividend: Money,
    annual_growth_rate: Rate,
    annual_discount_rate: Rate,
    pay_now: bool,
    payment_frequency: PaymentFrequency,
) -> FinCalcResult<Money> {
    let (g, d) = period_rates(annual_growth_rate, annual_discount_rate, payment_frequency);
    let numerator = next_dividend(dividend, g, pay_now)?;
    let spread = d
        .checked_sub(g)
        .ok_or_else(|| out_of_range("discount-growth spread"))?;

    numerator
        .checked_div(spread)
        .ok_or_else(|| FinCalcError::DivisionByZero {
            context: "constant-growth DDM (discount rate equals growth rate)".into(),
        })
}

/// Value a constant-growth stock and report the per-period rates used.
pub fn value_constant_growth(
    input: &ConstantGrowthInput,
) -> FinCalcResult<ComputationOutput<ConstantGrowthOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let price = pv_constant_growth(
        input.dividend,
        input.annual_growth_rate,
        input.annual_discount_rate,
        input.pay_now,
        input.payment_frequency,
    )?;

    let (g, d) = period_rates(
        input.annual_growth_rate,
        input.annual_discount_rate,
        input.payment_frequency,
    );
    let next = next_dividend(input.dividend, g, input.pay_now)?;

    if d < g {
        warnings.push(
            "Discount rate is below growth rate; the perpetuity does not converge and the price is negative"
                .into(),
        );
    }

    let dividend_yield = if price.is_zero() {
        Decimal::ZERO
    } else {
        next.checked_div(price)
            .ok_or_else(|| out_of_range("dividend yield"))?
    };

    let output = ConstantGrowthOutput {
        price,
        periods_per_year: input.payment_frequency.periods_per_year(),
        period_growth_rate: g,
        period_discount_rate: d,
        next_dividend: next,
        dividend_yield,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Gordon Growth DDM — D / (r - g) at per-period rates",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn period_rates(
    annual_growth_rate: Rate,
    annual_discount_rate: Rate,
    frequency: PaymentFrequency,
) -> (Rate, Rate) {
    let periods = Decimal::from(frequency.periods_per_year());
    (annual_growth_rate / periods, annual_discount_rate / periods)
}

fn next_dividend(dividend: Money, period_growth: Rate, pay_now: bool) -> FinCalcResult<Money> {
    if !pay_now {
        return Ok(dividend);
    }
    Decimal::ONE
        .checked_add(period_growth)
        .and_then(|growth| dividend.checked_mul(growth))
        .ok_or_else(|| out_of_range("next dividend"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn approx_eq(a: Decimal, b: Decimal, eps: Decimal) -> bool {
        (a - b).abs() < eps
    }

    fn quarterly_input() -> ConstantGrowthInput {
        ConstantGrowthInput {
            dividend: dec!(0.22),
            annual_growth_rate: dec!(0.004),
            annual_discount_rate: dec!(0.16),
            pay_now: false,
            payment_frequency: PaymentFrequency::Quarter,
        }
    }

    #[test]
    fn test_reference_quarterly_price() {
        let price = pv_constant_growth(
            dec!(0.22),
            dec!(0.004),
            dec!(0.16),
            false,
            PaymentFrequency::Quarter,
        )
        .unwrap();
        assert!(approx_eq(price, dec!(5.64), dec!(0.005)));
    }

    #[test]
    fn test_pay_now_grows_first_dividend() {
        let price = pv_constant_growth(
            dec!(0.22),
            dec!(0.004),
            dec!(0.16),
            true,
            PaymentFrequency::Quarter,
        )
        .unwrap();
        assert!(approx_eq(price, dec!(5.646667), dec!(0.00001)));
    }

    #[test]
    fn test_annual_gordon_growth() {
        // 2 x 1.05 / (0.10 - 0.05) = 42
        let price =
            pv_constant_growth(dec!(2), dec!(0.05), dec!(0.10), true, PaymentFrequency::Annual)
                .unwrap();
        assert_eq!(price, dec!(42));
    }

    #[test]
    fn test_semi_annual_rates_halved() {
        let out = value_constant_growth(&ConstantGrowthInput {
            dividend: dec!(1),
            annual_growth_rate: dec!(0.04),
            annual_discount_rate: dec!(0.12),
            pay_now: false,
            payment_frequency: PaymentFrequency::SemiAnnual,
        })
        .unwrap();
        assert_eq!(out.result.period_growth_rate, dec!(0.02));
        assert_eq!(out.result.period_discount_rate, dec!(0.06));
        assert_eq!(out.result.price, dec!(25));
    }

    #[test]
    fn test_equal_rates_division_by_zero() {
        let err = pv_constant_growth(dec!(1), dec!(0.08), dec!(0.08), false, PaymentFrequency::Annual)
            .unwrap_err();
        assert!(matches!(err, FinCalcError::DivisionByZero { .. }));
    }

    #[test]
    fn test_out_of_range_inputs_are_errors() {
        let grown = pv_constant_growth(
            Decimal::MAX,
            dec!(0.4),
            dec!(0.5),
            true,
            PaymentFrequency::Annual,
        );
        assert!(matches!(grown, Err(FinCalcError::DivisionByZero { .. })));
        let spread = pv_constant_growth(
            dec!(1),
            Decimal::MAX,
            Decimal::MIN,
            false,
            PaymentFrequency::Annual,
        );
        assert!(matches!(spread, Err(FinCalcError::DivisionByZero { .. })));
    }

    #[test]
    fn test_monthly_frequency_rejected_at_parse() {
        let err = "monthly".parse::<PaymentFrequency>().unwrap_err();
        assert!(matches!(err, FinCalcError::InvalidInput { .. }));
    }

    #[test]
    fn test_monthly_frequency_rejected_in_input() {
        let json = r#"{
            "dividend": "0.22",
            "annual_growth_rate": "0.004",
            "annual_discount_rate": "0.16",
            "payment_frequency": "monthly"
        }"#;
        assert!(serde_json::from_str::<ConstantGrowthInput>(json).is_err());
    }

    #[test]
    fn test_pay_now_defaults_false() {
        let json = r#"{
            "dividend": "0.22",
            "annual_growth_rate": "0.004",
            "annual_discount_rate": "0.16",
            "payment_frequency": "quarter"
        }"#;
        let input: ConstantGrowthInput = serde_json::from_str(json).unwrap();
        assert!(!input.pay_now);
    }

    #[test]
    fn test_growth_above_discount_warns() {
        let input = ConstantGrowthInput {
            annual_growth_rate: dec!(0.20),
            ..quarterly_input()
        };
        let out = value_constant_growth(&input).unwrap();
        assert!(out.result.price < Decimal::ZERO);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_dividend_yield() {
        let out = value_constant_growth(&quarterly_input()).unwrap();
        // D / P = d - g per quarter
        assert!(approx_eq(out.result.dividend_yield, dec!(0.039), dec!(0.0000001)));
        assert_eq!(out.result.periods_per_year, 4);
    }
}
