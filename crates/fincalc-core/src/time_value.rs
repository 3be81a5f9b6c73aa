use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::FinCalcError;
use crate::types::{Money, Rate};
use crate::FinCalcResult;

/// Error for a calculation whose result falls outside the `Decimal` range.
pub(crate) fn out_of_range(context: impl std::fmt::Display) -> FinCalcError {
    FinCalcError::DivisionByZero {
        context: format!("{context} (result out of range)"),
    }
}

/// Present value of a single amount received `periods` periods from now.
pub fn present_value(amount: Money, rate: Rate, periods: u32) -> FinCalcResult<Money> {
    let one_plus_r = Decimal::ONE
        .checked_add(rate)
        .ok_or_else(|| out_of_range(format!("discount rate {rate}")))?;
    let growth = one_plus_r
        .checked_powi(i64::from(periods))
        .ok_or_else(|| out_of_range(format!("discount factor at period {periods}")))?;

    amount
        .checked_div(growth)
        .ok_or_else(|| FinCalcError::DivisionByZero {
            context: format!("present value at period {periods} (rate {rate})"),
        })
}

/// Present value of a level payment received at the end of periods `1..=periods`,
/// plus a terminal amount received with the last payment.
///
/// This is the price of a plain coupon bond when `terminal` is the face value.
/// A sum that leaves the `Decimal` range is an error, never a panic.
pub fn pv_level_cash_flows(
    payment: Money,
    rate: Rate,
    periods: u32,
    terminal: Money,
) -> FinCalcResult<Money> {
    let one_plus_r = Decimal::ONE
        .checked_add(rate)
        .ok_or_else(|| out_of_range(format!("discount rate {rate}")))?;
    let mut discount = Decimal::ONE;
    let mut result = Decimal::ZERO;

    for t in 1..=periods {
        discount = discount
            .checked_mul(one_plus_r)
            .ok_or_else(|| out_of_range(format!("discount factor at period {t}")))?;
        let pv = payment
            .checked_div(discount)
            .ok_or_else(|| FinCalcError::DivisionByZero {
                context: format!("discount factor at period {t} (rate {rate})"),
            })?;
        result = result
            .checked_add(pv)
            .ok_or_else(|| out_of_range(format!("cash flow sum at period {t}")))?;
    }

    // Zero periods: the terminal amount is already at present value.
    let terminal_pv = terminal
        .checked_div(discount)
        .ok_or_else(|| FinCalcError::DivisionByZero {
            context: format!("terminal discount factor (rate {rate})"),
        })?;
    result
        .checked_add(terminal_pv)
        .ok_or_else(|| out_of_range("cash flow sum with terminal amount"))
}

/// Effective annual rate for a periodic rate compounded `periods_per_year` times.
pub fn effective_annual_rate(periodic_rate: Rate, periods_per_year: u32) -> FinCalcResult<Rate> {
    Decimal::ONE
        .checked_add(periodic_rate)
        .and_then(|base| base.checked_powi(i64::from(periods_per_year)))
        .and_then(|compounded| compounded.checked_sub(Decimal::ONE))
        .ok_or_else(|| out_of_range("effective annual rate"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_present_value_basic() {
        let result = present_value(dec!(121), dec!(0.10), 2).unwrap();
        assert!((result - dec!(100)).abs() < dec!(0.0000001));
    }

    #[test]
    fn test_present_value_zero_periods() {
        assert_eq!(present_value(dec!(50), dec!(0.08), 0).unwrap(), dec!(50));
    }

    #[test]
    fn test_present_value_minus_one_rate() {
        let err = present_value(dec!(100), dec!(-1), 3).unwrap_err();
        assert!(matches!(err, FinCalcError::DivisionByZero { .. }));
    }

    #[test]
    fn test_level_cash_flows_par_bond() {
        // 5% annual coupon discounted at 5% prices at par
        let result = pv_level_cash_flows(dec!(50), dec!(0.05), 10, dec!(1000)).unwrap();
        assert!((result - dec!(1000)).abs() < dec!(0.000001));
    }

    #[test]
    fn test_level_cash_flows_zero_periods() {
        let result = pv_level_cash_flows(dec!(50), dec!(0.05), 0, dec!(1000)).unwrap();
        assert_eq!(result, dec!(1000));
    }

    #[test]
    fn test_level_cash_flows_zero_rate() {
        let result = pv_level_cash_flows(dec!(10), Decimal::ZERO, 4, dec!(100)).unwrap();
        assert_eq!(result, dec!(140));
    }

    #[test]
    fn test_level_cash_flows_minus_one_rate() {
        assert!(pv_level_cash_flows(dec!(10), dec!(-1), 4, dec!(100)).is_err());
    }

    #[test]
    fn test_level_cash_flows_sum_overflow_is_error() {
        // Each term doubles at -50% per period until the sum leaves the range
        let err = pv_level_cash_flows(dec!(60), dec!(-0.5), 90, dec!(1000)).unwrap_err();
        assert!(matches!(err, FinCalcError::DivisionByZero { .. }));
    }

    #[test]
    fn test_level_cash_flows_rate_overflow_is_error() {
        assert!(pv_level_cash_flows(dec!(10), Decimal::MAX, 2, dec!(100)).is_err());
        assert!(present_value(dec!(10), Decimal::MAX, 2).is_err());
    }

    #[test]
    fn test_effective_annual_rate_semi_annual() {
        // 4% per half year => 8.16% effective
        let ear = effective_annual_rate(dec!(0.04), 2).unwrap();
        assert_eq!(ear, dec!(0.0816));
    }
}
