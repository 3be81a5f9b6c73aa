use fincalc_core::fixed_income::bonds::bond_value;
use fincalc_core::fixed_income::realized_yield::calculate_realized_yield;
use fincalc_core::fixed_income::yields::{calculate_ytm, DEFAULT_YTM_GUESS};
use fincalc_core::{FinCalcError, PaymentFrequency};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Bond pricing, yield to maturity and realized yield through the public API.
// ===========================================================================

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

#[test]
fn test_discount_bond_reference_price() {
    let price = bond_value(
        dec!(1000),
        dec!(0.12),
        15,
        dec!(0.16),
        PaymentFrequency::SemiAnnual,
    )
    .unwrap();
    assert!(
        (price - dec!(774.844)).abs() < dec!(0.001),
        "Expected ~774.844, got {}",
        price
    );
}

#[test]
fn test_matured_bond_is_face_value() {
    for freq in [PaymentFrequency::Annual, PaymentFrequency::SemiAnnual] {
        let price = bond_value(dec!(1000), dec!(0.09), 0, dec!(0.03), freq).unwrap();
        assert_eq!(price, dec!(1000));
    }
}

#[test]
fn test_price_falls_as_yield_rises() {
    let yields = [dec!(0.00), dec!(0.02), dec!(0.05), dec!(0.10), dec!(0.25)];
    let prices: Vec<Decimal> = yields
        .iter()
        .map(|&y| bond_value(dec!(100), dec!(0.04), 20, y, PaymentFrequency::Annual).unwrap())
        .collect();
    for pair in prices.windows(2) {
        assert!(pair[1] <= pair[0], "Price rose: {} -> {}", pair[0], pair[1]);
    }
}

#[test]
fn test_quarterly_bond_rejected() {
    let err = bond_value(dec!(1000), dec!(0.05), 3, dec!(0.05), PaymentFrequency::Quarter)
        .unwrap_err();
    assert!(matches!(err, FinCalcError::InvalidInput { .. }));
}

#[test]
fn test_extreme_inputs_return_errors() {
    let deep_negative = bond_value(
        dec!(1000),
        dec!(0.12),
        45,
        dec!(-1),
        PaymentFrequency::SemiAnnual,
    );
    assert!(deep_negative.is_err(), "Expected error, got {:?}", deep_negative);

    let long_dated = bond_value(
        dec!(1000),
        dec!(0.05),
        3_000_000_000,
        dec!(0.05),
        PaymentFrequency::SemiAnnual,
    );
    assert!(
        matches!(long_dated, Err(FinCalcError::InvalidInput { .. })),
        "Expected invalid input, got {:?}",
        long_dated
    );
}

// ---------------------------------------------------------------------------
// Yield to maturity
// ---------------------------------------------------------------------------

#[test]
fn test_reference_yield_to_maturity() {
    let ytm = calculate_ytm(
        dec!(774.85),
        dec!(1000),
        dec!(0.12),
        15,
        PaymentFrequency::SemiAnnual,
        DEFAULT_YTM_GUESS,
    )
    .unwrap();
    assert!(
        (ytm - dec!(0.159999)).abs() < dec!(0.00001),
        "Expected ~16%, got {}",
        ytm
    );
}

#[test]
fn test_price_then_yield_round_trip() {
    for y0 in [dec!(0.01), dec!(0.045), dec!(0.09), dec!(0.14)] {
        let price = bond_value(dec!(1000), dec!(0.06), 12, y0, PaymentFrequency::SemiAnnual)
            .unwrap();
        let ytm = calculate_ytm(
            price,
            dec!(1000),
            dec!(0.06),
            12,
            PaymentFrequency::SemiAnnual,
            DEFAULT_YTM_GUESS,
        )
        .unwrap();
        assert!(
            (ytm - y0).abs() < dec!(0.000001),
            "Expected {}, got {}",
            y0,
            ytm
        );
    }
}

// ---------------------------------------------------------------------------
// Realized yield
// ---------------------------------------------------------------------------

#[test]
fn test_realized_yield_unchanged_rates() {
    let realized = calculate_realized_yield(
        dec!(1000),
        dec!(0.06),
        dec!(0.05),
        10,
        4,
        dec!(0.05),
        PaymentFrequency::Annual,
    )
    .unwrap();
    assert!((realized - dec!(0.05)).abs() < dec!(0.000001));
}

#[test]
fn test_realized_yield_moves_against_sale_yield() {
    let at = |future: Decimal| {
        calculate_realized_yield(
            dec!(1000),
            dec!(0.05),
            dec!(0.05),
            10,
            2,
            future,
            PaymentFrequency::SemiAnnual,
        )
        .unwrap()
    };
    assert!(at(dec!(0.03)) > at(dec!(0.05)));
    assert!(at(dec!(0.07)) < at(dec!(0.05)));
}

#[test]
fn test_realized_yield_holding_past_maturity_rejected() {
    let err = calculate_realized_yield(
        dec!(1000),
        dec!(0.05),
        dec!(0.05),
        3,
        4,
        dec!(0.05),
        PaymentFrequency::Annual,
    )
    .unwrap_err();
    assert!(matches!(err, FinCalcError::InvalidInput { .. }));
}
