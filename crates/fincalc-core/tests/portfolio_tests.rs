use fincalc_core::portfolio_optimization::capital_allocation::capital_allocation_blend;
use fincalc_core::portfolio_optimization::two_asset::{
    optimal_two_asset_weights, portfolio_return, portfolio_std_dev, sharpe_ratio,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Two-asset optimisation and capital allocation tests
// ===========================================================================

#[test]
fn test_reference_tangency_weights() {
    let (w1, w2) = optimal_two_asset_weights(
        dec!(0.043381),
        dec!(0.096887),
        dec!(0.036666),
        dec!(0.151002),
        dec!(0.04155),
        dec!(0.02),
    )
    .unwrap();
    assert!((w1 - dec!(0.8403)).abs() < dec!(0.0001), "w1 = {}", w1);
    assert!((w2 - dec!(0.1597)).abs() < dec!(0.0001), "w2 = {}", w2);
    assert_eq!(w1 + w2, Decimal::ONE);
}

#[test]
fn test_weights_always_sum_to_one() {
    let cases = [
        (dec!(0.10), dec!(0.06), dec!(0.25), dec!(0.12), dec!(-0.4), dec!(0.01)),
        (dec!(0.07), dec!(0.15), dec!(0.10), dec!(0.30), dec!(0.9), dec!(0.03)),
        (dec!(0.05), dec!(0.05), dec!(0.08), dec!(0.20), Decimal::ZERO, dec!(0.00)),
    ];
    for (r1, r2, s1, s2, rho, rf) in cases {
        let (w1, w2) = optimal_two_asset_weights(r1, r2, s1, s2, rho, rf).unwrap();
        assert_eq!(w1 + w2, Decimal::ONE);
    }
}

#[test]
fn test_complete_portfolio_has_tangency_sharpe() {
    let (r1, r2, s1, s2, rho, rf) = (
        dec!(0.043381),
        dec!(0.096887),
        dec!(0.036666),
        dec!(0.151002),
        dec!(0.04155),
        dec!(0.02),
    );
    let (w1, w2) = optimal_two_asset_weights(r1, r2, s1, s2, rho, rf).unwrap();
    let rp = portfolio_return(w1, r1, r2).unwrap();
    let sd = portfolio_std_dev(w1, s1, s2, rho).unwrap();

    let blend = capital_allocation_blend(dec!(0.04), rf, rp, &[w1, w2]).unwrap();
    let blended_return = rf * blend.risk_free_weight + rp * blend.portfolio_weight;
    let blended_sd = sd * blend.portfolio_weight;

    assert!((blended_return - dec!(0.04)).abs() < dec!(0.0000001));
    // Every point on the capital allocation line shares the tangency Sharpe ratio
    let tangency = sharpe_ratio(rp, rf, sd).unwrap();
    let blended = sharpe_ratio(blended_return, rf, blended_sd).unwrap();
    assert!((tangency - blended).abs() < dec!(0.000001));
}
