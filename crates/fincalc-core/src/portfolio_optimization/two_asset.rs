use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinCalcError;
use crate::time_value::out_of_range;
use crate::types::{with_metadata, ComputationOutput, Rate, Weight};
use crate::FinCalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input to the two-asset maximum-Sharpe allocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwoAssetInput {
    /// Expected return of asset 1.
    pub r1: Rate,
    /// Expected return of asset 2.
    pub r2: Rate,
    /// Standard deviation of asset 1.
    pub sigma1: Decimal,
    /// Standard deviation of asset 2.
    pub sigma2: Decimal,
    /// Correlation between the two assets.
    pub rho: Decimal,
    /// Risk-free rate.
    pub risk_free_rate: Rate,
}

/// Output of the two-asset allocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwoAssetOutput {
    pub w1: Weight,
    pub w2: Weight,
    /// w1 * r1 + w2 * r2.
    pub expected_return: Rate,
    /// Two-asset portfolio standard deviation.
    pub std_dev: Decimal,
    /// (return - rf) / std dev.
    pub sharpe_ratio: Decimal,
    /// sigma1 * sigma2 * rho.
    pub covariance: Decimal,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Weights of the maximum-Sharpe (tangency) portfolio of two risky assets.
///
/// Weights are unbounded: a negative weight is a short position and a weight
/// above one is leverage. `w1 + w2 == 1` exactly.
pub fn optimal_two_asset_weights(
    r1: Rate,
    r2: Rate,
    sigma1: Decimal,
    sigma2: Decimal,
    rho: Decimal,
    risk_free_rate: Rate,
) -> FinCalcResult<(Weight, Weight)> {
    let (numerator, denominator) = tangency_terms(r1, r2, sigma1, sigma2, rho, risk_free_rate)
        .ok_or_else(|| out_of_range("two-asset tangency terms"))?;

    let w1 = numerator
        .checked_div(denominator)
        .ok_or_else(|| FinCalcError::DivisionByZero {
            context: "two-asset tangency weight (denominator terms cancel)".into(),
        })?;

    let w2 = Decimal::ONE
        .checked_sub(w1)
        .ok_or_else(|| out_of_range("two-asset tangency weight"))?;
    Ok((w1, w2))
}

/// Expected return of a two-asset portfolio.
pub fn portfolio_return(w1: Weight, r1: Rate, r2: Rate) -> FinCalcResult<Rate> {
    let w2 = Decimal::ONE.checked_sub(w1);
    w1.checked_mul(r1)
        .zip(w2.and_then(|w2| w2.checked_mul(r2)))
        .and_then(|(a, b)| a.checked_add(b))
        .ok_or_else(|| out_of_range("portfolio return"))
}

/// Standard deviation of a two-asset portfolio.
pub fn portfolio_std_dev(
    w1: Weight,
    sigma1: Decimal,
    sigma2: Decimal,
    rho: Decimal,
) -> FinCalcResult<Decimal> {
    let variance = portfolio_variance(w1, sigma1, sigma2, rho)
        .ok_or_else(|| out_of_range("portfolio variance"))?;

    if variance < Decimal::ZERO {
        return Err(FinCalcError::InvalidInput {
            field: "rho".into(),
            reason: "Negative portfolio variance; correlation must lie in [-1, 1]".into(),
        });
    }
    variance.sqrt().ok_or_else(|| FinCalcError::InvalidInput {
        field: "rho".into(),
        reason: "Portfolio variance has no square root".into(),
    })
}

/// Sharpe ratio; zero when the portfolio is riskless.
pub fn sharpe_ratio(ret: Rate, risk_free_rate: Rate, std_dev: Decimal) -> FinCalcResult<Decimal> {
    if std_dev.is_zero() {
        return Ok(Decimal::ZERO);
    }
    ret.checked_sub(risk_free_rate)
        .and_then(|excess| excess.checked_div(std_dev))
        .ok_or_else(|| out_of_range("Sharpe ratio"))
}

/// Solve the tangency portfolio and report its return, risk and Sharpe ratio.
pub fn optimize_two_asset(input: &TwoAssetInput) -> FinCalcResult<ComputationOutput<TwoAssetOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let (w1, w2) = optimal_two_asset_weights(
        input.r1,
        input.r2,
        input.sigma1,
        input.sigma2,
        input.rho,
        input.risk_free_rate,
    )?;

    let expected_return = portfolio_return(w1, input.r1, input.r2)?;
    let std_dev = portfolio_std_dev(w1, input.sigma1, input.sigma2, input.rho)?;
    let sharpe = sharpe_ratio(expected_return, input.risk_free_rate, std_dev)?;
    let covariance = input
        .sigma1
        .checked_mul(input.sigma2)
        .and_then(|s| s.checked_mul(input.rho))
        .ok_or_else(|| out_of_range("covariance"))?;

    for (name, w) in [("asset 1", w1), ("asset 2", w2)] {
        if w < Decimal::ZERO {
            warnings.push(format!("Short position in {name} (weight {w})"));
        } else if w > Decimal::ONE {
            warnings.push(format!("Leveraged position in {name} (weight {w})"));
        }
    }
    if std_dev.is_zero() {
        warnings.push("Portfolio is riskless; Sharpe ratio set to zero".into());
    }

    let output = TwoAssetOutput {
        w1,
        w2,
        expected_return,
        std_dev,
        sharpe_ratio: sharpe,
        covariance,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Two-asset tangency portfolio (closed-form maximum Sharpe ratio)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Numerator and denominator of the closed-form asset 1 tangency weight.
fn tangency_terms(
    r1: Rate,
    r2: Rate,
    sigma1: Decimal,
    sigma2: Decimal,
    rho: Decimal,
    risk_free_rate: Rate,
) -> Option<(Decimal, Decimal)> {
    let rp1 = r1.checked_sub(risk_free_rate)?;
    let rp2 = r2.checked_sub(risk_free_rate)?;
    let cov = sigma1.checked_mul(sigma2)?.checked_mul(rho)?;
    let var1 = sigma1.checked_mul(sigma1)?;
    let var2 = sigma2.checked_mul(sigma2)?;

    let numerator = var2.checked_mul(rp1)?.checked_sub(cov.checked_mul(rp2)?)?;
    let denominator = var1
        .checked_mul(rp2)?
        .checked_add(var2.checked_mul(rp1)?)?
        .checked_sub(cov.checked_mul(rp1.checked_add(rp2)?)?)?;
    Some((numerator, denominator))
}

fn portfolio_variance(w1: Weight, sigma1: Decimal, sigma2: Decimal, rho: Decimal) -> Option<Decimal> {
    let w2 = Decimal::ONE.checked_sub(w1)?;
    let a = w1.checked_mul(sigma1)?;
    let b = w2.checked_mul(sigma2)?;
    let cross = dec!(2).checked_mul(a)?.checked_mul(b)?.checked_mul(rho)?;
    a.checked_mul(a)?
        .checked_add(b.checked_mul(b)?)?
        .checked_add(cross)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &TwoAssetInput) -> FinCalcResult<()> {
    if input.sigma1 < Decimal::ZERO {
        return Err(FinCalcError::InvalidInput {
            field: "sigma1".into(),
            reason: "Standard deviation cannot be negative".into(),
        });
    }
    if input.sigma2 < Decimal::ZERO {
        return Err(FinCalcError::InvalidInput {
            field: "sigma2".into(),
            reason: "Standard deviation cannot be negative".into(),
        });
    }
    if input.rho < dec!(-1) || input.rho > Decimal::ONE {
        return Err(FinCalcError::InvalidInput {
            field: "rho".into(),
            reason: "Correlation must lie in [-1, 1]".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
