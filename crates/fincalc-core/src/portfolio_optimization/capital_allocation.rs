//! Capital allocation line: blend a risky portfolio with the risk-free asset
//! to hit a target return.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinCalcError;
use crate::time_value::out_of_range;
use crate::types::{with_metadata, ComputationOutput, Rate, Weight};
use crate::FinCalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Weights of a risk-free / risky-portfolio blend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapitalAllocation {
    /// Fraction of capital in the risk-free asset (negative = borrowing).
    pub risk_free_weight: Weight,
    /// Fraction of capital in the risky portfolio.
    pub portfolio_weight: Weight,
    /// Each risky asset's weight scaled by `portfolio_weight`.
    pub asset_weights: Vec<Weight>,
}

/// Input for capital allocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapitalAllocationInput {
    /// Return the blend must earn.
    pub target_return: Rate,
    pub risk_free_rate: Rate,
    /// Expected return of the risky portfolio.
    pub portfolio_return: Rate,
    /// Weights of the assets inside the risky portfolio.
    pub asset_weights: Vec<Weight>,
    /// Standard deviation of the risky portfolio, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portfolio_std_dev: Option<Decimal>,
}

/// Output of capital allocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapitalAllocationOutput {
    pub risk_free_weight: Weight,
    pub portfolio_weight: Weight,
    pub asset_weights: Vec<Weight>,
    /// rf * w_rf + portfolio return * w_p.
    pub blended_return: Rate,
    /// portfolio std dev * |w_p|, when the std dev was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blended_std_dev: Option<Decimal>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Split capital between the risk-free asset and a risky portfolio so the
/// blend earns `target_return`.
pub fn capital_allocation_blend(
    target_return: Rate,
    risk_free_rate: Rate,
    portfolio_return: Rate,
    asset_weights: &[Weight],
) -> FinCalcResult<CapitalAllocation> {
    let excess_target = target_return
        .checked_sub(portfolio_return)
        .ok_or_else(|| out_of_range("capital allocation target spread"))?;
    let excess_risk_free = risk_free_rate
        .checked_sub(portfolio_return)
        .ok_or_else(|| out_of_range("capital allocation risk-free spread"))?;
    let risk_free_weight = excess_target
        .checked_div(excess_risk_free)
        .ok_or_else(|| FinCalcError::DivisionByZero {
            context: "capital allocation (portfolio return equals risk-free rate)".into(),
        })?;
    let portfolio_weight = Decimal::ONE
        .checked_sub(risk_free_weight)
        .ok_or_else(|| out_of_range("portfolio weight"))?;

    let asset_weights = asset_weights
        .iter()
        .map(|w| {
            w.checked_mul(portfolio_weight)
                .ok_or_else(|| out_of_range("blended asset weight"))
        })
        .collect::<FinCalcResult<Vec<Weight>>>()?;

    Ok(CapitalAllocation {
        risk_free_weight,
        portfolio_weight,
        asset_weights,
    })
}

/// Blend the risky portfolio with the risk-free asset and report the
/// resulting return and risk.
pub fn allocate_capital(
    input: &CapitalAllocationInput,
) -> FinCalcResult<ComputationOutput<CapitalAllocationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if let Some(sd) = input.portfolio_std_dev {
        if sd < Decimal::ZERO {
            return Err(FinCalcError::InvalidInput {
                field: "portfolio_std_dev".into(),
                reason: "Standard deviation cannot be negative".into(),
            });
        }
    }

    let allocation = capital_allocation_blend(
        input.target_return,
        input.risk_free_rate,
        input.portfolio_return,
        &input.asset_weights,
    )?;

    let weight_sum = input
        .asset_weights
        .iter()
        .try_fold(Decimal::ZERO, |acc, w| acc.checked_add(*w))
        .ok_or_else(|| out_of_range("asset weight sum"))?;
    if !input.asset_weights.is_empty() && weight_sum != Decimal::ONE {
        warnings.push(format!(
            "Risky asset weights sum to {weight_sum}, not 1; blended weights keep that total"
        ));
    }
    if allocation.risk_free_weight < Decimal::ZERO {
        warnings.push(format!(
            "Target requires borrowing at the risk-free rate (risk-free weight {})",
            allocation.risk_free_weight
        ));
    }

    let blended_return = input
        .risk_free_rate
        .checked_mul(allocation.risk_free_weight)
        .zip(input.portfolio_return.checked_mul(allocation.portfolio_weight))
        .and_then(|(safe, risky)| safe.checked_add(risky))
        .ok_or_else(|| out_of_range("blended return"))?;
    let blended_std_dev = input
        .portfolio_std_dev
        .map(|sd| {
            sd.checked_mul(allocation.portfolio_weight.abs())
                .ok_or_else(|| out_of_range("blended standard deviation"))
        })
        .transpose()?;

    let output = CapitalAllocationOutput {
        risk_free_weight: allocation.risk_free_weight,
        portfolio_weight: allocation.portfolio_weight,
        asset_weights: allocation.asset_weights,
        blended_return,
        blended_std_dev,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Capital allocation line — risk-free / risky portfolio blend",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
