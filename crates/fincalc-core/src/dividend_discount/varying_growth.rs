//! Multi-stage dividend discount model driven by a per-period growth schedule.
//!
//! Dividends are grown period by period from the last paid dividend. Periods
//! before `perpetuity_start_period` are discounted individually. From that
//! period on, the grown dividend is capitalised as a Gordon perpetuity at
//! that period's growth rate and discounted back one period less.
//!
//! Every schedule entry at or past the start period re-evaluates the
//! perpetuity, and the last one replaces the earlier ones. A schedule longer
//! than `perpetuity_start_period` therefore values the perpetuity from its
//! final entry while the intermediate periods contribute nothing. Size the
//! schedule to exactly `perpetuity_start_period` entries.
//!
//! All arithmetic uses `rust_decimal::Decimal`. No `f64`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinCalcError;
use crate::time_value::{out_of_range, present_value};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::FinCalcResult;

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

/// Input for the varying-growth DDM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaryingGrowthInput {
    /// Most recently paid dividend (D₀).
    pub last_dividend: Money,
    /// Required rate of return per period.
    pub discount_rate: Rate,
    /// Growth rate for periods 1, 2, ... in order.
    pub growth_rates: Vec<Rate>,
    /// First period valued as a perpetuity (1-indexed).
    pub perpetuity_start_period: u32,
}

/// Period-by-period dividend detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodDetail {
    /// Period number (1-indexed).
    pub period: u32,
    pub growth_rate: Rate,
    /// Projected dividend for this period.
    pub dividend: Money,
    /// Present value of the dividend, or of the perpetuity for terminal periods.
    pub pv: Money,
    /// Whether this period was valued as a perpetuity.
    pub is_terminal: bool,
}

/// Output of the varying-growth DDM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaryingGrowthOutput {
    /// Intrinsic value per share.
    pub intrinsic_value: Money,
    /// Present value of the individually discounted dividends.
    pub pv_explicit_dividends: Money,
    /// Present value of the perpetuity (zero if never reached).
    pub terminal_value: Money,
    /// Terminal value as a percentage of intrinsic value.
    pub terminal_pct: Decimal,
    pub periods: Vec<PeriodDetail>,
}

struct Projection {
    pv_explicit: Money,
    terminal: Money,
    periods: Vec<PeriodDetail>,
}

impl Projection {
    fn intrinsic_value(&self) -> FinCalcResult<Money> {
        self.pv_explicit
            .checked_add(self.terminal)
            .ok_or_else(|| out_of_range("intrinsic value"))
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Present value of a stock whose dividend grows at `growth_rates[t-1]` in
/// period `t`, switching to a perpetuity at `perpetuity_start_period`.
pub fn pv_varying_growth(
    last_dividend: Money,
    discount_rate: Rate,
    growth_rates: &[Rate],
    perpetuity_start_period: u32,
) -> FinCalcResult<Money> {
    validate(growth_rates, perpetuity_start_period)?;
    let projection = project(
        last_dividend,
        discount_rate,
        growth_rates,
        perpetuity_start_period,
    )?;
    projection.intrinsic_value()
}

/// Value a stock under a growth schedule with period-by-period detail.
pub fn value_varying_growth(
    input: &VaryingGrowthInput,
) -> FinCalcResult<ComputationOutput<VaryingGrowthOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate(&input.growth_rates, input.perpetuity_start_period)?;
    let projection = project(
        input.last_dividend,
        input.discount_rate,
        &input.growth_rates,
        input.perpetuity_start_period,
    )?;

    let periods = input.growth_rates.len();
    let start_period = input.perpetuity_start_period as usize;
    if periods < start_period {
        warnings.push(format!(
            "Growth schedule ends before period {start_period}; no perpetuity value included"
        ));
    } else if periods > start_period {
        warnings.push(format!(
            "Growth schedule has {periods} entries but the perpetuity starts at period {start_period}; \
             the perpetuity is valued from the last entry"
        ));
    }

    let intrinsic_value = projection.intrinsic_value()?;
    let terminal_pct = if intrinsic_value.is_zero() {
        Decimal::ZERO
    } else {
        projection
            .terminal
            .checked_div(intrinsic_value)
            .and_then(|share| share.checked_mul(dec!(100)))
            .ok_or_else(|| out_of_range("terminal share of value"))?
    };

    let output = VaryingGrowthOutput {
        intrinsic_value,
        pv_explicit_dividends: projection.pv_explicit,
        terminal_value: projection.terminal,
        terminal_pct,
        periods: projection.periods,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Multi-stage DDM — explicit dividends then Gordon perpetuity",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Core
// ---------------------------------------------------------------------------

fn project(
    last_dividend: Money,
    discount_rate: Rate,
    growth_rates: &[Rate],
    perpetuity_start_period: u32,
) -> FinCalcResult<Projection> {
    let mut dividend = last_dividend;
    let mut pv_explicit = Decimal::ZERO;
    let mut terminal = Decimal::ZERO;
    let mut periods = Vec::with_capacity(growth_rates.len());

    for (idx, &g) in growth_rates.iter().enumerate() {
        let t = (idx + 1) as u32;
        dividend = Decimal::ONE
            .checked_add(g)
            .and_then(|growth| dividend.checked_mul(growth))
            .ok_or_else(|| out_of_range(format!("dividend at period {t}")))?;

        let is_terminal = t >= perpetuity_start_period;
        let pv = if is_terminal {
            // Perpetuity at t is worth D_t / (r - g_t) one period earlier
            let spread = discount_rate
                .checked_sub(g)
                .ok_or_else(|| out_of_range(format!("discount-growth spread at period {t}")))?;
            let perpetuity = dividend.checked_div(spread).ok_or_else(|| {
                FinCalcError::DivisionByZero {
                    context: format!("perpetuity at period {t} (discount rate equals growth rate)"),
                }
            })?;
            let pv = present_value(perpetuity, discount_rate, t - 1)?;
            terminal = pv;
            pv
        } else {
            let pv = present_value(dividend, discount_rate, t)?;
            pv_explicit = pv_explicit
                .checked_add(pv)
                .ok_or_else(|| out_of_range(format!("explicit dividends at period {t}")))?;
            pv
        };

        periods.push(PeriodDetail {
            period: t,
            growth_rate: g,
            dividend,
            pv,
            is_terminal,
        });
    }

    Ok(Projection {
        pv_explicit,
        terminal,
        periods,
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(growth_rates: &[Rate], perpetuity_start_period: u32) -> FinCalcResult<()> {
    if perpetuity_start_period == 0 {
        return Err(FinCalcError::InvalidInput {
            field: "perpetuity_start_period".into(),
            reason: "Perpetuity start period is 1-indexed and must be at least 1".into(),
        });
    }
    if growth_rates.len() + 1 < perpetuity_start_period as usize {
        return Err(FinCalcError::InsufficientData(format!(
            "Growth schedule needs at least {} entries for a perpetuity starting at period {}",
            perpetuity_start_period - 1,
            perpetuity_start_period
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
