use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use fincalc_core::dividend_discount::constant_growth::{self, ConstantGrowthInput};
use fincalc_core::dividend_discount::varying_growth::{self, VaryingGrowthInput};
use fincalc_core::PaymentFrequency;

use super::{load_input, CommandResult};

/// Arguments for the constant-growth dividend discount model
#[derive(Args)]
pub struct ConstantGrowthArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Dividend per payment period
    #[arg(long)]
    pub dividend: Option<Decimal>,

    /// Annual dividend growth rate
    #[arg(long, allow_hyphen_values = true)]
    pub growth_rate: Option<Decimal>,

    /// Annual required return
    #[arg(long)]
    pub discount_rate: Option<Decimal>,

    /// Dividend has just been paid; grow it one period before valuing
    #[arg(long)]
    pub pay_now: bool,

    /// Payment frequency: annual, semi-annual, quarter
    #[arg(long, default_value = "annual")]
    pub frequency: PaymentFrequency,
}

pub fn run_constant_growth(args: ConstantGrowthArgs) -> CommandResult<Value> {
    let ddm_input: ConstantGrowthInput = load_input(
        args.input.as_deref(),
        || {
            Some(ConstantGrowthInput {
                dividend: args.dividend?,
                annual_growth_rate: args.growth_rate?,
                annual_discount_rate: args.discount_rate?,
                pay_now: args.pay_now,
                payment_frequency: args.frequency,
            })
        },
        "ddm-constant",
    )?;
    let result = constant_growth::value_constant_growth(&ddm_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for the varying-growth dividend discount model
#[derive(Args)]
pub struct VaryingGrowthArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Most recently paid dividend
    #[arg(long)]
    pub last_dividend: Option<Decimal>,

    /// Required return per period
    #[arg(long)]
    pub discount_rate: Option<Decimal>,

    /// Comma-separated growth rates for periods 1, 2, ... (e.g. "0.2,0.15,0.05")
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub growth_rates: Option<Vec<Decimal>>,

    /// First period valued as a perpetuity (1-indexed)
    #[arg(long)]
    pub perpetuity_start: Option<u32>,
}

pub fn run_varying_growth(args: VaryingGrowthArgs) -> CommandResult<Value> {
    let ddm_input: VaryingGrowthInput = load_input(
        args.input.as_deref(),
        || {
            Some(VaryingGrowthInput {
                last_dividend: args.last_dividend?,
                discount_rate: args.discount_rate?,
                growth_rates: args.growth_rates.clone()?,
                perpetuity_start_period: args.perpetuity_start?,
            })
        },
        "ddm-varying",
    )?;
    let result = varying_growth::value_varying_growth(&ddm_input)?;
    Ok(serde_json::to_value(result)?)
}
