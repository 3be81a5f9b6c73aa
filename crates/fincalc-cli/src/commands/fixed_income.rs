use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use fincalc_core::fixed_income::bonds::{self, BondValueInput};
use fincalc_core::fixed_income::realized_yield::{self, RealizedYieldInput};
use fincalc_core::fixed_income::yields::{self, YtmInput};
use fincalc_core::solver::SolverConfig;
use fincalc_core::PaymentFrequency;

use super::{load_input, CommandResult};

/// Arguments for bond pricing
#[derive(Args)]
pub struct BondValueArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Face (par) value
    #[arg(long, default_value = "1000")]
    pub face_value: Decimal,

    /// Annual coupon rate (e.g. 0.05 for 5%)
    #[arg(long)]
    pub coupon_rate: Option<Decimal>,

    /// Whole years to maturity
    #[arg(long)]
    pub years: Option<u32>,

    /// Annual yield to maturity
    #[arg(long, allow_hyphen_values = true)]
    pub ytm: Option<Decimal>,

    /// Coupon frequency: annual, semi-annual
    #[arg(long, default_value = "semi-annual")]
    pub frequency: PaymentFrequency,
}

pub fn run_bond_value(args: BondValueArgs) -> CommandResult<Value> {
    let pricing_input: BondValueInput = load_input(
        args.input.as_deref(),
        || {
            Some(BondValueInput {
                face_value: args.face_value,
                coupon_rate: args.coupon_rate?,
                years_to_maturity: args.years?,
                ytm: args.ytm?,
                frequency: args.frequency,
            })
        },
        "bond-value",
    )?;
    let result = bonds::price_bond(&pricing_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for yield-to-maturity
#[derive(Args)]
pub struct YtmArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Market price of the bond
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Face (par) value
    #[arg(long, default_value = "1000")]
    pub face_value: Decimal,

    /// Annual coupon rate
    #[arg(long)]
    pub coupon_rate: Option<Decimal>,

    /// Whole years to maturity
    #[arg(long)]
    pub years: Option<u32>,

    /// Coupon frequency: annual, semi-annual
    #[arg(long, default_value = "semi-annual")]
    pub frequency: PaymentFrequency,

    /// Starting yield for the solver
    #[arg(long, default_value = "0.05", allow_hyphen_values = true)]
    pub guess: Decimal,

    /// Maximum solver iterations
    #[arg(long)]
    pub max_iterations: Option<u32>,
}

pub fn run_ytm(args: YtmArgs) -> CommandResult<Value> {
    let solver = solver_config(args.max_iterations);
    let ytm_input: YtmInput = load_input(
        args.input.as_deref(),
        || {
            Some(YtmInput {
                bond_price: args.price?,
                face_value: args.face_value,
                coupon_rate: args.coupon_rate?,
                years_to_maturity: args.years?,
                frequency: args.frequency,
                initial_guess: Some(args.guess),
                solver,
            })
        },
        "ytm",
    )?;
    let result = yields::calculate_bond_yield(&ytm_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for realized (horizon) yield
#[derive(Args)]
pub struct RealizedYieldArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Face (par) value
    #[arg(long, default_value = "1000")]
    pub face_value: Decimal,

    /// Annual coupon rate
    #[arg(long)]
    pub coupon_rate: Option<Decimal>,

    /// Yield to maturity at purchase
    #[arg(long, allow_hyphen_values = true)]
    pub current_ytm: Option<Decimal>,

    /// Whole years to maturity at purchase
    #[arg(long)]
    pub years: Option<u32>,

    /// Whole years held before sale
    #[arg(long)]
    pub holding_period: Option<u32>,

    /// Yield to maturity at sale
    #[arg(long, allow_hyphen_values = true)]
    pub future_ytm: Option<Decimal>,

    /// Coupon frequency: annual, semi-annual
    #[arg(long, default_value = "semi-annual")]
    pub frequency: PaymentFrequency,

    /// Maximum solver iterations
    #[arg(long)]
    pub max_iterations: Option<u32>,
}

pub fn run_realized_yield(args: RealizedYieldArgs) -> CommandResult<Value> {
    let solver = solver_config(args.max_iterations);
    let ry_input: RealizedYieldInput = load_input(
        args.input.as_deref(),
        || {
            Some(RealizedYieldInput {
                face_value: args.face_value,
                coupon_rate: args.coupon_rate?,
                current_ytm: args.current_ytm?,
                years_to_maturity: args.years?,
                holding_period: args.holding_period?,
                future_ytm: args.future_ytm?,
                frequency: args.frequency,
                solver,
            })
        },
        "realized-yield",
    )?;
    let result = realized_yield::analyze_realized_yield(&ry_input)?;
    Ok(serde_json::to_value(result)?)
}

fn solver_config(max_iterations: Option<u32>) -> Option<SolverConfig> {
    max_iterations.map(|max_iterations| SolverConfig {
        max_iterations,
        ..SolverConfig::default()
    })
}
