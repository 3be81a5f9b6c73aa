use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use fincalc_core::portfolio_optimization::capital_allocation::{self, CapitalAllocationInput};
use fincalc_core::portfolio_optimization::two_asset::{self, TwoAssetInput};

use super::{load_input, CommandResult};

/// Arguments for the two-asset maximum-Sharpe allocation
#[derive(Args)]
pub struct TwoAssetArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Expected return of asset 1
    #[arg(long, allow_hyphen_values = true)]
    pub r1: Option<Decimal>,

    /// Expected return of asset 2
    #[arg(long, allow_hyphen_values = true)]
    pub r2: Option<Decimal>,

    /// Standard deviation of asset 1
    #[arg(long)]
    pub sigma1: Option<Decimal>,

    /// Standard deviation of asset 2
    #[arg(long)]
    pub sigma2: Option<Decimal>,

    /// Correlation between the assets
    #[arg(long, allow_hyphen_values = true)]
    pub rho: Option<Decimal>,

    /// Risk-free rate
    #[arg(long, default_value = "0.02")]
    pub risk_free_rate: Decimal,
}

pub fn run_two_asset(args: TwoAssetArgs) -> CommandResult<Value> {
    let opt_input: TwoAssetInput = load_input(
        args.input.as_deref(),
        || {
            Some(TwoAssetInput {
                r1: args.r1?,
                r2: args.r2?,
                sigma1: args.sigma1?,
                sigma2: args.sigma2?,
                rho: args.rho?,
                risk_free_rate: args.risk_free_rate,
            })
        },
        "two-asset",
    )?;
    let result = two_asset::optimize_two_asset(&opt_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for capital allocation between risk-free and risky assets
#[derive(Args)]
pub struct CapitalAllocationArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Target return for the blend
    #[arg(long, allow_hyphen_values = true)]
    pub target_return: Option<Decimal>,

    /// Risk-free rate
    #[arg(long, default_value = "0.02")]
    pub risk_free_rate: Decimal,

    /// Expected return of the risky portfolio
    #[arg(long, allow_hyphen_values = true)]
    pub portfolio_return: Option<Decimal>,

    /// Comma-separated asset weights inside the risky portfolio
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub asset_weights: Option<Vec<Decimal>>,

    /// Standard deviation of the risky portfolio
    #[arg(long)]
    pub portfolio_std_dev: Option<Decimal>,
}

pub fn run_capital_allocation(args: CapitalAllocationArgs) -> CommandResult<Value> {
    let cal_input: CapitalAllocationInput = load_input(
        args.input.as_deref(),
        || {
            Some(CapitalAllocationInput {
                target_return: args.target_return?,
                risk_free_rate: args.risk_free_rate,
                portfolio_return: args.portfolio_return?,
                asset_weights: args.asset_weights.clone()?,
                portfolio_std_dev: args.portfolio_std_dev,
            })
        },
        "capital-allocation",
    )?;
    let result = capital_allocation::allocate_capital(&cal_input)?;
    Ok(serde_json::to_value(result)?)
}
