mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::dividend_discount::{ConstantGrowthArgs, VaryingGrowthArgs};
use commands::fixed_income::{BondValueArgs, RealizedYieldArgs, YtmArgs};
use commands::portfolio_optimization::{CapitalAllocationArgs, TwoAssetArgs};

/// Bond, dividend discount and portfolio valuation formulas
#[derive(Parser)]
#[command(
    name = "fincalc",
    version,
    about = "Bond, dividend discount and portfolio valuation formulas",
    long_about = "A CLI for closed-form and numerically solved valuation formulas with \
                  decimal precision. Supports bond pricing, yield to maturity, realized \
                  yield, constant and multi-stage dividend discount models, two-asset \
                  maximum-Sharpe weights and capital allocation."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a bond at a flat yield to maturity
    BondValue(BondValueArgs),
    /// Solve for a bond's yield to maturity from its price
    Ytm(YtmArgs),
    /// Realized yield from buying at one yield and selling at another
    RealizedYield(RealizedYieldArgs),
    /// Constant-growth (Gordon) dividend discount model
    DdmConstant(ConstantGrowthArgs),
    /// Dividend discount model with a per-period growth schedule
    DdmVarying(VaryingGrowthArgs),
    /// Maximum-Sharpe weights for two risky assets
    TwoAsset(TwoAssetArgs),
    /// Blend a risky portfolio with the risk-free asset to hit a target return
    CapitalAllocation(CapitalAllocationArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: commands::CommandResult<serde_json::Value> = match cli.command {
        Commands::BondValue(args) => commands::fixed_income::run_bond_value(args),
        Commands::Ytm(args) => commands::fixed_income::run_ytm(args),
        Commands::RealizedYield(args) => commands::fixed_income::run_realized_yield(args),
        Commands::DdmConstant(args) => commands::dividend_discount::run_constant_growth(args),
        Commands::DdmVarying(args) => commands::dividend_discount::run_varying_growth(args),
        Commands::TwoAsset(args) => commands::portfolio_optimization::run_two_asset(args),
        Commands::CapitalAllocation(args) => {
            commands::portfolio_optimization::run_capital_allocation(args)
        }
        Commands::Version => {
            println!("fincalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_bond_value_flags() {
        let cli = Cli::try_parse_from([
            "fincalc",
            "bond-value",
            "--coupon-rate",
            "0.12",
            "--years",
            "15",
            "--ytm",
            "0.16",
            "--frequency",
            "semi-annual",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::BondValue(_)));
    }

    #[test]
    fn test_reject_unknown_frequency() {
        let parsed = Cli::try_parse_from([
            "fincalc",
            "ddm-constant",
            "--dividend",
            "0.22",
            "--growth-rate",
            "0.004",
            "--discount-rate",
            "0.16",
            "--frequency",
            "monthly",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_bond_value_command_output() {
        let args = BondValueArgs {
            input: None,
            face_value: rust_decimal_macros::dec!(1000),
            coupon_rate: Some(rust_decimal_macros::dec!(0.12)),
            years: Some(15),
            ytm: Some(rust_decimal_macros::dec!(0.16)),
            frequency: fincalc_core::PaymentFrequency::SemiAnnual,
        };
        let value = commands::fixed_income::run_bond_value(args).unwrap();
        let price: rust_decimal::Decimal = value["result"]["price"]
            .as_str()
            .unwrap()
            .parse()
            .unwrap();
        assert!((price - rust_decimal_macros::dec!(774.844)).abs() < rust_decimal_macros::dec!(0.001));
    }

    #[test]
    fn test_varying_growth_list_flag() {
        let cli = Cli::try_parse_from([
            "fincalc",
            "--output",
            "minimal",
            "ddm-varying",
            "--last-dividend",
            "1",
            "--discount-rate",
            "0.2",
            "--growth-rates",
            "0.2,0.15,0.05",
            "--perpetuity-start",
            "3",
        ])
        .unwrap();
        match cli.command {
            Commands::DdmVarying(args) => {
                assert_eq!(args.growth_rates.map(|g| g.len()), Some(3));
            }
            _ => panic!("expected ddm-varying"),
        }
    }
}
