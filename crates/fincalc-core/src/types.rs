use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FinCalcError;
use crate::FinCalcResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Portfolio weights as fractions of capital (1.0 = 100%).
pub type Weight = Decimal;

/// How many times per year a cash flow is paid.
///
/// Bonds accept `Annual` and `SemiAnnual` only; the dividend model also
/// accepts `Quarter`. Any other spelling is rejected rather than mapped to
/// the nearest frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentFrequency {
    Annual,
    SemiAnnual,
    Quarter,
}

impl PaymentFrequency {
    pub fn periods_per_year(self) -> u32 {
        match self {
            PaymentFrequency::Annual => 1,
            PaymentFrequency::SemiAnnual => 2,
            PaymentFrequency::Quarter => 4,
        }
    }

    /// Periods per year for bond cash flows, rejecting `Quarter`.
    pub fn bond_periods_per_year(self) -> FinCalcResult<u32> {
        match self {
            PaymentFrequency::Annual | PaymentFrequency::SemiAnnual => {
                Ok(self.periods_per_year())
            }
            PaymentFrequency::Quarter => Err(FinCalcError::InvalidInput {
                field: "frequency".into(),
                reason: "Bond frequency must be 'annual' or 'semi-annual'".into(),
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentFrequency::Annual => "annual",
            PaymentFrequency::SemiAnnual => "semi-annual",
            PaymentFrequency::Quarter => "quarter",
        }
    }
}

impl fmt::Display for PaymentFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentFrequency {
    type Err = FinCalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "annual" => Ok(PaymentFrequency::Annual),
            "semi-annual" => Ok(PaymentFrequency::SemiAnnual),
            "quarter" => Ok(PaymentFrequency::Quarter),
            other => Err(FinCalcError::InvalidInput {
                field: "frequency".into(),
                reason: format!(
                    "Unknown payment frequency '{other}'. Use: annual, semi-annual, quarter"
                ),
            }),
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
