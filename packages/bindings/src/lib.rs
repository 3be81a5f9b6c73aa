use napi::Result as NapiResult;
use napi_derive::napi;
use serde::de::DeserializeOwned;
use serde::Serialize;

use fincalc_core::dividend_discount::{constant_growth, varying_growth};
use fincalc_core::fixed_income::{bonds, realized_yield, yields};
use fincalc_core::portfolio_optimization::{capital_allocation, two_asset};
use fincalc_core::FinCalcResult;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Parse a JSON input, run a calculator, and serialise its output.
fn run_json<I, O>(input_json: &str, calc: impl FnOnce(&I) -> FinCalcResult<O>) -> NapiResult<String>
where
    I: DeserializeOwned,
    O: Serialize,
{
    let input: I = serde_json::from_str(input_json).map_err(to_napi_error)?;
    let output = calc(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Fixed income
// ---------------------------------------------------------------------------

#[napi]
pub fn bond_value(input_json: String) -> NapiResult<String> {
    run_json(&input_json, bonds::price_bond)
}

#[napi]
pub fn yield_to_maturity(input_json: String) -> NapiResult<String> {
    run_json(&input_json, yields::calculate_bond_yield)
}

#[napi]
pub fn calculate_realized_yield(input_json: String) -> NapiResult<String> {
    run_json(&input_json, realized_yield::analyze_realized_yield)
}

// ---------------------------------------------------------------------------
// Dividend discount
// ---------------------------------------------------------------------------

#[napi]
pub fn ddm_constant_growth(input_json: String) -> NapiResult<String> {
    run_json(&input_json, constant_growth::value_constant_growth)
}

#[napi]
pub fn ddm_varying_growth(input_json: String) -> NapiResult<String> {
    run_json(&input_json, varying_growth::value_varying_growth)
}

// ---------------------------------------------------------------------------
// Portfolio optimization
// ---------------------------------------------------------------------------

#[napi]
pub fn two_asset_weights(input_json: String) -> NapiResult<String> {
    run_json(&input_json, two_asset::optimize_two_asset)
}

#[napi]
pub fn allocate_capital(input_json: String) -> NapiResult<String> {
    run_json(&input_json, capital_allocation::allocate_capital)
}
