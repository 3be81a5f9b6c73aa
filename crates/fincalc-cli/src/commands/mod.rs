pub mod dividend_discount;
pub mod fixed_income;
pub mod portfolio_optimization;

use serde::de::DeserializeOwned;

use crate::input;

pub type CommandResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Resolve a calculator input from `--input <file.json>`, then command-line
/// flags, then JSON piped on stdin.
///
/// `from_flags` returns None when a required flag is missing.
pub fn load_input<T, F>(path: Option<&str>, from_flags: F, command: &str) -> CommandResult<T>
where
    T: DeserializeOwned,
    F: FnOnce() -> Option<T>,
{
    if let Some(path) = path {
        return input::file::read_json(path);
    }
    if let Some(parsed) = from_flags() {
        return Ok(parsed);
    }
    if let Some(data) = input::stdin::read_stdin()? {
        return Ok(serde_json::from_value(data)?);
    }
    Err(format!("{command}: provide the required flags, --input <file.json>, or pipe JSON via stdin").into())
}
