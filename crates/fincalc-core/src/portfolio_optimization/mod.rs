pub mod capital_allocation;
pub mod two_asset;
