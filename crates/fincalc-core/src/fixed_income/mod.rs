pub mod bonds;
pub mod realized_yield;
pub mod yields;
