pub mod constant_growth;
pub mod varying_growth;
