pub mod ratios;
pub mod zscore;
