pub mod amount;
pub mod config;
