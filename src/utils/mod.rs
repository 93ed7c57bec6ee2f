pub mod currency;
pub mod formatters;
