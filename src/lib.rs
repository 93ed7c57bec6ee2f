pub mod app;
pub mod constants;
pub mod models;
pub mod services;
pub mod utils;
