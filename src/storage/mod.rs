//! Storage Layer
//!
//! SQLite persistence and gateway configuration.

pub mod config;
pub mod database;

pub use config::{load_gateway_config, save_gateway_config};
pub use database::Database;
