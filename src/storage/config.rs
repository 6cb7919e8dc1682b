//! Gateway Configuration
//!
//! Persists the model gateway settings in the database settings table so
//! they survive restarts and can be edited at runtime.

use loomline_llm::GatewayConfig;

use crate::storage::database::Database;
use crate::utils::error::AppResult;

const SETTING_KEY: &str = "gateway.config";

/// Load the gateway configuration, falling back to defaults when unset.
pub fn load_gateway_config(db: &Database) -> AppResult<GatewayConfig> {
    match db.get_setting(SETTING_KEY)? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(GatewayConfig::default()),
    }
}

/// Persist the gateway configuration.
pub fn save_gateway_config(db: &Database, config: &GatewayConfig) -> AppResult<()> {
    let raw = serde_json::to_string(config)?;
    db.set_setting(SETTING_KEY, &raw)?;
    Ok(())
}
