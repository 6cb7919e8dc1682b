//! Cross-Platform Path Utilities
//!
//! Functions for resolving application directories across platforms.

use std::path::PathBuf;

use crate::utils::error::{AppError, AppResult};

/// Get the user's home directory
pub fn home_dir() -> AppResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| AppError::config("Could not determine home directory"))
}

/// Get the Loomline directory (~/.loomline/)
pub fn loomline_dir() -> AppResult<PathBuf> {
    Ok(home_dir()?.join(".loomline"))
}

/// Get the database file path (~/.loomline/data.db)
pub fn database_path() -> AppResult<PathBuf> {
    Ok(loomline_dir()?.join("data.db"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &PathBuf) -> AppResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Get the Loomline directory, creating if it doesn't exist
pub fn ensure_loomline_dir() -> AppResult<PathBuf> {
    let path = loomline_dir()?;
    ensure_dir(&path)?;
    Ok(path)
}
