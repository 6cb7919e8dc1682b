//! Utilities
//!
//! Common utilities used throughout the application.

pub mod error;
pub mod paths;
pub mod time;

pub use error::*;
pub use paths::*;
pub use time::*;
