//! Configuration module for the expense ledger
//!
//! This module provides configuration management including:
//! - Base directory resolution and file locations
//! - User settings persistence (language, currency, audit)

pub mod paths;
pub mod settings;

pub use paths::LedgerPaths;
pub use settings::{Language, Settings};
