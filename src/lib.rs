//! Expense ledger - personal expenses with category colors and monthly budgets
//!
//! This library provides the core functionality of the ledger: a flat CSV
//! expense file with id migration and duplicate detection, a JSON category
//! registry with colors, a sandboxed price calculator, a JSON budget store
//! and a month by category budget pivot.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (expenses, categories, prices)
//! - `storage`: CSV and JSON file stores
//! - `audit`: Audit logging system
//! - `services`: Business logic layer
//! - `reports`: The budget pivot
//! - `display`: Terminal rendering
//! - `export`: CSV, JSON and YAML export
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use expense_ledger::{parse_price, read_expenses};
//!
//! assert_eq!(parse_price("4+5*6")?, 34.0);
//! let expenses = read_expenses("data/expenses.csv")?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
pub use models::{format_price, parse_price};
pub use reports::compute_pivot;
pub use storage::{
    add_category, add_expense, delete_expense, load_budgets, load_category_options,
    migrate_expense_ids, read_expenses, remove_category, save_budgets, save_category_options,
    update_expense,
};
