//! Core data models for the expense ledger
//!
//! Expenses, categories, and the price-expression evaluator that validates
//! and formats the price text of each expense.

pub mod category;
pub mod expense;
pub mod ids;
pub mod price;

pub use category::{Category, DEFAULT_CATEGORIES};
pub use expense::{Expense, ExpenseFields, DATE_FORMAT};
pub use ids::ExpenseId;
pub use price::{format_amount, format_price, parse_price};
