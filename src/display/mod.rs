//! Display formatting for terminal output
//!
//! Tables and detail views for expenses, categories, budgets and the
//! pivot, with labels in the configured language.

pub mod budget;
pub mod category;
pub mod expense;
pub mod labels;
pub mod pivot;

pub use budget::format_year_budgets;
pub use category::format_category_list;
pub use expense::{format_expense_details, format_expense_table};
pub use labels::Labels;
pub use pivot::{format_pivot, paint};
