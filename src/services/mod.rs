//! Service layer for the expense ledger
//!
//! Business logic on top of the storage layer. Services validate input,
//! call the repositories and record every mutation in the audit log.

pub mod budget;
pub mod category;
pub mod expense;

pub use budget::BudgetService;
pub use category::CategoryService;
pub use expense::{
    available_years, sort_expenses, ExpenseFilter, ExpenseService, ExpenseSort, SortKey,
};
