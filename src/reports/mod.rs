//! Reports for the expense ledger
//!
//! The month by category pivot with budget variance and summary rows.

pub mod pivot;

pub use pivot::{
    compute_pivot, compute_pivot_at, pivot_columns, CategoryColumn, CellTone, PivotCell,
    PivotReport, PivotRow, RowKind, YearSelection,
};
