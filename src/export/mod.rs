//! Data export
//!
//! - CSV: expenses and budgets, for spreadsheets
//! - JSON: full machine-readable export, and the pivot
//! - YAML: the same structures for reading by humans

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::{export_budgets_csv, export_expenses_csv};
pub use json::{
    export_full_json, export_pivot_json, import_from_json, FullExport, PivotExport,
    EXPORT_SCHEMA_VERSION,
};
pub use yaml::{export_full_yaml, export_pivot_yaml, import_from_yaml};
