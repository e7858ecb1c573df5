//! JSON export
//!
//! A full export bundles expenses, categories and budgets with a schema
//! version. The pivot has its own flattened, labelled export shape.

use std::collections::HashSet;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::display::pivot::{column_label, row_label};
use crate::display::Labels;
use crate::error::{LedgerError, LedgerResult};
use crate::models::category::name_key;
use crate::models::{Category, Expense};
use crate::reports::{PivotCell, PivotReport, PivotRow};
use crate::services::{available_years, ExpenseService};
use crate::storage::{BudgetData, Storage};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Everything the ledger stores
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    pub schema_version: String,
    pub exported_at: DateTime<Utc>,
    pub app_version: String,
    pub expenses: Vec<Expense>,
    pub categories: Vec<Category>,
    pub budgets: BudgetData,
    pub metadata: ExportMetadata,
}

/// Summary counts for a full export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub expense_count: usize,
    pub category_count: usize,
    /// Years that have at least one budget entry
    pub budget_years: Vec<String>,
    /// Years that have at least one dated expense
    pub expense_years: Vec<i32>,
}

impl FullExport {
    /// Snapshot the current storage (migrating the expense file first)
    pub fn from_storage(storage: &Storage) -> LedgerResult<Self> {
        let expenses = ExpenseService::new(storage).load()?;
        let categories = storage.categories.load()?.categories;
        let budgets = storage.budgets.load();

        let metadata = ExportMetadata {
            expense_count: expenses.len(),
            category_count: categories.len(),
            budget_years: budgets.keys().cloned().collect(),
            expense_years: available_years(&expenses),
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            expenses,
            categories,
            budgets,
            metadata,
        })
    }

    /// Check the schema version and the uniqueness invariants
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        let mut ids = HashSet::new();
        for expense in &self.expenses {
            if expense.id.is_empty() {
                return Err(format!("Expense '{}' has no id", expense.name()));
            }
            if !ids.insert(expense.id.as_str()) {
                return Err(format!("Duplicate expense id {}", expense.id));
            }
        }

        let mut names = HashSet::new();
        for category in &self.categories {
            if !names.insert(name_key(&category.name)) {
                return Err(format!("Duplicate category {}", category.name));
            }
        }

        Ok(())
    }
}

/// Export everything as JSON
pub fn export_full_json<W: Write>(storage: &Storage, writer: &mut W, pretty: bool) -> LedgerResult<()> {
    let export = FullExport::from_storage(storage)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| LedgerError::Export(e.to_string()))?;

    Ok(())
}

/// Parse and validate a JSON export
pub fn import_from_json(json_str: &str) -> LedgerResult<FullExport> {
    let export: FullExport =
        serde_json::from_str(json_str).map_err(|e| LedgerError::Export(e.to_string()))?;
    export.validate().map_err(LedgerError::Validation)?;
    Ok(export)
}

/// One pivot cell as exported
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PivotExportCell {
    pub category: String,
    pub spent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    /// Remaining when budgeted, spent otherwise
    pub value: f64,
}

/// One pivot row as exported
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PivotExportRow {
    pub label: String,
    pub cells: Vec<PivotExportCell>,
    pub total: PivotExportCell,
}

/// The pivot with labels resolved
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PivotExport {
    pub year: String,
    pub rows: Vec<PivotExportRow>,
}

impl PivotExport {
    pub fn from_report(report: &PivotReport, labels: &Labels) -> Self {
        let export_cell = |category: String, cell: &PivotCell| PivotExportCell {
            category,
            spent: round2(cell.spent),
            budget: cell.budget.map(round2),
            value: round2(cell.value()),
        };

        let export_row = |row: &PivotRow| PivotExportRow {
            label: row_label(row, labels),
            cells: report
                .columns
                .iter()
                .zip(&row.cells)
                .map(|(column, cell)| export_cell(column_label(column, labels), cell))
                .collect(),
            total: export_cell(labels.total.to_string(), &row.total),
        };

        Self {
            year: report.selection.to_string(),
            rows: report.rows().map(export_row).collect(),
        }
    }
}

/// Round to cents for presentation
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Export the pivot as JSON
pub fn export_pivot_json<W: Write>(
    report: &PivotReport,
    labels: &Labels,
    writer: &mut W,
) -> LedgerResult<()> {
    serde_json::to_writer_pretty(writer, &PivotExport::from_report(report, labels))
        .map_err(|e| LedgerError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Language, LedgerPaths};
    use crate::models::{ExpenseFields, ExpenseId};
    use crate::reports::{compute_pivot_at, YearSelection};
    use crate::services::{BudgetService, ExpenseService};
    use crate::storage::YearBudgets;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_full_export_round_trip() {
        let (_temp_dir, storage) = create_test_storage();
        ExpenseService::new(&storage)
            .add(
                &ExpenseFields::new("Bread", "05/03/2024", "2,5", "Nourriture", ""),
                false,
            )
            .unwrap();
        BudgetService::new(&storage)
            .set_amount(2024, 3, "Nourriture", "100")
            .unwrap();

        let mut buffer = Vec::new();
        export_full_json(&storage, &mut buffer, true).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        let export = import_from_json(&text).unwrap();
        assert_eq!(export.metadata.expense_count, 1);
        assert_eq!(export.metadata.category_count, 8);
        assert_eq!(export.metadata.budget_years, vec!["2024".to_string()]);
        assert_eq!(export.metadata.expense_years, vec![2024]);
        assert_eq!(export.expenses[0].price(), "2,5");
        assert_eq!(export.budgets["2024"]["03"]["Nourriture"], 100.0);
    }

    #[test]
    fn test_validate_rejects_duplicate_ids() {
        let (_temp_dir, storage) = create_test_storage();
        let mut export = FullExport::from_storage(&storage).unwrap();
        let expense = Expense::new(
            ExpenseId::from("same"),
            ExpenseFields::new("a", "01/01/2024", "1", "b", ""),
        );
        export.expenses = vec![expense.clone(), expense];

        assert!(export.validate().unwrap_err().contains("Duplicate expense id"));

        export.expenses.clear();
        export.schema_version = "0.1".into();
        assert!(export.validate().unwrap_err().contains("Schema version"));
    }

    #[test]
    fn test_pivot_export() {
        let expenses = vec![Expense::new(
            ExpenseId::from("a"),
            ExpenseFields::new("Bread", "10/01/2024", "10", "Food", ""),
        )];
        let mut budgets = YearBudgets::new();
        budgets
            .entry("01".into())
            .or_default()
            .insert("Food".into(), 15.0);
        let report = compute_pivot_at(
            &expenses,
            &["Food".to_string()],
            YearSelection::Year(2024),
            &budgets,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        );

        let export = PivotExport::from_report(&report, &Labels::new(Language::En));
        assert_eq!(export.year, "2024");
        assert_eq!(export.rows.len(), 14);
        assert_eq!(export.rows[0].label, "January");
        assert_eq!(
            export.rows[0].cells[0],
            PivotExportCell {
                category: "Food".into(),
                spent: 10.0,
                budget: Some(15.0),
                value: 5.0,
            }
        );
        assert_eq!(export.rows[12].label, "Year total (through December)");

        let mut buffer = Vec::new();
        export_pivot_json(&report, &Labels::new(Language::En), &mut buffer).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["rows"][1]["cells"][0].get("budget"), None);
    }
}
