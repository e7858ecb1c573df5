//! Storage layer for the expense ledger
//!
//! Three file-backed repositories (expenses, categories, budgets) plus the
//! audit log. Each repository owns only a path; every call reads the file
//! fresh and mutations rewrite it whole.

pub mod budget;
pub mod categories;
pub mod expenses;
pub mod file_io;

pub use budget::{
    budget_for, load_budgets, month_key, save_budgets, BudgetData, BudgetStore, CategoryBudgets,
    YearBudgets,
};
pub use categories::{
    add_category, load_category_options, remove_category, save_categories,
    save_category_options, set_category_color, CategoryOptions, CategoryRegistry,
};
pub use expenses::{
    add_expense, delete_expense, migrate_expense_ids, read_expenses, update_expense,
    ExpenseStore, MigrationReport,
};
pub use file_io::write_json_atomic;

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::LedgerPaths;
use crate::error::LedgerResult;

/// Main storage coordinator that provides access to all repositories
#[derive(Debug, Clone)]
pub struct Storage {
    paths: LedgerPaths,
    pub expenses: ExpenseStore,
    pub categories: CategoryRegistry,
    pub budgets: BudgetStore,
    audit: AuditLogger,
    audit_enabled: bool,
}

impl Storage {
    /// Open storage under `paths`, creating the directories if needed
    pub fn new(paths: LedgerPaths) -> LedgerResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            expenses: ExpenseStore::new(paths.expenses_file()),
            categories: CategoryRegistry::new(paths.categories_file()),
            budgets: BudgetStore::new(paths.budgets_file()),
            audit: AuditLogger::new(paths.audit_log()),
            audit_enabled: true,
            paths,
        })
    }

    /// Turn audit recording on or off
    pub fn with_audit(mut self, enabled: bool) -> Self {
        self.audit_enabled = enabled;
        self
    }

    pub fn paths(&self) -> &LedgerPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Record a newly created entity
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> LedgerResult<()> {
        self.record(AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    /// Record a change; nothing is written when before and after are equal
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> LedgerResult<()> {
        let entry = AuditEntry::update(entity_type, entity_id, entity_name, before, after);
        if entry.is_noop() {
            return Ok(());
        }
        self.record(entry)
    }

    /// Record a removed entity
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> LedgerResult<()> {
        self.record(AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }

    /// Record an expense id migration that rewrote the file
    pub fn log_migration(&self, report: &MigrationReport) -> LedgerResult<()> {
        if !report.changed() {
            return Ok(());
        }
        let file_name = self
            .expenses
            .path()
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.record(AuditEntry::migrate(
            EntityType::Expense,
            file_name,
            format!("{} of {} rows given ids", report.migrated, report.rows),
        ))
    }

    fn record(&self, entry: AuditEntry) -> LedgerResult<()> {
        if self.audit_enabled {
            self.audit.log(&entry)?;
        }
        Ok(())
    }
}
