//! Expense service
//!
//! Business logic on top of [`ExpenseStore`](crate::storage::ExpenseStore):
//! audit recording, id lookup by prefix, filtering and sorting for listings.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::Datelike;

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::category::fold_case;
use crate::models::{Expense, ExpenseFields, ExpenseId};
use crate::storage::{MigrationReport, Storage};

/// Service for expense management
pub struct ExpenseService<'a> {
    storage: &'a Storage,
}

/// Options for filtering expenses
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    /// Case-insensitive text matched against every column
    pub search: Option<String>,
    /// Keep only expenses dated in this year
    pub year: Option<i32>,
    /// Keep only this month (ignored without a year)
    pub month: Option<u32>,
    /// Maximum number of expenses to return
    pub limit: Option<usize>,
}

impl ExpenseFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether one expense passes the search and period filters
    ///
    /// With a year set, expenses whose date does not parse never match.
    pub fn matches(&self, expense: &Expense) -> bool {
        if let Some(needle) = &self.search {
            if !expense.matches_search(needle) {
                return false;
            }
        }

        match self.year {
            Some(year) => expense.is_in_period(year, self.month),
            None => true,
        }
    }
}

/// Column an expense listing is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Date,
    Name,
    Price,
    Category,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Date => write!(f, "date"),
            SortKey::Name => write!(f, "name"),
            SortKey::Price => write!(f, "price"),
            SortKey::Category => write!(f, "category"),
        }
    }
}

impl FromStr for SortKey {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(SortKey::Date),
            "name" => Ok(SortKey::Name),
            "price" => Ok(SortKey::Price),
            "category" => Ok(SortKey::Category),
            other => Err(LedgerError::Validation(format!(
                "Unknown sort column: {}",
                other
            ))),
        }
    }
}

/// Sort order of an expense listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExpenseSort {
    pub key: SortKey,
    pub descending: bool,
}

impl ExpenseSort {
    pub fn ascending(key: SortKey) -> Self {
        Self {
            key,
            descending: false,
        }
    }

    pub fn descending(key: SortKey) -> Self {
        Self {
            key,
            descending: true,
        }
    }

    /// Compare two expenses under this order
    ///
    /// Dates that parse come first in calendar order; unparsable dates
    /// follow, ordered as text. Unparsable prices sort as zero.
    pub fn compare(&self, a: &Expense, b: &Expense) -> Ordering {
        let ordering = match self.key {
            SortKey::Date => match (a.parsed_date(), b.parsed_date()) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => a.date().cmp(b.date()),
            },
            SortKey::Name => fold_case(a.name()).cmp(&fold_case(b.name())),
            SortKey::Price => a
                .amount()
                .unwrap_or(0.0)
                .total_cmp(&b.amount().unwrap_or(0.0)),
            SortKey::Category => fold_case(a.category()).cmp(&fold_case(b.category())),
        };

        if self.descending {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

/// Sort expenses in place (stable)
pub fn sort_expenses(expenses: &mut [Expense], sort: ExpenseSort) {
    expenses.sort_by(|a, b| sort.compare(a, b));
}

/// Distinct years of the expenses whose date parses, ascending
pub fn available_years(expenses: &[Expense]) -> Vec<i32> {
    expenses
        .iter()
        .filter_map(|e| e.parsed_date())
        .map(|d| d.year())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

impl<'a> ExpenseService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Bring the expense file to the id-first row shape
    pub fn migrate(&self) -> LedgerResult<MigrationReport> {
        let report = self.storage.expenses.migrate_ids()?;
        self.storage.log_migration(&report)?;
        Ok(report)
    }

    /// Add an expense
    pub fn add(&self, fields: &ExpenseFields, allow_duplicates: bool) -> LedgerResult<Expense> {
        self.migrate()?;
        let expense = self.storage.expenses.add(fields, allow_duplicates)?;

        self.storage.log_create(
            EntityType::Expense,
            expense.id.as_str(),
            Some(expense.name().to_string()),
            &expense,
        )?;

        Ok(expense)
    }

    /// Replace the fields of an existing expense
    ///
    /// Returns the expense as now stored.
    pub fn update(
        &self,
        id: &ExpenseId,
        fields: &ExpenseFields,
        allow_duplicates: bool,
    ) -> LedgerResult<Expense> {
        if self.storage.expenses.exists() {
            self.migrate()?;
        }
        let before = self.storage.expenses.update(id, fields, allow_duplicates)?;
        let after = Expense::new(id.clone(), fields.trimmed());

        self.storage.log_update(
            EntityType::Expense,
            id.as_str(),
            Some(after.name().to_string()),
            &before,
            &after,
        )?;

        Ok(after)
    }

    /// Delete an expense, returning it
    pub fn delete(&self, id: &ExpenseId) -> LedgerResult<Expense> {
        if self.storage.expenses.exists() {
            self.migrate()?;
        }
        let removed = self.storage.expenses.delete(id)?;

        self.storage.log_delete(
            EntityType::Expense,
            removed.id.as_str(),
            Some(removed.name().to_string()),
            &removed,
        )?;

        Ok(removed)
    }

    /// Find an expense by full id or unambiguous id prefix
    pub fn find(&self, identifier: &str) -> LedgerResult<Expense> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(LedgerError::MissingField("id"));
        }

        let expenses = self.load()?;
        if let Some(exact) = expenses.iter().find(|e| e.id.as_str() == identifier) {
            return Ok(exact.clone());
        }

        let mut matches = expenses
            .into_iter()
            .filter(|e| e.id.as_str().starts_with(identifier));
        match (matches.next(), matches.next()) {
            (Some(found), None) => Ok(found),
            (Some(_), Some(_)) => Err(LedgerError::Validation(format!(
                "Id prefix '{}' matches more than one expense",
                identifier
            ))),
            _ => Err(LedgerError::RecordNotFound(identifier.to_string())),
        }
    }

    /// Migrate, then read every expense in file order
    pub fn load(&self) -> LedgerResult<Vec<Expense>> {
        self.migrate()?;
        self.storage.expenses.read_all()
    }

    /// Filtered and sorted listing
    pub fn list(&self, filter: &ExpenseFilter, sort: ExpenseSort) -> LedgerResult<Vec<Expense>> {
        let mut expenses: Vec<Expense> = self
            .load()?
            .into_iter()
            .filter(|e| filter.matches(e))
            .collect();

        sort_expenses(&mut expenses, sort);

        if let Some(limit) = filter.limit {
            expenses.truncate(limit);
        }

        Ok(expenses)
    }

    /// Years present in the expense file
    pub fn available_years(&self) -> LedgerResult<Vec<i32>> {
        Ok(available_years(&self.load()?))
    }

    pub fn count(&self) -> LedgerResult<usize> {
        self.storage.expenses.count()
    }
}
