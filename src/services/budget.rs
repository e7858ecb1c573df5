//! Budget service
//!
//! Editing of monthly per-category budgets. Amount text goes through the
//! price parser, so `"3*50"` sets 150. Empty text removes the entry, which
//! is different from setting zero.

use std::collections::BTreeMap;

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::category::same_name;
use crate::models::parse_price;
use crate::services::CategoryService;
use crate::storage::{month_key, Storage, YearBudgets};

/// Service for budget management
pub struct BudgetService<'a> {
    storage: &'a Storage,
}

/// Parse budget text; `None` means "clear"
pub fn parse_budget_amount(text: &str) -> LedgerResult<Option<f64>> {
    if text.trim().is_empty() {
        Ok(None)
    } else {
        parse_price(text).map(Some)
    }
}

fn check_month(month: u32) -> LedgerResult<()> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(LedgerError::Validation(format!(
            "Month must be between 1 and 12, got {}",
            month
        )))
    }
}

impl<'a> BudgetService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Budgets of one year, by two-digit month key
    pub fn year_budgets(&self, year: i32) -> YearBudgets {
        self.storage.budgets.load_year(year)
    }

    /// Set or clear one category's budget for one month
    ///
    /// Returns the stored amount (`None` when cleared).
    pub fn set_amount(
        &self,
        year: i32,
        month: u32,
        category: &str,
        text: &str,
    ) -> LedgerResult<Option<f64>> {
        self.apply_to_months(year, &[month], category, text)
    }

    /// Set or clear one category's budget for every month of a year
    pub fn apply_to_year(&self, year: i32, category: &str, text: &str) -> LedgerResult<Option<f64>> {
        let months: Vec<u32> = (1..=12).collect();
        self.apply_to_months(year, &months, category, text)
    }

    /// Set or clear one category's budget for a selection of months
    pub fn apply_to_months(
        &self,
        year: i32,
        months: &[u32],
        category: &str,
        text: &str,
    ) -> LedgerResult<Option<f64>> {
        for &month in months {
            check_month(month)?;
        }
        let category = self.category_key(category)?;
        let amount = parse_budget_amount(text)?;

        let before = self.year_budgets(year);
        let mut after = before.clone();

        for &month in months {
            let entry = after.entry(month_key(month)).or_default();
            entry.retain(|name, _| !same_name(name, &category));
            if let Some(value) = amount {
                entry.insert(category.clone(), value);
            }
        }

        self.save_year(year, Some(category), before, after)?;
        Ok(amount)
    }

    /// Copy every entry of one month onto other months, replacing theirs
    ///
    /// Copying an empty month clears the targets. Returns the number of
    /// entries copied per month.
    pub fn copy_month(&self, year: i32, from_month: u32, to_months: &[u32]) -> LedgerResult<usize> {
        check_month(from_month)?;
        for &month in to_months {
            check_month(month)?;
        }

        let before = self.year_budgets(year);
        let source = before
            .get(&month_key(from_month))
            .cloned()
            .unwrap_or_default();

        let mut after = before.clone();
        for &month in to_months {
            if month != from_month {
                after.insert(month_key(month), source.clone());
            }
        }

        self.save_year(year, None, before, after)?;
        Ok(source.len())
    }

    fn category_key(&self, category: &str) -> LedgerResult<String> {
        if category.trim().is_empty() {
            return Err(LedgerError::EmptyName);
        }
        CategoryService::new(self.storage).canonical_name(category)
    }

    fn save_year(
        &self,
        year: i32,
        category: Option<String>,
        before: YearBudgets,
        after: YearBudgets,
    ) -> LedgerResult<()> {
        let after: YearBudgets = after
            .into_iter()
            .filter(|(_, per_category)| !per_category.is_empty())
            .collect::<BTreeMap<_, _>>();

        self.storage.budgets.save_year(year, after.clone())?;
        self.storage.log_update(
            EntityType::Budget,
            year.to_string(),
            category,
            &before,
            &after,
        )
    }
}
