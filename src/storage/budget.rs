//! Budget repository over the budget side file
//!
//! Layout: `{"<year>": {"<MM>": {"<category>": amount}}}` with two-digit
//! month keys. An absent entry means "no budget", which is not the same
//! as a budget of zero.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::LedgerResult;

use super::file_io::{read_json_lenient, write_json_atomic};

/// Category name to amount
pub type CategoryBudgets = BTreeMap<String, f64>;

/// Two-digit month key to per-category amounts for one year
pub type YearBudgets = BTreeMap<String, CategoryBudgets>;

/// Year key to that year's budgets
pub type BudgetData = BTreeMap<String, YearBudgets>;

/// Month key as stored on disk ("01".."12")
pub fn month_key(month: u32) -> String {
    format!("{:02}", month)
}

/// Budget amount for one category in one month, if defined
pub fn budget_for(budgets: &YearBudgets, month: u32, category: &str) -> Option<f64> {
    budgets
        .get(&month_key(month))
        .and_then(|per_category| per_category.get(category))
        .copied()
}

/// Repository for the budget side file
#[derive(Debug, Clone)]
pub struct BudgetStore {
    path: PathBuf,
}

impl BudgetStore {
    /// Create a repository for the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all budgets; a missing or corrupt file reads as empty
    ///
    /// Entries are decoded one by one, so a single unusable amount only
    /// drops that amount and the rest of the file is kept.
    pub fn load(&self) -> BudgetData {
        read_json_lenient(&self.path)
            .map(decode_budgets)
            .unwrap_or_default()
    }

    /// Write all budgets as given
    pub fn save(&self, data: &BudgetData) -> LedgerResult<()> {
        write_json_atomic(&self.path, data)
    }

    /// Budgets of one year (empty when none are defined)
    pub fn load_year(&self, year: i32) -> YearBudgets {
        self.load().remove(&year.to_string()).unwrap_or_default()
    }

    /// Replace the budgets of one year, dropping the year when empty
    pub fn save_year(&self, year: i32, budgets: YearBudgets) -> LedgerResult<()> {
        let mut data = self.load();
        let budgets: YearBudgets = budgets
            .into_iter()
            .filter(|(_, per_category)| !per_category.is_empty())
            .collect();

        if budgets.is_empty() {
            data.remove(&year.to_string());
        } else {
            data.insert(year.to_string(), budgets);
        }
        self.save(&data)
    }
}

fn decode_budgets(raw: Value) -> BudgetData {
    let Value::Object(years) = raw else {
        return BudgetData::new();
    };

    let mut data = BudgetData::new();
    for (year, months) in years {
        let Value::Object(months) = months else {
            continue;
        };
        let mut year_budgets = YearBudgets::new();
        for (month, amounts) in months {
            let Value::Object(amounts) = amounts else {
                continue;
            };
            let per_category: CategoryBudgets = amounts
                .into_iter()
                .filter_map(|(category, amount)| decode_amount(&amount).map(|a| (category, a)))
                .collect();
            year_budgets.insert(month, per_category);
        }
        data.insert(year, year_budgets);
    }
    data
}

// Numbers as written by hand ("15", "12,5") are accepted too
fn decode_amount(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(text) => text.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    }
    .filter(|amount| amount.is_finite())
}

// Path-based entry points

/// Load all budgets stored at `path`
pub fn load_budgets(path: impl AsRef<Path>) -> BudgetData {
    BudgetStore::new(path.as_ref()).load()
}

/// Save all budgets to `path`
pub fn save_budgets(path: impl AsRef<Path>, data: &BudgetData) -> LedgerResult<()> {
    BudgetStore::new(path.as_ref()).save(data)
}
