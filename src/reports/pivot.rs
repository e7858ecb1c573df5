//! Month by category budget pivot
//!
//! Each cell holds what was spent and, when a budget entry exists, the
//! budget. A budgeted cell's value is the remaining amount (budget minus
//! spent); an unbudgeted cell's value is the amount spent. Month totals and
//! the two summary rows are merges of cells, so they follow the same rule:
//! once anything in the merged scope is budgeted, the value is the summed
//! budgets minus what was spent in the budgeted cells only.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;

use crate::error::LedgerError;
use crate::models::category::{name_key, same_name};
use crate::models::Expense;
use crate::storage::{month_key, YearBudgets};

/// Which expenses the pivot covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum YearSelection {
    /// One calendar year, with its budgets
    Year(i32),
    /// Every year folded onto the same twelve months, budgets ignored
    All,
}

impl fmt::Display for YearSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearSelection::Year(year) => write!(f, "{}", year),
            YearSelection::All => write!(f, "all"),
        }
    }
}

impl FromStr for YearSelection {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") || s.eq_ignore_ascii_case("toutes") {
            return Ok(YearSelection::All);
        }
        s.parse::<i32>()
            .map(YearSelection::Year)
            .map_err(|_| LedgerError::Validation(format!("Invalid year: {}", s)))
    }
}

/// One pivot column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryColumn {
    Named(String),
    /// Expenses with a blank category
    Uncategorized,
}

impl CategoryColumn {
    /// Category name, `None` for the uncategorized column
    pub fn name(&self) -> Option<&str> {
        match self {
            CategoryColumn::Named(name) => Some(name),
            CategoryColumn::Uncategorized => None,
        }
    }
}

/// How a cell compares to its budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellTone {
    Unbudgeted,
    UnderBudget,
    OnBudget,
    OverBudget,
}

/// Spending and budget for one scope (cell, month total, or summary)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PivotCell {
    /// Everything spent in the scope
    pub spent: f64,
    /// Summed budget entries, `None` when nothing in the scope is budgeted
    pub budget: Option<f64>,
    /// Spent in the budgeted parts of the scope only
    pub budgeted_spent: f64,
}

impl PivotCell {
    /// A single category-month cell
    pub fn new(spent: f64, budget: Option<f64>) -> Self {
        Self {
            spent,
            budget,
            budgeted_spent: if budget.is_some() { spent } else { 0.0 },
        }
    }

    pub fn is_budgeted(&self) -> bool {
        self.budget.is_some()
    }

    /// Remaining budget when budgeted, otherwise spent
    pub fn value(&self) -> f64 {
        match self.budget {
            Some(budget) => budget - self.budgeted_spent,
            None => self.spent,
        }
    }

    /// Remaining budget, if any part of the scope is budgeted
    pub fn remaining(&self) -> Option<f64> {
        self.budget.map(|budget| budget - self.budgeted_spent)
    }

    /// Sign of the remaining amount, judged at display precision
    pub fn tone(&self) -> CellTone {
        match self.remaining() {
            None => CellTone::Unbudgeted,
            Some(remaining) if remaining.abs() < 0.005 => CellTone::OnBudget,
            Some(remaining) if remaining > 0.0 => CellTone::UnderBudget,
            Some(_) => CellTone::OverBudget,
        }
    }

    /// Fold another scope into this one
    pub fn merge(&mut self, other: &PivotCell) {
        self.spent += other.spent;
        self.budgeted_spent += other.budgeted_spent;
        self.budget = match (self.budget, other.budget) {
            (Some(a), Some(b)) => Some(a + b),
            (a, b) => a.or(b),
        };
    }

    fn merged<'c>(cells: impl IntoIterator<Item = &'c PivotCell>) -> PivotCell {
        cells.into_iter().fold(PivotCell::default(), |mut acc, cell| {
            acc.merge(cell);
            acc
        })
    }
}

/// What a pivot row stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    /// Calendar month 1..=12
    Month(u32),
    /// Months 1 through `through` of the current year
    YearToDate { through: u32 },
    /// All twelve months, when the selection is not the current year
    FullYear,
    /// All twelve months unconditionally
    YearEnd,
}

/// One pivot row: a cell per column plus the row total
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotRow {
    pub kind: RowKind,
    pub cells: Vec<PivotCell>,
    pub total: PivotCell,
}

impl PivotRow {
    fn new(kind: RowKind, cells: Vec<PivotCell>) -> Self {
        let total = PivotCell::merged(&cells);
        Self { kind, cells, total }
    }

    /// Sum of rows, column by column
    fn summary(kind: RowKind, rows: &[PivotRow], width: usize) -> Self {
        let cells = (0..width)
            .map(|column| PivotCell::merged(rows.iter().map(|row| &row.cells[column])))
            .collect();
        Self::new(kind, cells)
    }
}

/// The computed pivot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotReport {
    pub selection: YearSelection,
    pub columns: Vec<CategoryColumn>,
    /// January through December
    pub months: Vec<PivotRow>,
    pub year_to_date: PivotRow,
    pub year_end: PivotRow,
}

impl PivotReport {
    /// Index of a named column, matched ignoring case
    pub fn column_index(&self, category: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.name().is_some_and(|name| same_name(name, category)))
    }

    /// Cell for one month (1..=12) and category
    pub fn cell(&self, month: u32, category: &str) -> Option<&PivotCell> {
        let column = self.column_index(category)?;
        let row = self.months.get(month.checked_sub(1)? as usize)?;
        row.cells.get(column)
    }

    /// Every row in display order: months, then the two summaries
    pub fn rows(&self) -> impl Iterator<Item = &PivotRow> {
        self.months
            .iter()
            .chain([&self.year_to_date, &self.year_end])
    }
}

/// Pivot columns: registry order, then other categories found in the
/// expenses sorted ignoring case, then the uncategorized column if needed
pub fn pivot_columns(expenses: &[Expense], categories: &[String]) -> Vec<CategoryColumn> {
    let mut columns: Vec<CategoryColumn> = Vec::new();
    let mut keys: HashSet<String> = HashSet::new();

    for name in categories {
        let name = name.trim();
        if !name.is_empty() && keys.insert(name_key(name)) {
            columns.push(CategoryColumn::Named(name.to_string()));
        }
    }

    let mut extras: Vec<String> = Vec::new();
    let mut uncategorized = false;
    for expense in expenses {
        let category = expense.category().trim();
        if category.is_empty() {
            uncategorized = true;
        } else if keys.insert(name_key(category)) {
            extras.push(category.to_string());
        }
    }

    extras.sort_by_key(|name| name_key(name));
    columns.extend(extras.into_iter().map(CategoryColumn::Named));
    if uncategorized {
        columns.push(CategoryColumn::Uncategorized);
    }

    columns
}

/// Compute the pivot as of today
pub fn compute_pivot(
    expenses: &[Expense],
    categories: &[String],
    selection: YearSelection,
    budgets: &YearBudgets,
) -> PivotReport {
    compute_pivot_at(
        expenses,
        categories,
        selection,
        budgets,
        Local::now().date_naive(),
    )
}

/// Compute the pivot with an explicit "today" for the year-to-date row
///
/// Expenses whose date does not parse are left out. Prices that do not
/// parse count as zero. Budgets apply only to a single-year selection.
pub fn compute_pivot_at(
    expenses: &[Expense],
    categories: &[String],
    selection: YearSelection,
    budgets: &YearBudgets,
    today: NaiveDate,
) -> PivotReport {
    let columns = pivot_columns(expenses, categories);
    let width = columns.len();

    let column_of: HashMap<Option<String>, usize> = columns
        .iter()
        .enumerate()
        .map(|(index, column)| (column.name().map(name_key), index))
        .collect();

    let mut spent = vec![vec![0.0_f64; width]; 12];
    for expense in expenses {
        let Some(date) = expense.parsed_date() else {
            continue;
        };
        if let YearSelection::Year(year) = selection {
            if date.year() != year {
                continue;
            }
        }

        let category = expense.category().trim();
        let key = (!category.is_empty()).then(|| name_key(category));
        if let Some(&column) = column_of.get(&key) {
            spent[date.month0() as usize][column] += expense.amount().unwrap_or(0.0);
        }
    }

    let lookup = budget_lookup(selection, budgets);
    let months: Vec<PivotRow> = (1..=12u32)
        .map(|month| {
            let cells = columns
                .iter()
                .enumerate()
                .map(|(column, category)| {
                    let budget = category
                        .name()
                        .and_then(|name| lookup.get(&(month, name_key(name))).copied());
                    PivotCell::new(spent[month as usize - 1][column], budget)
                })
                .collect();
            PivotRow::new(RowKind::Month(month), cells)
        })
        .collect();

    let ytd_kind = match selection {
        YearSelection::Year(year) if year == today.year() => RowKind::YearToDate {
            through: today.month(),
        },
        _ => RowKind::FullYear,
    };
    let ytd_months = match ytd_kind {
        RowKind::YearToDate { through } => through as usize,
        _ => 12,
    };

    // Summaries merge their months' cells first and branch once on the merged
    // cell: a column budgeted in any month shows summed budgets minus spending
    // in the budgeted months, and unbudgeted months' spending stays in `spent`.
    let year_to_date = PivotRow::summary(ytd_kind, &months[..ytd_months], width);
    let year_end = PivotRow::summary(RowKind::YearEnd, &months, width);

    PivotReport {
        selection,
        columns,
        months,
        year_to_date,
        year_end,
    }
}

/// Budget amounts keyed by (month, category key)
///
/// When two stored names differ only by case, the first in key order wins.
fn budget_lookup(selection: YearSelection, budgets: &YearBudgets) -> HashMap<(u32, String), f64> {
    let mut lookup = HashMap::new();
    if selection == YearSelection::All {
        return lookup;
    }

    for month in 1..=12u32 {
        if let Some(per_category) = budgets.get(&month_key(month)) {
            for (category, amount) in per_category {
                lookup.entry((month, name_key(category))).or_insert(*amount);
            }
        }
    }
    lookup
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseFields, ExpenseId};
    use std::collections::BTreeMap;

    fn expense(date: &str, price: &str, category: &str) -> Expense {
        Expense::new(
            ExpenseId::generate(),
            ExpenseFields::new("item", date, price, category, ""),
        )
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn budgets(entries: &[(u32, &str, f64)]) -> YearBudgets {
        let mut year: YearBudgets = BTreeMap::new();
        for (month, category, amount) in entries {
            year.entry(month_key(*month))
                .or_default()
                .insert(category.to_string(), *amount);
        }
        year
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_budgeted_and_unbudgeted_cells() {
        let expenses = vec![expense("10/01/2024", "10", "Food"), expense("03/02/2024", "20", "Food")];
        let report = compute_pivot_at(
            &expenses,
            &names(&["Food"]),
            YearSelection::Year(2024),
            &budgets(&[(1, "Food", 15.0)]),
            date(2024, 6, 1),
        );

        let january = report.cell(1, "Food").unwrap();
        assert_close(january.value(), 5.0);
        assert_eq!(january.tone(), CellTone::UnderBudget);

        let february = report.cell(2, "Food").unwrap();
        assert_close(february.value(), 20.0);
        assert_eq!(february.tone(), CellTone::Unbudgeted);

        // Through June: Food is budgeted in January only
        assert_eq!(report.year_to_date.kind, RowKind::YearToDate { through: 6 });
        let food_ytd = &report.year_to_date.cells[0];
        assert_close(food_ytd.spent, 30.0);
        assert_close(food_ytd.value(), 5.0);
    }

    #[test]
    fn test_month_total_uses_budgeted_categories_only() {
        let expenses = vec![
            expense("01/03/2024", "40", "Food"),
            expense("02/03/2024", "7", "Fun"),
            expense("05/04/2024", "7", "Fun"),
        ];
        let report = compute_pivot_at(
            &expenses,
            &names(&["Food", "Fun"]),
            YearSelection::Year(2024),
            &budgets(&[(3, "Food", 100.0)]),
            date(2024, 12, 31),
        );

        let march = &report.months[2];
        assert_close(march.total.value(), 60.0);
        assert_close(march.total.spent, 47.0);

        let april = &report.months[3];
        assert!(!april.total.is_budgeted());
        assert_close(april.total.value(), 7.0);
    }

    #[test]
    fn test_zero_budget_is_explicit() {
        let expenses = vec![expense("01/05/2024", "12", "Rent")];
        let report = compute_pivot_at(
            &expenses,
            &names(&["Rent"]),
            YearSelection::Year(2024),
            &budgets(&[(5, "Rent", 0.0), (6, "Rent", 0.0)]),
            date(2024, 1, 1),
        );

        let may = report.cell(5, "Rent").unwrap();
        assert_close(may.value(), -12.0);
        assert_eq!(may.tone(), CellTone::OverBudget);

        let june = report.cell(6, "Rent").unwrap();
        assert_close(june.value(), 0.0);
        assert_eq!(june.tone(), CellTone::OnBudget);

        let july = report.cell(7, "Rent").unwrap();
        assert_close(july.value(), 0.0);
        assert_eq!(july.tone(), CellTone::Unbudgeted);
    }

    #[test]
    fn test_year_to_date_scope() {
        let expenses = vec![
            expense("15/01/2024", "1", "Food"),
            expense("15/02/2024", "2", "Food"),
            expense("15/11/2024", "4", "Food"),
        ];
        let categories = names(&["Food"]);
        let empty = YearBudgets::new();

        let current = compute_pivot_at(
            &expenses,
            &categories,
            YearSelection::Year(2024),
            &empty,
            date(2024, 2, 10),
        );
        assert_eq!(current.year_to_date.kind, RowKind::YearToDate { through: 2 });
        assert_close(current.year_to_date.total.value(), 3.0);
        assert_close(current.year_end.total.value(), 7.0);

        let past = compute_pivot_at(
            &expenses,
            &categories,
            YearSelection::Year(2024),
            &empty,
            date(2025, 2, 10),
        );
        assert_eq!(past.year_to_date.kind, RowKind::FullYear);
        assert_close(past.year_to_date.total.value(), 7.0);
    }

    #[test]
    fn test_all_years_ignores_budgets() {
        let expenses = vec![
            expense("15/01/2023", "1", "Food"),
            expense("15/01/2024", "2", "Food"),
            expense("15/01/2022", "abc", "Food"),
            expense("not a date", "100", "Food"),
        ];
        let report = compute_pivot_at(
            &expenses,
            &names(&["Food"]),
            YearSelection::All,
            &budgets(&[(1, "Food", 50.0)]),
            date(2024, 6, 1),
        );

        let january = report.cell(1, "Food").unwrap();
        assert!(!january.is_budgeted());
        assert_close(january.value(), 3.0);
        assert_close(report.year_end.total.value(), 3.0);
    }

    #[test]
    fn test_year_filter_and_case_insensitive_columns() {
        let expenses = vec![
            expense("15/01/2024", "5", "food"),
            expense("15/01/2023", "9", "Food"),
            expense("15/01/2024", "2", "zoo"),
            expense("15/01/2024", "3", "Books"),
            expense("15/01/2024", "1", ""),
        ];
        let report = compute_pivot_at(
            &expenses,
            &names(&["Food", "food", " "]),
            YearSelection::Year(2024),
            &budgets(&[(1, "FOOD", 10.0)]),
            date(2024, 6, 1),
        );

        assert_eq!(
            report.columns,
            vec![
                CategoryColumn::Named("Food".into()),
                CategoryColumn::Named("Books".into()),
                CategoryColumn::Named("zoo".into()),
                CategoryColumn::Uncategorized,
            ]
        );

        let food = report.cell(1, "FOOD").unwrap();
        assert_close(food.spent, 5.0);
        assert_close(food.value(), 5.0);
        assert_close(report.months[0].cells[3].spent, 1.0);
        assert!(report.cell(13, "Food").is_none());
        assert!(report.cell(0, "Food").is_none());
    }

    #[test]
    fn test_empty_pivot() {
        let report = compute_pivot_at(
            &[],
            &names(&["Food"]),
            YearSelection::Year(2024),
            &YearBudgets::new(),
            date(2024, 3, 1),
        );

        assert_eq!(report.months.len(), 12);
        assert_eq!(report.rows().count(), 14);
        assert_close(report.year_end.total.value(), 0.0);
    }

    #[test]
    fn test_cell_merge() {
        let mut cell = PivotCell::new(10.0, Some(15.0));
        cell.merge(&PivotCell::new(20.0, None));
        cell.merge(&PivotCell::new(4.0, Some(5.0)));

        assert_close(cell.spent, 34.0);
        assert_eq!(cell.budget, Some(20.0));
        assert_close(cell.budgeted_spent, 14.0);
        assert_close(cell.value(), 6.0);
    }

    #[test]
    fn test_year_selection_parse() {
        assert_eq!("2024".parse::<YearSelection>().unwrap(), YearSelection::Year(2024));
        assert_eq!("ALL".parse::<YearSelection>().unwrap(), YearSelection::All);
        assert!("someday".parse::<YearSelection>().is_err());
    }
}
