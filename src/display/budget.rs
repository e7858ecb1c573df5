//! Budget grid formatting
//!
//! One row per month, one column per category. Empty cells have no budget;
//! `0.00` is an explicit zero budget.

use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};

use crate::models::category::same_name;
use crate::models::format_amount;
use crate::storage::{month_key, YearBudgets};

use super::labels::Labels;

/// Render a year's budgets for the given categories
///
/// Budgeted categories missing from `categories` get their own columns at
/// the end so nothing stored is hidden.
pub fn format_year_budgets(
    year: i32,
    budgets: &YearBudgets,
    categories: &[String],
    labels: &Labels,
) -> String {
    let mut columns: Vec<String> = categories.to_vec();
    for per_category in budgets.values() {
        for name in per_category.keys() {
            if !columns.iter().any(|c| same_name(c, name)) {
                columns.push(name.clone());
            }
        }
    }

    let mut builder = Builder::default();
    let mut header = vec![labels.month.to_string()];
    header.extend(columns.iter().cloned());
    builder.push_record(header);

    for month in 1..=12u32 {
        let per_category = budgets.get(&month_key(month));
        let mut record = vec![labels.month_name(month)];
        record.extend(columns.iter().map(|column| {
            per_category
                .and_then(|entries| entries.iter().find(|(name, _)| same_name(name, column)))
                .map(|(_, amount)| format_amount(*amount))
                .unwrap_or_default()
        }));
        builder.push_record(record);
    }

    let mut table = builder.build();
    table
        .with(Style::psql())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()));

    format!("{}\n\n{}\n", labels.budget_title(year), table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Language;
    use std::collections::BTreeMap;

    #[test]
    fn test_budget_grid() {
        let mut budgets = YearBudgets::new();
        budgets.insert(
            "01".to_string(),
            BTreeMap::from([("Food".to_string(), 150.0), ("Rent".to_string(), 0.0)]),
        );

        let output = format_year_budgets(
            2024,
            &budgets,
            &["Food".to_string()],
            &Labels::new(Language::En),
        );

        assert!(output.starts_with("Budgets for 2024"));
        assert!(output.contains("Rent"));
        assert!(output.contains("150.00"));
        assert!(output.contains("0.00"));
        assert!(output.contains("December"));
    }
}
