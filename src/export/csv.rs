//! CSV export
//!
//! Spreadsheet-friendly files with a header row, unlike the ledger's own
//! header-less expense file.

use std::io::Write;

use csv::WriterBuilder;

use crate::error::LedgerResult;
use crate::models::{format_amount, Expense};
use crate::storage::BudgetData;

/// Export expenses with both the entered price and its evaluated amount
///
/// The amount column is blank when the price text does not evaluate.
pub fn export_expenses_csv<W: Write>(expenses: &[Expense], writer: W) -> LedgerResult<()> {
    let mut csv = WriterBuilder::new().from_writer(writer);
    csv.write_record([
        "id",
        "name",
        "date",
        "price",
        "amount",
        "category",
        "description",
    ])?;

    for expense in expenses {
        let amount = expense.amount().map(format_amount).unwrap_or_default();
        csv.write_record([
            expense.id.as_str(),
            expense.name(),
            expense.date(),
            expense.price(),
            amount.as_str(),
            expense.category(),
            expense.description(),
        ])?;
    }

    csv.flush()?;
    Ok(())
}

/// Export budgets as one `year,month,category,amount` line per entry
pub fn export_budgets_csv<W: Write>(budgets: &BudgetData, writer: W) -> LedgerResult<()> {
    let mut csv = WriterBuilder::new().from_writer(writer);
    csv.write_record(["year", "month", "category", "amount"])?;

    for (year, months) in budgets {
        for (month, categories) in months {
            for (category, amount) in categories {
                csv.write_record([
                    year.as_str(),
                    month.as_str(),
                    category.as_str(),
                    format_amount(*amount).as_str(),
                ])?;
            }
        }
    }

    csv.flush()?;
    Ok(())
}
