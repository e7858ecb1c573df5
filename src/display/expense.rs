//! Expense listing and detail formatting

use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};

use crate::models::{format_amount, Expense};

use super::labels::Labels;

/// Render expenses as a table followed by a count and total line
///
/// Ids are shortened; any unambiguous prefix is accepted back by the
/// edit and delete commands.
pub fn format_expense_table(expenses: &[Expense], labels: &Labels, currency: &str) -> String {
    if expenses.is_empty() {
        return format!("{}\n", labels.no_expenses);
    }

    let mut builder = Builder::default();
    builder.push_record([
        "Id",
        labels.date,
        labels.name,
        labels.price,
        labels.category,
        labels.description,
    ]
    .map(str::to_string));

    for expense in expenses {
        builder.push_record([
            expense.id.short().to_string(),
            expense.date().to_string(),
            expense.name().to_string(),
            expense.display_price(),
            expense.category().to_string(),
            expense.description().to_string(),
        ]);
    }

    let mut table = builder.build();
    table
        .with(Style::psql())
        .with(Modify::new(Columns::single(3)).with(Alignment::right()));

    let total: f64 = expenses.iter().filter_map(Expense::amount).sum();
    format!(
        "{}\n\n{} | {} {} {}\n",
        table,
        expenses.len(),
        labels.total,
        format_amount(total),
        currency
    )
}

/// Format one expense for display
pub fn format_expense_details(expense: &Expense, labels: &Labels) -> String {
    let mut output = String::new();

    output.push_str(&format!("Id:          {}\n", expense.id));
    output.push_str(&format!("{:<13}{}\n", format!("{}:", labels.name), expense.name()));
    output.push_str(&format!("{:<13}{}\n", format!("{}:", labels.date), expense.date()));

    let price = if expense.display_price() == expense.price() {
        expense.price().to_string()
    } else {
        format!("{} ({})", expense.display_price(), expense.price())
    };
    output.push_str(&format!("{:<13}{}\n", format!("{}:", labels.price), price));
    output.push_str(&format!(
        "{:<13}{}\n",
        format!("{}:", labels.category),
        expense.category()
    ));

    if !expense.description().is_empty() {
        output.push_str(&format!(
            "{:<13}{}\n",
            format!("{}:", labels.description),
            expense.description()
        ));
    }

    output
}
