//! Expense CLI commands

use chrono::Local;
use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_expense_details, format_expense_table, Labels};
use crate::error::LedgerResult;
use crate::models::{ExpenseFields, DATE_FORMAT};
use crate::services::{ExpenseFilter, ExpenseService, ExpenseSort, SortKey};
use crate::storage::Storage;

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Add an expense
    Add {
        /// What the money was spent on
        name: String,
        /// Price, a number or a calculation such as "10+5" or "12,5"
        #[arg(allow_hyphen_values = true)]
        price: String,
        /// Category
        #[arg(short, long)]
        category: String,
        /// Date (DD/MM/YYYY), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Free-text description
        #[arg(long, default_value = "")]
        description: String,
        /// Store even if an identical expense exists
        #[arg(long)]
        allow_duplicate: bool,
    },

    /// Change fields of an expense
    Edit {
        /// Expense id or unambiguous id prefix
        id: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long, allow_hyphen_values = true)]
        price: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Save even if it makes the expense identical to another
        #[arg(long)]
        allow_duplicate: bool,
    },

    /// Delete an expense
    Delete {
        /// Expense id or unambiguous id prefix
        id: String,
    },

    /// Show one expense
    Show {
        /// Expense id or unambiguous id prefix
        id: String,
    },

    /// List expenses
    List {
        /// Text to look for in any column
        #[arg(short, long)]
        search: Option<String>,
        /// Only this year
        #[arg(short, long)]
        year: Option<i32>,
        /// Only this month (needs --year)
        #[arg(short, long, requires = "year")]
        month: Option<u32>,
        /// Sort column: date, name, price or category
        #[arg(long, default_value = "date")]
        sort: String,
        /// Sort in descending order
        #[arg(long)]
        desc: bool,
        /// Show at most this many expenses
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Give every row of the expense file an id
    Migrate,
}

/// Today in the expense file's date format
pub fn today() -> String {
    Local::now().date_naive().format(DATE_FORMAT).to_string()
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> LedgerResult<()> {
    let service = ExpenseService::new(storage);
    let labels = Labels::new(settings.language);

    match cmd {
        ExpenseCommands::Add {
            name,
            price,
            category,
            date,
            description,
            allow_duplicate,
        } => {
            let date = date.unwrap_or_else(today);
            let fields = ExpenseFields::new(name, date, price, category, description);
            let expense = service.add(&fields, allow_duplicate)?;

            println!("Added expense: {}", expense);
            println!("  ID: {}", expense.id);
        }

        ExpenseCommands::Edit {
            id,
            name,
            date,
            price,
            category,
            description,
            allow_duplicate,
        } => {
            let existing = service.find(&id)?;

            if name.is_none()
                && date.is_none()
                && price.is_none()
                && category.is_none()
                && description.is_none()
            {
                println!("No changes specified.");
                return Ok(());
            }

            let current = &existing.fields;
            let fields = ExpenseFields::new(
                name.unwrap_or_else(|| current.name.clone()),
                date.unwrap_or_else(|| current.date.clone()),
                price.unwrap_or_else(|| current.price.clone()),
                category.unwrap_or_else(|| current.category.clone()),
                description.unwrap_or_else(|| current.description.clone()),
            );

            let updated = service.update(&existing.id, &fields, allow_duplicate)?;
            println!("Updated expense: {}", updated);
        }

        ExpenseCommands::Delete { id } => {
            let expense = service.find(&id)?;
            let removed = service.delete(&expense.id)?;
            println!("Deleted expense: {}", removed);
        }

        ExpenseCommands::Show { id } => {
            let expense = service.find(&id)?;
            print!("{}", format_expense_details(&expense, &labels));
        }

        ExpenseCommands::List {
            search,
            year,
            month,
            sort,
            desc,
            limit,
        } => {
            let mut filter = ExpenseFilter::new();
            filter.search = search;
            filter.year = year;
            filter.month = month;
            filter.limit = limit;

            let sort = ExpenseSort {
                key: sort.parse::<SortKey>()?,
                descending: desc,
            };

            let expenses = service.list(&filter, sort)?;
            print!(
                "{}",
                format_expense_table(&expenses, &labels, &settings.currency_symbol)
            );
        }

        ExpenseCommands::Migrate => {
            let report = service.migrate()?;
            if report.changed() {
                println!(
                    "Migrated {} of {} rows in {}",
                    report.migrated,
                    report.rows,
                    storage.expenses.path().display()
                );
            } else {
                println!("Expense file is up to date ({} rows).", report.rows);
            }
        }
    }

    Ok(())
}
