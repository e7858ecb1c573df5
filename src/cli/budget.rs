//! Budget CLI commands

use chrono::{Datelike, Local};
use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_year_budgets, Labels};
use crate::error::LedgerResult;
use crate::models::format_amount;
use crate::services::{BudgetService, CategoryService};
use crate::storage::Storage;

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Show the budget grid for a year
    Show {
        /// Year (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Set or clear one category's budget for one month
    Set {
        /// Category name
        category: String,
        /// Amount or calculation; omit to clear
        #[arg(allow_hyphen_values = true)]
        amount: Option<String>,
        /// Month (1-12)
        #[arg(short, long)]
        month: u32,
        /// Year (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Set or clear one category's budget for all twelve months
    #[command(name = "apply-year")]
    ApplyYear {
        /// Category name
        category: String,
        /// Amount or calculation; omit to clear
        #[arg(allow_hyphen_values = true)]
        amount: Option<String>,
        /// Year (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Copy every budget of one month onto other months
    #[command(name = "copy-month")]
    CopyMonth {
        /// Source month (1-12)
        from: u32,
        /// Target months (1-12)
        #[arg(required = true)]
        to: Vec<u32>,
        /// Year (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,
    },
}

fn describe(amount: Option<f64>) -> String {
    amount.map_or_else(|| "cleared".to_string(), format_amount)
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BudgetCommands,
) -> LedgerResult<()> {
    let service = BudgetService::new(storage);
    let current_year = Local::now().year();

    match cmd {
        BudgetCommands::Show { year } => {
            let year = year.unwrap_or(current_year);
            let categories = CategoryService::new(storage).list()?.names();
            print!(
                "{}",
                format_year_budgets(
                    year,
                    &service.year_budgets(year),
                    &categories,
                    &Labels::new(settings.language)
                )
            );
        }

        BudgetCommands::Set {
            category,
            amount,
            month,
            year,
        } => {
            let year = year.unwrap_or(current_year);
            let stored =
                service.set_amount(year, month, &category, amount.as_deref().unwrap_or(""))?;
            println!(
                "Budget {} {:02}/{}: {}",
                category.trim(),
                month,
                year,
                describe(stored)
            );
        }

        BudgetCommands::ApplyYear {
            category,
            amount,
            year,
        } => {
            let year = year.unwrap_or(current_year);
            let stored = service.apply_to_year(year, &category, amount.as_deref().unwrap_or(""))?;
            println!(
                "Budget {} for every month of {}: {}",
                category.trim(),
                year,
                describe(stored)
            );
        }

        BudgetCommands::CopyMonth { from, to, year } => {
            let year = year.unwrap_or(current_year);
            let copied = service.copy_month(year, from, &to)?;
            let targets: Vec<String> = to.iter().map(|m| format!("{:02}", m)).collect();
            println!(
                "Copied {} budget(s) from {:02}/{} to {}",
                copied,
                from,
                year,
                targets.join(", ")
            );
        }
    }

    Ok(())
}
