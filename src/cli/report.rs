//! CLI command for the budget pivot report

use std::io::{self, IsTerminal, Write};

use chrono::{Datelike, Local};
use clap::{Args, ValueEnum};

use crate::config::Settings;
use crate::display::{format_pivot, Labels};
use crate::error::LedgerResult;
use crate::export::{export_pivot_json, export_pivot_yaml};
use crate::reports::{compute_pivot, PivotReport, YearSelection};
use crate::services::{BudgetService, CategoryService, ExpenseService};
use crate::storage::{Storage, YearBudgets};

/// How the report is printed
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum ReportFormat {
    /// Table for the terminal
    #[default]
    Table,
    Json,
    Yaml,
}

/// Arguments of the report command
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Year to report on, or "all" (defaults to the current year)
    #[arg(short, long)]
    pub year: Option<YearSelection>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: ReportFormat,

    /// Never color amounts against their budgets
    #[arg(long)]
    pub no_color: bool,
}

/// Build the pivot for a selection from what is on disk
pub fn load_pivot(storage: &Storage, selection: YearSelection) -> LedgerResult<PivotReport> {
    let expenses = ExpenseService::new(storage).load()?;
    let categories = CategoryService::new(storage).list()?.names();
    let budgets = match selection {
        YearSelection::Year(year) => BudgetService::new(storage).year_budgets(year),
        YearSelection::All => YearBudgets::new(),
    };

    Ok(compute_pivot(&expenses, &categories, selection, &budgets))
}

/// The selection used when none is given
pub fn current_selection() -> YearSelection {
    YearSelection::Year(Local::now().year())
}

/// Handle the report command
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    args: ReportArgs,
) -> LedgerResult<()> {
    let selection = args.year.unwrap_or_else(current_selection);
    let report = load_pivot(storage, selection)?;
    let labels = Labels::new(settings.language);

    match args.format {
        ReportFormat::Table => {
            let color = !args.no_color && io::stdout().is_terminal();
            print!("{}", format_pivot(&report, &labels, color));
        }
        ReportFormat::Json => {
            let mut stdout = io::stdout().lock();
            export_pivot_json(&report, &labels, &mut stdout)?;
            writeln!(stdout)?;
        }
        ReportFormat::Yaml => {
            let mut stdout = io::stdout().lock();
            export_pivot_yaml(&report, &labels, &mut stdout)?;
        }
    }

    Ok(())
}
