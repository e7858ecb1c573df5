//! CLI commands for data export

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Subcommand, ValueEnum};

use crate::config::Settings;
use crate::display::Labels;
use crate::error::{LedgerError, LedgerResult};
use crate::export::{
    export_budgets_csv, export_expenses_csv, export_full_json, export_full_yaml,
    export_pivot_json, export_pivot_yaml, FullExport,
};
use crate::reports::YearSelection;
use crate::services::ExpenseService;
use crate::storage::Storage;

use super::report::{current_selection, load_pivot};

/// Structured export formats
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// JSON
    Json,
    /// YAML, human-readable
    Yaml,
}

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export expenses, categories and budgets to one file
    All {
        /// Output file path
        output: PathBuf,

        /// Export format
        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Export expenses to CSV
    Expenses {
        /// Output file path
        output: PathBuf,
    },

    /// Export budgets to CSV
    Budgets {
        /// Output file path
        output: PathBuf,
    },

    /// Export the budget pivot
    Pivot {
        /// Output file path
        output: PathBuf,

        /// Year to report on, or "all" (defaults to the current year)
        #[arg(short, long)]
        year: Option<YearSelection>,

        /// Export format
        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,
    },

    /// Show what an export would contain without writing files
    Info,
}

fn create_output(output: &Path) -> LedgerResult<BufWriter<File>> {
    let file = File::create(output).map_err(|e| {
        LedgerError::Export(format!(
            "Failed to create file {}: {}",
            output.display(),
            e
        ))
    })?;
    Ok(BufWriter::new(file))
}

/// Handle export commands
pub fn handle_export_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExportCommands,
) -> LedgerResult<()> {
    match cmd {
        ExportCommands::All {
            output,
            format,
            pretty,
        } => {
            let mut writer = create_output(&output)?;
            match format {
                ExportFormat::Json => export_full_json(storage, &mut writer, pretty)?,
                ExportFormat::Yaml => export_full_yaml(storage, &mut writer)?,
            }
            writer.flush()?;
            println!("Ledger exported to: {}", output.display());
        }

        ExportCommands::Expenses { output } => {
            let expenses = ExpenseService::new(storage).load()?;
            export_expenses_csv(&expenses, create_output(&output)?)?;
            println!(
                "Exported {} expenses to: {}",
                expenses.len(),
                output.display()
            );
        }

        ExportCommands::Budgets { output } => {
            let budgets = storage.budgets.load();
            export_budgets_csv(&budgets, create_output(&output)?)?;
            println!(
                "Exported budgets for {} year(s) to: {}",
                budgets.len(),
                output.display()
            );
        }

        ExportCommands::Pivot {
            output,
            year,
            format,
        } => {
            let report = load_pivot(storage, year.unwrap_or_else(current_selection))?;
            let labels = Labels::new(settings.language);
            let mut writer = create_output(&output)?;
            match format {
                ExportFormat::Json => export_pivot_json(&report, &labels, &mut writer)?,
                ExportFormat::Yaml => export_pivot_yaml(&report, &labels, &mut writer)?,
            }
            writer.flush()?;
            println!(
                "Pivot for {} exported to: {}",
                report.selection,
                output.display()
            );
        }

        ExportCommands::Info => {
            let export = FullExport::from_storage(storage)?;
            let metadata = &export.metadata;
            println!("Export Information");
            println!("==================");
            println!("Schema version: {}", export.schema_version);
            println!("Expenses:       {}", metadata.expense_count);
            println!("Categories:     {}", metadata.category_count);
            println!("Budget years:   {}", join_years(&metadata.budget_years));
            println!("Expense years:  {}", join_years(&metadata.expense_years));
        }
    }

    Ok(())
}

fn join_years<T: ToString>(years: &[T]) -> String {
    if years.is_empty() {
        return "-".to_string();
    }
    years
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
