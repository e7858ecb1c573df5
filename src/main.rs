use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use expense_ledger::cli::{
    handle_audit_command, handle_budget_command, handle_category_command, handle_expense_command,
    handle_export_command, handle_report_command,
};
use expense_ledger::config::paths::DATA_DIR_ENV;
use expense_ledger::config::{Language, LedgerPaths, Settings};
use expense_ledger::models::format_price;
use expense_ledger::storage::Storage;

#[derive(Parser)]
#[command(
    name = "ledger",
    version,
    about = "Personal expense ledger with monthly budgets",
    long_about = "Keeps expenses in a plain CSV file, categories with colors and \
                  monthly budgets in JSON side files, and shows a month by \
                  category pivot of spending against budgets."
)]
struct Cli {
    /// Directory holding the ledger files
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Expense management commands
    #[command(subcommand, alias = "exp")]
    Expense(expense_ledger::cli::ExpenseCommands),

    /// Category management commands
    #[command(subcommand)]
    Category(expense_ledger::cli::CategoryCommands),

    /// Budget management commands
    #[command(subcommand)]
    Budget(expense_ledger::cli::BudgetCommands),

    /// Month by category pivot of spending against budgets
    Report(expense_ledger::cli::ReportArgs),

    /// Export data to files
    #[command(subcommand)]
    Export(expense_ledger::cli::ExportCommands),

    /// Evaluate a price expression such as "4+5*6" or "12,5"
    Price {
        #[arg(allow_hyphen_values = true)]
        expression: String,
    },

    /// Show recent changes from the audit log
    Audit(expense_ledger::cli::AuditArgs),

    /// Show configuration and paths, or change settings
    Config {
        /// Label language (fr or en)
        #[arg(long)]
        language: Option<Language>,
        /// Currency symbol shown next to totals
        #[arg(long)]
        currency: Option<String>,
        /// Record changes in the audit log
        #[arg(long)]
        audit: Option<bool>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = match cli.data_dir {
        Some(dir) => LedgerPaths::with_base_dir(dir),
        None => LedgerPaths::new()?,
    };
    let mut settings = Settings::load_or_create(&paths)?;

    let storage = Storage::new(paths.clone())?.with_audit(settings.audit_enabled);

    match cli.command {
        Some(Commands::Expense(cmd)) => {
            handle_expense_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Category(cmd)) => {
            handle_category_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Budget(cmd)) => {
            handle_budget_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Report(args)) => {
            handle_report_command(&storage, &settings, args)?;
        }
        Some(Commands::Export(cmd)) => {
            handle_export_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Price { expression }) => {
            println!("{}", format_price(&expression)?);
        }
        Some(Commands::Audit(args)) => {
            handle_audit_command(&storage, args)?;
        }
        Some(Commands::Config {
            language,
            currency,
            audit,
        }) => {
            let changed = language.is_some() || currency.is_some() || audit.is_some();
            if let Some(language) = language {
                settings.language = language;
            }
            if let Some(currency) = currency {
                settings.currency_symbol = currency;
            }
            if let Some(audit) = audit {
                settings.audit_enabled = audit;
            }
            if changed {
                settings.save(&paths)?;
                println!("Settings saved.");
                println!();
            }

            println!("Expense Ledger Configuration");
            println!("============================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Expenses:       {}", paths.expenses_file().display());
            println!("Categories:     {}", paths.categories_file().display());
            println!("Budgets:        {}", paths.budgets_file().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Language:      {}", settings.language);
            println!("  Currency:      {}", settings.currency_symbol);
            println!("  Audit enabled: {}", settings.audit_enabled);
        }
        None => {
            println!("Expense ledger");
            println!();
            println!("Run 'ledger --help' for usage information.");
        }
    }

    Ok(())
}
