//! CLI command for reading the audit log

use clap::Args;

use crate::error::LedgerResult;
use crate::storage::Storage;

/// Arguments of the audit command
#[derive(Args, Debug)]
pub struct AuditArgs {
    /// Number of most recent entries to show
    #[arg(short, long, default_value = "20")]
    pub limit: usize,
}

/// Print the most recent audit entries, newest last
pub fn handle_audit_command(storage: &Storage, args: AuditArgs) -> LedgerResult<()> {
    let logger = storage.audit();
    let entries = logger.read_recent(args.limit)?;

    if entries.is_empty() {
        println!("No audit entries in {}", logger.path().display());
        return Ok(());
    }

    for entry in &entries {
        println!("{}", entry.format_human_readable());
    }
    println!();
    println!(
        "Showing {} of {} entries",
        entries.len(),
        logger.entry_count()?
    );

    Ok(())
}
