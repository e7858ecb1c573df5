//! YAML export
//!
//! Same structures as the JSON export, for reading by humans.

use std::io::Write;

use crate::display::Labels;
use crate::error::{LedgerError, LedgerResult};
use crate::reports::PivotReport;
use crate::storage::Storage;

use super::json::{FullExport, PivotExport};

/// Export everything as YAML, preceded by a comment header
pub fn export_full_yaml<W: Write>(storage: &Storage, writer: &mut W) -> LedgerResult<()> {
    let export = FullExport::from_storage(storage)?;

    writeln!(writer, "# Expense ledger export")?;
    writeln!(writer, "# Generated: {}", export.exported_at)?;
    writeln!(writer, "# App Version: {}", export.app_version)?;
    writeln!(writer)?;

    serde_yaml::to_writer(writer, &export).map_err(|e| LedgerError::Export(e.to_string()))
}

/// Parse and validate a YAML export
pub fn import_from_yaml(yaml_str: &str) -> LedgerResult<FullExport> {
    let export: FullExport =
        serde_yaml::from_str(yaml_str).map_err(|e| LedgerError::Export(e.to_string()))?;
    export.validate().map_err(LedgerError::Validation)?;
    Ok(export)
}

/// Export the pivot as YAML
pub fn export_pivot_yaml<W: Write>(
    report: &PivotReport,
    labels: &Labels,
    writer: &mut W,
) -> LedgerResult<()> {
    serde_yaml::to_writer(writer, &PivotExport::from_report(report, labels))
        .map_err(|e| LedgerError::Export(e.to_string()))
}
