//! Audit logging for the expense ledger
//!
//! Every mutation made through the service layer is appended to a JSONL
//! file with its before/after values.
//!
//! - `AuditEntry`: one recorded operation with timestamp and entity info
//! - `AuditLogger`: appends entries to the log and reads them back
//! - `generate_diff`: field-level change summary for updates
//!
//! # Example
//!
//! ```rust,ignore
//! use expense_ledger::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! let entry = AuditEntry::update(
//!     EntityType::Expense,
//!     expense.id.as_str(),
//!     Some(expense.name().to_string()),
//!     &before,
//!     &expense,
//! );
//! logger.log(&entry)?;
//! ```

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
