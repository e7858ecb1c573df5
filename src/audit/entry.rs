//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::diff::generate_diff;

/// Kinds of change recorded in the audit log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
    /// Bulk rewrite of stored ids
    Migrate,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
            Operation::Migrate => write!(f, "MIGRATE"),
        }
    }
}

/// What a logged change applied to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Expense,
    Category,
    Budget,
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityType::Expense => write!(f, "Expense"),
            EntityType::Category => write!(f, "Category"),
            EntityType::Budget => write!(f, "Budget"),
        }
    }
}

/// One line of the audit log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    /// Expense id, category name or budget year
    pub entity_id: String,

    /// Human-readable label, e.g. the expense name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    fn new(operation: Operation, entity_type: EntityType, entity_id: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id: entity_id.into(),
            entity_name: None,
            before: None,
            after: None,
            diff_summary: None,
        }
    }

    /// Entry for a newly stored entity
    pub fn create<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            entity_name,
            after: serde_json::to_value(entity).ok(),
            ..Self::new(Operation::Create, entity_type, entity_id)
        }
    }

    /// Entry for a modified entity, with the change summary computed here
    pub fn update<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Self {
        let before = serde_json::to_value(before).ok();
        let after = serde_json::to_value(after).ok();
        let diff_summary = match (&before, &after) {
            (Some(b), Some(a)) => generate_diff(b, a),
            _ => None,
        };

        Self {
            entity_name,
            before,
            after,
            diff_summary,
            ..Self::new(Operation::Update, entity_type, entity_id)
        }
    }

    /// Entry for a removed entity
    pub fn delete<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            entity_name,
            before: serde_json::to_value(entity).ok(),
            ..Self::new(Operation::Delete, entity_type, entity_id)
        }
    }

    /// Entry for a bulk migration, described only by its summary
    pub fn migrate(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            diff_summary: Some(summary.into()),
            ..Self::new(Operation::Migrate, entity_type, entity_id)
        }
    }

    /// Whether the entry records a change with nothing actually changed
    pub fn is_noop(&self) -> bool {
        self.operation == Operation::Update && self.diff_summary.is_none()
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if let Some(name) = &self.entity_name {
            output.push_str(&format!(" ({})", name));
        }

        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display() {
        assert_eq!(Operation::Migrate.to_string(), "MIGRATE");
        assert_eq!(EntityType::Budget.to_string(), "Budget");
    }

    #[test]
    fn test_create_entry() {
        let data = json!({"name": "Bread", "price": "2,5"});
        let entry = AuditEntry::create(
            EntityType::Expense,
            "0a1b2c3d",
            Some("Bread".to_string()),
            &data,
        );

        assert_eq!(entry.operation, Operation::Create);
        assert_eq!(entry.entity_type, EntityType::Expense);
        assert!(entry.before.is_none());
        assert_eq!(entry.after, Some(data));
    }

    #[test]
    fn test_update_entry_computes_diff() {
        let before = json!({"name": "Bread", "price": "2"});
        let after = json!({"name": "Bread", "price": "3"});

        let entry = AuditEntry::update(EntityType::Expense, "id1", None, &before, &after);

        assert_eq!(entry.operation, Operation::Update);
        assert_eq!(entry.diff_summary.as_deref(), Some("price: \"2\" -> \"3\""));
        assert!(!entry.is_noop());

        let same = AuditEntry::update(EntityType::Expense, "id1", None, &before, &before);
        assert!(same.is_noop());
    }

    #[test]
    fn test_delete_and_migrate_entries() {
        let entry = AuditEntry::delete(EntityType::Category, "Food", None, &json!({"name": "Food"}));
        assert!(entry.before.is_some());
        assert!(entry.after.is_none());

        let entry = AuditEntry::migrate(EntityType::Expense, "expenses.csv", "3 of 10 rows");
        assert_eq!(entry.operation, Operation::Migrate);
        assert_eq!(entry.diff_summary.as_deref(), Some("3 of 10 rows"));
    }

    #[test]
    fn test_serialization() {
        let entry = AuditEntry::create(EntityType::Budget, "2024", None, &json!({"01": {}}));

        let line = serde_json::to_string(&entry).unwrap();
        assert!(line.contains("\"operation\":\"create\""));
        assert!(!line.contains("before"));

        let parsed: AuditEntry = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed.entity_type, EntityType::Budget);
    }

    #[test]
    fn test_human_readable_format() {
        let entry = AuditEntry::update(
            EntityType::Category,
            "Food",
            Some("Food".to_string()),
            &json!({"color": "#fff"}),
            &json!({"color": "#000"}),
        );

        let formatted = entry.format_human_readable();
        assert!(formatted.contains("UPDATE Category Food (Food)"));
        assert!(formatted.contains("Changes: color: \"#fff\" -> \"#000\""));
    }
}
