//! Expense model
//!
//! An expense is one ledger line. The price is kept as the text the user
//! entered (possibly an arithmetic expression); only its display is derived.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::fold_case;
use super::ids::ExpenseId;
use super::price::{format_price, parse_price};
use crate::error::{LedgerError, LedgerResult};

/// Canonical date format of the expense file (DD/MM/YYYY)
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// The user-visible fields of an expense, everything except the id
///
/// Two expenses with equal fields are duplicates regardless of their ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ExpenseFields {
    pub name: String,
    pub date: String,
    pub price: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
}

impl ExpenseFields {
    /// Create a field set from raw input
    pub fn new(
        name: impl Into<String>,
        date: impl Into<String>,
        price: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            date: date.into(),
            price: price.into(),
            category: category.into(),
            description: description.into(),
        }
    }

    /// Trim every field
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            date: self.date.trim().to_string(),
            price: self.price.trim().to_string(),
            category: self.category.trim().to_string(),
            description: self.description.trim().to_string(),
        }
    }

    /// Check required fields and that the price evaluates
    ///
    /// The parsed price is discarded; the text is what gets stored.
    pub fn validate(&self) -> LedgerResult<()> {
        if self.name.trim().is_empty() {
            return Err(LedgerError::MissingField("name"));
        }
        if self.date.trim().is_empty() {
            return Err(LedgerError::MissingField("date"));
        }
        if self.category.trim().is_empty() {
            return Err(LedgerError::MissingField("category"));
        }
        parse_price(&self.price)?;
        Ok(())
    }

    /// Fields in file order: name, date, price, category, description
    pub fn as_row(&self) -> [&str; 5] {
        [
            &self.name,
            &self.date,
            &self.price,
            &self.category,
            &self.description,
        ]
    }
}

/// A single expense record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Stable id (blank only when read from a file that was never migrated)
    pub id: ExpenseId,

    #[serde(flatten)]
    pub fields: ExpenseFields,
}

impl Expense {
    /// Create an expense from an id and its fields
    pub fn new(id: ExpenseId, fields: ExpenseFields) -> Self {
        Self { id, fields }
    }

    pub fn name(&self) -> &str {
        &self.fields.name
    }

    pub fn date(&self) -> &str {
        &self.fields.date
    }

    /// The price exactly as entered
    pub fn price(&self) -> &str {
        &self.fields.price
    }

    pub fn category(&self) -> &str {
        &self.fields.category
    }

    pub fn description(&self) -> &str {
        &self.fields.description
    }

    /// The date as a calendar date, if it follows DD/MM/YYYY
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.fields.date)
    }

    /// The evaluated price, if the text is a valid price
    pub fn amount(&self) -> Option<f64> {
        parse_price(&self.fields.price).ok()
    }

    /// Two-decimal price, falling back to the raw text when it does not parse
    pub fn display_price(&self) -> String {
        format_price(&self.fields.price).unwrap_or_else(|_| self.fields.price.clone())
    }

    /// Whether the expense falls in `year` (and `month`, when given)
    pub fn is_in_period(&self, year: i32, month: Option<u32>) -> bool {
        match self.parsed_date() {
            Some(date) => date.year() == year && month.map_or(true, |m| date.month() == m),
            None => false,
        }
    }

    /// Case-insensitive substring match over every visible column
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = fold_case(needle.trim());
        if needle.is_empty() {
            return true;
        }

        let price = self.display_price();
        [
            self.id.as_str(),
            self.name(),
            self.date(),
            price.as_str(),
            self.category(),
            self.description(),
        ]
        .iter()
        .any(|value| fold_case(value).contains(&needle))
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} ({})",
            self.date(),
            self.name(),
            self.display_price(),
            self.category()
        )
    }
}

/// Parse a DD/MM/YYYY date
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).ok()
}
