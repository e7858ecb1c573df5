//! Expense identifiers
//!
//! Ids already on disk are opaque tokens and are kept exactly as found.
//! Freshly minted ids are random v4 UUIDs in their 32-character hex form.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

/// Identifier of one expense row
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(String);

impl ExpenseId {
    /// Mint a new random id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Mint a new random id that is not already in `taken`
    pub fn generate_unique(taken: &HashSet<String>) -> Self {
        loop {
            let id = Self::generate();
            if !taken.contains(id.as_str()) {
                return id;
            }
        }
    }

    /// Wrap an existing token (trimmed)
    pub fn from_token(token: impl AsRef<str>) -> Self {
        Self(token.as_ref().trim().to_string())
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the token is blank (legacy rows read without migration)
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Short form for terminal listings
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ExpenseId {
    fn from(token: &str) -> Self {
        Self::from_token(token)
    }
}

impl From<String> for ExpenseId {
    fn from(token: String) -> Self {
        Self::from_token(token)
    }
}
