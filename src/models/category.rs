//! Category model
//!
//! A category is a name, unique ignoring case, with an optional display
//! color in `#RGB` or `#RRGGBB` form. An empty color string means "none".

use serde::{Deserialize, Serialize};
use std::fmt;

/// Built-in categories used when no usable category file exists
pub const DEFAULT_CATEGORIES: [(&str, &str); 8] = [
    ("Nourriture", "#FFC0CB"),
    ("Vie quotidienne", "#008080"),
    ("Santé", "#b92020"),
    ("Loisir", "#800080"),
    ("Vêtement", "#20b7b9"),
    ("Transport", "#808080"),
    ("Coiffeur", "#A52A2A"),
    ("Épargne", "#008000"),
];

/// A category with its display color
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category name
    pub name: String,

    /// Normalized hex color, or empty
    #[serde(default)]
    pub color: String,
}

impl Category {
    /// Create a category, normalizing the color
    pub fn new(name: impl Into<String>, color: &str) -> Self {
        Self {
            name: name.into(),
            color: normalize_hex_color(color).unwrap_or_default(),
        }
    }

    /// Create a category with its built-in color (or none)
    pub fn with_default_color(name: impl Into<String>) -> Self {
        let name = name.into();
        let color = default_color(&name).unwrap_or_default().to_string();
        Self { name, color }
    }

    /// The built-in category list
    pub fn defaults() -> Vec<Category> {
        DEFAULT_CATEGORIES
            .iter()
            .map(|(name, color)| Category {
                name: name.to_string(),
                color: color.to_string(),
            })
            .collect()
    }

    /// Case-insensitive name comparison
    pub fn is_named(&self, name: &str) -> bool {
        same_name(&self.name, name)
    }

    /// Whether a display color is set
    pub fn has_color(&self) -> bool {
        !self.color.is_empty()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Built-in color for a category name (exact match)
pub fn default_color(name: &str) -> Option<&'static str> {
    DEFAULT_CATEGORIES
        .iter()
        .find(|(default_name, _)| *default_name == name)
        .map(|(_, color)| *color)
}

/// Case-insensitive comparison key for category names
pub fn name_key(name: &str) -> String {
    fold_case(name.trim())
}

/// Caseless form of a text
///
/// Lowercases, then applies the full foldings where lowercase alone keeps
/// two spellings apart ("Straße" and "STRASSE" fold to the same text).
pub fn fold_case(text: &str) -> String {
    let lower = text.to_lowercase();
    let mut folded = String::with_capacity(lower.len());
    for c in lower.chars() {
        match c {
            'ß' => folded.push_str("ss"),
            'ſ' => folded.push('s'),
            'ς' => folded.push('σ'),
            'ϐ' => folded.push('β'),
            'ϑ' => folded.push('θ'),
            'ϕ' => folded.push('φ'),
            'ϖ' => folded.push('π'),
            'ϰ' => folded.push('κ'),
            'ϱ' => folded.push('ρ'),
            'ϵ' => folded.push('ε'),
            'ﬀ' => folded.push_str("ff"),
            'ﬁ' => folded.push_str("fi"),
            'ﬂ' => folded.push_str("fl"),
            'ﬃ' => folded.push_str("ffi"),
            'ﬄ' => folded.push_str("ffl"),
            'ﬅ' | 'ﬆ' => folded.push_str("st"),
            _ => folded.push(c),
        }
    }
    folded
}

/// Compare two category names ignoring case
pub fn same_name(a: &str, b: &str) -> bool {
    name_key(a) == name_key(b)
}

/// Accept `#RGB` or `#RRGGBB` (surrounding whitespace ignored)
pub fn normalize_hex_color(color: &str) -> Option<String> {
    let value = color.trim();
    let hex = value.strip_prefix('#')?;
    if (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(value.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_hex_color() {
        assert_eq!(normalize_hex_color("#fff"), Some("#fff".into()));
        assert_eq!(normalize_hex_color(" #A0b1C2 "), Some("#A0b1C2".into()));
        assert_eq!(normalize_hex_color("fff"), None);
        assert_eq!(normalize_hex_color("#ffff"), None);
        assert_eq!(normalize_hex_color("#ggg"), None);
        assert_eq!(normalize_hex_color(""), None);
        assert_eq!(normalize_hex_color("#"), None);
    }

    #[test]
    fn test_defaults() {
        let defaults = Category::defaults();
        assert_eq!(defaults.len(), 8);
        assert!(defaults.iter().all(|c| c.has_color()));
        assert_eq!(defaults[0].name, "Nourriture");
    }

    #[test]
    fn test_default_color_lookup() {
        assert_eq!(default_color("Transport"), Some("#808080"));
        assert_eq!(default_color("transport"), None);
        assert_eq!(Category::with_default_color("Pets").color, "");
        assert_eq!(Category::with_default_color("Loisir").color, "#800080");
    }

    #[test]
    fn test_case_insensitive_names() {
        let category = Category::new("Santé", "");
        assert!(category.is_named("SANTÉ"));
        assert!(category.is_named(" santé "));
        assert!(!category.is_named("Sante"));
    }

    #[test]
    fn test_full_case_folding() {
        assert!(same_name("Straße", "STRASSE"));
        assert!(same_name("Straße", "strasse"));
        assert!(same_name("ẞ", "ss"));
        assert!(same_name("ΟΔΟΣ", "οδος"));
        assert!(same_name("ﬁnances", "FINANCES"));
        assert_eq!(name_key("  Straße "), "strasse");
        assert_eq!(fold_case(" Straße "), " strasse ");
    }

    #[test]
    fn test_new_drops_invalid_color() {
        assert_eq!(Category::new("Food", "red").color, "");
        assert_eq!(Category::new("Food", "#123").color, "#123");
    }
}
