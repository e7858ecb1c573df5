//! Category registry over the category side file
//!
//! The file holds `{"categories": [{"name": ..., "color": ...}, ...]}`.
//! Older releases wrote `{"categories": ["name", ...]}`; that form is still
//! read and is rewritten in the current form on load. Anything unusable
//! (missing file, bad JSON, wrong shape, nothing left after filtering)
//! falls back to the built-in category list.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{LedgerError, LedgerResult};
use crate::models::category::{default_color, name_key, normalize_hex_color, same_name};
use crate::models::Category;

use super::file_io::{read_json_lenient, write_json_atomic};

/// Serializable category file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryData {
    pub categories: Vec<Category>,
}

/// What a category file turned out to contain
#[derive(Debug, Clone, PartialEq)]
enum StoredCategories {
    /// Plain list of names
    Legacy(Vec<String>),
    /// List of `{name, color}` objects (entries kept raw for filtering)
    Current(Vec<Value>),
    /// Missing, unreadable, or not the expected shape
    Invalid,
}

impl StoredCategories {
    fn decode(raw: Option<Value>) -> Self {
        let Some(Value::Object(mut root)) = raw else {
            return Self::Invalid;
        };

        match root.remove("categories") {
            Some(Value::Array(items)) => {
                if !items.is_empty() && items.iter().all(Value::is_string) {
                    Self::Legacy(
                        items
                            .into_iter()
                            .filter_map(|v| v.as_str().map(str::to_string))
                            .collect(),
                    )
                } else {
                    Self::Current(items)
                }
            }
            _ => Self::Invalid,
        }
    }

    /// Map to the normalized in-memory list (possibly empty)
    fn normalize(self) -> Vec<Category> {
        let mut seen = HashSet::new();
        let mut categories = Vec::new();

        match self {
            Self::Legacy(names) => {
                for name in names {
                    let name = name.trim();
                    if name.is_empty() || !seen.insert(name_key(name)) {
                        continue;
                    }
                    categories.push(Category::with_default_color(name));
                }
            }
            Self::Current(items) => {
                for item in items {
                    let Some(name) = item.get("name").and_then(Value::as_str) else {
                        continue;
                    };
                    let name = name.trim();
                    if name.is_empty() || !seen.insert(name_key(name)) {
                        continue;
                    }
                    let color = item
                        .get("color")
                        .and_then(Value::as_str)
                        .and_then(normalize_hex_color)
                        .or_else(|| default_color(name).map(str::to_string))
                        .unwrap_or_default();
                    categories.push(Category {
                        name: name.to_string(),
                        color,
                    });
                }
            }
            Self::Invalid => {}
        }

        categories
    }
}

/// The loaded category set, in persisted order
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryOptions {
    pub categories: Vec<Category>,
}

impl CategoryOptions {
    /// Category names in order
    pub fn names(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.name.clone()).collect()
    }

    /// Name to color map (empty string when a category has no color)
    pub fn colors(&self) -> HashMap<String, String> {
        self.categories
            .iter()
            .map(|c| (c.name.clone(), c.color.clone()))
            .collect()
    }

    /// Color of a category, matched ignoring case
    pub fn color_for(&self, name: &str) -> Option<&str> {
        self.find(name)
            .filter(|c| c.has_color())
            .map(|c| c.color.as_str())
    }

    /// Find a category ignoring case
    pub fn find(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.is_named(name))
    }
}

/// Repository for the category side file
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    path: PathBuf,
}

impl CategoryRegistry {
    /// Create a registry for the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load categories, migrating and re-persisting the normalized form
    ///
    /// Always returns at least one category. Read failures are never
    /// reported; write failures are.
    pub fn load(&self) -> LedgerResult<CategoryOptions> {
        let stored = StoredCategories::decode(read_json_lenient(&self.path));

        let mut categories = stored.normalize();
        if categories.is_empty() {
            categories = Category::defaults();
        }

        self.write(&categories)?;
        Ok(CategoryOptions { categories })
    }

    /// Save names in the given order with their colors
    ///
    /// Colors are looked up by exact name; missing or invalid colors are
    /// stored as empty strings.
    pub fn save(&self, names: &[String], colors: &HashMap<String, String>) -> LedgerResult<()> {
        let categories: Vec<Category> = names
            .iter()
            .map(|name| Category::new(name.clone(), colors.get(name).map_or("", String::as_str)))
            .collect();
        self.write(&categories)
    }

    /// Save a name list, keeping the colors already stored for kept names
    ///
    /// New names get their built-in color, if any.
    pub fn save_names(&self, names: &[String]) -> LedgerResult<()> {
        let existing = self.load()?.colors();
        let colors: HashMap<String, String> = names
            .iter()
            .map(|name| {
                let color = existing
                    .get(name)
                    .cloned()
                    .unwrap_or_else(|| default_color(name).unwrap_or_default().to_string());
                (name.clone(), color)
            })
            .collect();
        self.save(names, &colors)
    }

    /// Add a category at the end of the list
    ///
    /// Returns the updated name list.
    pub fn add(&self, name: &str) -> LedgerResult<Vec<String>> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::EmptyName);
        }

        let mut names = self.load()?.names();
        if names.iter().any(|existing| same_name(existing, name)) {
            return Err(LedgerError::DuplicateCategory(name.to_string()));
        }

        names.push(name.to_string());
        self.save_names(&names)?;
        Ok(names)
    }

    /// Remove a category (matched ignoring case)
    ///
    /// Returns the remaining name list. Removing the last category leaves an
    /// empty list on disk, which the next load replaces with the defaults.
    pub fn remove(&self, name: &str) -> LedgerResult<Vec<String>> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::EmptyName);
        }

        let names = self.load()?.names();
        let remaining: Vec<String> = names
            .iter()
            .filter(|existing| !same_name(existing, name))
            .cloned()
            .collect();

        if remaining.len() == names.len() {
            return Err(LedgerError::CategoryNotFound(name.to_string()));
        }

        self.save_names(&remaining)?;
        Ok(remaining)
    }

    /// Change the color of an existing category
    ///
    /// An invalid color clears it. Returns the category as stored.
    pub fn set_color(&self, name: &str, color: &str) -> LedgerResult<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::EmptyName);
        }

        let mut options = self.load()?;
        let category = options
            .categories
            .iter_mut()
            .find(|c| c.is_named(name))
            .ok_or_else(|| LedgerError::CategoryNotFound(name.to_string()))?;
        category.color = normalize_hex_color(color).unwrap_or_default();
        let updated = category.clone();

        self.write(&options.categories)?;
        Ok(updated)
    }

    fn write(&self, categories: &[Category]) -> LedgerResult<()> {
        let data = CategoryData {
            categories: categories.to_vec(),
        };
        write_json_atomic(&self.path, &data)
    }
}

// Path-based entry points for collaborators that do not hold a registry

/// Load (and re-persist) the categories stored at `path`
pub fn load_category_options(path: impl AsRef<Path>) -> LedgerResult<CategoryOptions> {
    CategoryRegistry::new(path.as_ref()).load()
}

/// Save names and colors to `path`
pub fn save_category_options(
    path: impl AsRef<Path>,
    names: &[String],
    colors: &HashMap<String, String>,
) -> LedgerResult<()> {
    CategoryRegistry::new(path.as_ref()).save(names, colors)
}

/// Save a name list to `path`, preserving stored colors
pub fn save_categories(path: impl AsRef<Path>, names: &[String]) -> LedgerResult<()> {
    CategoryRegistry::new(path.as_ref()).save_names(names)
}

/// Add a category to the registry at `path`
pub fn add_category(path: impl AsRef<Path>, name: &str) -> LedgerResult<Vec<String>> {
    CategoryRegistry::new(path.as_ref()).add(name)
}

/// Remove a category from the registry at `path`
pub fn remove_category(path: impl AsRef<Path>, name: &str) -> LedgerResult<Vec<String>> {
    CategoryRegistry::new(path.as_ref()).remove(name)
}

/// Recolor a category of the registry at `path`
pub fn set_category_color(path: impl AsRef<Path>, name: &str, color: &str) -> LedgerResult<Category> {
    CategoryRegistry::new(path.as_ref()).set_color(name, color)
}
