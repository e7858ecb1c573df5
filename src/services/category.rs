//! Category service
//!
//! Registry edits with audit recording, plus lookups used by the budget
//! service and the report.

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::Category;
use crate::storage::{CategoryOptions, Storage};

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

impl<'a> CategoryService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// All categories in persisted order
    pub fn list(&self) -> LedgerResult<CategoryOptions> {
        self.storage.categories.load()
    }

    /// Find a category by name, ignoring case
    pub fn find(&self, name: &str) -> LedgerResult<Option<Category>> {
        Ok(self.list()?.find(name.trim()).cloned())
    }

    /// Registry spelling of `name` when it is registered, else `name` trimmed
    pub fn canonical_name(&self, name: &str) -> LedgerResult<String> {
        let name = name.trim();
        Ok(self
            .find(name)?
            .map(|c| c.name)
            .unwrap_or_else(|| name.to_string()))
    }

    /// Add a category at the end of the list
    pub fn add(&self, name: &str) -> LedgerResult<Category> {
        self.storage.categories.add(name)?;

        let category = self
            .find(name)?
            .ok_or_else(|| LedgerError::Storage(format!("Category '{}' was not saved", name)))?;

        self.storage.log_create(
            EntityType::Category,
            category.name.as_str(),
            None,
            &category,
        )?;

        Ok(category)
    }

    /// Remove a category, returning it as it was stored
    pub fn remove(&self, name: &str) -> LedgerResult<Category> {
        let existing = self.find(name)?;
        self.storage.categories.remove(name)?;

        // remove() has already rejected blank and unknown names
        let category = existing.unwrap_or_else(|| Category::with_default_color(name.trim()));

        self.storage.log_delete(
            EntityType::Category,
            category.name.as_str(),
            None,
            &category,
        )?;

        Ok(category)
    }

    /// Set the display color of a category
    ///
    /// A color that is not `#RGB` or `#RRGGBB` clears it.
    pub fn set_color(&self, name: &str, color: &str) -> LedgerResult<Category> {
        let before = self
            .find(name)?
            .ok_or_else(|| LedgerError::CategoryNotFound(name.trim().to_string()))?;
        let after = self.storage.categories.set_color(name, color)?;

        self.storage.log_update(
            EntityType::Category,
            after.name.as_str(),
            None,
            &before,
            &after,
        )?;

        Ok(after)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::config::LedgerPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_defaults_listed() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        let options = service.list().unwrap();
        assert_eq!(options.categories.len(), 8);
        assert_eq!(service.canonical_name(" transport ").unwrap(), "Transport");
        assert_eq!(service.canonical_name("Pets").unwrap(), "Pets");
    }

    #[test]
    fn test_add_remove_recolor() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        let pets = service.add("  Pets ").unwrap();
        assert_eq!(pets.name, "Pets");
        assert!(matches!(
            service.add("pets"),
            Err(LedgerError::DuplicateCategory(_))
        ));

        let recolored = service.set_color("PETS", "#AbC").unwrap();
        assert_eq!(recolored.name, "Pets");
        assert_eq!(recolored.color, "#AbC");

        let removed = service.remove("pets").unwrap();
        assert_eq!(removed.color, "#AbC");
        assert!(service.find("Pets").unwrap().is_none());

        let ops: Vec<Operation> = storage
            .audit()
            .read_all()
            .unwrap()
            .into_iter()
            .map(|e| e.operation)
            .collect();
        assert_eq!(
            ops,
            vec![Operation::Create, Operation::Update, Operation::Delete]
        );
    }

    #[test]
    fn test_errors() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        assert!(matches!(service.add("  "), Err(LedgerError::EmptyName)));
        assert!(matches!(
            service.remove("Nope"),
            Err(LedgerError::CategoryNotFound(_))
        ));
        assert!(matches!(
            service.set_color("Nope", "#fff"),
            Err(LedgerError::CategoryNotFound(_))
        ));
        assert_eq!(storage.audit().entry_count().unwrap(), 0);
    }
}
