//! Expense repository over the delimited expense file
//!
//! Each line is one expense: `id,name,date,price,category,description`.
//! Files written before ids existed have five columns (no id). Those are
//! upgraded in place by [`ExpenseStore::migrate_ids`], which every id-based
//! operation runs first. Reads accept both shapes.
//!
//! Every mutation reads the whole file, changes it in memory and rewrites
//! it. There is no locking; one process per file is assumed.

use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Expense, ExpenseFields, ExpenseId};

use super::file_io::{ensure_parent_dir, write_atomic};

/// Number of columns in a migrated row
const CURRENT_WIDTH: usize = 6;

/// Number of columns in a pre-id row
const LEGACY_WIDTH: usize = 5;

type Row = Vec<String>;

/// Summary of a migration pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Rows inspected
    pub rows: usize,
    /// Rows that received a new id or were reshaped
    pub migrated: usize,
}

impl MigrationReport {
    /// Whether the file was rewritten
    pub fn changed(&self) -> bool {
        self.migrated > 0
    }
}

/// Repository for the expense file
#[derive(Debug, Clone)]
pub struct ExpenseStore {
    path: PathBuf,
}

impl ExpenseStore {
    /// Create a repository for the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the backing file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Give every row a unique id, converting older row shapes
    ///
    /// Six-column rows keep their id unless it is blank or already seen
    /// earlier in the file. Five-column rows get a fresh id prepended. Any
    /// other shape is rebuilt from the fields present, blanks filling the
    /// gaps, under a fresh id. The file is rewritten only when a row
    /// changed, so running this on a migrated file is a no-op.
    pub fn migrate_ids(&self) -> LedgerResult<MigrationReport> {
        let rows = self.read_rows()?;
        let mut report = MigrationReport {
            rows: rows.len(),
            migrated: 0,
        };

        // Ids already present anywhere in the file; minted ids must avoid them all
        let mut taken: HashSet<String> = rows
            .iter()
            .filter(|row| row.len() == CURRENT_WIDTH)
            .map(|row| row[0].trim().to_string())
            .filter(|id| !id.is_empty())
            .collect();
        let mut seen: HashSet<String> = HashSet::new();

        let mut migrated_rows = Vec::with_capacity(rows.len());
        for row in rows {
            let (row, changed) = migrate_row(row, &mut seen, &mut taken);
            if changed {
                report.migrated += 1;
            }
            migrated_rows.push(row);
        }

        if report.changed() {
            self.write_rows(&migrated_rows)?;
        }

        Ok(report)
    }

    /// Append a new expense
    ///
    /// Fields are trimmed and validated; the price text is stored as typed.
    /// Unless `allow_duplicates` is set, an existing row with the same
    /// visible fields is rejected with [`LedgerError::DuplicateExpense`].
    pub fn add(&self, fields: &ExpenseFields, allow_duplicates: bool) -> LedgerResult<Expense> {
        let fields = fields.trimmed();
        fields.validate()?;

        self.migrate_ids()?;
        let rows = self.read_rows()?;

        if !allow_duplicates && rows.iter().any(|row| stored_fields(row) == fields) {
            return Err(LedgerError::DuplicateExpense);
        }

        let taken: HashSet<String> = rows
            .iter()
            .map(|row| split_row(row).0.as_str().to_string())
            .collect();
        let expense = Expense::new(ExpenseId::generate_unique(&taken), fields);

        self.append_row(&expense_row(&expense))?;
        Ok(expense)
    }

    /// Replace the fields of the expense with `id`, keeping its position
    ///
    /// Returns the record as it was before the update.
    pub fn update(
        &self,
        id: &ExpenseId,
        fields: &ExpenseFields,
        allow_duplicates: bool,
    ) -> LedgerResult<Expense> {
        if !self.exists() {
            return Err(LedgerError::StoreNotFound(self.path.display().to_string()));
        }

        self.migrate_ids()?;

        let fields = fields.trimmed();
        fields.validate()?;

        let mut rows = self.read_rows()?;
        let index = find_row(&rows, id).ok_or_else(|| LedgerError::RecordNotFound(id.to_string()))?;

        if !allow_duplicates {
            let clash = rows
                .iter()
                .any(|row| split_row(row).0 != *id && stored_fields(row) == fields);
            if clash {
                return Err(LedgerError::DuplicateExpense);
            }
        }

        let (_, previous_fields) = split_row(&rows[index]);
        let previous = Expense::new(id.clone(), previous_fields);

        let row_id = rows[index][0].clone();
        let mut replacement = Vec::with_capacity(CURRENT_WIDTH);
        replacement.push(row_id);
        replacement.extend(fields.as_row().iter().map(|f| f.to_string()));
        rows[index] = replacement;

        self.write_rows(&rows)?;
        Ok(previous)
    }

    /// Remove the expense with `id`
    ///
    /// Only the first matching row is removed. Returns the removed record.
    pub fn delete(&self, id: &ExpenseId) -> LedgerResult<Expense> {
        if !self.exists() {
            return Err(LedgerError::StoreNotFound(self.path.display().to_string()));
        }

        self.migrate_ids()?;

        let mut rows = self.read_rows()?;
        let index = find_row(&rows, id).ok_or_else(|| LedgerError::RecordNotFound(id.to_string()))?;

        let removed = rows.remove(index);
        let (_, fields) = split_row(&removed);

        self.write_rows(&rows)?;
        Ok(Expense::new(id.clone(), fields))
    }

    /// Read every complete expense in file order
    ///
    /// Accepts both row shapes. Rows missing a name, date or category are
    /// skipped. A missing file reads as empty.
    pub fn read_all(&self) -> LedgerResult<Vec<Expense>> {
        Ok(self
            .read_records()?
            .into_iter()
            .filter(|e| {
                !e.fields.name.is_empty()
                    && !e.fields.date.is_empty()
                    && !e.fields.category.is_empty()
            })
            .collect())
    }

    /// Find one expense by id
    pub fn find(&self, id: &ExpenseId) -> LedgerResult<Option<Expense>> {
        Ok(self.read_all()?.into_iter().find(|e| e.id == *id))
    }

    /// Number of complete expenses in the file
    pub fn count(&self) -> LedgerResult<usize> {
        Ok(self.read_all()?.len())
    }

    // Raw row access

    fn read_records(&self) -> LedgerResult<Vec<Expense>> {
        Ok(self
            .read_rows()?
            .iter()
            .map(|row| {
                let (id, fields) = split_row(row);
                Expense::new(id, fields)
            })
            .collect())
    }

    fn read_rows(&self) -> LedgerResult<Vec<Row>> {
        if !self.exists() {
            return Ok(Vec::new());
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| {
                LedgerError::Csv(format!("Failed to open {}: {}", self.path.display(), e))
            })?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            if record.iter().all(|field| field.trim().is_empty()) {
                continue;
            }
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(rows)
    }

    fn write_rows(&self, rows: &[Row]) -> LedgerResult<()> {
        write_atomic(&self.path, |file| {
            let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
            for row in rows {
                writer.write_record(row)?;
            }
            writer.flush()?;
            Ok(())
        })
    }

    fn append_row(&self, row: &[String]) -> LedgerResult<()> {
        ensure_parent_dir(&self.path)?;

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;

        // A file edited by hand may lack its final newline
        if !ends_with_newline(&mut file)? {
            file.write_all(b"\n")?;
        }

        let mut writer = WriterBuilder::new().has_headers(false).from_writer(&mut file);
        writer.write_record(row)?;
        writer.flush()?;
        Ok(())
    }
}

/// Migrate one row, returning it in six-column form and whether it changed
fn migrate_row(row: Row, seen: &mut HashSet<String>, taken: &mut HashSet<String>) -> (Row, bool) {
    let mut mint = |seen: &mut HashSet<String>| {
        let id = ExpenseId::generate_unique(taken);
        taken.insert(id.as_str().to_string());
        seen.insert(id.as_str().to_string());
        id.to_string()
    };

    match row.len() {
        CURRENT_WIDTH => {
            let id = row[0].trim().to_string();
            if !id.is_empty() && seen.insert(id) {
                (row, false)
            } else {
                let mut row = row;
                row[0] = mint(seen);
                (row, true)
            }
        }
        LEGACY_WIDTH => {
            let mut migrated = Vec::with_capacity(CURRENT_WIDTH);
            migrated.push(mint(seen));
            migrated.extend(row);
            (migrated, true)
        }
        _ => {
            let (_, fields) = split_row(&row);
            let mut migrated = Vec::with_capacity(CURRENT_WIDTH);
            migrated.push(mint(seen));
            migrated.extend(fields.as_row().iter().map(|f| f.to_string()));
            (migrated, true)
        }
    }
}

/// Split a row of either shape into its id and trimmed fields
fn split_row(row: &[String]) -> (ExpenseId, ExpenseFields) {
    let id = if row.len() >= CURRENT_WIDTH {
        ExpenseId::from_token(&row[0])
    } else {
        ExpenseId::from_token("")
    };
    (id, stored_fields(row).trimmed())
}

/// The visible fields of a row exactly as written in the file
///
/// Rows of six or more columns are id-first (extra columns ignored);
/// shorter rows are the legacy layout with missing fields left blank.
/// Duplicate checks compare against this text, not the trimmed form.
fn stored_fields(row: &[String]) -> ExpenseFields {
    let offset = usize::from(row.len() >= CURRENT_WIDTH);
    let field = |i: usize| row.get(offset + i).cloned().unwrap_or_default();
    ExpenseFields::new(field(0), field(1), field(2), field(3), field(4))
}

fn find_row(rows: &[Row], id: &ExpenseId) -> Option<usize> {
    rows.iter()
        .position(|row| row.len() >= CURRENT_WIDTH && row[0].trim() == id.as_str())
}

fn expense_row(expense: &Expense) -> Row {
    let mut row = Vec::with_capacity(CURRENT_WIDTH);
    row.push(expense.id.to_string());
    row.extend(expense.fields.as_row().iter().map(|f| f.to_string()));
    row
}

fn ends_with_newline(file: &mut fs::File) -> LedgerResult<bool> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::Start(len - 1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

// Path-based entry points for collaborators that do not hold a store

/// Append an expense to the file at `path`
pub fn add_expense(
    path: impl AsRef<Path>,
    fields: &ExpenseFields,
    allow_duplicates: bool,
) -> LedgerResult<Expense> {
    ExpenseStore::new(path.as_ref()).add(fields, allow_duplicates)
}

/// Replace the fields of one expense in the file at `path`
pub fn update_expense(
    path: impl AsRef<Path>,
    id: &ExpenseId,
    fields: &ExpenseFields,
    allow_duplicates: bool,
) -> LedgerResult<Expense> {
    ExpenseStore::new(path.as_ref()).update(id, fields, allow_duplicates)
}

/// Remove one expense from the file at `path`
pub fn delete_expense(path: impl AsRef<Path>, id: &ExpenseId) -> LedgerResult<Expense> {
    ExpenseStore::new(path.as_ref()).delete(id)
}

/// Give every row of the file at `path` a unique id
pub fn migrate_expense_ids(path: impl AsRef<Path>) -> LedgerResult<MigrationReport> {
    ExpenseStore::new(path.as_ref()).migrate_ids()
}

/// Read every complete expense from the file at `path`
pub fn read_expenses(path: impl AsRef<Path>) -> LedgerResult<Vec<Expense>> {
    ExpenseStore::new(path.as_ref()).read_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, ExpenseStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = ExpenseStore::new(temp_dir.path().join("expenses.csv"));
        (temp_dir, store)
    }

    fn bread() -> ExpenseFields {
        ExpenseFields::new("Bread", "05/01/2024", "2,5", "Food", "")
    }

    fn lines(store: &ExpenseStore) -> Vec<String> {
        fs::read_to_string(store.path())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_empty_store() {
        let (_temp_dir, store) = create_test_store();
        assert!(store.read_all().unwrap().is_empty());
        assert_eq!(store.migrate_ids().unwrap(), MigrationReport::default());
        assert!(!store.exists());
    }

    #[test]
    fn test_add_and_read() {
        let (_temp_dir, store) = create_test_store();

        let added = store
            .add(
                &ExpenseFields::new(" Bread ", "05/01/2024", " 2+1 ", "Food", " corner shop "),
                false,
            )
            .unwrap();

        let all = store.read_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0], added);
        assert_eq!(all[0].name(), "Bread");
        assert_eq!(all[0].price(), "2+1");
        assert_eq!(all[0].description(), "corner shop");
        assert_eq!(all[0].id.as_str().len(), 32);
    }

    #[test]
    fn test_add_validates() {
        let (_temp_dir, store) = create_test_store();

        let missing = ExpenseFields::new("", "05/01/2024", "1", "Food", "");
        assert!(matches!(
            store.add(&missing, false),
            Err(LedgerError::MissingField("name"))
        ));

        let bad_price = ExpenseFields::new("Bread", "05/01/2024", "two", "Food", "");
        assert!(matches!(
            store.add(&bad_price, false),
            Err(LedgerError::InvalidPrice(_))
        ));

        assert!(!store.exists());
    }

    #[test]
    fn test_duplicate_rejected_unless_allowed() {
        let (_temp_dir, store) = create_test_store();

        let first = store.add(&bread(), false).unwrap();
        assert!(matches!(
            store.add(&bread(), false),
            Err(LedgerError::DuplicateExpense)
        ));

        let second = store.add(&bread(), true).unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(store.read_all().unwrap().len(), 2);
    }

    #[test]
    fn test_duplicate_compares_price_text() {
        let (_temp_dir, store) = create_test_store();

        store
            .add(&ExpenseFields::new("Gift", "01/02/2024", "10", "Loisir", ""), false)
            .unwrap();
        store
            .add(&ExpenseFields::new("Gift", "01/02/2024", "5+5", "Loisir", ""), false)
            .unwrap();
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_duplicate_compares_stored_text_exactly() {
        let (_temp_dir, store) = create_test_store();
        fs::write(store.path(), "id1,Bread ,05/01/2024,\"2,5\",Food,\n").unwrap();

        store.add(&bread(), false).unwrap();
        assert_eq!(store.count().unwrap(), 2);

        assert!(matches!(
            store.add(&bread(), false),
            Err(LedgerError::DuplicateExpense)
        ));
    }

    #[test]
    fn test_fields_with_delimiters_round_trip() {
        let (_temp_dir, store) = create_test_store();

        let fields = ExpenseFields::new(
            "Dinner, drinks",
            "05/01/2024",
            "12,5",
            "Loisir",
            "said \"cheers\"",
        );
        store.add(&fields, false).unwrap();

        let all = store.read_all().unwrap();
        assert_eq!(all[0].fields, fields);
    }

    #[test]
    fn test_legacy_file_migrates() {
        let (_temp_dir, store) = create_test_store();
        fs::write(
            store.path(),
            "Bread,05/01/2024,2.5,Food,\nBus,06/01/2024,1.80,Transport,ticket\n",
        )
        .unwrap();

        let report = store.migrate_ids().unwrap();
        assert_eq!(report.rows, 2);
        assert_eq!(report.migrated, 2);

        let lines = lines(&store);
        assert_eq!(lines.len(), 2);
        let first: Vec<&str> = lines[0].split(',').collect();
        assert_eq!(first.len(), 6);
        assert_eq!(&first[1..], ["Bread", "05/01/2024", "2.5", "Food", ""]);
        let second: Vec<&str> = lines[1].split(',').collect();
        assert_eq!(&second[1..], ["Bus", "06/01/2024", "1.80", "Transport", "ticket"]);
        assert_ne!(first[0], second[0]);
    }

    #[test]
    fn test_migration_is_idempotent() {
        let (_temp_dir, store) = create_test_store();
        fs::write(store.path(), "Bread,05/01/2024,2.5,Food,\n").unwrap();

        store.migrate_ids().unwrap();
        let before = fs::read_to_string(store.path()).unwrap();

        let report = store.migrate_ids().unwrap();
        assert!(!report.changed());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
    }

    #[test]
    fn test_migration_fixes_duplicate_and_blank_ids() {
        let (_temp_dir, store) = create_test_store();
        fs::write(
            store.path(),
            "a1,Bread,05/01/2024,2,Food,\na1,Milk,05/01/2024,1,Food,\n,Eggs,05/01/2024,3,Food,\n",
        )
        .unwrap();

        let report = store.migrate_ids().unwrap();
        assert_eq!(report.migrated, 2);

        let all = store.read_all().unwrap();
        assert_eq!(all[0].id.as_str(), "a1");
        assert_ne!(all[1].id.as_str(), "a1");
        assert!(!all[2].id.is_empty());
        let ids: HashSet<_> = all.iter().map(|e| e.id.clone()).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_migration_rebuilds_malformed_rows() {
        let (_temp_dir, store) = create_test_store();
        fs::write(store.path(), "Bread,05/01/2024,2\n\n   \nx,Tea,07/01/2024,4,Food,hot,extra\n").unwrap();

        let report = store.migrate_ids().unwrap();
        assert_eq!(report.rows, 2);
        assert_eq!(report.migrated, 2);

        let lines = lines(&store);
        assert_eq!(lines.len(), 2);
        let first: Vec<&str> = lines[0].split(',').collect();
        assert_eq!(&first[1..], ["Bread", "05/01/2024", "2", "", ""]);
        let second: Vec<&str> = lines[1].split(',').collect();
        assert_eq!(second.len(), 6);
        assert_ne!(second[0], "x");
        assert_eq!(&second[1..], ["Tea", "07/01/2024", "4", "Food", "hot"]);
    }

    #[test]
    fn test_read_tolerates_both_shapes() {
        let (_temp_dir, store) = create_test_store();
        fs::write(
            store.path(),
            "Bread,05/01/2024,2.5,Food,\nid9,Bus,06/01/2024,1.80,Transport,\n,,,,\nNoCat,06/01/2024,1,,\n",
        )
        .unwrap();

        let all = store.read_all().unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].id.is_empty());
        assert_eq!(all[0].name(), "Bread");
        assert_eq!(all[1].id.as_str(), "id9");
    }

    #[test]
    fn test_update_in_place() {
        let (_temp_dir, store) = create_test_store();
        let first = store.add(&bread(), false).unwrap();
        let second = store
            .add(&ExpenseFields::new("Bus", "06/01/2024", "1.8", "Transport", ""), false)
            .unwrap();

        let new_fields = ExpenseFields::new("Bagel", "05/01/2024", "3", "Food", "sesame");
        let previous = store.update(&first.id, &new_fields, false).unwrap();
        assert_eq!(previous.fields, bread());

        let all = store.read_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, first.id);
        assert_eq!(all[0].fields, new_fields);
        assert_eq!(all[1], second);
    }

    #[test]
    fn test_update_errors() {
        let (_temp_dir, store) = create_test_store();
        let missing_id = ExpenseId::from("nope");

        assert!(matches!(
            store.update(&missing_id, &bread(), false),
            Err(LedgerError::StoreNotFound(_))
        ));

        let first = store.add(&bread(), false).unwrap();
        let second = store
            .add(&ExpenseFields::new("Milk", "05/01/2024", "1", "Food", ""), false)
            .unwrap();

        assert!(matches!(
            store.update(&missing_id, &bread(), false),
            Err(LedgerError::RecordNotFound(_))
        ));
        assert!(matches!(
            store.update(&first.id, &ExpenseFields::new("Bread", "", "1", "Food", ""), false),
            Err(LedgerError::MissingField("date"))
        ));
        assert!(matches!(
            store.update(&second.id, &bread(), false),
            Err(LedgerError::DuplicateExpense)
        ));

        // Re-saving a record with its own fields is not a duplicate
        store.update(&first.id, &bread(), false).unwrap();
        // And duplicates pass when explicitly allowed
        store.update(&second.id, &bread(), true).unwrap();
        assert_eq!(store.read_all().unwrap()[1].fields, bread());
    }

    #[test]
    fn test_delete_removes_exactly_one() {
        let (_temp_dir, store) = create_test_store();
        let a = store.add(&bread(), false).unwrap();
        let b = store
            .add(&ExpenseFields::new("Milk", "05/01/2024", "1", "Food", ""), false)
            .unwrap();
        let c = store
            .add(&ExpenseFields::new("Bus", "06/01/2024", "1.8", "Transport", ""), false)
            .unwrap();

        let removed = store.delete(&b.id).unwrap();
        assert_eq!(removed, b);

        let all = store.read_all().unwrap();
        assert_eq!(all, vec![a, c]);

        assert!(matches!(
            store.delete(&b.id),
            Err(LedgerError::RecordNotFound(_))
        ));
    }

    #[test]
    fn test_delete_missing_file() {
        let (_temp_dir, store) = create_test_store();
        assert!(matches!(
            store.delete(&ExpenseId::from("x")),
            Err(LedgerError::StoreNotFound(_))
        ));
    }

    #[test]
    fn test_add_migrates_legacy_file_first() {
        let (_temp_dir, store) = create_test_store();
        fs::write(store.path(), "Bread,05/01/2024,2.5,Food,").unwrap();

        assert!(matches!(
            store.add(&ExpenseFields::new("Bread", "05/01/2024", "2.5", "Food", ""), false),
            Err(LedgerError::DuplicateExpense)
        ));

        store
            .add(&ExpenseFields::new("Milk", "05/01/2024", "1", "Food", ""), false)
            .unwrap();
        let all = store.read_all().unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|e| !e.id.is_empty()));
    }

    #[test]
    fn test_append_after_missing_trailing_newline() {
        let (_temp_dir, store) = create_test_store();
        fs::write(store.path(), "id1,Bread,05/01/2024,2.5,Food,").unwrap();

        store
            .add(&ExpenseFields::new("Milk", "05/01/2024", "1", "Food", ""), false)
            .unwrap();
        assert_eq!(lines(&store).len(), 2);
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_path_functions() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("expenses.csv");

        let added = add_expense(&path, &bread(), false).unwrap();
        assert_eq!(read_expenses(&path).unwrap().len(), 1);
        assert!(!migrate_expense_ids(&path).unwrap().changed());

        let fields = ExpenseFields::new("Bread", "05/01/2024", "3", "Food", "");
        update_expense(&path, &added.id, &fields, false).unwrap();
        delete_expense(&path, &added.id).unwrap();
        assert!(read_expenses(&path).unwrap().is_empty());
    }
}
