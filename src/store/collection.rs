//! A single file-backed record collection

use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::AppResult;

use super::Record;

/// Handle to one JSON-encoded collection file
pub struct Collection<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: Record> Collection<T> {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(format!("{}.json", T::COLLECTION)),
            _marker: PhantomData,
        }
    }

    /// Load all records under a shared advisory lock
    ///
    /// A missing or unreadable file yields an empty collection; corrupt JSON
    /// is swallowed the same way, logged at warn.
    pub fn load(&self) -> Vec<T> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "Failed to open collection: {}", e);
                return Vec::new();
            }
        };

        if let Err(e) = file.lock_shared() {
            tracing::warn!(path = %self.path.display(), "Failed to acquire shared lock: {}", e);
        }
        let result = serde_json::from_reader(BufReader::new(&file));
        let _ = file.unlock();

        match result {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    "Corrupt collection file, treating as empty: {}", e
                );
                Vec::new()
            }
        }
    }

    /// Overwrite the entire collection under an exclusive advisory lock
    pub fn save(&self, records: &[T]) -> AppResult<()> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)?;
        file.lock_exclusive()?;

        let mut writer = BufWriter::new(&file);
        let result = serde_json::to_writer_pretty(&mut writer, records)
            .map_err(|e| std::io::Error::new(ErrorKind::InvalidData, e))
            .and_then(|_| writer.flush());
        drop(writer);
        file.unlock()?;

        result?;
        Ok(())
    }

    /// Get the first record with the given key
    pub fn get(&self, key: &str) -> Option<T> {
        self.load().into_iter().find(|r| r.key() == key)
    }

    /// Append a record and persist the whole collection
    pub fn insert(&self, record: T) -> AppResult<()> {
        let mut records = self.load();
        records.push(record);
        self.save(&records)
    }

    /// Mutate the first record matching the key; returns false if none matched
    pub fn update(&self, key: &str, mutate: impl FnOnce(&mut T)) -> AppResult<bool> {
        let mut records = self.load();
        match records.iter_mut().find(|r| r.key() == key) {
            Some(record) => {
                mutate(record);
                self.save(&records)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove all records matching the key; returns false (and leaves the
    /// file untouched) if none matched
    pub fn delete(&self, key: &str) -> AppResult<bool> {
        let mut records = self.load();
        let before = records.len();
        records.retain(|r| r.key() != key);
        if records.len() == before {
            return Ok(false);
        }
        self.save(&records)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::book::Book;

    fn sample_books() -> Vec<Book> {
        vec![
            Book {
                isbn: "9780134685991".to_string(),
                title: "Effective Java".to_string(),
                author: "Joshua Bloch".to_string(),
                quantity: 3,
            },
            Book {
                isbn: "9781593278281".to_string(),
                title: "The Rust Programming Language".to_string(),
                author: "Steve Klabnik".to_string(),
                quantity: 1,
            },
        ]
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let books: Collection<Book> = Collection::new(dir.path());
        assert!(books.load().is_empty());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let books: Collection<Book> = Collection::new(dir.path());
        let records = sample_books();
        books.save(&records).unwrap();
        assert_eq!(books.load(), records);
    }

    #[test]
    fn test_corrupt_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("books.json"), b"{not json").unwrap();
        let books: Collection<Book> = Collection::new(dir.path());
        assert!(books.load().is_empty());
    }

    #[test]
    fn test_get_by_key() {
        let dir = tempfile::tempdir().unwrap();
        let books: Collection<Book> = Collection::new(dir.path());
        books.save(&sample_books()).unwrap();

        let book = books.get("9781593278281").unwrap();
        assert_eq!(book.quantity, 1);
        assert!(books.get("0000000000").is_none());
    }

    #[test]
    fn test_update_first_match_only() {
        let dir = tempfile::tempdir().unwrap();
        let books: Collection<Book> = Collection::new(dir.path());
        books.save(&sample_books()).unwrap();

        let updated = books.update("9780134685991", |b| b.quantity = 7).unwrap();
        assert!(updated);
        assert_eq!(books.get("9780134685991").unwrap().quantity, 7);

        let updated = books.update("missing", |b| b.quantity = 0).unwrap();
        assert!(!updated);
    }

    #[test]
    fn test_delete_nonexistent_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let books: Collection<Book> = Collection::new(dir.path());
        let records = sample_books();
        books.save(&records).unwrap();

        assert!(!books.delete("missing").unwrap());
        assert_eq!(books.load(), records);

        assert!(books.delete("9780134685991").unwrap());
        assert_eq!(books.load().len(), 1);
    }
}
