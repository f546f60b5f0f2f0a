//! JSON-file record store
//!
//! Each collection is the sole persisted copy of its records, held as one
//! JSON array in `<data_dir>/<collection>.json`. Reads take a shared advisory
//! lock, writes an exclusive one; every operation re-reads and fully rewrites
//! the file it touches. There is no snapshot isolation across collections.

pub mod collection;

use std::fs;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::AppResult;
use crate::models::{
    book::Book, member::Member, reservation::Reservation, transaction::Transaction, user::User,
};

pub use collection::Collection;

/// A persistable record with a unique key within its collection
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// File stem of the backing collection
    const COLLECTION: &'static str;

    /// Unique key value for this record
    fn key(&self) -> String;
}

/// Main store struct holding one collection handle per entity
#[derive(Clone)]
pub struct Store {
    pub books: Collection<Book>,
    pub members: Collection<Member>,
    pub transactions: Collection<Transaction>,
    pub reservations: Collection<Reservation>,
    pub users: Collection<User>,
}

impl Store {
    /// Create a store rooted at the given data directory, creating it if needed
    pub fn new(data_dir: impl Into<PathBuf>) -> AppResult<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;

        Ok(Self {
            books: Collection::new(&data_dir),
            members: Collection::new(&data_dir),
            transactions: Collection::new(&data_dir),
            reservations: Collection::new(&data_dir),
            users: Collection::new(&data_dir),
        })
    }
}
