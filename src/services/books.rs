//! Book catalog service

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, CreateBook, UpdateBook},
    store::Store,
    validate,
};

#[derive(Clone)]
pub struct BooksService {
    store: Store,
}

impl BooksService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// List books with optional filters and sorting
    pub fn list(&self, query: &BookQuery) -> Vec<Book> {
        let mut books = self.store.books.load();

        if let Some(ref search) = query.search {
            let needle = search.to_lowercase();
            books.retain(|b| {
                b.title.to_lowercase().contains(&needle)
                    || b.author.to_lowercase().contains(&needle)
                    || b.isbn.contains(&needle)
            });
        }
        if let Some(min) = query.min_quantity {
            books.retain(|b| b.quantity >= min);
        }
        if let Some(max) = query.max_quantity {
            books.retain(|b| b.quantity <= max);
        }

        match query.sort.as_deref() {
            Some("title") => books.sort_by(|a, b| a.title.cmp(&b.title)),
            Some("author") => books.sort_by(|a, b| a.author.cmp(&b.author)),
            Some("quantity") => books.sort_by(|a, b| a.quantity.cmp(&b.quantity)),
            _ => books.sort_by(|a, b| a.isbn.cmp(&b.isbn)),
        }

        books
    }

    /// Get a book by ISBN
    pub fn get(&self, isbn: &str) -> AppResult<Book> {
        self.store
            .books
            .get(isbn)
            .ok_or_else(|| AppError::NotFound(format!("Book with ISBN {} not found", isbn)))
    }

    /// Create a new book
    pub fn create(&self, request: CreateBook) -> AppResult<Book> {
        validate::validate_book(&request)?;

        // Duplicate-key scan over the loaded collection
        if self.store.books.get(&request.isbn).is_some() {
            return Err(AppError::Conflict(format!(
                "Book with ISBN {} already exists",
                request.isbn
            )));
        }

        let book = Book {
            isbn: request.isbn,
            title: request.title,
            author: request.author,
            quantity: request.quantity,
        };
        self.store.books.insert(book.clone())?;

        tracing::info!(isbn = %book.isbn, "Book created");
        Ok(book)
    }

    /// Merge updated fields into an existing book
    ///
    /// A quantity decrease is not re-checked against outstanding loans; the
    /// availability bound is only enforced at borrow time.
    pub fn update(&self, isbn: &str, request: UpdateBook) -> AppResult<Book> {
        let updated = self.store.books.update(isbn, |book| {
            if let Some(title) = request.title {
                book.title = title;
            }
            if let Some(author) = request.author {
                book.author = author;
            }
            if let Some(quantity) = request.quantity {
                book.quantity = quantity;
            }
        })?;

        if !updated {
            return Err(AppError::NotFound(format!(
                "Book with ISBN {} not found",
                isbn
            )));
        }
        self.get(isbn)
    }

    /// Delete a book by ISBN
    pub fn delete(&self, isbn: &str) -> AppResult<()> {
        if !self.store.books.delete(isbn)? {
            return Err(AppError::NotFound(format!(
                "Book with ISBN {} not found",
                isbn
            )));
        }
        tracing::info!(isbn, "Book deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> (BooksService, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path()).unwrap();
        (BooksService::new(store), dir)
    }

    fn create_request(isbn: &str, title: &str) -> CreateBook {
        CreateBook {
            isbn: isbn.to_string(),
            title: title.to_string(),
            author: "Author".to_string(),
            quantity: 2,
        }
    }

    #[test]
    fn test_create_and_get() {
        let (books, _dir) = service();
        books.create(create_request("9780306406157", "Physics")).unwrap();
        assert_eq!(books.get("9780306406157").unwrap().title, "Physics");
    }

    #[test]
    fn test_duplicate_isbn_rejected() {
        let (books, _dir) = service();
        books.create(create_request("9780306406157", "Physics")).unwrap();
        let err = books.create(create_request("9780306406157", "Other")).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn test_update_merges_fields() {
        let (books, _dir) = service();
        books.create(create_request("9780306406157", "Physics")).unwrap();
        let book = books
            .update(
                "9780306406157",
                UpdateBook {
                    title: None,
                    author: None,
                    quantity: Some(9),
                },
            )
            .unwrap();
        assert_eq!(book.title, "Physics");
        assert_eq!(book.quantity, 9);
    }

    #[test]
    fn test_list_filters_and_sort() {
        let (books, _dir) = service();
        books.create(create_request("9780306406157", "Zoology")).unwrap();
        books
            .create(CreateBook {
                isbn: "0306406152".to_string(),
                title: "Algebra".to_string(),
                author: "Author".to_string(),
                quantity: 5,
            })
            .unwrap();

        let query = BookQuery {
            min_quantity: Some(3),
            ..Default::default()
        };
        let result = books.list(&query);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "Algebra");

        let query = BookQuery {
            sort: Some("title".to_string()),
            ..Default::default()
        };
        let result = books.list(&query);
        assert_eq!(result[0].title, "Algebra");
        assert_eq!(result[1].title, "Zoology");
    }

    #[test]
    fn test_delete_missing_reports_not_found() {
        let (books, _dir) = service();
        assert!(matches!(
            books.delete("9780306406157").unwrap_err(),
            AppError::NotFound(_)
        ));
    }
}
