//! Borrow/return transaction engine
//!
//! State machine per (book, member) pair: borrow creates an active loan,
//! return sets the return date in place, and only returned records may be
//! deleted. Availability is enforced at borrow time only.

use chrono::{NaiveDate, Utc};

use crate::{
    error::{AppError, AppResult},
    models::transaction::{
        BorrowRequest, OverdueTier, ReturnRequest, Transaction, TransactionQuery,
    },
    store::Store,
    validate,
};

/// Days a loan may be held before it counts as overdue
pub const GRACE_PERIOD_DAYS: i64 = 14;

/// Days past the grace period at the evaluation date; zero or negative
/// means the loan is not overdue
pub fn days_overdue(borrow_date: NaiveDate, eval_date: NaiveDate) -> i64 {
    (eval_date - borrow_date).num_days() - GRACE_PERIOD_DAYS
}

/// Bucket an overdue loan into severity tiers at thresholds 0, 14 and 30
/// days past the grace period
pub fn overdue_tier(borrow_date: NaiveDate, eval_date: NaiveDate) -> Option<OverdueTier> {
    match days_overdue(borrow_date, eval_date) {
        d if d <= 0 => None,
        d if d <= 14 => Some(OverdueTier::Slight),
        d if d <= 30 => Some(OverdueTier::Moderate),
        _ => Some(OverdueTier::Severe),
    }
}

#[derive(Clone)]
pub struct LoansService {
    store: Store,
}

impl LoansService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// List transactions with optional filters and sorting
    pub fn list(&self, query: &TransactionQuery) -> Vec<Transaction> {
        let mut transactions = self.store.transactions.load();

        if let Some(ref search) = query.search {
            let needle = search.to_lowercase();
            transactions.retain(|t| {
                t.book_isbn.contains(&needle) || t.member_email.to_lowercase().contains(&needle)
            });
        }
        if let Some(from) = query.date_from {
            transactions.retain(|t| t.borrow_date >= from);
        }
        if let Some(to) = query.date_to {
            transactions.retain(|t| t.borrow_date <= to);
        }
        match query.status.as_deref() {
            Some("active") => transactions.retain(|t| t.is_active()),
            Some("returned") => transactions.retain(|t| !t.is_active()),
            _ => {}
        }

        match query.sort.as_deref() {
            Some("borrow_date") => transactions.sort_by_key(|t| t.borrow_date),
            Some("member_email") => {
                transactions.sort_by(|a, b| a.member_email.cmp(&b.member_email))
            }
            _ => transactions.sort_by_key(|t| t.id),
        }

        transactions
    }

    /// Get a transaction by id
    pub fn get(&self, id: i64) -> AppResult<Transaction> {
        self.store
            .transactions
            .get(&id.to_string())
            .ok_or_else(|| AppError::NotFound(format!("Transaction {} not found", id)))
    }

    /// Borrow a book, creating a new active loan
    pub fn borrow(&self, request: BorrowRequest) -> AppResult<Transaction> {
        let today = Utc::now().date_naive();
        let borrow_date = request.date.unwrap_or(today);
        validate::validate_not_future(borrow_date, "Borrow date")?;

        let book = self
            .store
            .books
            .get(&request.book_isbn)
            .ok_or_else(|| {
                AppError::NotFound(format!("Book with ISBN {} not found", request.book_isbn))
            })?;
        if self.store.members.get(&request.member_email).is_none() {
            return Err(AppError::NotFound(format!(
                "Member {} not found",
                request.member_email
            )));
        }

        let mut transactions = self.store.transactions.load();

        // Availability guard: active loans for this ISBN must stay below the
        // book's quantity
        let active = transactions
            .iter()
            .filter(|t| t.book_isbn == book.isbn && t.is_active())
            .count();
        if active >= book.quantity as usize {
            return Err(AppError::BusinessRule(format!(
                "No copies of {} available ({}/{} on loan)",
                book.isbn, active, book.quantity
            )));
        }

        // Overdue guard: the member must have no loan held past the grace
        // period
        let has_overdue = transactions.iter().any(|t| {
            t.member_email == request.member_email
                && t.is_active()
                && days_overdue(t.borrow_date, today) > 0
        });
        if has_overdue {
            return Err(AppError::BusinessRule(format!(
                "Member {} has an outstanding overdue loan",
                request.member_email
            )));
        }

        let id = transactions.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        let transaction = Transaction {
            id,
            book_isbn: request.book_isbn,
            member_email: request.member_email,
            borrow_date,
            return_date: None,
        };
        transactions.push(transaction.clone());
        self.store.transactions.save(&transactions)?;

        tracing::info!(
            id,
            isbn = %transaction.book_isbn,
            member = %transaction.member_email,
            "Book borrowed"
        );
        Ok(transaction)
    }

    /// Return an active loan, setting its return date in place
    pub fn return_loan(&self, id: i64, request: ReturnRequest) -> AppResult<Transaction> {
        let transaction = self.get(id)?;
        if !transaction.is_active() {
            return Err(AppError::BusinessRule(format!(
                "Transaction {} is already returned",
                id
            )));
        }

        let return_date = request.date.unwrap_or_else(|| Utc::now().date_naive());
        if return_date < transaction.borrow_date {
            return Err(AppError::Validation(
                "Return date must be on or after the borrow date".to_string(),
            ));
        }

        self.store
            .transactions
            .update(&id.to_string(), |t| t.return_date = Some(return_date))?;

        tracing::info!(id, "Book returned");
        self.get(id)
    }

    /// Delete a transaction; only permitted once it has been returned
    pub fn delete(&self, id: i64) -> AppResult<()> {
        let transaction = self.get(id)?;
        if transaction.is_active() {
            return Err(AppError::BusinessRule(
                "Cannot delete an active loan; return the book first".to_string(),
            ));
        }
        self.store.transactions.delete(&id.to_string())?;
        tracing::info!(id, "Transaction deleted");
        Ok(())
    }
}
