//! Aggregate reporting over the record collections

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{reservation::ReservationStatus, transaction::OverdueTier},
    services::loans::{days_overdue, overdue_tier},
    store::Store,
};

/// Downloadable report types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    BookUsage,
    MemberActivity,
    TransactionHistory,
    Overdue,
}

impl std::str::FromStr for ReportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "book_usage" => Ok(ReportType::BookUsage),
            "member_activity" => Ok(ReportType::MemberActivity),
            "transaction_history" => Ok(ReportType::TransactionHistory),
            "overdue" => Ok(ReportType::Overdue),
            _ => Err(format!("Invalid report type: {}", s)),
        }
    }
}

/// Library-wide aggregate counts
#[derive(Debug, Serialize, ToSchema)]
pub struct ReportSummary {
    pub total_books: usize,
    pub total_copies: u64,
    pub total_members: usize,
    pub active_loans: usize,
    pub overdue_loans: usize,
    pub active_reservations: usize,
}

/// Borrow counts per book
#[derive(Debug, Serialize, ToSchema)]
pub struct BookUsageRow {
    pub isbn: String,
    pub title: String,
    pub quantity: u32,
    pub total_borrows: usize,
    pub active_loans: usize,
}

/// Loan counts per member
#[derive(Debug, Serialize, ToSchema)]
pub struct MemberActivityRow {
    pub email: String,
    pub name: String,
    pub total_borrows: usize,
    pub active_loans: usize,
    pub overdue_loans: usize,
}

/// One transaction with its overdue classification
#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionHistoryRow {
    pub id: i64,
    pub book_isbn: String,
    pub member_email: String,
    pub borrow_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub status: String,
    pub overdue_tier: Option<OverdueTier>,
}

/// One active loan held past the grace period
#[derive(Debug, Serialize, ToSchema)]
pub struct OverdueRow {
    pub transaction_id: i64,
    pub book_isbn: String,
    pub member_email: String,
    pub borrow_date: NaiveDate,
    pub days_overdue: i64,
    pub tier: OverdueTier,
}

#[derive(Clone)]
pub struct ReportsService {
    store: Store,
}

impl ReportsService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Aggregate counts across all collections
    pub fn summary(&self) -> AppResult<ReportSummary> {
        let books = self.store.books.load();
        let members = self.store.members.load();
        let transactions = self.store.transactions.load();
        let reservations = self.store.reservations.load();
        let today = Utc::now().date_naive();

        Ok(ReportSummary {
            total_books: books.len(),
            total_copies: books.iter().map(|b| b.quantity as u64).sum(),
            total_members: members.len(),
            active_loans: transactions.iter().filter(|t| t.is_active()).count(),
            overdue_loans: transactions
                .iter()
                .filter(|t| t.is_active() && days_overdue(t.borrow_date, today) > 0)
                .count(),
            active_reservations: reservations
                .iter()
                .filter(|r| r.status == ReservationStatus::Active)
                .count(),
        })
    }

    /// Borrow counts per book, most borrowed first
    pub fn book_usage(&self) -> Vec<BookUsageRow> {
        let transactions = self.store.transactions.load();
        let mut rows: Vec<BookUsageRow> = self
            .store
            .books
            .load()
            .into_iter()
            .map(|book| {
                let total = transactions
                    .iter()
                    .filter(|t| t.book_isbn == book.isbn)
                    .count();
                let active = transactions
                    .iter()
                    .filter(|t| t.book_isbn == book.isbn && t.is_active())
                    .count();
                BookUsageRow {
                    isbn: book.isbn,
                    title: book.title,
                    quantity: book.quantity,
                    total_borrows: total,
                    active_loans: active,
                }
            })
            .collect();
        rows.sort_by(|a, b| b.total_borrows.cmp(&a.total_borrows));
        rows
    }

    /// Loan counts per member, most active first
    pub fn member_activity(&self) -> Vec<MemberActivityRow> {
        let transactions = self.store.transactions.load();
        let today = Utc::now().date_naive();
        let mut rows: Vec<MemberActivityRow> = self
            .store
            .members
            .load()
            .into_iter()
            .map(|member| {
                let theirs: Vec<_> = transactions
                    .iter()
                    .filter(|t| t.member_email == member.email)
                    .collect();
                MemberActivityRow {
                    total_borrows: theirs.len(),
                    active_loans: theirs.iter().filter(|t| t.is_active()).count(),
                    overdue_loans: theirs
                        .iter()
                        .filter(|t| t.is_active() && days_overdue(t.borrow_date, today) > 0)
                        .count(),
                    email: member.email,
                    name: member.name,
                }
            })
            .collect();
        rows.sort_by(|a, b| b.total_borrows.cmp(&a.total_borrows));
        rows
    }

    /// All transactions with their overdue classification
    ///
    /// Returned loans are classified at their return date, active loans at
    /// the evaluation date.
    pub fn transaction_history(&self) -> Vec<TransactionHistoryRow> {
        let today = Utc::now().date_naive();
        let mut rows: Vec<TransactionHistoryRow> = self
            .store
            .transactions
            .load()
            .into_iter()
            .map(|t| {
                let eval = t.return_date.unwrap_or(today);
                TransactionHistoryRow {
                    id: t.id,
                    status: if t.is_active() { "active" } else { "returned" }.to_string(),
                    overdue_tier: overdue_tier(t.borrow_date, eval),
                    book_isbn: t.book_isbn,
                    member_email: t.member_email,
                    borrow_date: t.borrow_date,
                    return_date: t.return_date,
                }
            })
            .collect();
        rows.sort_by_key(|r| r.id);
        rows
    }

    /// Active loans held past the grace period, worst first
    pub fn overdue(&self, eval_date: NaiveDate) -> Vec<OverdueRow> {
        let mut rows: Vec<OverdueRow> = self
            .store
            .transactions
            .load()
            .into_iter()
            .filter(|t| t.is_active())
            .filter_map(|t| {
                overdue_tier(t.borrow_date, eval_date).map(|tier| OverdueRow {
                    transaction_id: t.id,
                    book_isbn: t.book_isbn,
                    member_email: t.member_email,
                    borrow_date: t.borrow_date,
                    days_overdue: days_overdue(t.borrow_date, eval_date),
                    tier,
                })
            })
            .collect();
        rows.sort_by(|a, b| b.days_overdue.cmp(&a.days_overdue));
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{book::Book, member::Member, transaction::Transaction};
    use chrono::Duration;

    fn store_with_history() -> (ReportsService, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path()).unwrap();
        let today = Utc::now().date_naive();

        store
            .books
            .save(&[Book {
                isbn: "9780306406157".to_string(),
                title: "Physics".to_string(),
                author: "Author".to_string(),
                quantity: 2,
            }])
            .unwrap();
        store
            .members
            .save(&[Member {
                email: "reader@example.com".to_string(),
                name: "Reader".to_string(),
                phone: "555-0100".to_string(),
            }])
            .unwrap();
        store
            .transactions
            .save(&[
                Transaction {
                    id: 1,
                    book_isbn: "9780306406157".to_string(),
                    member_email: "reader@example.com".to_string(),
                    borrow_date: today - Duration::days(40),
                    return_date: Some(today - Duration::days(30)),
                },
                Transaction {
                    id: 2,
                    book_isbn: "9780306406157".to_string(),
                    member_email: "reader@example.com".to_string(),
                    borrow_date: today - Duration::days(20),
                    return_date: None,
                },
            ])
            .unwrap();

        (ReportsService::new(store), dir)
    }

    #[test]
    fn test_summary_counts() {
        let (reports, _dir) = store_with_history();
        let summary = reports.summary().unwrap();
        assert_eq!(summary.total_books, 1);
        assert_eq!(summary.total_copies, 2);
        assert_eq!(summary.active_loans, 1);
        assert_eq!(summary.overdue_loans, 1);
    }

    #[test]
    fn test_book_usage_counts() {
        let (reports, _dir) = store_with_history();
        let usage = reports.book_usage();
        assert_eq!(usage[0].total_borrows, 2);
        assert_eq!(usage[0].active_loans, 1);
    }

    #[test]
    fn test_overdue_report_only_lists_active_loans() {
        let (reports, _dir) = store_with_history();
        let today = Utc::now().date_naive();
        let rows = reports.overdue(today);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].transaction_id, 2);
        assert_eq!(rows[0].days_overdue, 6);
        assert_eq!(rows[0].tier, OverdueTier::Slight);
    }
}
