//! Borrow/return transaction model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::store::Record;

/// Loan transaction as persisted in transactions.json
///
/// A record with a null `return_date` is an active loan; returning sets the
/// date in place, so history accumulates in the same collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Transaction {
    /// Monotonic id, max(existing) + 1
    pub id: i64,
    pub book_isbn: String,
    pub member_email: String,
    pub borrow_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
}

impl Transaction {
    pub fn is_active(&self) -> bool {
        self.return_date.is_none()
    }
}

impl Record for Transaction {
    const COLLECTION: &'static str = "transactions";

    fn key(&self) -> String {
        self.id.to_string()
    }
}

/// Transaction actions accepted on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionAction {
    Borrow,
    Return,
}

impl std::str::FromStr for TransactionAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "borrow" => Ok(TransactionAction::Borrow),
            "return" => Ok(TransactionAction::Return),
            _ => Err(format!("Invalid transaction action: {}", s)),
        }
    }
}

/// Borrow request
#[derive(Debug, Deserialize, ToSchema)]
pub struct BorrowRequest {
    pub book_isbn: String,
    pub member_email: String,
    /// Borrow date; defaults to today
    pub date: Option<NaiveDate>,
}

/// Return request
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ReturnRequest {
    /// Return date; defaults to today
    pub date: Option<NaiveDate>,
}

/// Transaction list query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct TransactionQuery {
    /// Substring match on ISBN or member email
    pub search: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    /// Filter: active or returned
    pub status: Option<String>,
    /// Sort field: id, borrow_date or member_email
    pub sort: Option<String>,
}

/// Overdue severity buckets for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OverdueTier {
    Slight,
    Moderate,
    Severe,
}

impl std::fmt::Display for OverdueTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            OverdueTier::Slight => "slightly overdue",
            OverdueTier::Moderate => "moderately overdue",
            OverdueTier::Severe => "severely overdue",
        };
        write!(f, "{}", label)
    }
}
