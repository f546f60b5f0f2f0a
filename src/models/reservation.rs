//! Reservation model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::store::Record;

/// Reservation lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Active,
    Cancelled,
    Completed,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Active => "active",
            ReservationStatus::Cancelled => "cancelled",
            ReservationStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(ReservationStatus::Active),
            "cancelled" => Ok(ReservationStatus::Cancelled),
            "completed" => Ok(ReservationStatus::Completed),
            _ => Err(format!("Invalid reservation status: {}", s)),
        }
    }
}

/// Reservation record as persisted in reservations.json
///
/// Reservations are never physically deleted; cancel and complete only
/// mutate the status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Reservation {
    /// Sequential decimal string id
    pub id: String,
    pub book_isbn: String,
    pub member_email: String,
    pub status: ReservationStatus,
    pub reserved_date: NaiveDate,
    pub due_date: NaiveDate,
}

impl Record for Reservation {
    const COLLECTION: &'static str = "reservations";

    fn key(&self) -> String {
        self.id.clone()
    }
}

/// Create reservation request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReservation {
    pub book_isbn: String,
    pub member_email: String,
    pub due_date: NaiveDate,
    /// Reservation date; defaults to today
    pub reserved_date: Option<NaiveDate>,
}

/// Update reservation request (fields merge into the existing record)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateReservation {
    pub status: Option<ReservationStatus>,
    pub due_date: Option<NaiveDate>,
}

/// Reservation list query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ReservationQuery {
    /// Substring match on ISBN or member email
    pub search: Option<String>,
    pub status: Option<ReservationStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}
