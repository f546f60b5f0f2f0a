//! Reservation management service

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::reservation::{
        CreateReservation, Reservation, ReservationQuery, ReservationStatus, UpdateReservation,
    },
    store::Store,
    validate,
};

#[derive(Clone)]
pub struct ReservationsService {
    store: Store,
}

impl ReservationsService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// List reservations with optional filters
    pub fn list(&self, query: &ReservationQuery) -> Vec<Reservation> {
        let mut reservations = self.store.reservations.load();

        if let Some(ref search) = query.search {
            let needle = search.to_lowercase();
            reservations.retain(|r| {
                r.book_isbn.contains(&needle) || r.member_email.to_lowercase().contains(&needle)
            });
        }
        if let Some(status) = query.status {
            reservations.retain(|r| r.status == status);
        }
        if let Some(from) = query.date_from {
            reservations.retain(|r| r.reserved_date >= from);
        }
        if let Some(to) = query.date_to {
            reservations.retain(|r| r.reserved_date <= to);
        }

        reservations
    }

    /// Get a reservation by id
    pub fn get(&self, id: &str) -> AppResult<Reservation> {
        self.store
            .reservations
            .get(id)
            .ok_or_else(|| AppError::NotFound(format!("Reservation {} not found", id)))
    }

    /// Create a new reservation with the next sequential id
    pub fn create(&self, request: CreateReservation) -> AppResult<Reservation> {
        let today = Utc::now().date_naive();
        validate::validate_reservation(&request, today)?;

        if self.store.books.get(&request.book_isbn).is_none() {
            return Err(AppError::NotFound(format!(
                "Book with ISBN {} not found",
                request.book_isbn
            )));
        }
        if self.store.members.get(&request.member_email).is_none() {
            return Err(AppError::NotFound(format!(
                "Member {} not found",
                request.member_email
            )));
        }

        let mut reservations = self.store.reservations.load();
        let next_id = reservations
            .iter()
            .filter_map(|r| r.id.parse::<i64>().ok())
            .max()
            .unwrap_or(0)
            + 1;

        let reservation = Reservation {
            id: next_id.to_string(),
            book_isbn: request.book_isbn,
            member_email: request.member_email,
            status: ReservationStatus::Active,
            reserved_date: request.reserved_date.unwrap_or(today),
            due_date: request.due_date,
        };
        reservations.push(reservation.clone());
        self.store.reservations.save(&reservations)?;

        tracing::info!(id = %reservation.id, isbn = %reservation.book_isbn, "Reservation created");
        Ok(reservation)
    }

    /// Merge updated fields into an existing reservation
    pub fn update(&self, id: &str, request: UpdateReservation) -> AppResult<Reservation> {
        let existing = self.get(id)?;

        if let Some(due_date) = request.due_date {
            if due_date < existing.reserved_date {
                return Err(AppError::Validation(
                    "Due date must not be earlier than the reservation date".to_string(),
                ));
            }
        }

        self.store.reservations.update(id, |reservation| {
            if let Some(status) = request.status {
                reservation.status = status;
            }
            if let Some(due_date) = request.due_date {
                reservation.due_date = due_date;
            }
        })?;

        self.get(id)
    }

    /// Cancel an active reservation; the record is retained
    pub fn cancel(&self, id: &str) -> AppResult<Reservation> {
        let reservation = self.get(id)?;
        if reservation.status != ReservationStatus::Active {
            return Err(AppError::BusinessRule(format!(
                "Reservation {} is already {}",
                id, reservation.status
            )));
        }

        self.store
            .reservations
            .update(id, |r| r.status = ReservationStatus::Cancelled)?;

        tracing::info!(id, "Reservation cancelled");
        self.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{book::Book, member::Member};
    use chrono::Duration;

    fn service() -> (ReservationsService, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path()).unwrap();
        store
            .books
            .save(&[Book {
                isbn: "9780306406157".to_string(),
                title: "Physics".to_string(),
                author: "Author".to_string(),
                quantity: 1,
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
        (ReservationsService::new(store), dir)
    }

    fn request(days_ahead: i64) -> CreateReservation {
        CreateReservation {
            book_isbn: "9780306406157".to_string(),
            member_email: "reader@example.com".to_string(),
            due_date: Utc::now().date_naive() + Duration::days(days_ahead),
            reserved_date: None,
        }
    }

    #[test]
    fn test_sequential_string_ids() {
        let (reservations, _dir) = service();
        assert_eq!(reservations.create(request(7)).unwrap().id, "1");
        assert_eq!(reservations.create(request(7)).unwrap().id, "2");
    }

    #[test]
    fn test_past_due_date_rejected() {
        let (reservations, _dir) = service();
        let err = reservations.create(request(-1)).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_cancel_is_terminal() {
        let (reservations, _dir) = service();
        reservations.create(request(7)).unwrap();

        let cancelled = reservations.cancel("1").unwrap();
        assert_eq!(cancelled.status, ReservationStatus::Cancelled);

        let err = reservations.cancel("1").unwrap_err();
        assert!(matches!(err, AppError::BusinessRule(_)));
    }

    #[test]
    fn test_unknown_book_rejected() {
        let (reservations, _dir) = service();
        let mut req = request(7);
        req.book_isbn = "9999999999999".to_string();
        assert!(matches!(
            reservations.create(req).unwrap_err(),
            AppError::NotFound(_)
        ));
    }
}
