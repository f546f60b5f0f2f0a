//! Business logic services

pub mod books;
pub mod export;
pub mod loans;
pub mod members;
pub mod reports;
pub mod reservations;
pub mod users;

use crate::{config::AuthConfig, store::Store};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub books: books::BooksService,
    pub members: members::MembersService,
    pub loans: loans::LoansService,
    pub reservations: reservations::ReservationsService,
    pub users: users::UsersService,
    pub reports: reports::ReportsService,
    pub export: export::ExportService,
}

impl Services {
    /// Create all services over the given store
    pub fn new(store: Store, auth_config: AuthConfig) -> Self {
        Self {
            books: books::BooksService::new(store.clone()),
            members: members::MembersService::new(store.clone()),
            loans: loans::LoansService::new(store.clone()),
            reservations: reservations::ReservationsService::new(store.clone()),
            users: users::UsersService::new(store.clone(), auth_config),
            reports: reports::ReportsService::new(store.clone()),
            export: export::ExportService::new(store),
        }
    }
}
