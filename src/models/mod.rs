//! Domain models for books, members, transactions, reservations and users

pub mod book;
pub mod member;
pub mod reservation;
pub mod transaction;
pub mod user;
