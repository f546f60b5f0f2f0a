//! Per-entity validation predicates
//!
//! Validators check field presence, format and cross-field constraints on a
//! single candidate record. Uniqueness and referential integrity are checked
//! by the services against the loaded collections, not here.

use chrono::{NaiveDate, Utc};
use validator::ValidateEmail;

use crate::error::{AppError, AppResult};
use crate::models::book::CreateBook;
use crate::models::member::CreateMember;
use crate::models::reservation::CreateReservation;

/// Strip hyphens and spaces before checksum validation
fn normalize_isbn(isbn: &str) -> String {
    isbn.chars().filter(|c| *c != '-' && *c != ' ').collect()
}

/// ISBN-10 checksum: weighted digit sum divisible by 11, 'X' = 10 allowed
/// as the check digit
fn is_valid_isbn10(isbn: &str) -> bool {
    let chars: Vec<char> = isbn.chars().collect();
    if chars.len() != 10 {
        return false;
    }
    let mut sum: u32 = 0;
    for (i, c) in chars.iter().enumerate() {
        let value = match c.to_digit(10) {
            Some(d) => d,
            None if i == 9 && (*c == 'X' || *c == 'x') => 10,
            None => return false,
        };
        sum += value * (10 - i as u32);
    }
    sum % 11 == 0
}

/// ISBN-13 checksum: alternating 1/3 weighted digit sum divisible by 10
fn is_valid_isbn13(isbn: &str) -> bool {
    let digits: Vec<u32> = match isbn.chars().map(|c| c.to_digit(10)).collect() {
        Some(d) => d,
        None => return false,
    };
    if digits.len() != 13 {
        return false;
    }
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { *d } else { 3 * d })
        .sum();
    sum % 10 == 0
}

/// Accept either a valid ISBN-10 or ISBN-13
pub fn is_valid_isbn(isbn: &str) -> bool {
    let normalized = normalize_isbn(isbn);
    match normalized.len() {
        10 => is_valid_isbn10(&normalized),
        13 => is_valid_isbn13(&normalized),
        _ => false,
    }
}

pub fn is_valid_email(email: &str) -> bool {
    email.validate_email()
}

/// Reject dates in the future relative to the server clock
pub fn validate_not_future(date: NaiveDate, field: &str) -> AppResult<()> {
    if date > Utc::now().date_naive() {
        return Err(AppError::Validation(format!(
            "{} must not be in the future",
            field
        )));
    }
    Ok(())
}

pub fn validate_book(book: &CreateBook) -> AppResult<()> {
    if book.title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    if book.author.trim().is_empty() {
        return Err(AppError::Validation("Author is required".to_string()));
    }
    if !is_valid_isbn(&book.isbn) {
        return Err(AppError::Validation("Invalid ISBN checksum".to_string()));
    }
    Ok(())
}

pub fn validate_member(member: &CreateMember) -> AppResult<()> {
    if member.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    if member.phone.trim().is_empty() {
        return Err(AppError::Validation("Phone is required".to_string()));
    }
    if !is_valid_email(&member.email) {
        return Err(AppError::Validation("Invalid email address".to_string()));
    }
    Ok(())
}

/// Cross-field checks on a reservation request; `today` is the evaluation
/// date so the cutoff is testable
pub fn validate_reservation(reservation: &CreateReservation, today: NaiveDate) -> AppResult<()> {
    if reservation.due_date < today {
        return Err(AppError::Validation(
            "Due date must not be earlier than the current date".to_string(),
        ));
    }
    if let Some(reserved) = reservation.reserved_date {
        if reservation.due_date < reserved {
            return Err(AppError::Validation(
                "Due date must not be earlier than the reservation date".to_string(),
            ));
        }
    }
    Ok(())
}

/// Password strength rules applied at registration: at least 8 characters
/// with upper, lower, digit and special characters
pub fn validate_password_strength(password: &str) -> AppResult<()> {
    if password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters long".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(AppError::Validation(
            "Password must contain at least one uppercase letter".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(AppError::Validation(
            "Password must contain at least one lowercase letter".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AppError::Validation(
            "Password must contain at least one number".to_string(),
        ));
    }
    if !password.chars().any(|c| "!@#$%^&*(),.?\":{}|<>".contains(c)) {
        return Err(AppError::Validation(
            "Password must contain at least one special character".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isbn13_checksum() {
        assert!(is_valid_isbn("9780306406157"));
        assert!(is_valid_isbn("978-0-306-40615-7"));
        // Same digits, wrong check digit
        assert!(!is_valid_isbn("9780306406158"));
    }

    #[test]
    fn test_isbn10_checksum() {
        assert!(is_valid_isbn("0306406152"));
        assert!(is_valid_isbn("0-8044-2957-X"));
        assert!(!is_valid_isbn("0306406151"));
    }

    #[test]
    fn test_isbn_rejects_bad_shapes() {
        assert!(!is_valid_isbn(""));
        assert!(!is_valid_isbn("12345"));
        assert!(!is_valid_isbn("97803064061570"));
        assert!(!is_valid_isbn("03064061X2"));
    }

    #[test]
    fn test_validate_book_rejects_bad_isbn() {
        let book = CreateBook {
            isbn: "9780306406158".to_string(),
            title: "Gravitation".to_string(),
            author: "Misner".to_string(),
            quantity: 2,
        };
        assert!(validate_book(&book).is_err());
    }

    #[test]
    fn test_validate_book_requires_fields() {
        let book = CreateBook {
            isbn: "9780306406157".to_string(),
            title: "  ".to_string(),
            author: "Misner".to_string(),
            quantity: 2,
        };
        assert!(validate_book(&book).is_err());
    }

    #[test]
    fn test_validate_member_email() {
        let mut member = CreateMember {
            email: "reader@example.com".to_string(),
            name: "Reader".to_string(),
            phone: "555-0100".to_string(),
        };
        assert!(validate_member(&member).is_ok());
        member.email = "not-an-email".to_string();
        assert!(validate_member(&member).is_err());
    }

    #[test]
    fn test_reservation_due_date_cutoff() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut reservation = CreateReservation {
            book_isbn: "9780306406157".to_string(),
            member_email: "reader@example.com".to_string(),
            due_date: NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(),
            reserved_date: None,
        };
        assert!(validate_reservation(&reservation, today).is_err());
        reservation.due_date = today;
        assert!(validate_reservation(&reservation, today).is_ok());
    }

    #[test]
    fn test_password_strength() {
        assert!(validate_password_strength("Library@123").is_ok());
        assert!(validate_password_strength("short1!A").is_ok());
        assert!(validate_password_strength("alllowercase1!").is_err());
        assert!(validate_password_strength("NOLOWER1!").is_err());
        assert!(validate_password_strength("NoSpecial12").is_err());
        assert!(validate_password_strength("NoDigits!!").is_err());
        assert!(validate_password_strength("Sh0rt!").is_err());
    }
}
