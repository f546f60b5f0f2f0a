//! Book catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::book::{Book, BookQuery, CreateBook, UpdateBook},
    models::user::Role,
};

use super::AuthenticatedUser;

/// List books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    params(BookQuery),
    responses(
        (status = 200, description = "Matching books", body = Vec<Book>)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<Vec<Book>>> {
    Ok(Json(state.services.books.list(&query)))
}

/// Get a book by ISBN
#[utoipa::path(
    get,
    path = "/books/{isbn}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("isbn" = String, Path, description = "Book ISBN")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(isbn): Path<String>,
) -> AppResult<Json<Book>> {
    Ok(Json(state.services.books.get(&isbn)?))
}

/// Add a book to the catalog
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "ISBN already exists")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    claims.require_role(&[Role::Admin, Role::Librarian])?;

    let book = state.services.books.create(request)?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Update a book
#[utoipa::path(
    put,
    path = "/books/{isbn}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("isbn" = String, Path, description = "Book ISBN")
    ),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(isbn): Path<String>,
    Json(request): Json<UpdateBook>,
) -> AppResult<Json<Book>> {
    claims.require_role(&[Role::Admin, Role::Librarian])?;

    Ok(Json(state.services.books.update(&isbn, request)?))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{isbn}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("isbn" = String, Path, description = "Book ISBN")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(isbn): Path<String>,
) -> AppResult<StatusCode> {
    claims.require_role(&[Role::Admin, Role::Librarian])?;

    state.services.books.delete(&isbn)?;
    Ok(StatusCode::NO_CONTENT)
}
