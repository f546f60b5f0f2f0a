//! Borrow/return transaction endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::transaction::{BorrowRequest, ReturnRequest, Transaction, TransactionQuery},
    models::user::Role,
};

use super::AuthenticatedUser;

/// List transactions
#[utoipa::path(
    get,
    path = "/transactions",
    tag = "transactions",
    security(("bearer_auth" = [])),
    params(TransactionQuery),
    responses(
        (status = 200, description = "Matching transactions", body = Vec<Transaction>)
    )
)]
pub async fn list_transactions(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<TransactionQuery>,
) -> AppResult<Json<Vec<Transaction>>> {
    Ok(Json(state.services.loans.list(&query)))
}

/// Get a transaction by id
#[utoipa::path(
    get,
    path = "/transactions/{id}",
    tag = "transactions",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Transaction id")
    ),
    responses(
        (status = 200, description = "Transaction details", body = Transaction),
        (status = 404, description = "Transaction not found")
    )
)]
pub async fn get_transaction(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Transaction>> {
    Ok(Json(state.services.loans.get(id)?))
}

/// Borrow a book
#[utoipa::path(
    post,
    path = "/transactions",
    tag = "transactions",
    security(("bearer_auth" = [])),
    request_body = BorrowRequest,
    responses(
        (status = 201, description = "Loan created", body = Transaction),
        (status = 404, description = "Book or member not found"),
        (status = 422, description = "No copies available or member has an overdue loan")
    )
)]
pub async fn borrow_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<BorrowRequest>,
) -> AppResult<(StatusCode, Json<Transaction>)> {
    claims.require_role(&[Role::Admin, Role::Librarian, Role::Staff])?;

    let transaction = state.services.loans.borrow(request)?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/transactions/{id}/return",
    tag = "transactions",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Transaction id")
    ),
    request_body = ReturnRequest,
    responses(
        (status = 200, description = "Book returned", body = Transaction),
        (status = 404, description = "Transaction not found"),
        (status = 422, description = "Already returned")
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(request): Json<ReturnRequest>,
) -> AppResult<Json<Transaction>> {
    claims.require_role(&[Role::Admin, Role::Librarian, Role::Staff])?;

    Ok(Json(state.services.loans.return_loan(id, request)?))
}

/// Delete a completed transaction
#[utoipa::path(
    delete,
    path = "/transactions/{id}",
    tag = "transactions",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Transaction id")
    ),
    responses(
        (status = 204, description = "Transaction deleted"),
        (status = 404, description = "Transaction not found"),
        (status = 422, description = "Loan is still active")
    )
)]
pub async fn delete_transaction(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    claims.require_role(&[Role::Admin, Role::Librarian])?;

    state.services.loans.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}
