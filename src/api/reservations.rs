//! Reservation endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::reservation::{CreateReservation, Reservation, ReservationQuery, UpdateReservation},
    models::user::Role,
};

use super::AuthenticatedUser;

/// List reservations
#[utoipa::path(
    get,
    path = "/reservations",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(ReservationQuery),
    responses(
        (status = 200, description = "Matching reservations", body = Vec<Reservation>)
    )
)]
pub async fn list_reservations(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<ReservationQuery>,
) -> AppResult<Json<Vec<Reservation>>> {
    Ok(Json(state.services.reservations.list(&query)))
}

/// Get a reservation by id
#[utoipa::path(
    get,
    path = "/reservations/{id}",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Reservation id")
    ),
    responses(
        (status = 200, description = "Reservation details", body = Reservation),
        (status = 404, description = "Reservation not found")
    )
)]
pub async fn get_reservation(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<Reservation>> {
    Ok(Json(state.services.reservations.get(&id)?))
}

/// Reserve a book
#[utoipa::path(
    post,
    path = "/reservations",
    tag = "reservations",
    security(("bearer_auth" = [])),
    request_body = CreateReservation,
    responses(
        (status = 201, description = "Reservation created", body = Reservation),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Book or member not found")
    )
)]
pub async fn create_reservation(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateReservation>,
) -> AppResult<(StatusCode, Json<Reservation>)> {
    claims.require_role(&[Role::Admin, Role::Librarian, Role::Staff])?;

    let reservation = state.services.reservations.create(request)?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

/// Update a reservation
#[utoipa::path(
    put,
    path = "/reservations/{id}",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Reservation id")
    ),
    request_body = UpdateReservation,
    responses(
        (status = 200, description = "Reservation updated", body = Reservation),
        (status = 404, description = "Reservation not found")
    )
)]
pub async fn update_reservation(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateReservation>,
) -> AppResult<Json<Reservation>> {
    claims.require_role(&[Role::Admin, Role::Librarian, Role::Staff])?;

    Ok(Json(state.services.reservations.update(&id, request)?))
}

/// Cancel an active reservation
#[utoipa::path(
    post,
    path = "/reservations/{id}/cancel",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Reservation id")
    ),
    responses(
        (status = 200, description = "Reservation cancelled", body = Reservation),
        (status = 404, description = "Reservation not found"),
        (status = 422, description = "Reservation is not active")
    )
)]
pub async fn cancel_reservation(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<Reservation>> {
    claims.require_role(&[Role::Admin, Role::Librarian, Role::Staff])?;

    Ok(Json(state.services.reservations.cancel(&id)?))
}
