//! User administration endpoints (admin only)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::user::UpdateUser,
};

use super::{auth::UserInfo, AuthenticatedUser};

/// List system user accounts
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "System users", body = Vec<UserInfo>),
        (status = 403, description = "Administrator privileges required")
    )
)]
pub async fn list_users(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<UserInfo>>> {
    claims.require_admin()?;

    let users = state
        .services
        .users
        .list_system_users()
        .into_iter()
        .map(UserInfo::from)
        .collect();
    Ok(Json(users))
}

/// Update a user account
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "User id")
    ),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = UserInfo),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn update_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateUser>,
) -> AppResult<Json<UserInfo>> {
    claims.require_admin()?;

    let user = state.services.users.update(id, request)?;
    Ok(Json(user.into()))
}

/// Delete a user account; the seed admin is protected
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "User id")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found"),
        (status = 422, description = "Seed admin cannot be deleted")
    )
)]
pub async fn delete_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;

    state.services.users.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}
