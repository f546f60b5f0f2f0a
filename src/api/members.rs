//! Member management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::member::{CreateMember, Member, MemberQuery, UpdateMember},
    models::user::Role,
};

use super::AuthenticatedUser;

/// List members
#[utoipa::path(
    get,
    path = "/members",
    tag = "members",
    security(("bearer_auth" = [])),
    params(MemberQuery),
    responses(
        (status = 200, description = "Matching members", body = Vec<Member>)
    )
)]
pub async fn list_members(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<MemberQuery>,
) -> AppResult<Json<Vec<Member>>> {
    Ok(Json(state.services.members.list(&query)))
}

/// Get a member by email
#[utoipa::path(
    get,
    path = "/members/{email}",
    tag = "members",
    security(("bearer_auth" = [])),
    params(
        ("email" = String, Path, description = "Member email")
    ),
    responses(
        (status = 200, description = "Member details", body = Member),
        (status = 404, description = "Member not found")
    )
)]
pub async fn get_member(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(email): Path<String>,
) -> AppResult<Json<Member>> {
    Ok(Json(state.services.members.get(&email)?))
}

/// Register a library member
#[utoipa::path(
    post,
    path = "/members",
    tag = "members",
    security(("bearer_auth" = [])),
    request_body = CreateMember,
    responses(
        (status = 201, description = "Member created", body = Member),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_member(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateMember>,
) -> AppResult<(StatusCode, Json<Member>)> {
    claims.require_role(&[Role::Admin, Role::Librarian])?;

    let member = state.services.members.create(request)?;
    Ok((StatusCode::CREATED, Json(member)))
}

/// Update a member
#[utoipa::path(
    put,
    path = "/members/{email}",
    tag = "members",
    security(("bearer_auth" = [])),
    params(
        ("email" = String, Path, description = "Member email")
    ),
    request_body = UpdateMember,
    responses(
        (status = 200, description = "Member updated", body = Member),
        (status = 404, description = "Member not found")
    )
)]
pub async fn update_member(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(email): Path<String>,
    Json(request): Json<UpdateMember>,
) -> AppResult<Json<Member>> {
    claims.require_role(&[Role::Admin, Role::Librarian])?;

    Ok(Json(state.services.members.update(&email, request)?))
}

/// Delete a member
#[utoipa::path(
    delete,
    path = "/members/{email}",
    tag = "members",
    security(("bearer_auth" = [])),
    params(
        ("email" = String, Path, description = "Member email")
    ),
    responses(
        (status = 204, description = "Member deleted"),
        (status = 404, description = "Member not found")
    )
)]
pub async fn delete_member(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(email): Path<String>,
) -> AppResult<StatusCode> {
    claims.require_role(&[Role::Admin, Role::Librarian])?;

    state.services.members.delete(&email)?;
    Ok(StatusCode::NO_CONTENT)
}
