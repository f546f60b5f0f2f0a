//! Collection export endpoints

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::{
    error::{AppError, AppResult},
    models::user::Role,
    services::export::{ExportDataType, ExportFormat},
};

use super::AuthenticatedUser;

/// Download a collection as CSV or PDF
#[utoipa::path(
    get,
    path = "/export/{data_type}/{format}",
    tag = "export",
    security(("bearer_auth" = [])),
    params(
        ("data_type" = String, Path, description = "books, members, transactions or reservations"),
        ("format" = String, Path, description = "csv or pdf")
    ),
    responses(
        (status = 200, description = "Rendered export"),
        (status = 400, description = "Unknown data type or format")
    )
)]
pub async fn export_collection(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((data_type, format)): Path<(String, String)>,
) -> AppResult<Response> {
    claims.require_role(&[Role::Admin, Role::Librarian, Role::Staff])?;

    let data_type: ExportDataType = data_type.parse().map_err(AppError::BadRequest)?;
    let format: ExportFormat = format.parse().map_err(AppError::BadRequest)?;

    let export = state.services.export.export(data_type, format)?;

    Ok((
        [
            (header::CONTENT_TYPE, export.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.filename),
            ),
        ],
        export.bytes,
    )
        .into_response())
}
