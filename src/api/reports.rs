//! Aggregate report endpoints

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::user::Role,
    services::export::csv_bytes,
    services::reports::{ReportSummary, ReportType},
};

use super::AuthenticatedUser;

/// Library-wide aggregate counts
#[utoipa::path(
    get,
    path = "/reports",
    tag = "reports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Aggregate counts", body = ReportSummary)
    )
)]
pub async fn get_reports(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<ReportSummary>> {
    claims.require_role(&[Role::Admin, Role::Librarian, Role::Staff])?;

    Ok(Json(state.services.reports.summary()?))
}

/// Download one report as CSV
#[utoipa::path(
    get,
    path = "/reports/download/{report_type}",
    tag = "reports",
    security(("bearer_auth" = [])),
    params(
        ("report_type" = String, Path,
         description = "book_usage, member_activity, transaction_history or overdue")
    ),
    responses(
        (status = 200, description = "CSV report"),
        (status = 400, description = "Unknown report type")
    )
)]
pub async fn download_report(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(report_type): Path<String>,
) -> AppResult<Response> {
    claims.require_role(&[Role::Admin, Role::Librarian, Role::Staff])?;

    let report_type: ReportType = report_type.parse().map_err(AppError::BadRequest)?;
    let reports = &state.services.reports;

    let (bytes, filename) = match report_type {
        ReportType::BookUsage => (csv_bytes(&reports.book_usage())?, "book_usage.csv"),
        ReportType::MemberActivity => {
            (csv_bytes(&reports.member_activity())?, "member_activity.csv")
        }
        ReportType::TransactionHistory => (
            csv_bytes(&reports.transaction_history())?,
            "transaction_history.csv",
        ),
        ReportType::Overdue => (
            csv_bytes(&reports.overdue(Utc::now().date_naive()))?,
            "overdue.csv",
        ),
    };

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response())
}
