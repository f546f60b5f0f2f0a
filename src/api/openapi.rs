//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, export, health, loans, members, reports, reservations, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Lectern API",
        version = "1.0.0",
        description = "Library Management System REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::register,
        auth::me,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Members
        members::list_members,
        members::get_member,
        members::create_member,
        members::update_member,
        members::delete_member,
        // Transactions
        loans::list_transactions,
        loans::get_transaction,
        loans::borrow_book,
        loans::return_book,
        loans::delete_transaction,
        // Reservations
        reservations::list_reservations,
        reservations::get_reservation,
        reservations::create_reservation,
        reservations::update_reservation,
        reservations::cancel_reservation,
        // Users
        users::list_users,
        users::update_user,
        users::delete_user,
        // Reports & export
        reports::get_reports,
        reports::download_report,
        export::export_collection,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::RegisterRequest,
            auth::UserInfo,
            // Books
            crate::models::book::Book,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            // Members
            crate::models::member::Member,
            crate::models::member::CreateMember,
            crate::models::member::UpdateMember,
            // Transactions
            crate::models::transaction::Transaction,
            crate::models::transaction::TransactionAction,
            crate::models::transaction::BorrowRequest,
            crate::models::transaction::ReturnRequest,
            crate::models::transaction::OverdueTier,
            // Reservations
            crate::models::reservation::Reservation,
            crate::models::reservation::ReservationStatus,
            crate::models::reservation::CreateReservation,
            crate::models::reservation::UpdateReservation,
            // Users
            crate::models::user::Role,
            crate::models::user::UpdateUser,
            // Reports
            crate::services::reports::ReportType,
            crate::services::reports::ReportSummary,
            crate::services::reports::BookUsageRow,
            crate::services::reports::MemberActivityRow,
            crate::services::reports::TransactionHistoryRow,
            crate::services::reports::OverdueRow,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "books", description = "Book catalog management"),
        (name = "members", description = "Library member management"),
        (name = "transactions", description = "Borrow and return transactions"),
        (name = "reservations", description = "Book reservations"),
        (name = "users", description = "System user administration"),
        (name = "reports", description = "Aggregate reports"),
        (name = "export", description = "Collection export")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
