//! Loan endpoints: borrowed copies and renewals

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::BookInstance,
    pagination::PageQuery,
    renewal::RenewBookForm,
    services::loans::RenewalForm,
    AppState,
};

use super::{AuthenticatedUser, PaginatedResponse};

/// Renewal response with the updated copy
#[derive(Serialize, ToSchema)]
pub struct RenewResponse {
    pub copy: BookInstance,
    /// Status message
    pub message: String,
}

/// Copies on loan to the current user
#[utoipa::path(
    get,
    path = "/mybooks",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Borrowed copies, earliest due first", body = PaginatedResponse<BookInstance>),
        (status = 302, description = "Not logged in, redirected to login")
    )
)]
pub async fn list_my_borrowed(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PaginatedResponse<BookInstance>>> {
    let page = state
        .services
        .loans
        .list_borrowed_by(claims.user_id, query.number())
        .await?;
    Ok(Json(page.into()))
}

/// Every copy on loan (librarians only)
#[utoipa::path(
    get,
    path = "/borrowed",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "All borrowed copies, earliest due first", body = PaginatedResponse<BookInstance>),
        (status = 302, description = "Not logged in, redirected to login"),
        (status = 403, description = "Not a librarian")
    )
)]
pub async fn list_all_borrowed(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PaginatedResponse<BookInstance>>> {
    claims.require_mark_returned()?;

    let page = state.services.loans.list_all_borrowed(query.number()).await?;
    Ok(Json(page.into()))
}

/// Renewal form for a copy with the proposed date
#[utoipa::path(
    get,
    path = "/copies/{id}/renew",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Book instance ID")
    ),
    responses(
        (status = 200, description = "Renewal form", body = RenewalForm),
        (status = 403, description = "Not a librarian"),
        (status = 404, description = "Book instance not found")
    )
)]
pub async fn get_renewal_form(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RenewalForm>> {
    claims.require_mark_returned()?;

    let form = state.services.loans.renewal_form(id).await?;
    Ok(Json(form))
}

/// Renew a copy until the submitted date
#[utoipa::path(
    post,
    path = "/copies/{id}/renew",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Book instance ID")
    ),
    request_body = RenewBookForm,
    responses(
        (status = 200, description = "Copy renewed", body = RenewResponse),
        (status = 400, description = "Renewal date missing, malformed or outside the allowed window", body = crate::error::ErrorResponse),
        (status = 403, description = "Not a librarian"),
        (status = 404, description = "Book instance not found")
    )
)]
pub async fn renew_copy(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    payload: Result<Json<RenewBookForm>, JsonRejection>,
) -> AppResult<Json<RenewResponse>> {
    claims.require_mark_returned()?;
    let Json(form) = payload.map_err(renewal_rejection)?;

    let copy = state.services.loans.renew(id, &form).await?;
    let message = match copy.due_back {
        Some(due_back) => format!("Renewed until {}", due_back),
        None => "Renewed".to_string(),
    };

    Ok(Json(RenewResponse { copy, message }))
}

/// Unreadable renewal forms are reported against the date field
fn renewal_rejection(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonDataError(e) => {
            let message = if e.body_text().contains("missing field") {
                "This field is required."
            } else {
                "Enter a valid date."
            };
            AppError::InvalidField {
                field: "renewal_date",
                message: message.to_string(),
            }
        }
        other => AppError::BadRequest(other.body_text()),
    }
}
