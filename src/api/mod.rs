//! API handlers for the catalog REST endpoints

pub mod authors;
pub mod health;
pub mod loans;
pub mod openapi;

use axum::{
    async_trait,
    extract::{FromRequestParts, OriginalUri},
    http::{header::AUTHORIZATION, request::Parts},
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::ToSchema;

use crate::{error::AppError, models::UserClaims, pagination::Page, AppState};

/// Extractor for the logged-in user.
///
/// Requests without a valid bearer token are redirected to the login page,
/// with the requested path in `next`.
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let parts: &Parts = parts;
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| login_redirect(parts, state))?;

        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret).map_err(|e| {
            tracing::debug!("Rejected bearer token: {}", e);
            login_redirect(parts, state)
        })?;

        Ok(AuthenticatedUser(claims))
    }
}

fn login_redirect(parts: &Parts, state: &AppState) -> AppError {
    let uri = parts
        .extensions
        .get::<OriginalUri>()
        .map(|original| &original.0)
        .unwrap_or(&parts.uri);
    let full_path = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());

    AppError::LoginRequired {
        location: login_location(&state.config.auth.login_url, full_path),
    }
}

/// Login URL carrying `full_path` as the percent-encoded `next` parameter
fn login_location(login_url: &str, full_path: &str) -> String {
    // Slashes stay readable in `next`
    let next = form_urlencoded::byte_serialize(full_path.as_bytes())
        .collect::<String>()
        .replace("%2F", "/");
    let separator = if login_url.contains('?') { '&' } else { '?' };
    format!("{}{}next={}", login_url, separator, next)
}

/// Paginated response wrapper
#[derive(Serialize, ToSchema)]
pub struct PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Rows on the current page
    pub items: Vec<T>,
    /// Total number of rows
    pub total: usize,
    /// Current page number
    pub page: usize,
    /// Rows per page
    pub per_page: usize,
    /// Total number of pages
    pub num_pages: usize,
    /// True when the result spans more than one page
    pub is_paginated: bool,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> From<Page<T>> for PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    fn from(page: Page<T>) -> Self {
        Self {
            total: page.count,
            page: page.number,
            per_page: page.per_page,
            num_pages: page.num_pages,
            is_paginated: page.has_multiple_pages(),
            has_next: page.has_next(),
            has_previous: page.has_previous(),
            items: page.items,
        }
    }
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authors
        .route("/authors", get(authors::list_authors))
        .route("/authors/:id", get(authors::get_author))
        // Loans
        .route("/mybooks", get(loans::list_my_borrowed))
        .route("/borrowed", get(loans::list_all_borrowed))
        .route(
            "/copies/:id/renew",
            get(loans::get_renewal_form).post(loans::renew_copy),
        )
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
