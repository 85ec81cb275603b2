//! Route definitions.

pub mod company;
pub mod health;
pub mod mobile;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /company/{company_id}/leads/{id}                                    GET, PUT
/// /company/{company_id}/workshop/quotes/{id}                          GET, PATCH
/// /company/{company_id}/rsa/leads/{id}/dispatch                       POST
///
/// /mobile/company/{company_id}/leads/{id}                             GET, PUT
/// /mobile/company/{company_id}/branches/{branch_id}
///         /workshop/quotes/{id}                                       GET, PATCH
/// /mobile/company/{company_id}/rsa/leads/{id}/transition              POST
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/company/{company_id}", company::router())
        .nest("/mobile/company/{company_id}", mobile::router())
}
