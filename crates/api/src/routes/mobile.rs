//! Mobile surface, mounted at `/mobile/company/{company_id}`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::mobile::{lead, quote, rsa};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/leads/{id}", get(lead::get_lead).put(lead::update_lead))
        .route(
            "/branches/{branch_id}/workshop/quotes/{id}",
            get(quote::get_quote).patch(quote::patch_quote),
        )
        .route("/rsa/leads/{id}/transition", post(rsa::transition_lead))
}
