//! Web (back office) surface, mounted at `/company/{company_id}`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{lead, quote, rsa};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/leads/{id}", get(lead::get_lead).put(lead::update_lead))
        .route(
            "/workshop/quotes/{id}",
            get(quote::get_quote).patch(quote::patch_quote),
        )
        .route("/rsa/leads/{id}/dispatch", post(rsa::dispatch_lead))
}
