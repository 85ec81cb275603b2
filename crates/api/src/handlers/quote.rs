//! Web-surface handlers for `/company/{company_id}/workshop/quotes`.

use axum::extract::{Path, State};
use axum::Json;
use wrenchwork_core::error::CoreError;
use wrenchwork_core::types::DbId;
use wrenchwork_db::models::workshop_quote::QuoteWithItems;
use wrenchwork_db::repositories::WorkshopQuoteRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::lenient_json;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::workflow::QuoteNegotiationStateMachine;

/// GET /api/v1/company/{company_id}/workshop/quotes/{id}
pub async fn get_quote(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path((company_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<QuoteWithItems>>> {
    let quote = WorkshopQuoteRepo::find_by_id(&state.pool, company_id, id, None)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "WorkshopQuote",
            id,
        }))?;
    Ok(Json(DataResponse { data: quote.into() }))
}

/// PATCH /api/v1/company/{company_id}/workshop/quotes/{id}
///
/// Accepts either a workflow action (`accepted` / `negotiation` /
/// `rejected`) or a direct field/status update; the two shapes are
/// mutually exclusive.
pub async fn patch_quote(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((company_id, id)): Path<(DbId, DbId)>,
    body: String,
) -> AppResult<Json<DataResponse<QuoteWithItems>>> {
    let body = lenient_json(&body);
    let quote = QuoteNegotiationStateMachine::apply(
        &state.pool,
        company_id,
        id,
        None,
        &body,
        Some(auth.user_id),
    )
    .await?;
    Ok(Json(DataResponse { data: quote.into() }))
}
