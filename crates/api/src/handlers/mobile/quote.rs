//! Mobile handlers for branch-scoped workshop quotes.

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

/// GET /api/v1/mobile/company/{company_id}/branches/{branch_id}/workshop/quotes/{id}
pub async fn get_quote(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path((company_id, branch_id, id)): Path<(DbId, DbId, DbId)>,
) -> AppResult<Json<DataResponse<QuoteWithItems>>> {
    let quote = WorkshopQuoteRepo::find_by_id(&state.pool, company_id, id, Some(branch_id))
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "WorkshopQuote",
            id,
        }))?;
    Ok(Json(DataResponse { data: quote.into() }))
}

/// PATCH /api/v1/mobile/company/{company_id}/branches/{branch_id}/workshop/quotes/{id}
///
/// Identical semantics to the web surface's quote update; the branch from
/// the URL participates in the quote lookup scope.
pub async fn patch_quote(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((company_id, branch_id, id)): Path<(DbId, DbId, DbId)>,
    body: String,
) -> AppResult<Json<DataResponse<QuoteWithItems>>> {
    let body = lenient_json(&body);
    let quote = QuoteNegotiationStateMachine::apply(
        &state.pool,
        company_id,
        id,
        Some(branch_id),
        &body,
        Some(auth.user_id),
    )
    .await?;
    Ok(Json(DataResponse { data: quote.into() }))
}
