//! Web-surface handler for RSA lead dispatch.

use axum::extract::{Path, State};
use axum::Json;
use wrenchwork_core::types::DbId;
use wrenchwork_db::models::lead::Lead;

use crate::error::AppResult;
use crate::handlers::lenient_json;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::workflow::RsaFlow;

/// POST /api/v1/company/{company_id}/rsa/leads/{id}/dispatch
pub async fn dispatch_lead(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((company_id, id)): Path<(DbId, DbId)>,
    body: String,
) -> AppResult<Json<DataResponse<Lead>>> {
    let body = lenient_json(&body);
    let lead =
        RsaFlow::dispatch(&state.pool, company_id, id, &body, Some(auth.user_id)).await?;
    Ok(Json(DataResponse { data: lead }))
}
