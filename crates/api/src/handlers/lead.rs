//! Web-surface handlers for `/company/{company_id}/leads`.

use axum::extract::{Path, State};
use axum::Json;
use wrenchwork_core::error::CoreError;
use wrenchwork_core::types::DbId;
use wrenchwork_db::models::lead::Lead;
use wrenchwork_db::repositories::LeadRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::lenient_json;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::workflow::LeadAssignmentCoordinator;

/// GET /api/v1/company/{company_id}/leads/{id}
pub async fn get_lead(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path((company_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<Lead>>> {
    let lead = LeadRepo::find_by_id(&state.pool, company_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Lead",
            id,
        }))?;
    Ok(Json(DataResponse { data: lead }))
}

/// PUT /api/v1/company/{company_id}/leads/{id}
///
/// The assignment workflow: status/branch/user changes plus their
/// inspection and recovery side effects.
pub async fn update_lead(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((company_id, id)): Path<(DbId, DbId)>,
    body: String,
) -> AppResult<Json<DataResponse<Lead>>> {
    let body = lenient_json(&body);
    let lead = LeadAssignmentCoordinator::apply_assignment(
        &state.pool,
        company_id,
        id,
        &body,
        Some(auth.user_id),
    )
    .await?;
    Ok(Json(DataResponse { data: lead }))
}
