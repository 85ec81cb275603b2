use serde::Serialize;
use sqlx::FromRow;
use wrenchwork_core::types::{DbId, Timestamp};

/// A row from the `job_cards` table.
///
/// Job cards are mutated by this crate only as a side effect of quote
/// acceptance/rejection; their own lifecycle lives elsewhere.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCard {
    pub id: DbId,
    pub company_id: DbId,
    pub estimate_id: Option<DbId>,
    pub lead_id: Option<DbId>,
    pub status: String,
    pub remarks: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
