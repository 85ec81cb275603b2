use serde::Serialize;
use sqlx::FromRow;
use wrenchwork_core::types::{DbId, Timestamp};

/// A row from the `inspections` table.
///
/// Once `verified_at` is set the inspection locks its lead: assignment and
/// reassignment are refused until the verification is lifted out-of-band.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Inspection {
    pub id: DbId,
    pub company_id: DbId,
    pub lead_id: DbId,
    pub car_id: Option<DbId>,
    pub customer_id: Option<DbId>,
    pub branch_id: Option<DbId>,
    pub status: String,
    pub verified_at: Option<Timestamp>,
    pub cancelled_by: Option<DbId>,
    pub cancelled_at: Option<Timestamp>,
    pub cancel_remarks: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Inspection {
    pub fn is_verified(&self) -> bool {
        self.verified_at.is_some()
    }
}

/// Insert model for `inspections`.
#[derive(Debug, Clone)]
pub struct NewInspection {
    pub company_id: DbId,
    pub lead_id: DbId,
    pub car_id: Option<DbId>,
    pub customer_id: Option<DbId>,
    pub branch_id: Option<DbId>,
    pub status: String,
}
