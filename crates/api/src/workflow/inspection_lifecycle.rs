//! Inspection lifecycle driven by lead assignment changes.
//!
//! A workshop lead entering `car_in` with a branch/user assigned gets a
//! pending inspection. Reassigning the lead before that inspection is
//! verified cancels it (with an audit trail) and opens a fresh one. A
//! verified inspection freezes the lead: no assignment change may touch it.

use sqlx::PgPool;
use wrenchwork_core::error::CoreError;
use wrenchwork_core::types::DbId;
use wrenchwork_db::models::inspection::{Inspection, NewInspection};
use wrenchwork_db::models::lead::Lead;
use wrenchwork_db::repositories::InspectionRepo;

use crate::error::AppResult;

/// Audit reason written onto inspections cancelled by a reassignment.
pub const REASSIGN_CANCEL_REMARK: &str = "Inspection reassigned to another workshop/branch.";

pub struct InspectionLifecycleManager;

impl InspectionLifecycleManager {
    /// Pre-write invariant check: fail with [`CoreError::InspectionLocked`]
    /// if the lead's latest inspection is verified. Called by the
    /// coordinator *before* any mutation so a locked lead is left
    /// completely untouched.
    pub async fn assert_not_locked(
        pool: &PgPool,
        company_id: DbId,
        lead_id: DbId,
    ) -> AppResult<()> {
        let latest = InspectionRepo::latest_for_lead(pool, company_id, lead_id).await?;
        match latest {
            Some(inspection) if inspection.is_verified() => {
                Err(CoreError::InspectionLocked.into())
            }
            _ => Ok(()),
        }
    }

    /// Ensure the lead has a pending inspection for its new assignment.
    ///
    /// - No inspection yet: create one, copying `car_id`/`customer_id`
    ///   from the lead and using the newly assigned branch.
    /// - Unverified inspection exists: cancel it (actor + reason recorded)
    ///   and create a fresh pending one.
    /// - Verified inspection: refuse without mutating anything.
    pub async fn ensure_for_assignment(
        pool: &PgPool,
        company_id: DbId,
        lead: &Lead,
        branch_id: Option<DbId>,
        actor: Option<DbId>,
        reason: &str,
    ) -> AppResult<Inspection> {
        let latest = InspectionRepo::latest_for_lead(pool, company_id, lead.id).await?;

        if let Some(existing) = latest {
            if existing.is_verified() {
                return Err(CoreError::InspectionLocked.into());
            }
            InspectionRepo::cancel(pool, company_id, existing.id, actor, reason).await?;
        }

        let created = InspectionRepo::create(
            pool,
            &NewInspection {
                company_id,
                lead_id: lead.id,
                car_id: lead.car_id,
                customer_id: lead.customer_id,
                branch_id,
                status: "pending".to_string(),
            },
        )
        .await?;

        tracing::info!(
            lead_id = %lead.id,
            inspection_id = %created.id,
            branch_id = ?branch_id,
            "Opened pending inspection for assignment"
        );

        Ok(created)
    }
}
