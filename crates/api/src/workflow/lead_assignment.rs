//! The lead assignment coordinator.
//!
//! Orchestrates one assignment update end to end: resolve the request
//! against the current lead, enforce the verified-inspection invariant
//! *before* writing, persist the mutation, then fire the dependent side
//! effects. Side effects are fault-isolated from each other and from the
//! primary mutation: a failing inspection refresh or recovery sync is
//! logged and the caller still sees the updated lead.

use chrono::Utc;
use serde_json::{json, Value};
use sqlx::PgPool;
use wrenchwork_core::assignment::{self, AssignmentChange};
use wrenchwork_core::error::CoreError;
use wrenchwork_core::lead::LEAD_TYPE_WORKSHOP;
use wrenchwork_core::types::DbId;
use wrenchwork_db::models::lead::{Lead, LeadAssignmentWrite, NewLeadEvent};
use wrenchwork_db::repositories::LeadRepo;

use crate::error::AppResult;
use crate::workflow::inspection_lifecycle::REASSIGN_CANCEL_REMARK;
use crate::workflow::{InspectionLifecycleManager, RecoveryLinkSynchronizer};

pub struct LeadAssignmentCoordinator;

impl LeadAssignmentCoordinator {
    /// Apply an assignment request to a lead and return the freshly-read
    /// result.
    ///
    /// Validation and the inspection-lock check run before the write and
    /// abort the whole operation; everything after the write is
    /// best-effort per side effect.
    pub async fn apply_assignment(
        pool: &PgPool,
        company_id: DbId,
        lead_id: DbId,
        body: &Value,
        actor: Option<DbId>,
    ) -> AppResult<Lead> {
        let lead = LeadRepo::find_by_id(pool, company_id, lead_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Lead",
                id: lead_id,
            })?;

        let change = AssignmentChange::from_body(body);
        let plan = assignment::resolve(&lead.assignment_context(), &change);

        // Validate-before-write: a verified inspection rejects the entire
        // assignment with nothing mutated.
        if plan.assignment_requested {
            InspectionLifecycleManager::assert_not_locked(pool, company_id, lead_id).await?;
        }

        let write = LeadAssignmentWrite {
            lead_status: plan.next_status.clone(),
            lead_stage: plan.next_stage.clone(),
            branch_id: plan.next_branch_id,
            assigned_user_id: plan.next_assigned_user_id,
            assigned_at: plan.next_assigned_user_id.map(|_| Utc::now()),
            service_type: plan.next_service_type.clone(),
            recovery_direction: plan.next_recovery_direction.clone(),
            recovery_flow: plan.next_recovery_flow.clone(),
            agent_remark: plan.next_agent_remark.clone(),
            customer_remark: plan.next_customer_remark.clone(),
        };
        LeadRepo::apply_assignment(pool, company_id, lead_id, &write).await?;

        if let Some(owner) = plan.set_owner {
            LeadRepo::set_agent_employee(pool, company_id, lead_id, owner).await?;
        }

        let updated = LeadRepo::find_by_id(pool, company_id, lead_id).await?;

        if plan.branch_changed {
            if let Some(ref updated) = updated {
                LeadRepo::append_event(
                    pool,
                    &NewLeadEvent {
                        company_id,
                        lead_id,
                        actor_user_id: actor,
                        actor_employee_id: None,
                        event_type: "branch_updated".to_string(),
                        event_payload: Some(json!({
                            "from": lead.branch_id,
                            "to": updated.branch_id,
                        })),
                    },
                )
                .await?;
            }
        }

        // -- Side effects: each is isolated; failures never roll back the
        // lead mutation or suppress the other side effects.

        if plan.assignment_requested {
            if let Err(err) = InspectionLifecycleManager::ensure_for_assignment(
                pool,
                company_id,
                &lead,
                plan.next_branch_id,
                actor,
                REASSIGN_CANCEL_REMARK,
            )
            .await
            {
                tracing::error!(
                    error = %err,
                    lead_id = %lead_id,
                    "Failed to refresh inspection after assignment"
                );
            }
        }

        if lead.lead_type == LEAD_TYPE_WORKSHOP {
            if let Some(branch_id) = plan.next_branch_id {
                if let Err(err) =
                    RecoveryLinkSynchronizer::on_workshop_branch_assigned(pool, company_id, branch_id)
                        .await
                {
                    tracing::error!(
                        error = %err,
                        lead_id = %lead_id,
                        %branch_id,
                        "Failed to update linked recovery lead drop-off"
                    );
                }
            } else if let Some(previous_branch_id) = lead.branch_id {
                if let Err(err) = RecoveryLinkSynchronizer::on_workshop_branch_cleared(
                    pool,
                    company_id,
                    previous_branch_id,
                )
                .await
                {
                    tracing::error!(
                        error = %err,
                        lead_id = %lead_id,
                        branch_id = %previous_branch_id,
                        "Failed to clear linked recovery lead drop-off after unassigning branch"
                    );
                }
            }
        }

        Ok(updated.unwrap_or(lead))
    }
}
