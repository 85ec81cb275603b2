//! RSA lead dispatch and technician stage transitions.
//!
//! Dispatch (back office) hands an open RSA lead to a technician;
//! transitions (field app) walk it through accepted -> enroute ->
//! job_started -> completed/lost. The allowed-stages table and status
//! normalization live in `wrenchwork_core::rsa`.

use chrono::Utc;
use serde_json::{json, Value};
use sqlx::PgPool;
use wrenchwork_core::error::CoreError;
use wrenchwork_core::lead::LEAD_TYPE_RSA;
use wrenchwork_core::rsa::{self, RsaAction};
use wrenchwork_core::types::DbId;
use wrenchwork_db::models::lead::{Lead, LeadAssignmentWrite, NewLeadEvent};
use wrenchwork_db::repositories::LeadRepo;

use crate::error::AppResult;

pub struct RsaFlow;

impl RsaFlow {
    /// Dispatch an RSA lead to a technician (web surface).
    ///
    /// Requires `assignedUserId`; optionally re-homes the lead to a branch
    /// and records an agent remark and owning employee. The lead moves to
    /// stage `dispatched` with its status normalized, and an
    /// `rsa_dispatched` event captures the before/after.
    pub async fn dispatch(
        pool: &PgPool,
        company_id: DbId,
        lead_id: DbId,
        body: &Value,
        actor: Option<DbId>,
    ) -> AppResult<Lead> {
        let lead = Self::load_rsa_lead(pool, company_id, lead_id, "Dispatch").await?;

        if rsa::is_final_status(&lead.lead_status) {
            return Err(CoreError::Validation("Lead is already closed".into()).into());
        }

        let assigned_user_id: DbId = body
            .get("assignedUserId")
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| CoreError::Validation("assignedUserId is required".into()))?;

        let assigned_employee_id: Option<DbId> = body
            .get("assignedEmployeeId")
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok());

        let agent_remark = body
            .get("agentRemark")
            .and_then(Value::as_str)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let branch_id: Option<DbId> = body
            .get("branchId")
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
            .or(lead.branch_id);

        let next_status = rsa::normalize_status(&lead.lead_status).to_string();
        let write = LeadAssignmentWrite {
            lead_status: next_status.clone(),
            lead_stage: Some("dispatched".to_string()),
            branch_id,
            assigned_user_id: Some(assigned_user_id),
            assigned_at: Some(Utc::now()),
            service_type: lead.service_type.clone(),
            recovery_direction: lead.recovery_direction.clone(),
            recovery_flow: lead.recovery_flow.clone(),
            agent_remark: agent_remark.clone().or_else(|| lead.agent_remark.clone()),
            customer_remark: lead.customer_remark.clone(),
        };
        LeadRepo::apply_assignment(pool, company_id, lead_id, &write).await?;

        if let Some(employee_id) = assigned_employee_id {
            LeadRepo::set_agent_employee(pool, company_id, lead_id, employee_id).await?;
        }

        LeadRepo::append_event(
            pool,
            &NewLeadEvent {
                company_id,
                lead_id,
                actor_user_id: actor,
                actor_employee_id: None,
                event_type: "rsa_dispatched".to_string(),
                event_payload: Some(json!({
                    "from": {
                        "assignedUserId": lead.assigned_user_id,
                        "leadStage": lead.lead_stage,
                        "leadStatus": lead.lead_status,
                        "branchId": lead.branch_id,
                    },
                    "to": {
                        "assignedUserId": assigned_user_id,
                        "leadStage": "dispatched",
                        "leadStatus": next_status,
                        "branchId": branch_id,
                        "assignedEmployeeId": assigned_employee_id,
                    },
                })),
            },
        )
        .await?;

        let updated = LeadRepo::find_by_id(pool, company_id, lead_id).await?;
        Ok(updated.unwrap_or(lead))
    }

    /// Apply a technician action to an RSA lead (mobile surface).
    ///
    /// Enforces the per-action allowed-stages table and that only the
    /// assigned technician may progress the lead (`accept` may claim an
    /// unassigned one, but not someone else's).
    pub async fn transition(
        pool: &PgPool,
        company_id: DbId,
        lead_id: DbId,
        body: &Value,
        actor: DbId,
    ) -> AppResult<Lead> {
        let lead = Self::load_rsa_lead(pool, company_id, lead_id, "Transition").await?;

        let raw_action = body
            .get("action")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();
        let action = RsaAction::parse(&raw_action)
            .ok_or_else(|| CoreError::Validation("action is required".into()))?;

        let remark = body
            .get("remark")
            .and_then(Value::as_str)
            .map(|s| s.trim().to_string());

        if rsa::is_final_status(&lead.lead_status) {
            return Err(CoreError::Validation("Lead is already closed".into()).into());
        }

        let current_stage = lead.lead_stage.clone().unwrap_or_else(|| "new".to_string());
        if !action.allowed_from(&current_stage) {
            return Err(CoreError::Validation(format!(
                "Invalid transition from stage '{current_stage}' using action '{raw_action}'"
            ))
            .into());
        }

        match (action, lead.assigned_user_id) {
            // Progress actions require the acting technician to own the lead.
            (a, assigned) if a != RsaAction::Accept => match assigned {
                Some(user) if user == actor => {}
                _ => {
                    return Err(CoreError::Forbidden(
                        "Only assigned technician can update this lead".into(),
                    )
                    .into())
                }
            },
            // Accept may claim an unassigned lead, but not someone else's.
            (_, Some(user)) if user != actor => {
                return Err(CoreError::Forbidden(
                    "This lead is assigned to another technician".into(),
                )
                .into())
            }
            _ => {}
        }

        let transition = action.transition();
        let next_assignee = lead.assigned_user_id.unwrap_or(actor);
        let write = LeadAssignmentWrite {
            lead_status: transition.lead_status.to_string(),
            lead_stage: Some(transition.lead_stage.to_string()),
            branch_id: lead.branch_id,
            assigned_user_id: Some(next_assignee),
            assigned_at: if action == RsaAction::Accept {
                Some(Utc::now())
            } else {
                lead.assigned_at
            },
            service_type: lead.service_type.clone(),
            recovery_direction: lead.recovery_direction.clone(),
            recovery_flow: lead.recovery_flow.clone(),
            agent_remark: remark.clone().or_else(|| lead.agent_remark.clone()),
            customer_remark: lead.customer_remark.clone(),
        };
        LeadRepo::apply_assignment(pool, company_id, lead_id, &write).await?;

        LeadRepo::append_event(
            pool,
            &NewLeadEvent {
                company_id,
                lead_id,
                actor_user_id: Some(actor),
                actor_employee_id: None,
                event_type: transition.event_type.to_string(),
                event_payload: Some(json!({
                    "action": raw_action,
                    "from": { "leadStage": lead.lead_stage, "leadStatus": lead.lead_status },
                    "to": { "leadStage": transition.lead_stage, "leadStatus": transition.lead_status },
                    "remark": remark,
                })),
            },
        )
        .await?;

        let updated = LeadRepo::find_by_id(pool, company_id, lead_id).await?;
        Ok(updated.unwrap_or(lead))
    }

    async fn load_rsa_lead(
        pool: &PgPool,
        company_id: DbId,
        lead_id: DbId,
        operation: &str,
    ) -> AppResult<Lead> {
        let lead = LeadRepo::find_by_id(pool, company_id, lead_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Lead",
                id: lead_id,
            })?;
        if lead.lead_type != LEAD_TYPE_RSA {
            return Err(CoreError::Validation(format!(
                "{operation} is supported only for RSA leads"
            ))
            .into());
        }
        Ok(lead)
    }
}
