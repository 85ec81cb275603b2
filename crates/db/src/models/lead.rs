//! Lead entity, assignment write model, and lead event rows.

use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;
use wrenchwork_core::assignment::AssignmentContext;
use wrenchwork_core::types::{DbId, Timestamp};

/// A row from the `leads` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: DbId,
    pub company_id: DbId,
    pub lead_type: String,
    pub lead_status: String,
    pub lead_stage: Option<String>,
    pub source: Option<String>,
    pub branch_id: Option<DbId>,
    pub assigned_user_id: Option<DbId>,
    pub assigned_at: Option<Timestamp>,
    pub agent_employee_id: Option<DbId>,
    pub car_id: Option<DbId>,
    pub customer_id: Option<DbId>,
    pub service_type: Option<String>,
    pub recovery_direction: Option<String>,
    pub recovery_flow: Option<String>,
    pub pickup_from: Option<String>,
    pub pickup_google_location: Option<String>,
    pub dropoff_to: Option<String>,
    pub dropoff_google_location: Option<String>,
    pub agent_remark: Option<String>,
    pub customer_remark: Option<String>,
    pub is_archived: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Lead {
    /// View of the lead consumed by the pure assignment resolution.
    pub fn assignment_context(&self) -> AssignmentContext {
        AssignmentContext {
            lead_type: self.lead_type.clone(),
            lead_status: self.lead_status.clone(),
            lead_stage: self.lead_stage.clone(),
            branch_id: self.branch_id,
            assigned_user_id: self.assigned_user_id,
            agent_employee_id: self.agent_employee_id,
            service_type: self.service_type.clone(),
            recovery_direction: self.recovery_direction.clone(),
            recovery_flow: self.recovery_flow.clone(),
            agent_remark: self.agent_remark.clone(),
            customer_remark: self.customer_remark.clone(),
        }
    }
}

/// Resolved column values written by one assignment update.
///
/// Every field is a final value, not a patch: the coordinator resolves
/// fall-backs against the current lead before writing.
#[derive(Debug, Clone)]
pub struct LeadAssignmentWrite {
    pub lead_status: String,
    pub lead_stage: Option<String>,
    pub branch_id: Option<DbId>,
    pub assigned_user_id: Option<DbId>,
    pub assigned_at: Option<Timestamp>,
    pub service_type: Option<String>,
    pub recovery_direction: Option<String>,
    pub recovery_flow: Option<String>,
    pub agent_remark: Option<String>,
    pub customer_remark: Option<String>,
}

/// A row from the `lead_events` audit table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadEvent {
    pub id: DbId,
    pub lead_id: DbId,
    pub company_id: DbId,
    pub actor_user_id: Option<DbId>,
    pub actor_employee_id: Option<DbId>,
    pub event_type: String,
    pub event_payload: Option<Value>,
    pub created_at: Timestamp,
}

/// Insert model for `lead_events`.
#[derive(Debug, Clone)]
pub struct NewLeadEvent {
    pub company_id: DbId,
    pub lead_id: DbId,
    pub actor_user_id: Option<DbId>,
    pub actor_employee_id: Option<DbId>,
    pub event_type: String,
    pub event_payload: Option<Value>,
}
