//! Pure resolution of a lead assignment request.
//!
//! [`resolve`] turns the current lead state plus a caller-supplied change
//! into the exact column values to persist, along with the two decisions
//! that drive side effects: did the branch change, and does this request
//! constitute a workshop assignment (which triggers the inspection
//! lifecycle). Keeping this free of I/O lets the whole decision table be
//! unit-tested without a database.

use serde_json::Value;

use crate::lead::{LEAD_TYPE_RSA, LEAD_TYPE_WORKSHOP, STATUS_CAR_IN};
use crate::rsa;
use crate::types::DbId;

/// Requested change to the lead's branch.
///
/// An explicit JSON `null` clears the branch; an absent (or unparseable)
/// field keeps the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BranchUpdate {
    #[default]
    Keep,
    Clear,
    Set(DbId),
}

/// Caller-supplied assignment change, extracted leniently from a request
/// body: missing, null, and malformed fields all fall back to the lead's
/// current value rather than failing the request.
#[derive(Debug, Clone, Default)]
pub struct AssignmentChange {
    pub status: Option<String>,
    pub owner_id: Option<DbId>,
    pub agent_remark: Option<String>,
    pub customer_remark: Option<String>,
    pub branch: BranchUpdate,
    pub assigned_user_id: Option<DbId>,
    pub service_type: Option<String>,
    pub lead_stage: Option<String>,
    pub recovery_direction: Option<String>,
    pub recovery_flow: Option<String>,
    pub ensure_inspection: bool,
}

fn str_field(body: &Value, key: &str) -> Option<String> {
    body.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .filter(|s| !s.is_empty())
}

fn uuid_field(body: &Value, key: &str) -> Option<DbId> {
    body.get(key)
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
}

impl AssignmentChange {
    /// Extract an assignment change from a JSON request body.
    pub fn from_body(body: &Value) -> Self {
        let branch = match body.get("branchId") {
            Some(Value::Null) => BranchUpdate::Clear,
            Some(Value::String(s)) => match s.parse() {
                Ok(id) => BranchUpdate::Set(id),
                Err(_) => BranchUpdate::Keep,
            },
            _ => BranchUpdate::Keep,
        };

        Self {
            status: str_field(body, "status"),
            owner_id: uuid_field(body, "ownerId"),
            agent_remark: str_field(body, "agentRemark"),
            customer_remark: str_field(body, "customerRemark"),
            branch,
            assigned_user_id: uuid_field(body, "assignedUserId"),
            service_type: str_field(body, "serviceType"),
            lead_stage: str_field(body, "leadStage"),
            recovery_direction: str_field(body, "recoveryDirection"),
            recovery_flow: str_field(body, "recoveryFlow"),
            ensure_inspection: body.get("ensureInspection") == Some(&Value::Bool(true)),
        }
    }
}

/// Current lead state the resolution reads.
#[derive(Debug, Clone)]
pub struct AssignmentContext {
    pub lead_type: String,
    pub lead_status: String,
    pub lead_stage: Option<String>,
    pub branch_id: Option<DbId>,
    pub assigned_user_id: Option<DbId>,
    pub agent_employee_id: Option<DbId>,
    pub service_type: Option<String>,
    pub recovery_direction: Option<String>,
    pub recovery_flow: Option<String>,
    pub agent_remark: Option<String>,
    pub customer_remark: Option<String>,
}

/// The fully-resolved mutation plus side-effect decisions.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentPlan {
    pub next_status: String,
    pub next_stage: Option<String>,
    pub next_branch_id: Option<DbId>,
    pub next_assigned_user_id: Option<DbId>,
    pub next_service_type: Option<String>,
    pub next_recovery_direction: Option<String>,
    pub next_recovery_flow: Option<String>,
    pub next_agent_remark: Option<String>,
    pub next_customer_remark: Option<String>,
    /// Apply a separate owner update to this employee id.
    pub set_owner: Option<DbId>,
    /// The resolved branch differs from the current one.
    pub branch_changed: bool,
    /// This request is a workshop branch/user assignment and must run the
    /// inspection lifecycle (and its verified-inspection invariant check).
    pub assignment_requested: bool,
}

/// Resolve an assignment change against the lead's current state.
pub fn resolve(ctx: &AssignmentContext, change: &AssignmentChange) -> AssignmentPlan {
    let next_branch_id = match change.branch {
        BranchUpdate::Keep => ctx.branch_id,
        BranchUpdate::Clear => None,
        BranchUpdate::Set(id) => Some(id),
    };
    let branch_changed = next_branch_id != ctx.branch_id;

    let next_assigned_user_id = change.assigned_user_id.or(ctx.assigned_user_id);

    // RSA statuses are normalized; other lead types pass through unchanged.
    let next_status = match change.status.as_deref() {
        None => ctx.lead_status.clone(),
        Some(raw) if ctx.lead_type == LEAD_TYPE_RSA => rsa::normalize_status(raw).to_string(),
        Some(raw) => raw.to_string(),
    };

    let assignment_requested = ctx.lead_type == LEAD_TYPE_WORKSHOP
        && next_status == STATUS_CAR_IN
        && (next_branch_id.is_some() || next_assigned_user_id.is_some())
        && (branch_changed
            || next_assigned_user_id != ctx.assigned_user_id
            || change.ensure_inspection);

    let set_owner = change
        .owner_id
        .filter(|owner| Some(*owner) != ctx.agent_employee_id);

    AssignmentPlan {
        next_status,
        next_stage: change.lead_stage.clone().or_else(|| ctx.lead_stage.clone()),
        next_branch_id,
        next_assigned_user_id,
        next_service_type: change
            .service_type
            .clone()
            .or_else(|| ctx.service_type.clone()),
        next_recovery_direction: change
            .recovery_direction
            .clone()
            .or_else(|| ctx.recovery_direction.clone()),
        next_recovery_flow: change
            .recovery_flow
            .clone()
            .or_else(|| ctx.recovery_flow.clone()),
        next_agent_remark: change
            .agent_remark
            .clone()
            .or_else(|| ctx.agent_remark.clone()),
        next_customer_remark: change
            .customer_remark
            .clone()
            .or_else(|| ctx.customer_remark.clone()),
        set_owner,
        branch_changed,
        assignment_requested,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn workshop_ctx() -> AssignmentContext {
        AssignmentContext {
            lead_type: "workshop".into(),
            lead_status: "new".into(),
            lead_stage: Some("intake".into()),
            branch_id: None,
            assigned_user_id: None,
            agent_employee_id: None,
            service_type: None,
            recovery_direction: None,
            recovery_flow: None,
            agent_remark: None,
            customer_remark: None,
        }
    }

    // -----------------------------------------------------------------------
    // Body extraction
    // -----------------------------------------------------------------------

    #[test]
    fn explicit_null_branch_clears() {
        let change = AssignmentChange::from_body(&json!({ "branchId": null }));
        assert_eq!(change.branch, BranchUpdate::Clear);
    }

    #[test]
    fn absent_branch_keeps() {
        let change = AssignmentChange::from_body(&json!({}));
        assert_eq!(change.branch, BranchUpdate::Keep);
    }

    #[test]
    fn malformed_branch_keeps() {
        let change = AssignmentChange::from_body(&json!({ "branchId": "not-a-uuid" }));
        assert_eq!(change.branch, BranchUpdate::Keep);
    }

    #[test]
    fn empty_status_is_ignored() {
        let change = AssignmentChange::from_body(&json!({ "status": "" }));
        assert_eq!(change.status, None);
    }

    #[test]
    fn ensure_inspection_must_be_true() {
        assert!(!AssignmentChange::from_body(&json!({ "ensureInspection": "yes" })).ensure_inspection);
        assert!(AssignmentChange::from_body(&json!({ "ensureInspection": true })).ensure_inspection);
    }

    // -----------------------------------------------------------------------
    // Resolution
    // -----------------------------------------------------------------------

    #[test]
    fn assigning_branch_to_car_in_workshop_lead_requests_assignment() {
        let branch = Uuid::new_v4();
        let change = AssignmentChange {
            status: Some("car_in".into()),
            branch: BranchUpdate::Set(branch),
            ..Default::default()
        };
        let plan = resolve(&workshop_ctx(), &change);
        assert!(plan.assignment_requested);
        assert!(plan.branch_changed);
        assert_eq!(plan.next_branch_id, Some(branch));
        assert_eq!(plan.next_status, "car_in");
    }

    #[test]
    fn non_workshop_lead_never_requests_assignment() {
        let mut ctx = workshop_ctx();
        ctx.lead_type = "recovery".into();
        let change = AssignmentChange {
            status: Some("car_in".into()),
            branch: BranchUpdate::Set(Uuid::new_v4()),
            ..Default::default()
        };
        assert!(!resolve(&ctx, &change).assignment_requested);
    }

    #[test]
    fn status_other_than_car_in_does_not_request_assignment() {
        let change = AssignmentChange {
            status: Some("quoted".into()),
            branch: BranchUpdate::Set(Uuid::new_v4()),
            ..Default::default()
        };
        let plan = resolve(&workshop_ctx(), &change);
        assert!(plan.branch_changed);
        assert!(!plan.assignment_requested);
    }

    #[test]
    fn resubmitting_same_assignment_is_a_no_op() {
        let branch = Uuid::new_v4();
        let user = Uuid::new_v4();
        let mut ctx = workshop_ctx();
        ctx.lead_status = "car_in".into();
        ctx.branch_id = Some(branch);
        ctx.assigned_user_id = Some(user);

        let change = AssignmentChange {
            status: Some("car_in".into()),
            branch: BranchUpdate::Set(branch),
            assigned_user_id: Some(user),
            ..Default::default()
        };
        let plan = resolve(&ctx, &change);
        assert!(!plan.branch_changed);
        assert!(!plan.assignment_requested);
    }

    #[test]
    fn ensure_inspection_forces_assignment_on_identical_request() {
        let branch = Uuid::new_v4();
        let mut ctx = workshop_ctx();
        ctx.lead_status = "car_in".into();
        ctx.branch_id = Some(branch);

        let change = AssignmentChange {
            branch: BranchUpdate::Set(branch),
            ensure_inspection: true,
            ..Default::default()
        };
        assert!(resolve(&ctx, &change).assignment_requested);
    }

    #[test]
    fn user_change_alone_requests_assignment() {
        let mut ctx = workshop_ctx();
        ctx.lead_status = "car_in".into();
        ctx.branch_id = Some(Uuid::new_v4());
        ctx.assigned_user_id = Some(Uuid::new_v4());

        let change = AssignmentChange {
            assigned_user_id: Some(Uuid::new_v4()),
            ..Default::default()
        };
        let plan = resolve(&ctx, &change);
        assert!(!plan.branch_changed);
        assert!(plan.assignment_requested);
    }

    #[test]
    fn clearing_branch_is_a_branch_change_but_not_an_assignment() {
        let mut ctx = workshop_ctx();
        ctx.lead_status = "car_in".into();
        ctx.branch_id = Some(Uuid::new_v4());

        let change = AssignmentChange {
            branch: BranchUpdate::Clear,
            ..Default::default()
        };
        let plan = resolve(&ctx, &change);
        assert!(plan.branch_changed);
        assert_eq!(plan.next_branch_id, None);
        assert!(!plan.assignment_requested);
    }

    #[test]
    fn rsa_status_is_normalized() {
        let mut ctx = workshop_ctx();
        ctx.lead_type = "rsa".into();
        let change = AssignmentChange {
            status: Some("completed".into()),
            ..Default::default()
        };
        assert_eq!(resolve(&ctx, &change).next_status, "done");
    }

    #[test]
    fn workshop_status_passes_through() {
        let change = AssignmentChange {
            status: Some("completed".into()),
            ..Default::default()
        };
        assert_eq!(resolve(&workshop_ctx(), &change).next_status, "completed");
    }

    #[test]
    fn missing_fields_fall_back_to_current() {
        let mut ctx = workshop_ctx();
        ctx.agent_remark = Some("call before visit".into());
        ctx.service_type = Some("major_service".into());
        let plan = resolve(&ctx, &AssignmentChange::default());
        assert_eq!(plan.next_status, "new");
        assert_eq!(plan.next_agent_remark.as_deref(), Some("call before visit"));
        assert_eq!(plan.next_service_type.as_deref(), Some("major_service"));
    }

    #[test]
    fn owner_update_only_when_different() {
        let owner = Uuid::new_v4();
        let mut ctx = workshop_ctx();
        ctx.agent_employee_id = Some(owner);

        let same = AssignmentChange {
            owner_id: Some(owner),
            ..Default::default()
        };
        assert_eq!(resolve(&ctx, &same).set_owner, None);

        let other = Uuid::new_v4();
        let changed = AssignmentChange {
            owner_id: Some(other),
            ..Default::default()
        };
        assert_eq!(resolve(&ctx, &changed).set_owner, Some(other));
    }
}
