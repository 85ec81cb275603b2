//! Repository for the `leads` and `lead_events` tables.

use sqlx::PgPool;
use wrenchwork_core::lead::{LEAD_TYPE_RECOVERY, LEAD_TYPE_RSA, SOURCE_WORKSHOP_PICKUP};
use wrenchwork_core::types::DbId;

use crate::models::lead::{Lead, LeadAssignmentWrite, NewLeadEvent};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, company_id, lead_type, lead_status, lead_stage, source, \
    branch_id, assigned_user_id, assigned_at, agent_employee_id, car_id, customer_id, \
    service_type, recovery_direction, recovery_flow, pickup_from, pickup_google_location, \
    dropoff_to, dropoff_google_location, agent_remark, customer_remark, is_archived, \
    created_at, updated_at";

/// Read/write operations on leads, tenant-scoped by `company_id`.
pub struct LeadRepo;

impl LeadRepo {
    /// Find a lead by id within a company.
    pub async fn find_by_id(
        pool: &PgPool,
        company_id: DbId,
        id: DbId,
    ) -> Result<Option<Lead>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM leads WHERE company_id = $1 AND id = $2");
        sqlx::query_as::<_, Lead>(&query)
            .bind(company_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Apply one resolved assignment update. Every bound value is final;
    /// fall-backs against the current row were resolved by the caller.
    pub async fn apply_assignment(
        pool: &PgPool,
        company_id: DbId,
        id: DbId,
        write: &LeadAssignmentWrite,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE leads SET
                lead_status = $3,
                lead_stage = $4,
                branch_id = $5,
                assigned_user_id = $6,
                assigned_at = $7,
                service_type = $8,
                recovery_direction = $9,
                recovery_flow = $10,
                agent_remark = $11,
                customer_remark = $12,
                updated_at = now()
             WHERE company_id = $1 AND id = $2",
        )
        .bind(company_id)
        .bind(id)
        .bind(&write.lead_status)
        .bind(&write.lead_stage)
        .bind(write.branch_id)
        .bind(write.assigned_user_id)
        .bind(write.assigned_at)
        .bind(&write.service_type)
        .bind(&write.recovery_direction)
        .bind(&write.recovery_flow)
        .bind(&write.agent_remark)
        .bind(&write.customer_remark)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Targeted owner (agent employee) update, separate from assignment.
    pub async fn set_agent_employee(
        pool: &PgPool,
        company_id: DbId,
        id: DbId,
        employee_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE leads SET agent_employee_id = $3, updated_at = now()
             WHERE company_id = $1 AND id = $2",
        )
        .bind(company_id)
        .bind(id)
        .bind(employee_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Append an audit event to the lead's timeline.
    pub async fn append_event(pool: &PgPool, event: &NewLeadEvent) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO lead_events
                (lead_id, company_id, actor_user_id, actor_employee_id, event_type, event_payload)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(event.lead_id)
        .bind(event.company_id)
        .bind(event.actor_user_id)
        .bind(event.actor_employee_id)
        .bind(&event.event_type)
        .bind(&event.event_payload)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Recovery pickup leads whose drop-off has not been linked to a branch
    /// yet (empty drop-off label or no branch).
    pub async fn unlinked_recovery_pickups(
        pool: &PgPool,
        company_id: DbId,
    ) -> Result<Vec<Lead>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM leads
             WHERE company_id = $1
               AND lead_type = $2
               AND source = $3
               AND (dropoff_to IS NULL OR dropoff_to = '' OR branch_id IS NULL)"
        );
        sqlx::query_as::<_, Lead>(&query)
            .bind(company_id)
            .bind(LEAD_TYPE_RECOVERY)
            .bind(SOURCE_WORKSHOP_PICKUP)
            .fetch_all(pool)
            .await
    }

    /// Recovery pickup leads whose drop-off currently points at the given
    /// branch, matched by resolved label, geocode, or branch id. A `NULL`
    /// geocode never matches (SQL null equality), mirroring how the link
    /// was written.
    pub async fn recovery_pickups_for_branch(
        pool: &PgPool,
        company_id: DbId,
        label: &str,
        geocode: Option<&str>,
        branch_id: DbId,
    ) -> Result<Vec<Lead>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM leads
             WHERE company_id = $1
               AND lead_type = $2
               AND source = $3
               AND (dropoff_to = $4 OR dropoff_google_location = $5 OR branch_id = $6)"
        );
        sqlx::query_as::<_, Lead>(&query)
            .bind(company_id)
            .bind(LEAD_TYPE_RECOVERY)
            .bind(SOURCE_WORKSHOP_PICKUP)
            .bind(label)
            .bind(geocode)
            .bind(branch_id)
            .fetch_all(pool)
            .await
    }

    /// Set or clear a recovery lead's drop-off fields. The flow value is
    /// only written when provided; clearing the drop-off leaves it intact.
    pub async fn set_recovery_dropoff(
        pool: &PgPool,
        company_id: DbId,
        id: DbId,
        dropoff_to: Option<&str>,
        dropoff_google_location: Option<&str>,
        recovery_flow: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE leads SET
                dropoff_to = $3,
                dropoff_google_location = $4,
                recovery_flow = COALESCE($5, recovery_flow),
                updated_at = now()
             WHERE company_id = $1 AND id = $2",
        )
        .bind(company_id)
        .bind(id)
        .bind(dropoff_to)
        .bind(dropoff_google_location)
        .bind(recovery_flow)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Point the lead at a branch (quote-acceptance cascade).
    pub async fn set_branch(
        pool: &PgPool,
        company_id: DbId,
        id: DbId,
        branch_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE leads SET branch_id = $3, updated_at = now()
             WHERE company_id = $1 AND id = $2",
        )
        .bind(company_id)
        .bind(id)
        .bind(branch_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Clear the lead's branch only if it still equals the given branch,
    /// so a branch set by a later assignment is not clobbered.
    /// Returns `true` if a row was cleared.
    pub async fn clear_branch_if_matches(
        pool: &PgPool,
        company_id: DbId,
        id: DbId,
        branch_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE leads SET branch_id = NULL, updated_at = now()
             WHERE company_id = $1 AND id = $2 AND branch_id = $3",
        )
        .bind(company_id)
        .bind(id)
        .bind(branch_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Release RSA leads whose assignment went stale: still `open` in an
    /// early stage but assigned longer ago than the timeout. Returns the
    /// number of leads released.
    pub async fn release_expired_assignments(
        pool: &PgPool,
        timeout_minutes: i64,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE leads
             SET branch_id = NULL, assigned_user_id = NULL, assigned_at = NULL,
                 updated_at = now()
             WHERE lead_type = $1
               AND lead_status = 'open'
               AND lead_stage IN ('new', 'assigned')
               AND assigned_at IS NOT NULL
               AND assigned_at < now() - ($2 || ' minutes')::interval",
        )
        .bind(LEAD_TYPE_RSA)
        .bind(timeout_minutes.to_string())
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
