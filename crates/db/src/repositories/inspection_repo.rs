//! Repository for the `inspections` table.

use sqlx::PgPool;
use wrenchwork_core::types::DbId;

use crate::models::inspection::{Inspection, NewInspection};

const COLUMNS: &str = "id, company_id, lead_id, car_id, customer_id, branch_id, status, \
    verified_at, cancelled_by, cancelled_at, cancel_remarks, created_at, updated_at";

pub struct InspectionRepo;

impl InspectionRepo {
    /// The most recently created inspection for a lead, if any.
    pub async fn latest_for_lead(
        pool: &PgPool,
        company_id: DbId,
        lead_id: DbId,
    ) -> Result<Option<Inspection>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM inspections
             WHERE company_id = $1 AND lead_id = $2
             ORDER BY created_at DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, Inspection>(&query)
            .bind(company_id)
            .bind(lead_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new inspection, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewInspection) -> Result<Inspection, sqlx::Error> {
        let query = format!(
            "INSERT INTO inspections (company_id, lead_id, car_id, customer_id, branch_id, status)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Inspection>(&query)
            .bind(input.company_id)
            .bind(input.lead_id)
            .bind(input.car_id)
            .bind(input.customer_id)
            .bind(input.branch_id)
            .bind(&input.status)
            .fetch_one(pool)
            .await
    }

    /// Soft-cancel an inspection with an audit trail (who, when, why).
    pub async fn cancel(
        pool: &PgPool,
        company_id: DbId,
        id: DbId,
        cancelled_by: Option<DbId>,
        remarks: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE inspections
             SET status = 'cancelled',
                 cancelled_by = $3,
                 cancelled_at = now(),
                 cancel_remarks = $4,
                 updated_at = now()
             WHERE company_id = $1 AND id = $2",
        )
        .bind(company_id)
        .bind(id)
        .bind(cancelled_by)
        .bind(remarks)
        .execute(pool)
        .await?;
        Ok(())
    }
}
