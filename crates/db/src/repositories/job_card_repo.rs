//! Repository for the `job_cards` table.

use sqlx::PgPool;
use wrenchwork_core::types::DbId;

use crate::models::job_card::JobCard;

const COLUMNS: &str = "id, company_id, estimate_id, lead_id, status, remarks, \
    created_at, updated_at";

pub struct JobCardRepo;

impl JobCardRepo {
    /// Find a job card by id within a company.
    pub async fn find_by_id(
        pool: &PgPool,
        company_id: DbId,
        id: DbId,
    ) -> Result<Option<JobCard>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM job_cards WHERE company_id = $1 AND id = $2");
        sqlx::query_as::<_, JobCard>(&query)
            .bind(company_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Set a job card's status (quote acceptance/rejection cascade).
    pub async fn set_status(
        pool: &PgPool,
        company_id: DbId,
        id: DbId,
        status: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE job_cards SET status = $3, updated_at = now()
             WHERE company_id = $1 AND id = $2",
        )
        .bind(company_id)
        .bind(id)
        .bind(status)
        .execute(pool)
        .await?;
        Ok(())
    }
}
