//! Repository for the `branches` table.

use sqlx::PgPool;
use wrenchwork_core::types::DbId;

use crate::models::branch::Branch;

const COLUMNS: &str = "id, company_id, name, display_name, code, address_line1, \
    google_location, created_at, updated_at";

pub struct BranchRepo;

impl BranchRepo {
    /// Find a branch by id within a company.
    pub async fn find_by_id(
        pool: &PgPool,
        company_id: DbId,
        id: DbId,
    ) -> Result<Option<Branch>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM branches WHERE company_id = $1 AND id = $2");
        sqlx::query_as::<_, Branch>(&query)
            .bind(company_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
