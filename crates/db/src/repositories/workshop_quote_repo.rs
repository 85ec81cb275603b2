//! Repository for the `workshop_quotes` table.
//!
//! All update methods take an optional `branch_scope`: the mobile surface
//! addresses quotes through a branch-scoped URL and the scope participates
//! in every `WHERE` clause, while the web surface passes `None`.

use serde_json::Value;
use sqlx::PgPool;
use wrenchwork_core::types::DbId;

use crate::models::workshop_quote::WorkshopQuote;

const COLUMNS: &str = "id, company_id, estimate_id, job_card_id, lead_id, branch_id, status, \
    currency, total_amount, negotiated_amount, quoted_amount, accepted_amount, \
    additional_amount, eta_hours, remarks, meta, created_by, approved_by, approved_at, \
    created_at, updated_at";

const SCOPE: &str = "company_id = $1 AND id = $2 AND ($3::uuid IS NULL OR branch_id = $3)";

pub struct WorkshopQuoteRepo;

impl WorkshopQuoteRepo {
    /// Find a quote by id within a company, optionally restricted to a branch.
    pub async fn find_by_id(
        pool: &PgPool,
        company_id: DbId,
        id: DbId,
        branch_scope: Option<DbId>,
    ) -> Result<Option<WorkshopQuote>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workshop_quotes WHERE {SCOPE}");
        sqlx::query_as::<_, WorkshopQuote>(&query)
            .bind(company_id)
            .bind(id)
            .bind(branch_scope)
            .fetch_optional(pool)
            .await
    }

    /// Move the quote into negotiation: the negotiated amount becomes the
    /// running total and the caller-built meta replaces the old bag.
    pub async fn apply_negotiation(
        pool: &PgPool,
        company_id: DbId,
        id: DbId,
        branch_scope: Option<DbId>,
        negotiated_amount: f64,
        meta: &Value,
    ) -> Result<(), sqlx::Error> {
        let query = format!(
            "UPDATE workshop_quotes
             SET status = 'negotiation',
                 negotiated_amount = $4,
                 total_amount = $4,
                 meta = $5,
                 updated_at = now()
             WHERE {SCOPE}"
        );
        sqlx::query(&query)
            .bind(company_id)
            .bind(id)
            .bind(branch_scope)
            .bind(negotiated_amount)
            .bind(meta)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Accept the quote at the given amount, stamping the approver.
    pub async fn apply_acceptance(
        pool: &PgPool,
        company_id: DbId,
        id: DbId,
        branch_scope: Option<DbId>,
        accepted_amount: f64,
        approved_by: Option<DbId>,
    ) -> Result<(), sqlx::Error> {
        let query = format!(
            "UPDATE workshop_quotes
             SET status = 'accepted',
                 accepted_amount = $4,
                 total_amount = $4,
                 approved_by = $5,
                 approved_at = now(),
                 updated_at = now()
             WHERE {SCOPE}"
        );
        sqlx::query(&query)
            .bind(company_id)
            .bind(id)
            .bind(branch_scope)
            .bind(accepted_amount)
            .bind(approved_by)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Reject the quote. Amounts stay where negotiation left them; only the
    /// status flips and the meta (carrying the rejection reason) is replaced.
    pub async fn apply_rejection(
        pool: &PgPool,
        company_id: DbId,
        id: DbId,
        branch_scope: Option<DbId>,
        meta: &Value,
    ) -> Result<(), sqlx::Error> {
        let query = format!(
            "UPDATE workshop_quotes
             SET status = 'rejected',
                 meta = $4,
                 updated_at = now()
             WHERE {SCOPE}"
        );
        sqlx::query(&query)
            .bind(company_id)
            .bind(id)
            .bind(branch_scope)
            .bind(meta)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Direct update carrying a recognized status. The accepted amount is
    /// only (re)derived when the quote transitions into `accepted`; the
    /// labor rate merges into `meta` without touching unrelated keys.
    pub async fn apply_status_update(
        pool: &PgPool,
        company_id: DbId,
        id: DbId,
        branch_scope: Option<DbId>,
        status: &str,
        computed_total: Option<f64>,
        labor_hours: Option<f64>,
        labor_rate: Option<f64>,
    ) -> Result<(), sqlx::Error> {
        let query = format!(
            "UPDATE workshop_quotes
             SET status = $4,
                 total_amount = COALESCE($5::float8, total_amount),
                 quoted_amount = COALESCE($5::float8, quoted_amount),
                 accepted_amount = CASE
                     WHEN $4 = 'accepted'
                         THEN COALESCE($5::float8, negotiated_amount, quoted_amount, total_amount)
                     ELSE accepted_amount
                 END,
                 eta_hours = COALESCE($6::float8, eta_hours),
                 meta = CASE
                     WHEN $7::float8 IS NOT NULL
                         THEN COALESCE(meta, '{{}}'::jsonb) || jsonb_build_object('laborRate', $7::float8)
                     ELSE meta
                 END,
                 updated_at = now()
             WHERE {SCOPE}"
        );
        sqlx::query(&query)
            .bind(company_id)
            .bind(id)
            .bind(branch_scope)
            .bind(status)
            .bind(computed_total)
            .bind(labor_hours)
            .bind(labor_rate)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Direct update with labor figures but no recognized status: numeric
    /// fields only, status untouched.
    pub async fn apply_amounts_update(
        pool: &PgPool,
        company_id: DbId,
        id: DbId,
        branch_scope: Option<DbId>,
        computed_total: Option<f64>,
        labor_hours: Option<f64>,
        labor_rate: Option<f64>,
    ) -> Result<(), sqlx::Error> {
        let query = format!(
            "UPDATE workshop_quotes
             SET total_amount = COALESCE($4::float8, total_amount),
                 quoted_amount = COALESCE($4::float8, quoted_amount),
                 eta_hours = COALESCE($5::float8, eta_hours),
                 meta = CASE
                     WHEN $6::float8 IS NOT NULL
                         THEN COALESCE(meta, '{{}}'::jsonb) || jsonb_build_object('laborRate', $6::float8)
                     ELSE meta
                 END,
                 updated_at = now()
             WHERE {SCOPE}"
        );
        sqlx::query(&query)
            .bind(company_id)
            .bind(id)
            .bind(branch_scope)
            .bind(computed_total)
            .bind(labor_hours)
            .bind(labor_rate)
            .execute(pool)
            .await?;
        Ok(())
    }
}
