//! The quote negotiation state machine.
//!
//! Drives a workshop quote through pending -> negotiation ->
//! accepted/rejected and keeps `total_amount` aligned with whatever the
//! current status implies. Workflow actions and direct field updates are
//! mutually exclusive: classification happens once, at the boundary, and
//! the losing shape is ignored entirely.

use serde_json::{json, Value};
use sqlx::PgPool;
use wrenchwork_core::error::CoreError;
use wrenchwork_core::quote::{
    accepted_amount, meta_object, QuoteUpdate, JOB_CARD_PENDING, JOB_CARD_REASSIGNED,
};
use wrenchwork_core::types::DbId;
use wrenchwork_db::models::workshop_quote::WorkshopQuote;
use wrenchwork_db::repositories::{JobCardRepo, LeadRepo, WorkshopQuoteRepo};

use crate::error::AppResult;

pub struct QuoteNegotiationStateMachine;

impl QuoteNegotiationStateMachine {
    /// Apply a `PATCH` body to a quote and return the refreshed row.
    ///
    /// `branch_scope` restricts the quote lookup (and every write) to one
    /// branch; the mobile surface passes the branch from its URL, the web
    /// surface passes `None`.
    pub async fn apply(
        pool: &PgPool,
        company_id: DbId,
        quote_id: DbId,
        branch_scope: Option<DbId>,
        body: &Value,
        actor: Option<DbId>,
    ) -> AppResult<WorkshopQuote> {
        let quote = WorkshopQuoteRepo::find_by_id(pool, company_id, quote_id, branch_scope)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "WorkshopQuote",
                id: quote_id,
            })?;

        match QuoteUpdate::from_body(body)? {
            QuoteUpdate::Negotiate { amount, note } => {
                let mut meta = meta_object(quote.meta.as_ref());
                meta.insert(
                    "negotiationPreviousAmount".to_string(),
                    json!(quote.total_amount),
                );
                meta.insert("negotiatedAmount".to_string(), json!(amount));
                meta.insert(
                    "negotiationNote".to_string(),
                    note.map(Value::String).unwrap_or(Value::Null),
                );
                WorkshopQuoteRepo::apply_negotiation(
                    pool,
                    company_id,
                    quote_id,
                    branch_scope,
                    amount,
                    &Value::Object(meta),
                )
                .await?;
            }

            QuoteUpdate::Accept => {
                let accepted = accepted_amount(
                    None,
                    quote.negotiated_amount,
                    quote.quoted_amount,
                    Some(quote.total_amount),
                );
                WorkshopQuoteRepo::apply_acceptance(
                    pool,
                    company_id,
                    quote_id,
                    branch_scope,
                    accepted,
                    actor,
                )
                .await?;
                Self::cascade_acceptance(pool, company_id, &quote).await?;
            }

            QuoteUpdate::Reject { reason } => {
                let mut meta = meta_object(quote.meta.as_ref());
                meta.insert(
                    "rejectionReason".to_string(),
                    reason.map(Value::String).unwrap_or(Value::Null),
                );
                WorkshopQuoteRepo::apply_rejection(
                    pool,
                    company_id,
                    quote_id,
                    branch_scope,
                    &Value::Object(meta),
                )
                .await?;
                Self::cascade_rejection(pool, company_id, &quote).await?;
            }

            QuoteUpdate::Direct(direct) => {
                let computed = direct.computed_total();
                if let Some(status) = direct.known_status() {
                    WorkshopQuoteRepo::apply_status_update(
                        pool,
                        company_id,
                        quote_id,
                        branch_scope,
                        status,
                        computed,
                        direct.labor_hours,
                        direct.labor_rate,
                    )
                    .await?;
                } else if computed.is_some()
                    || direct.labor_hours.is_some()
                    || direct.labor_rate.is_some()
                {
                    WorkshopQuoteRepo::apply_amounts_update(
                        pool,
                        company_id,
                        quote_id,
                        branch_scope,
                        computed,
                        direct.labor_hours,
                        direct.labor_rate,
                    )
                    .await?;
                }
                // A body with nothing recognizable writes nothing; the
                // caller still gets the refreshed (unchanged) quote.
            }
        }

        let refreshed = WorkshopQuoteRepo::find_by_id(pool, company_id, quote_id, branch_scope)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "WorkshopQuote",
                id: quote_id,
            })?;
        Ok(refreshed)
    }

    /// Acceptance cascade: the job card goes back to `Pending` and the
    /// owning lead (reached through the job card) is pinned to the quote's
    /// branch.
    async fn cascade_acceptance(
        pool: &PgPool,
        company_id: DbId,
        quote: &WorkshopQuote,
    ) -> AppResult<()> {
        let (Some(job_card_id), Some(branch_id)) = (quote.job_card_id, quote.branch_id) else {
            return Ok(());
        };

        JobCardRepo::set_status(pool, company_id, job_card_id, JOB_CARD_PENDING).await?;

        if let Some(card) = JobCardRepo::find_by_id(pool, company_id, job_card_id).await? {
            if let Some(lead_id) = card.lead_id {
                LeadRepo::set_branch(pool, company_id, lead_id, branch_id).await?;
                tracing::info!(
                    quote_id = %quote.id,
                    %lead_id,
                    %branch_id,
                    "Quote accepted; lead pinned to branch"
                );
            }
        }
        Ok(())
    }

    /// Rejection cascade: the job card is marked `Re-Assigned` and the
    /// lead's branch is cleared -- but only if it still equals the quote's
    /// branch, so a branch set by a later assignment is not clobbered.
    async fn cascade_rejection(
        pool: &PgPool,
        company_id: DbId,
        quote: &WorkshopQuote,
    ) -> AppResult<()> {
        let (Some(job_card_id), Some(branch_id)) = (quote.job_card_id, quote.branch_id) else {
            return Ok(());
        };

        JobCardRepo::set_status(pool, company_id, job_card_id, JOB_CARD_REASSIGNED).await?;

        if let Some(card) = JobCardRepo::find_by_id(pool, company_id, job_card_id).await? {
            if let Some(lead_id) = card.lead_id {
                let cleared =
                    LeadRepo::clear_branch_if_matches(pool, company_id, lead_id, branch_id).await?;
                if cleared {
                    tracing::info!(
                        quote_id = %quote.id,
                        %lead_id,
                        "Quote rejected; lead released from branch"
                    );
                }
            }
        }
        Ok(())
    }
}
