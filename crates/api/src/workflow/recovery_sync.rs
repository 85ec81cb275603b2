//! Keeps linked recovery pickup leads' drop-off in sync with the workshop
//! lead's branch.
//!
//! The link is a soft join: recovery leads spawned from a workshop pickup
//! (`source = "workshop_pickup"`) are matched by the branch's *resolved*
//! label/geocode or branch id, never by a foreign key. Both directions
//! reproduce that matching exactly; a different precedence would silently
//! orphan existing links.

use sqlx::PgPool;
use wrenchwork_core::branch::{resolve_geocode_for_assignment, resolve_label, BranchLabelFields};
use wrenchwork_core::lead::RECOVERY_FLOW_CUSTOMER_TO_BRANCH;
use wrenchwork_core::types::DbId;
use wrenchwork_db::repositories::{BranchRepo, LeadRepo};

use crate::error::AppResult;

pub struct RecoveryLinkSynchronizer;

impl RecoveryLinkSynchronizer {
    /// A workshop lead was assigned to `branch_id`: point every recovery
    /// pickup lead with an unset drop-off at that branch and mark its flow
    /// as customer-to-branch. Returns the number of leads updated.
    pub async fn on_workshop_branch_assigned(
        pool: &PgPool,
        company_id: DbId,
        branch_id: DbId,
    ) -> AppResult<u64> {
        let fields = branch_label_fields(pool, company_id, branch_id).await?;
        let label = resolve_label(&fields, branch_id);
        let geocode = resolve_geocode_for_assignment(&fields, &label);

        let leads = LeadRepo::unlinked_recovery_pickups(pool, company_id).await?;
        let mut updated = 0;
        for lead in &leads {
            LeadRepo::set_recovery_dropoff(
                pool,
                company_id,
                lead.id,
                Some(&label),
                Some(&geocode),
                Some(RECOVERY_FLOW_CUSTOMER_TO_BRANCH),
            )
            .await?;
            updated += 1;
        }

        if updated > 0 {
            tracing::info!(%branch_id, updated, "Linked recovery drop-offs to branch");
        }
        Ok(updated)
    }

    /// A workshop lead was cleared from `previous_branch_id`: clear the
    /// drop-off of every recovery pickup lead still pointing at it (by
    /// label, geocode, or branch id). Returns the number of leads cleared.
    pub async fn on_workshop_branch_cleared(
        pool: &PgPool,
        company_id: DbId,
        previous_branch_id: DbId,
    ) -> AppResult<u64> {
        let fields = branch_label_fields(pool, company_id, previous_branch_id).await?;
        let label = resolve_label(&fields, previous_branch_id);
        // On clear the geocode does NOT fall back to the label; a branch
        // without a stored geocode only matches by label or id.
        let geocode = fields.google_location.clone();

        let leads = LeadRepo::recovery_pickups_for_branch(
            pool,
            company_id,
            &label,
            geocode.as_deref(),
            previous_branch_id,
        )
        .await?;

        let mut cleared = 0;
        for lead in &leads {
            LeadRepo::set_recovery_dropoff(pool, company_id, lead.id, None, None, None).await?;
            cleared += 1;
        }

        if cleared > 0 {
            tracing::info!(branch_id = %previous_branch_id, cleared, "Cleared recovery drop-offs");
        }
        Ok(cleared)
    }
}

/// Branch label fields, defaulting to empty when the branch row is gone
/// (resolution then falls back to the id rendered as text).
async fn branch_label_fields(
    pool: &PgPool,
    company_id: DbId,
    branch_id: DbId,
) -> AppResult<BranchLabelFields> {
    let branch = BranchRepo::find_by_id(pool, company_id, branch_id).await?;
    Ok(branch
        .map(|b| b.label_fields())
        .unwrap_or_default())
}
