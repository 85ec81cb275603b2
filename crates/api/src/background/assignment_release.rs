//! Periodic release of stale RSA assignments.
//!
//! A dispatched RSA lead the technician never acted on keeps its
//! branch/assignee forever unless something clears it. This task sweeps
//! leads still `open` in an early stage whose `assigned_at` is older than
//! the configured timeout and releases them back to the pool.

use std::time::Duration;

use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use wrenchwork_db::repositories::LeadRepo;

/// How often the sweep runs.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Run the release loop until `cancel` is triggered.
pub async fn run(pool: PgPool, timeout_minutes: i64, cancel: CancellationToken) {
    tracing::info!(
        timeout_minutes,
        interval_secs = SWEEP_INTERVAL.as_secs(),
        "Assignment release job started"
    );

    let mut interval = tokio::time::interval(SWEEP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Assignment release job stopping");
                break;
            }
            _ = interval.tick() => {
                match LeadRepo::release_expired_assignments(&pool, timeout_minutes).await {
                    Ok(released) if released > 0 => {
                        tracing::info!(released, "Released stale RSA assignments");
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::error!(error = %e, "Assignment release sweep failed");
                    }
                }
            }
        }
    }
}
