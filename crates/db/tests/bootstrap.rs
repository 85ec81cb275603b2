use sqlx::PgPool;

/// Full bootstrap test: connect, migrate, verify the workflow tables exist.
#[sqlx::test(migrations = "./migrations")]
async fn full_bootstrap(pool: PgPool) {
    wrenchwork_db::health_check(&pool).await.unwrap();

    let tables = [
        "branches",
        "leads",
        "lead_events",
        "inspections",
        "job_cards",
        "workshop_quotes",
    ];

    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should exist and start empty");
    }
}
