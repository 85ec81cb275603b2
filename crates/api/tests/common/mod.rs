//! Shared harness for HTTP-level integration tests.
//!
//! Tests drive the real router (same middleware stack as production) via
//! `tower::ServiceExt::oneshot`, against a per-test database provisioned
//! by `#[sqlx::test]`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use wrenchwork_api::auth::jwt::{generate_access_token, JwtConfig};
use wrenchwork_api::config::ServerConfig;
use wrenchwork_api::router::build_app_router;
use wrenchwork_api::state::AppState;
use wrenchwork_db::models::inspection::Inspection;
use wrenchwork_db::models::job_card::JobCard;
use wrenchwork_db::models::lead::Lead;
use wrenchwork_db::models::workshop_quote::WorkshopQuote;

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        assignment_release_timeout_mins: 5,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router with all middleware layers.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Mint a Bearer token for the given acting user.
pub fn bearer_for(user_id: Uuid) -> String {
    let token = generate_access_token(user_id, "agent", &test_config().jwt)
        .expect("failed to mint test token");
    format!("Bearer {token}")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send an authenticated request with an optional JSON body.
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    actor: Uuid,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, bearer_for(actor));

    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };

    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str, actor: Uuid) -> Response<Body> {
    send(app, Method::GET, uri, None, actor).await
}

pub async fn put_json(app: Router, uri: &str, body: Value, actor: Uuid) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body), actor).await
}

pub async fn patch_json(app: Router, uri: &str, body: Value, actor: Uuid) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(body), actor).await
}

pub async fn post_json(app: Router, uri: &str, body: Value, actor: Uuid) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), actor).await
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert a status and return the JSON body in one step.
pub async fn expect_json(response: Response<Body>, status: StatusCode) -> Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Seed helpers
// ---------------------------------------------------------------------------

/// Insert a branch and return its id.
pub async fn seed_branch(
    pool: &PgPool,
    company_id: Uuid,
    address_line1: Option<&str>,
    display_name: Option<&str>,
    google_location: Option<&str>,
) -> Uuid {
    let (id,): (Uuid,) = sqlx::query_as(
        "INSERT INTO branches (company_id, address_line1, display_name, google_location)
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(company_id)
    .bind(address_line1)
    .bind(display_name)
    .bind(google_location)
    .fetch_one(pool)
    .await
    .unwrap();
    id
}

/// Lead seed with workable defaults; override what the test cares about.
pub struct SeedLead {
    pub company_id: Uuid,
    pub lead_type: &'static str,
    pub lead_status: &'static str,
    pub lead_stage: Option<&'static str>,
    pub source: Option<&'static str>,
    pub branch_id: Option<Uuid>,
    pub assigned_user_id: Option<Uuid>,
    pub car_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    pub dropoff_to: Option<&'static str>,
    pub dropoff_google_location: Option<&'static str>,
}

impl SeedLead {
    pub fn workshop(company_id: Uuid) -> Self {
        Self {
            company_id,
            lead_type: "workshop",
            lead_status: "new",
            lead_stage: None,
            source: None,
            branch_id: None,
            assigned_user_id: None,
            car_id: Some(Uuid::new_v4()),
            customer_id: Some(Uuid::new_v4()),
            dropoff_to: None,
            dropoff_google_location: None,
        }
    }

    pub fn recovery_pickup(company_id: Uuid) -> Self {
        Self {
            lead_type: "recovery",
            source: Some("workshop_pickup"),
            car_id: None,
            customer_id: None,
            ..Self::workshop(company_id)
        }
    }

    pub fn rsa(company_id: Uuid) -> Self {
        Self {
            lead_type: "rsa",
            lead_status: "open",
            lead_stage: Some("new"),
            ..Self::workshop(company_id)
        }
    }

    pub async fn insert(self, pool: &PgPool) -> Uuid {
        let (id,): (Uuid,) = sqlx::query_as(
            "INSERT INTO leads
                (company_id, lead_type, lead_status, lead_stage, source, branch_id,
                 assigned_user_id, car_id, customer_id, dropoff_to, dropoff_google_location)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING id",
        )
        .bind(self.company_id)
        .bind(self.lead_type)
        .bind(self.lead_status)
        .bind(self.lead_stage)
        .bind(self.source)
        .bind(self.branch_id)
        .bind(self.assigned_user_id)
        .bind(self.car_id)
        .bind(self.customer_id)
        .bind(self.dropoff_to)
        .bind(self.dropoff_google_location)
        .fetch_one(pool)
        .await
        .unwrap();
        id
    }
}

/// Insert a job card bound to a lead.
pub async fn seed_job_card(pool: &PgPool, company_id: Uuid, lead_id: Option<Uuid>) -> Uuid {
    let (id,): (Uuid,) = sqlx::query_as(
        "INSERT INTO job_cards (company_id, lead_id, status)
         VALUES ($1, $2, 'InProgress') RETURNING id",
    )
    .bind(company_id)
    .bind(lead_id)
    .fetch_one(pool)
    .await
    .unwrap();
    id
}

/// Quote seed with workable defaults.
pub struct SeedQuote {
    pub company_id: Uuid,
    pub branch_id: Option<Uuid>,
    pub job_card_id: Option<Uuid>,
    pub lead_id: Option<Uuid>,
    pub status: &'static str,
    pub total_amount: f64,
    pub quoted_amount: Option<f64>,
    pub negotiated_amount: Option<f64>,
    pub meta: Option<Value>,
}

impl SeedQuote {
    pub fn pending(company_id: Uuid) -> Self {
        Self {
            company_id,
            branch_id: None,
            job_card_id: None,
            lead_id: None,
            status: "pending",
            total_amount: 0.0,
            quoted_amount: None,
            negotiated_amount: None,
            meta: None,
        }
    }

    pub async fn insert(self, pool: &PgPool) -> Uuid {
        let (id,): (Uuid,) = sqlx::query_as(
            "INSERT INTO workshop_quotes
                (company_id, branch_id, job_card_id, lead_id, status, total_amount,
                 quoted_amount, negotiated_amount, meta)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING id",
        )
        .bind(self.company_id)
        .bind(self.branch_id)
        .bind(self.job_card_id)
        .bind(self.lead_id)
        .bind(self.status)
        .bind(self.total_amount)
        .bind(self.quoted_amount)
        .bind(self.negotiated_amount)
        .bind(self.meta)
        .fetch_one(pool)
        .await
        .unwrap();
        id
    }
}

/// Mark a lead's latest inspection as verified.
pub async fn verify_inspection(pool: &PgPool, inspection_id: Uuid) {
    sqlx::query("UPDATE inspections SET verified_at = now() WHERE id = $1")
        .bind(inspection_id)
        .execute(pool)
        .await
        .unwrap();
}

// ---------------------------------------------------------------------------
// Fetch helpers
// ---------------------------------------------------------------------------

pub async fn fetch_lead(pool: &PgPool, company_id: Uuid, id: Uuid) -> Lead {
    wrenchwork_db::repositories::LeadRepo::find_by_id(pool, company_id, id)
        .await
        .unwrap()
        .expect("lead should exist")
}

/// All inspections for a lead, oldest first.
pub async fn inspections_for_lead(pool: &PgPool, company_id: Uuid, lead_id: Uuid) -> Vec<Inspection> {
    sqlx::query_as(
        "SELECT id, company_id, lead_id, car_id, customer_id, branch_id, status,
                verified_at, cancelled_by, cancelled_at, cancel_remarks, created_at, updated_at
         FROM inspections
         WHERE company_id = $1 AND lead_id = $2
         ORDER BY created_at ASC",
    )
    .bind(company_id)
    .bind(lead_id)
    .fetch_all(pool)
    .await
    .unwrap()
}

pub async fn fetch_quote(pool: &PgPool, company_id: Uuid, id: Uuid) -> WorkshopQuote {
    wrenchwork_db::repositories::WorkshopQuoteRepo::find_by_id(pool, company_id, id, None)
        .await
        .unwrap()
        .expect("quote should exist")
}

pub async fn fetch_job_card(pool: &PgPool, company_id: Uuid, id: Uuid) -> JobCard {
    wrenchwork_db::repositories::JobCardRepo::find_by_id(pool, company_id, id)
        .await
        .unwrap()
        .expect("job card should exist")
}

/// Event types recorded for a lead, oldest first.
pub async fn event_types_for_lead(pool: &PgPool, company_id: Uuid, lead_id: Uuid) -> Vec<String> {
    let rows: Vec<(String,)> = sqlx::query_as(
        "SELECT event_type FROM lead_events
         WHERE company_id = $1 AND lead_id = $2
         ORDER BY created_at ASC",
    )
    .bind(company_id)
    .bind(lead_id)
    .fetch_all(pool)
    .await
    .unwrap();
    rows.into_iter().map(|(t,)| t).collect()
}
