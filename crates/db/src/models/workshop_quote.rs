use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;
use wrenchwork_core::types::{DbId, Timestamp};

/// A row from the `workshop_quotes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkshopQuote {
    pub id: DbId,
    pub company_id: DbId,
    pub estimate_id: Option<DbId>,
    pub job_card_id: Option<DbId>,
    pub lead_id: Option<DbId>,
    pub branch_id: Option<DbId>,
    pub status: String,
    pub currency: Option<String>,
    pub total_amount: f64,
    pub negotiated_amount: Option<f64>,
    pub quoted_amount: Option<f64>,
    pub accepted_amount: Option<f64>,
    pub additional_amount: f64,
    pub eta_hours: Option<f64>,
    pub remarks: Option<String>,
    pub meta: Option<Value>,
    pub created_by: Option<DbId>,
    pub approved_by: Option<DbId>,
    pub approved_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Response payload for quote endpoints.
///
/// Branch labor quotes carry no line-item rows of their own; `items` keeps
/// the response shape shared with part quotes.
#[derive(Debug, Serialize)]
pub struct QuoteWithItems {
    pub quote: WorkshopQuote,
    pub items: Vec<Value>,
}

impl From<WorkshopQuote> for QuoteWithItems {
    fn from(quote: WorkshopQuote) -> Self {
        Self {
            quote,
            items: Vec::new(),
        }
    }
}
