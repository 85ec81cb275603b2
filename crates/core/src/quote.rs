//! Workshop quote states, update classification, and amount arithmetic.
//!
//! A `PATCH` on a quote carries one of two mutually exclusive shapes: a
//! workflow action (`accepted` / `negotiation` / `rejected`) or a direct
//! field/status update derived from labor figures. [`QuoteUpdate::from_body`]
//! classifies the request at the boundary; the presence of `workflowAction`
//! always wins and the direct shape is then ignored entirely.

use serde_json::{Map, Value};

use crate::error::CoreError;

pub const QUOTE_STATUS_PENDING: &str = "pending";
pub const QUOTE_STATUS_NEGOTIATION: &str = "negotiation";
pub const QUOTE_STATUS_ACCEPTED: &str = "accepted";
pub const QUOTE_STATUS_REJECTED: &str = "rejected";
pub const QUOTE_STATUS_CANCELLED: &str = "cancelled";
pub const QUOTE_STATUS_VERIFIED: &str = "verified";

/// All statuses a direct update may move a quote into.
pub const KNOWN_STATUSES: &[&str] = &[
    QUOTE_STATUS_PENDING,
    QUOTE_STATUS_ACCEPTED,
    QUOTE_STATUS_NEGOTIATION,
    QUOTE_STATUS_REJECTED,
    QUOTE_STATUS_CANCELLED,
    QUOTE_STATUS_VERIFIED,
];

/// Job card status set when a quote is accepted.
pub const JOB_CARD_PENDING: &str = "Pending";

/// Job card status set when a quote is rejected.
pub const JOB_CARD_REASSIGNED: &str = "Re-Assigned";

/// A classified quote update request.
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteUpdate {
    Negotiate { amount: f64, note: Option<String> },
    Accept,
    Reject { reason: Option<String> },
    Direct(DirectUpdate),
}

/// The direct field/status update shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectUpdate {
    /// Lowercased requested status, which may be outside [`KNOWN_STATUSES`].
    pub status: Option<String>,
    pub labor_hours: Option<f64>,
    pub labor_rate: Option<f64>,
}

impl DirectUpdate {
    /// The requested status, only if it is one of the six known states.
    pub fn known_status(&self) -> Option<&str> {
        self.status
            .as_deref()
            .filter(|s| KNOWN_STATUSES.contains(s))
    }

    /// `laborHours * laborRate` when both figures are present and sane
    /// (positive hours, non-negative rate).
    pub fn computed_total(&self) -> Option<f64> {
        match (self.labor_hours, self.labor_rate) {
            (Some(hours), Some(rate))
                if hours.is_finite() && rate.is_finite() && hours > 0.0 && rate >= 0.0 =>
            {
                Some(hours * rate)
            }
            _ => None,
        }
    }

    /// Whether the update carries nothing to write.
    pub fn is_no_op(&self) -> bool {
        self.known_status().is_none()
            && self.computed_total().is_none()
            && self.labor_hours.is_none()
            && self.labor_rate.is_none()
    }
}

fn number_field(value: Option<&Value>) -> Option<f64> {
    match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

fn trimmed_string(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl QuoteUpdate {
    /// Classify a `PATCH` body into a workflow action or a direct update.
    ///
    /// A present, non-empty `workflowAction` takes priority; an unknown
    /// action value or a non-positive negotiation amount is a validation
    /// error. Without `workflowAction` the body is read as a direct
    /// update: `status` (or nested `header.status`), and labor figures
    /// from the first entry of `items[]` or a singular `item`, where
    /// `quantity`/`unitPrice` are accepted as aliases.
    pub fn from_body(body: &Value) -> Result<Self, CoreError> {
        // Any non-empty scalar counts as a workflow action attempt; an
        // unknown one is an error, not a fall-through to the direct shape.
        let action = match body.get("workflowAction") {
            Some(Value::String(s)) => Some(s.trim().to_string()),
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(Value::Bool(b)) => Some(b.to_string()),
            _ => None,
        }
        .filter(|s| !s.is_empty());

        if let Some(action) = action {
            return match action.to_lowercase().as_str() {
                QUOTE_STATUS_NEGOTIATION => {
                    let amount = number_field(body.get("negotiatedAmount"))
                        .filter(|a| a.is_finite() && *a > 0.0)
                        .ok_or_else(|| {
                            CoreError::Validation("Valid negotiatedAmount is required.".into())
                        })?;
                    Ok(Self::Negotiate {
                        amount,
                        note: trimmed_string(body.get("negotiationNote")),
                    })
                }
                QUOTE_STATUS_ACCEPTED => Ok(Self::Accept),
                QUOTE_STATUS_REJECTED => Ok(Self::Reject {
                    reason: trimmed_string(body.get("rejectionReason")),
                }),
                _ => Err(CoreError::Validation("Invalid workflow action.".into())),
            };
        }

        let status = trimmed_string(body.get("status"))
            .or_else(|| trimmed_string(body.get("header").and_then(|h| h.get("status"))))
            .map(|s| s.to_lowercase());

        let item = match body.get("items") {
            Some(Value::Array(items)) => items.first(),
            _ => body.get("item"),
        };
        let labor_hours = item
            .and_then(|i| number_field(i.get("laborHours")).or_else(|| number_field(i.get("quantity"))));
        let labor_rate = item
            .and_then(|i| number_field(i.get("laborRate")).or_else(|| number_field(i.get("unitPrice"))));

        Ok(Self::Direct(DirectUpdate {
            status,
            labor_hours,
            labor_rate,
        }))
    }
}

/// The amount a quote locks in on acceptance: the first value present
/// among computed total, negotiated, quoted, and total amounts.
pub fn accepted_amount(
    computed: Option<f64>,
    negotiated: Option<f64>,
    quoted: Option<f64>,
    total: Option<f64>,
) -> f64 {
    computed
        .or(negotiated)
        .or(quoted)
        .or(total)
        .unwrap_or(0.0)
}

/// The quote's `meta` column as a mutable JSON object, treating non-object
/// values as empty.
pub fn meta_object(meta: Option<&Value>) -> Map<String, Value> {
    match meta {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    // -----------------------------------------------------------------------
    // Classification
    // -----------------------------------------------------------------------

    #[test]
    fn workflow_action_wins_over_direct_fields() {
        let update = QuoteUpdate::from_body(&json!({
            "workflowAction": "accepted",
            "status": "pending",
            "items": [{"laborHours": 2, "laborRate": 100}],
        }))
        .unwrap();
        assert_eq!(update, QuoteUpdate::Accept);
    }

    #[test]
    fn unknown_workflow_action_is_rejected() {
        let err = QuoteUpdate::from_body(&json!({ "workflowAction": "approve" })).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg == "Invalid workflow action.");
    }

    #[test]
    fn numeric_workflow_action_is_still_an_action_attempt() {
        let err = QuoteUpdate::from_body(&json!({ "workflowAction": 7 })).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg == "Invalid workflow action.");
    }

    #[test]
    fn workflow_action_is_case_insensitive() {
        let update = QuoteUpdate::from_body(&json!({ "workflowAction": "Rejected" })).unwrap();
        assert_matches!(update, QuoteUpdate::Reject { reason: None });
    }

    #[test]
    fn negotiation_requires_positive_amount() {
        for bad in [json!(0), json!(-5), json!("abc"), Value::Null] {
            let err = QuoteUpdate::from_body(&json!({
                "workflowAction": "negotiation",
                "negotiatedAmount": bad,
            }))
            .unwrap_err();
            assert_matches!(err, CoreError::Validation(_));
        }
    }

    #[test]
    fn negotiation_carries_amount_and_trimmed_note() {
        let update = QuoteUpdate::from_body(&json!({
            "workflowAction": "negotiation",
            "negotiatedAmount": 450,
            "negotiationNote": "  final offer  ",
        }))
        .unwrap();
        assert_eq!(
            update,
            QuoteUpdate::Negotiate {
                amount: 450.0,
                note: Some("final offer".into()),
            }
        );
    }

    #[test]
    fn negotiated_amount_accepts_numeric_string() {
        let update = QuoteUpdate::from_body(&json!({
            "workflowAction": "negotiation",
            "negotiatedAmount": "450.5",
        }))
        .unwrap();
        assert_matches!(update, QuoteUpdate::Negotiate { amount, .. } if amount == 450.5);
    }

    #[test]
    fn rejection_reason_empty_string_becomes_none() {
        let update = QuoteUpdate::from_body(&json!({
            "workflowAction": "rejected",
            "rejectionReason": "   ",
        }))
        .unwrap();
        assert_matches!(update, QuoteUpdate::Reject { reason: None });
    }

    // -----------------------------------------------------------------------
    // Direct updates
    // -----------------------------------------------------------------------

    #[test]
    fn direct_update_reads_first_item() {
        let update = QuoteUpdate::from_body(&json!({
            "status": "pending",
            "items": [{"laborHours": 2, "laborRate": 100}, {"laborHours": 9, "laborRate": 9}],
        }))
        .unwrap();
        let QuoteUpdate::Direct(direct) = update else {
            panic!("expected direct update");
        };
        assert_eq!(direct.known_status(), Some("pending"));
        assert_eq!(direct.computed_total(), Some(200.0));
    }

    #[test]
    fn direct_update_accepts_singular_item_and_aliases() {
        let update = QuoteUpdate::from_body(&json!({
            "item": {"quantity": 3, "unitPrice": 50},
        }))
        .unwrap();
        let QuoteUpdate::Direct(direct) = update else {
            panic!("expected direct update");
        };
        assert_eq!(direct.computed_total(), Some(150.0));
    }

    #[test]
    fn nested_header_status_is_recognized() {
        let update = QuoteUpdate::from_body(&json!({
            "header": {"status": "Verified"},
        }))
        .unwrap();
        let QuoteUpdate::Direct(direct) = update else {
            panic!("expected direct update");
        };
        assert_eq!(direct.known_status(), Some("verified"));
    }

    #[test]
    fn unknown_status_is_kept_but_not_known() {
        let update = QuoteUpdate::from_body(&json!({ "status": "draft" })).unwrap();
        let QuoteUpdate::Direct(direct) = update else {
            panic!("expected direct update");
        };
        assert_eq!(direct.status.as_deref(), Some("draft"));
        assert_eq!(direct.known_status(), None);
    }

    #[test]
    fn zero_hours_yields_no_computed_total() {
        let direct = DirectUpdate {
            status: None,
            labor_hours: Some(0.0),
            labor_rate: Some(100.0),
        };
        assert_eq!(direct.computed_total(), None);
    }

    #[test]
    fn negative_rate_yields_no_computed_total() {
        let direct = DirectUpdate {
            status: None,
            labor_hours: Some(2.0),
            labor_rate: Some(-1.0),
        };
        assert_eq!(direct.computed_total(), None);
    }

    #[test]
    fn zero_rate_is_allowed() {
        let direct = DirectUpdate {
            status: None,
            labor_hours: Some(2.0),
            labor_rate: Some(0.0),
        };
        assert_eq!(direct.computed_total(), Some(0.0));
    }

    #[test]
    fn empty_body_is_a_no_op_direct_update() {
        let update = QuoteUpdate::from_body(&json!({})).unwrap();
        let QuoteUpdate::Direct(direct) = update else {
            panic!("expected direct update");
        };
        assert!(direct.is_no_op());
    }

    // -----------------------------------------------------------------------
    // Amount precedence
    // -----------------------------------------------------------------------

    #[test]
    fn accepted_amount_prefers_computed_then_negotiated() {
        assert_eq!(
            accepted_amount(Some(200.0), Some(450.0), Some(500.0), Some(500.0)),
            200.0
        );
        assert_eq!(
            accepted_amount(None, Some(450.0), Some(500.0), Some(500.0)),
            450.0
        );
        assert_eq!(accepted_amount(None, None, Some(500.0), Some(600.0)), 500.0);
        assert_eq!(accepted_amount(None, None, None, Some(600.0)), 600.0);
        assert_eq!(accepted_amount(None, None, None, None), 0.0);
    }

    // -----------------------------------------------------------------------
    // Meta handling
    // -----------------------------------------------------------------------

    #[test]
    fn meta_object_preserves_unrelated_keys() {
        let meta = json!({"negotiationHistory": [1, 2], "laborRate": 80});
        let map = meta_object(Some(&meta));
        assert_eq!(map.get("negotiationHistory"), Some(&json!([1, 2])));
    }

    #[test]
    fn meta_object_treats_non_objects_as_empty() {
        assert!(meta_object(None).is_empty());
        assert!(meta_object(Some(&json!("oops"))).is_empty());
    }
}
