//! HTTP handlers.
//!
//! Handlers are thin adapters: they translate paths, auth, and response
//! envelopes, and dispatch into the workflow orchestrators. The web and
//! mobile surfaces share all semantics.

pub mod lead;
pub mod mobile;
pub mod quote;
pub mod rsa;

use serde_json::Value;

/// Parse a request body the way both surfaces always have: invalid or
/// absent JSON falls back to an empty object, and the workflow treats the
/// missing fields as "keep current".
pub(crate) fn lenient_json(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|_| Value::Object(Default::default()))
}
