//! Domain logic for the wrenchwork back office.
//!
//! This crate has **zero internal dependencies** so the decision logic of the
//! lead-assignment and quote-negotiation workflows can be exercised without a
//! database and reused by the API layer and any future CLI or worker tooling.

pub mod assignment;
pub mod branch;
pub mod error;
pub mod lead;
pub mod quote;
pub mod rsa;
pub mod types;
