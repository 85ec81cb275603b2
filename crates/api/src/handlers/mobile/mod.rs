//! Mobile-surface handlers.
//!
//! The mobile app speaks the same workflow semantics as the web back
//! office; only the URL shapes differ (quotes are addressed through their
//! branch). Handlers here stay adapters over the shared orchestrators.

pub mod lead;
pub mod quote;
pub mod rsa;
