//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the database row, plus the write-side structs its repository accepts.
//! Entities serialize in camelCase -- the wire format both HTTP surfaces
//! expose.

pub mod branch;
pub mod inspection;
pub mod job_card;
pub mod lead;
pub mod workshop_quote;
