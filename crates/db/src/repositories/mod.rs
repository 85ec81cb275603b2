//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Workflow orchestrators never
//! touch raw storage outside these repositories.

pub mod branch_repo;
pub mod inspection_repo;
pub mod job_card_repo;
pub mod lead_repo;
pub mod workshop_quote_repo;

pub use branch_repo::BranchRepo;
pub use inspection_repo::InspectionRepo;
pub use job_card_repo::JobCardRepo;
pub use lead_repo::LeadRepo;
pub use workshop_quote_repo::WorkshopQuoteRepo;
