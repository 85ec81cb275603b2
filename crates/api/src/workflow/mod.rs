//! Transport-agnostic workflow orchestrators.
//!
//! Both HTTP surfaces (web and mobile) dispatch into these components; the
//! handlers only translate paths and response envelopes. No axum types
//! appear in any signature here.
//!
//! Within one call, steps run strictly in order and later side effects may
//! read state written by earlier steps. There is no cross-entity
//! transaction and no locking: concurrent writers race last-write-wins,
//! including the window between the verified-inspection check and the lead
//! write.

pub mod inspection_lifecycle;
pub mod lead_assignment;
pub mod quote_negotiation;
pub mod recovery_sync;
pub mod rsa_flow;

pub use inspection_lifecycle::InspectionLifecycleManager;
pub use lead_assignment::LeadAssignmentCoordinator;
pub use quote_negotiation::QuoteNegotiationStateMachine;
pub use recovery_sync::RecoveryLinkSynchronizer;
pub use rsa_flow::RsaFlow;
