//! Branch label/geocode resolution for the recovery soft join.
//!
//! Linked recovery leads are matched to a workshop branch by the branch's
//! *resolved* display label and geocode, not by a foreign key. The
//! resolution precedence below must stay stable: changing it silently
//! desynchronizes every recovery lead whose drop-off was written under the
//! old precedence.

use crate::types::DbId;

/// The branch fields that participate in label resolution.
#[derive(Debug, Clone, Default)]
pub struct BranchLabelFields {
    pub address_line1: Option<String>,
    pub display_name: Option<String>,
    pub name: Option<String>,
    pub code: Option<String>,
    pub google_location: Option<String>,
}

/// Resolve the human-facing drop-off label for a branch.
///
/// Precedence: `address_line1`, then `display_name`, then `name`, then
/// `code`, falling back to the branch id rendered as text.
pub fn resolve_label(fields: &BranchLabelFields, branch_id: DbId) -> String {
    fields
        .address_line1
        .clone()
        .or_else(|| fields.display_name.clone())
        .or_else(|| fields.name.clone())
        .or_else(|| fields.code.clone())
        .unwrap_or_else(|| branch_id.to_string())
}

/// Resolve the geocode string written alongside the label when a branch is
/// assigned. Falls back to the label itself when the branch has no stored
/// geocode, so the two drop-off fields never disagree on assignment.
pub fn resolve_geocode_for_assignment(fields: &BranchLabelFields, label: &str) -> String {
    fields
        .google_location
        .clone()
        .unwrap_or_else(|| label.to_string())
}
