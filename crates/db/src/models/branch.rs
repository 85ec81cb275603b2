use serde::Serialize;
use sqlx::FromRow;
use wrenchwork_core::branch::BranchLabelFields;
use wrenchwork_core::types::{DbId, Timestamp};

/// A row from the `branches` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: DbId,
    pub company_id: DbId,
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub code: Option<String>,
    pub address_line1: Option<String>,
    pub google_location: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Branch {
    /// The fields participating in drop-off label/geocode resolution.
    pub fn label_fields(&self) -> BranchLabelFields {
        BranchLabelFields {
            address_line1: self.address_line1.clone(),
            display_name: self.display_name.clone(),
            name: self.name.clone(),
            code: self.code.clone(),
            google_location: self.google_location.clone(),
        }
    }
}
