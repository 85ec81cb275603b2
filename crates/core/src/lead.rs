//! Lead vocabulary shared across the assignment and recovery workflows.

/// Roadside-assistance lead.
pub const LEAD_TYPE_RSA: &str = "rsa";

/// Workshop service lead.
pub const LEAD_TYPE_WORKSHOP: &str = "workshop";

/// Vehicle pickup/drop-off movement lead.
pub const LEAD_TYPE_RECOVERY: &str = "recovery";

/// Lead status that marks the vehicle as physically in the workshop.
/// Branch/user assignment only triggers the inspection lifecycle while a
/// workshop lead is in this status.
pub const STATUS_CAR_IN: &str = "car_in";

/// `source` value stamped on recovery leads auto-spawned from a workshop
/// lead's pickup flow. The recovery link synchronizer only ever touches
/// leads carrying this source.
pub const SOURCE_WORKSHOP_PICKUP: &str = "workshop_pickup";

/// `recovery_flow` value set once a workshop branch becomes the drop-off
/// destination of a linked recovery lead.
pub const RECOVERY_FLOW_CUSTOMER_TO_BRANCH: &str = "customer_to_branch";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lead_types_are_distinct() {
        assert_ne!(LEAD_TYPE_RSA, LEAD_TYPE_WORKSHOP);
        assert_ne!(LEAD_TYPE_WORKSHOP, LEAD_TYPE_RECOVERY);
    }
}
