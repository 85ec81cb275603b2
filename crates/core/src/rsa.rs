//! RSA lead status normalization and the technician stage-transition table.
//!
//! RSA leads use a small closed status vocabulary (`open`, `pending`,
//! `done`, `lost`) while callers historically sent a wider set of legacy
//! values. Every status write on an RSA lead goes through
//! [`normalize_status`] so the stored value stays inside the vocabulary.

/// Lead has been created but nobody is working it yet.
pub const RSA_STATUS_OPEN: &str = "open";

/// Lead is being worked (assigned, enroute, job in progress).
pub const RSA_STATUS_PENDING: &str = "pending";

/// Job finished successfully. Final.
pub const RSA_STATUS_DONE: &str = "done";

/// Lead was lost or cancelled. Final.
pub const RSA_STATUS_LOST: &str = "lost";

/// Collapse an arbitrary caller-supplied status into the RSA vocabulary.
///
/// Final statuses map onto themselves (including the legacy aliases
/// `completed`/`closed` and `cancelled`); `open` is preserved; everything
/// else -- in-flight statuses, unknown values, empty strings -- becomes
/// `pending`.
pub fn normalize_status(raw: &str) -> &'static str {
    match raw.trim().to_lowercase().as_str() {
        "open" => RSA_STATUS_OPEN,
        "done" | "completed" | "closed" => RSA_STATUS_DONE,
        "lost" | "cancelled" | "canceled" => RSA_STATUS_LOST,
        _ => RSA_STATUS_PENDING,
    }
}

/// Whether a status closes the lead (no further transitions allowed).
pub fn is_final_status(status: &str) -> bool {
    matches!(normalize_status(status), RSA_STATUS_DONE | RSA_STATUS_LOST)
}

/// Technician actions on an RSA lead, in rough lifecycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsaAction {
    Accept,
    Enroute,
    JobStarted,
    Complete,
    Lose,
}

/// The lead mutation an action produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RsaTransition {
    pub lead_stage: &'static str,
    pub lead_status: &'static str,
    pub event_type: &'static str,
}

impl RsaAction {
    /// Parse a caller-supplied action string, accepting legacy aliases.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "accept" => Some(Self::Accept),
            "enroute" => Some(Self::Enroute),
            "job_started" | "start" | "jobstarted" => Some(Self::JobStarted),
            "complete" | "completed" | "done" => Some(Self::Complete),
            "lose" | "lost" | "cancel" => Some(Self::Lose),
            _ => None,
        }
    }

    /// Stages from which this action may be taken.
    pub fn allowed_stages(self) -> &'static [&'static str] {
        match self {
            Self::Accept => &["new", "assigned", "dispatched", "accepted"],
            Self::Enroute => &["assigned", "dispatched", "accepted", "enroute"],
            Self::JobStarted => &[
                "accepted",
                "enroute",
                "inprocess",
                "processing",
                "job_started",
            ],
            Self::Complete => &["job_started", "inprocess", "processing", "completed"],
            Self::Lose => &[
                "new",
                "assigned",
                "dispatched",
                "accepted",
                "enroute",
                "inprocess",
                "processing",
                "job_started",
            ],
        }
    }

    /// Whether the action is valid from the given stage.
    pub fn allowed_from(self, stage: &str) -> bool {
        self.allowed_stages()
            .contains(&stage.trim().to_lowercase().as_str())
    }

    /// The stage/status/event the action transitions the lead into.
    pub fn transition(self) -> RsaTransition {
        match self {
            Self::Accept => RsaTransition {
                lead_stage: "accepted",
                lead_status: RSA_STATUS_PENDING,
                event_type: "rsa_accepted",
            },
            Self::Enroute => RsaTransition {
                lead_stage: "enroute",
                lead_status: RSA_STATUS_PENDING,
                event_type: "rsa_enroute",
            },
            Self::JobStarted => RsaTransition {
                lead_stage: "job_started",
                lead_status: RSA_STATUS_PENDING,
                event_type: "rsa_job_started",
            },
            Self::Complete => RsaTransition {
                lead_stage: "completed",
                lead_status: RSA_STATUS_DONE,
                event_type: "rsa_completed",
            },
            Self::Lose => RsaTransition {
                lead_stage: "lost",
                lead_status: RSA_STATUS_LOST,
                event_type: "rsa_lost",
            },
        }
    }
}
