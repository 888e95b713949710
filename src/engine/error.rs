use chrono::NaiveDateTime;
use thiserror::Error;

/// Failures surfaced by attendance operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AttendanceError {
    #[error("unregistered code: {0}")]
    NotFound(String),

    #[error("code already registered: {0}")]
    DuplicateCode(String),

    #[error("unreadable session start for {code}: {raw:?}")]
    CorruptTimestamp { code: String, raw: String },

    #[error("session for {code} started in the future ({started_at}), {seconds}s")]
    NegativeDuration {
        code: String,
        started_at: NaiveDateTime,
        seconds: i64,
    },

    #[error("record store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("admin password rejected")]
    AdminRequired,
}

impl AttendanceError {
    /// Data-integrity problems that were recovered by force-closing a session.
    pub fn is_integrity_warning(&self) -> bool {
        matches!(
            self,
            AttendanceError::CorruptTimestamp { .. } | AttendanceError::NegativeDuration { .. }
        )
    }
}
