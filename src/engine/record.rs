use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// One student's attendance row, keyed by `code`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentRecord {
    pub code: String,
    pub name: String,
    /// Closed sessions of the current day.
    pub daily_seconds: i64,
    /// Closed days of the current month, today's bucket excluded.
    pub monthly_seconds: i64,
    pub session: SessionState,
    /// `None` when the store holds no readable date.
    pub last_update: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Studying { start: SessionStart },
}

/// Start of an open session as found in the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SessionStart {
    At(NaiveDateTime),
    /// Active row whose start time is missing or unreadable.
    Corrupt(String),
}

impl StudentRecord {
    pub fn new(code: String, name: String, today: NaiveDate) -> Self {
        Self {
            code,
            name,
            daily_seconds: 0,
            monthly_seconds: 0,
            session: SessionState::Idle,
            last_update: Some(today),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.session, SessionState::Studying { .. })
    }

    pub fn start_time(&self) -> Option<NaiveDateTime> {
        match &self.session {
            SessionState::Studying {
                start: SessionStart::At(started_at),
            } => Some(*started_at),
            _ => None,
        }
    }

    pub fn start(&mut self, now: NaiveDateTime) {
        self.session = SessionState::Studying {
            start: SessionStart::At(now),
        };
    }

    pub fn close(&mut self) {
        self.session = SessionState::Idle;
    }

    /// Seconds elapsed in the open session, never negative. Corrupt starts count as zero.
    pub fn elapsed_seconds(&self, now: NaiveDateTime) -> f64 {
        match self.start_time() {
            Some(started_at) => {
                let millis = now.signed_duration_since(started_at).num_milliseconds();
                (millis.max(0) as f64) / 1000.0
            }
            None => 0.0,
        }
    }
}

/// Canonical form of a student code: trimmed, with a float-rendered `.0` suffix removed.
pub fn normalize_code(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .strip_suffix(".0")
        .filter(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(trimmed)
        .to_string()
}
