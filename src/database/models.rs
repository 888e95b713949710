use crate::engine::record::{SessionStart, SessionState, StudentRecord, normalize_code};
use crate::utils::time::{format_date, format_start_time, parse_date, parse_start_time};

/// Student code as SQLite hands it back. Imported sheets may store codes as numbers.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredCode {
    Text(String),
    Integer(i64),
    Real(f64),
}

impl StoredCode {
    pub fn normalize(&self) -> String {
        match self {
            StoredCode::Text(text) => normalize_code(text),
            StoredCode::Integer(value) => value.to_string(),
            StoredCode::Real(value) if value.fract() == 0.0 => (*value as i64).to_string(),
            StoredCode::Real(value) => normalize_code(&value.to_string()),
        }
    }
}

/// Raw `students` row before normalisation.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRow {
    pub code: StoredCode,
    pub name: Option<String>,
    pub daily_seconds: Option<f64>,
    pub monthly_seconds: Option<f64>,
    pub is_active: Option<i64>,
    pub start_time: Option<String>,
    pub last_update: Option<String>,
}

impl StoredRow {
    pub fn into_record(self) -> StudentRecord {
        let code = self.code.normalize();

        let session = if self.is_active.unwrap_or(0) != 0 {
            let raw = self.start_time.unwrap_or_default();
            let start = match parse_start_time(&raw) {
                Ok(started_at) => SessionStart::At(started_at),
                Err(_) => {
                    tracing::warn!("Active record {} has unreadable start time {:?}", code, raw);
                    SessionStart::Corrupt(raw)
                }
            };
            SessionState::Studying { start }
        } else {
            SessionState::Idle
        };

        StudentRecord {
            daily_seconds: coerce_seconds(&code, "daily_seconds", self.daily_seconds),
            monthly_seconds: coerce_seconds(&code, "monthly_seconds", self.monthly_seconds),
            name: self.name.map(|name| name.trim().to_string()).unwrap_or_default(),
            session,
            last_update: self.last_update.as_deref().and_then(parse_date),
            code,
        }
    }
}

fn coerce_seconds(code: &str, column: &str, value: Option<f64>) -> i64 {
    let value = value.unwrap_or(0.0);
    if !value.is_finite() || value < 0.0 {
        tracing::warn!("Record {} has invalid {} ({}), using 0", code, column, value);
        return 0;
    }
    value.floor() as i64
}

/// Column values written back for one record.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordColumns {
    pub code: String,
    pub name: String,
    pub daily_seconds: i64,
    pub monthly_seconds: i64,
    pub is_active: bool,
    pub start_time: Option<String>,
    pub last_update: Option<String>,
}

impl From<&StudentRecord> for RecordColumns {
    fn from(record: &StudentRecord) -> Self {
        let start_time = match &record.session {
            SessionState::Idle => None,
            SessionState::Studying {
                start: SessionStart::At(started_at),
            } => Some(format_start_time(*started_at)),
            SessionState::Studying {
                start: SessionStart::Corrupt(raw),
            } => Some(raw.clone()),
        };

        RecordColumns {
            code: record.code.clone(),
            name: record.name.clone(),
            daily_seconds: record.daily_seconds,
            monthly_seconds: record.monthly_seconds,
            is_active: record.is_active(),
            start_time,
            last_update: record.last_update.map(format_date),
        }
    }
}
