use crate::engine::record::StudentRecord;
use chrono::NaiveDateTime;

/// Last records the caller managed to load, owned by the caller between refreshes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub records: Vec<StudentRecord>,
    /// When `records` were last read successfully.
    pub loaded_at: Option<NaiveDateTime>,
    /// Set when the store could not be reached and `records` are carried over.
    pub stale: bool,
}

impl Snapshot {
    pub fn fresh(records: Vec<StudentRecord>, loaded_at: NaiveDateTime) -> Self {
        Self {
            records,
            loaded_at: Some(loaded_at),
            stale: false,
        }
    }

    /// Keep the previous records but flag them; empty and stale when there were none.
    pub fn fallback(previous: Option<Snapshot>) -> Self {
        let previous = previous.unwrap_or_default();
        Self {
            stale: true,
            ..previous
        }
    }
}
