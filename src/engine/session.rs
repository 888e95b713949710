use crate::engine::error::AttendanceError;
use crate::engine::record::{SessionStart, SessionState, StudentRecord, normalize_code};
use chrono::NaiveDateTime;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Started,
    Stopped { duration_secs: i64 },
    /// Session closed without credit; the warning says why.
    ForcedClose { warning: AttendanceError },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toggle {
    pub record: StudentRecord,
    pub event: SessionEvent,
}

pub fn find_by_code<'a>(records: &'a [StudentRecord], code: &str) -> Option<&'a StudentRecord> {
    let code = normalize_code(code);
    records.iter().find(|record| record.code == code)
}

/// Check a student in or out. The input slice is left untouched.
pub fn toggle_session(
    records: &[StudentRecord],
    code: &str,
    now: NaiveDateTime,
) -> Result<Toggle, AttendanceError> {
    let mut record = find_by_code(records, code)
        .cloned()
        .ok_or_else(|| AttendanceError::NotFound(normalize_code(code)))?;

    let event = match record.session.clone() {
        SessionState::Idle => {
            record.start(now);
            SessionEvent::Started
        }
        SessionState::Studying { start } => check_out(&mut record, start, now),
    };
    record.last_update = Some(now.date());

    Ok(Toggle { record, event })
}

fn check_out(record: &mut StudentRecord, start: SessionStart, now: NaiveDateTime) -> SessionEvent {
    record.close();

    let started_at = match start {
        SessionStart::At(started_at) => started_at,
        SessionStart::Corrupt(raw) => {
            let warning = AttendanceError::CorruptTimestamp {
                code: record.code.clone(),
                raw,
            };
            tracing::warn!("{}; closing without credit", warning);
            return SessionEvent::ForcedClose { warning };
        }
    };

    let seconds = now
        .signed_duration_since(started_at)
        .num_milliseconds()
        .div_euclid(1000);
    if seconds < 0 {
        let warning = AttendanceError::NegativeDuration {
            code: record.code.clone(),
            started_at,
            seconds,
        };
        tracing::warn!("{}; closing without credit", warning);
        return SessionEvent::ForcedClose { warning };
    }

    record.daily_seconds += seconds;
    SessionEvent::Stopped {
        duration_secs: seconds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_micro_opt(15, 30, 0, 250_000)
            .unwrap()
    }

    fn roster() -> Vec<StudentRecord> {
        let today = now().date();
        vec![
            StudentRecord::new("1001".into(), "Mina".into(), today),
            StudentRecord::new("1002".into(), "Joon".into(), today),
        ]
    }

    #[test]
    fn check_in_then_out_credits_elapsed_time() {
        let mut records = roster();
        let checked_in = toggle_session(&records, "1001", now()).unwrap();
        assert_eq!(checked_in.event, SessionEvent::Started);
        assert!(checked_in.record.is_active());
        assert_eq!(checked_in.record.start_time(), Some(now()));
        records[0] = checked_in.record;

        let later = now() + Duration::seconds(1800);
        let checked_out = toggle_session(&records, "1001", later).unwrap();
        assert_eq!(
            checked_out.event,
            SessionEvent::Stopped {
                duration_secs: 1800
            }
        );
        assert!(!checked_out.record.is_active());
        assert_eq!(checked_out.record.start_time(), None);
        assert_eq!(checked_out.record.daily_seconds, 1800);
    }

    #[test]
    fn duration_is_floored_to_whole_seconds() {
        let mut records = roster();
        records[1].daily_seconds = 100;
        records[1].start(now());

        let later = now() + Duration::milliseconds(2_999);
        let toggle = toggle_session(&records, "1002", later).unwrap();
        assert_eq!(toggle.event, SessionEvent::Stopped { duration_secs: 2 });
        assert_eq!(toggle.record.daily_seconds, 102);
    }

    #[test]
    fn unknown_code_is_not_found() {
        let records = roster();
        let err = toggle_session(&records, "9999", now()).unwrap_err();
        assert_eq!(err, AttendanceError::NotFound("9999".into()));
        assert_eq!(records, roster());
    }

    #[test]
    fn lookup_normalizes_float_rendered_codes() {
        let records = roster();
        let toggle = toggle_session(&records, " 1002.0 ", now()).unwrap();
        assert_eq!(toggle.record.code, "1002");
    }

    #[test]
    fn corrupt_start_forces_close_without_credit() {
        let mut records = roster();
        records[0].daily_seconds = 60;
        records[0].session = SessionState::Studying {
            start: SessionStart::Corrupt("not-a-time".into()),
        };

        let toggle = toggle_session(&records, "1001", now()).unwrap();
        match toggle.event {
            SessionEvent::ForcedClose { warning } => {
                assert!(warning.is_integrity_warning());
                assert!(matches!(warning, AttendanceError::CorruptTimestamp { .. }));
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert!(!toggle.record.is_active());
        assert_eq!(toggle.record.daily_seconds, 60);
    }

    #[test]
    fn start_in_the_future_forces_close() {
        let mut records = roster();
        records[0].start(now() + Duration::minutes(5));

        let toggle = toggle_session(&records, "1001", now()).unwrap();
        assert!(matches!(
            toggle.event,
            SessionEvent::ForcedClose {
                warning: AttendanceError::NegativeDuration { seconds: -300, .. }
            }
        ));
        assert_eq!(toggle.record.daily_seconds, 0);
        assert_eq!(toggle.record.session, SessionState::Idle);
    }

    #[test]
    fn sub_second_future_start_forces_close() {
        let mut records = roster();
        records[0].daily_seconds = 30;
        records[0].start(now() + Duration::milliseconds(500));

        let toggle = toggle_session(&records, "1001", now()).unwrap();
        assert!(matches!(
            toggle.event,
            SessionEvent::ForcedClose {
                warning: AttendanceError::NegativeDuration { seconds: -1, .. }
            }
        ));
        assert_eq!(toggle.record.daily_seconds, 30);
        assert!(!toggle.record.is_active());
    }

    #[test]
    fn toggle_stamps_today() {
        let mut records = roster();
        records[0].last_update = None;
        let toggle = toggle_session(&records, "1001", now()).unwrap();
        assert_eq!(toggle.record.last_update, Some(now().date()));
    }
}
