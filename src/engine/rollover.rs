use crate::engine::record::StudentRecord;
use chrono::{Datelike, NaiveDate};

/// Result of one rollover pass over the full record set.
#[derive(Debug, Clone)]
pub struct RolloverScan {
    pub records: Vec<StudentRecord>,
    /// Codes of records that were stale and have been rolled over.
    pub rolled_over: Vec<String>,
}

impl RolloverScan {
    pub fn changed(&self) -> bool {
        !self.rolled_over.is_empty()
    }

    /// Records that need to be written back, in store order.
    pub fn changed_records(&self) -> Vec<StudentRecord> {
        self.records
            .iter()
            .filter(|record| self.rolled_over.contains(&record.code))
            .cloned()
            .collect()
    }
}

/// Bring every record's day bucket up to `today`.
pub fn scan_and_rollover(records: &[StudentRecord], today: NaiveDate) -> RolloverScan {
    let mut records = records.to_vec();
    let mut rolled_over = Vec::new();

    for record in records.iter_mut() {
        if roll_over(record, today) {
            rolled_over.push(record.code.clone());
        }
    }

    if !rolled_over.is_empty() {
        tracing::info!("Rolled over {} record(s) to {}", rolled_over.len(), today);
    }

    RolloverScan {
        records,
        rolled_over,
    }
}

/// Returns false when the record is already current.
pub fn roll_over(record: &mut StudentRecord, today: NaiveDate) -> bool {
    if record.last_update == Some(today) {
        return false;
    }

    match record.last_update {
        Some(last) if last > today => {
            // the clock went backwards: the counters cannot be attributed to this month
            tracing::warn!(
                "Record {} was last updated on {} which is after {}; resetting month",
                record.code,
                last,
                today
            );
            record.monthly_seconds = 0;
        }
        Some(last) if same_month(last, today) => {
            record.monthly_seconds += record.daily_seconds;
        }
        Some(_) => {
            // 月が変わった: 前月の端数日は繰り越さない
            record.monthly_seconds = 0;
        }
        None => {
            record.monthly_seconds = 0;
        }
    }

    record.daily_seconds = 0;
    record.last_update = Some(today);

    if record.is_active() {
        tracing::warn!(
            "Force-closing overnight session for {} without credit",
            record.code
        );
        record.close();
    }

    true
}

fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::record::{SessionStart, SessionState};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(code: &str, daily: i64, monthly: i64, last: Option<NaiveDate>) -> StudentRecord {
        StudentRecord {
            code: code.to_string(),
            name: format!("student {}", code),
            daily_seconds: daily,
            monthly_seconds: monthly,
            session: SessionState::Idle,
            last_update: last,
        }
    }

    #[test]
    fn same_month_folds_daily_into_monthly() {
        let today = date(2025, 3, 15);
        let scan = scan_and_rollover(&[record("1", 3600, 7200, Some(date(2025, 3, 14)))], today);

        assert!(scan.changed());
        let rolled = &scan.records[0];
        assert_eq!(rolled.monthly_seconds, 10800);
        assert_eq!(rolled.daily_seconds, 0);
        assert_eq!(rolled.last_update, Some(today));
    }

    #[test]
    fn month_boundary_resets_monthly() {
        let today = date(2025, 4, 1);
        let scan = scan_and_rollover(&[record("1", 3600, 99_000, Some(date(2025, 3, 31)))], today);

        assert_eq!(scan.records[0].monthly_seconds, 0);
        assert_eq!(scan.records[0].daily_seconds, 0);
    }

    #[test]
    fn same_month_number_in_another_year_resets() {
        let today = date(2025, 3, 2);
        let scan = scan_and_rollover(&[record("1", 10, 500, Some(date(2024, 3, 30)))], today);
        assert_eq!(scan.records[0].monthly_seconds, 0);
    }

    #[test]
    fn unknown_last_update_is_stamped_and_reset() {
        let today = date(2025, 3, 15);
        let scan = scan_and_rollover(&[record("1", 40, 400, None)], today);

        assert_eq!(scan.rolled_over, vec!["1".to_string()]);
        assert_eq!(scan.records[0].monthly_seconds, 0);
        assert_eq!(scan.records[0].last_update, Some(today));
    }

    #[test]
    fn future_last_update_resets_month_even_within_same_month() {
        let today = date(2025, 3, 15);
        let scan = scan_and_rollover(&[record("1", 3600, 7200, Some(date(2025, 3, 20)))], today);

        assert!(scan.changed());
        assert_eq!(scan.records[0].monthly_seconds, 0);
        assert_eq!(scan.records[0].daily_seconds, 0);
        assert_eq!(scan.records[0].last_update, Some(today));
    }

    #[test]
    fn current_records_are_untouched() {
        let today = date(2025, 3, 15);
        let input = vec![record("1", 120, 300, Some(today))];
        let scan = scan_and_rollover(&input, today);

        assert!(!scan.changed());
        assert!(scan.changed_records().is_empty());
        assert_eq!(scan.records, input);
    }

    #[test]
    fn second_scan_is_a_no_op() {
        let today = date(2025, 3, 15);
        let input = vec![
            record("1", 3600, 0, Some(date(2025, 3, 13))),
            record("2", 50, 10, Some(today)),
        ];
        let first = scan_and_rollover(&input, today);
        let second = scan_and_rollover(&first.records, today);

        assert_eq!(first.rolled_over, vec!["1".to_string()]);
        assert!(!second.changed());
        assert_eq!(second.records, first.records);
    }

    #[test]
    fn overnight_session_is_closed_without_credit() {
        let today = date(2025, 3, 15);
        let mut stale = record("7", 600, 1000, Some(date(2025, 3, 14)));
        stale.start(date(2025, 3, 14).and_hms_opt(21, 0, 0).unwrap());

        let scan = scan_and_rollover(&[stale], today);
        let rolled = &scan.records[0];

        assert!(!rolled.is_active());
        assert_eq!(rolled.start_time(), None);
        assert_eq!(rolled.daily_seconds, 0);
        assert_eq!(rolled.monthly_seconds, 1600);
    }

    #[test]
    fn corrupt_open_session_is_closed_too() {
        let today = date(2025, 3, 15);
        let mut stale = record("8", 0, 0, Some(date(2025, 3, 14)));
        stale.session = SessionState::Studying {
            start: SessionStart::Corrupt(String::new()),
        };

        let scan = scan_and_rollover(&[stale], today);
        assert_eq!(scan.records[0].session, SessionState::Idle);
    }

    #[test]
    fn changed_records_only_returns_stale_ones() {
        let today = date(2025, 3, 15);
        let input = vec![
            record("1", 1, 1, Some(today)),
            record("2", 2, 2, Some(date(2025, 3, 1))),
            record("3", 3, 3, Some(date(2025, 2, 28))),
        ];
        let scan = scan_and_rollover(&input, today);
        let codes: Vec<_> = scan.changed_records().into_iter().map(|r| r.code).collect();
        assert_eq!(codes, vec!["2", "3"]);
    }
}
