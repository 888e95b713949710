use crate::engine::record::StudentRecord;
use chrono::NaiveDateTime;
use serde::Serialize;

/// Students below this many seconds are left off a leaderboard.
pub const MIN_RANKED_SECONDS: f64 = 1.0;

/// Display-only totals including the open session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LiveTotal<'a> {
    pub record: &'a StudentRecord,
    pub live_daily: f64,
    pub live_monthly: f64,
}

pub fn live_total(record: &StudentRecord, now: NaiveDateTime) -> LiveTotal<'_> {
    let live_daily = record.daily_seconds as f64 + record.elapsed_seconds(now);
    LiveTotal {
        record,
        live_daily,
        live_monthly: record.monthly_seconds as f64 + live_daily,
    }
}

pub fn project_live_totals(records: &[StudentRecord], now: NaiveDateTime) -> Vec<LiveTotal<'_>> {
    records.iter().map(|record| live_total(record, now)).collect()
}

pub fn daily_leaderboard<'a>(totals: &[LiveTotal<'a>]) -> Vec<LiveTotal<'a>> {
    rank_by(totals, |total| total.live_daily)
}

pub fn monthly_leaderboard<'a>(totals: &[LiveTotal<'a>]) -> Vec<LiveTotal<'a>> {
    rank_by(totals, |total| total.live_monthly)
}

// sort_by is stable, so ties keep store order
fn rank_by<'a>(totals: &[LiveTotal<'a>], key: impl Fn(&LiveTotal<'a>) -> f64) -> Vec<LiveTotal<'a>> {
    let mut ranked: Vec<LiveTotal<'a>> = totals
        .iter()
        .copied()
        .filter(|total| key(total) >= MIN_RANKED_SECONDS)
        .collect();
    ranked.sort_by(|a, b| key(b).total_cmp(&key(a)));
    ranked
}
