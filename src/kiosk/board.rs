use crate::engine::{LiveTotal, daily_leaderboard, monthly_leaderboard, project_live_totals};
use crate::kiosk::snapshot::Snapshot;
use crate::utils::format::{format_leaderboard, format_stale_banner};
use chrono::NaiveDateTime;
use serde::Serialize;

/// Daily and monthly rankings for one refresh.
#[derive(Debug, Serialize)]
pub struct Board<'a> {
    pub generated_at: NaiveDateTime,
    pub stale: bool,
    pub loaded_at: Option<NaiveDateTime>,
    pub studying: usize,
    pub daily: Vec<LiveTotal<'a>>,
    pub monthly: Vec<LiveTotal<'a>>,
}

impl<'a> Board<'a> {
    pub fn build(snapshot: &'a Snapshot, now: NaiveDateTime, limit: usize) -> Self {
        let totals = project_live_totals(&snapshot.records, now);

        let mut daily = daily_leaderboard(&totals);
        daily.truncate(limit);
        let mut monthly = monthly_leaderboard(&totals);
        monthly.truncate(limit);

        Board {
            generated_at: now,
            stale: snapshot.stale,
            loaded_at: snapshot.loaded_at,
            studying: snapshot.records.iter().filter(|r| r.is_active()).count(),
            daily,
            monthly,
        }
    }

    pub fn render(&self) -> String {
        let mut out = format!(
            "=== Study Room | {} | {} studying ===\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S"),
            self.studying
        );

        if self.stale {
            out.push_str(&format_stale_banner(self.loaded_at));
            out.push('\n');
        }

        out.push('\n');
        out.push_str(&format_leaderboard("Today", &self.daily, |t| t.live_daily));
        out.push('\n');
        out.push_str(&format_leaderboard("This month", &self.monthly, |t| {
            t.live_monthly
        }));

        out
    }
}
