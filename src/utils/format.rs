use crate::engine::{LiveTotal, SessionEvent, StudentRecord};
use crate::utils::time::format_duration_seconds;
use chrono::NaiveDateTime;

pub fn format_event_message(record: &StudentRecord, event: &SessionEvent) -> String {
    match event {
        SessionEvent::Started => {
            format_success_message(&format!("{}, checked in. Have a good session!", record.name))
        }
        SessionEvent::Stopped { duration_secs } => format_success_message(&format!(
            "{}, checked out after {}. Today: {}",
            record.name,
            format_duration_seconds(*duration_secs),
            format_duration_seconds(record.daily_seconds)
        )),
        SessionEvent::ForcedClose { warning } => format_warning_message(&format!(
            "{}, your session was closed without adding time ({})",
            record.name, warning
        )),
    }
}

pub fn format_rank_line(rank: usize, total: &LiveTotal<'_>, seconds: f64) -> String {
    let marker = if total.record.is_active() { " *" } else { "" };
    format!(
        "{:>3}. {:<20} {}{}",
        rank,
        total.record.name,
        format_duration_seconds(seconds.floor() as i64),
        marker
    )
}

pub fn format_leaderboard(
    title: &str,
    totals: &[LiveTotal<'_>],
    seconds: impl Fn(&LiveTotal<'_>) -> f64,
) -> String {
    let mut board = format!("{}\n", title);

    if totals.is_empty() {
        board.push_str("     (nobody yet)\n");
        return board;
    }

    for (index, total) in totals.iter().enumerate() {
        board.push_str(&format_rank_line(index + 1, total, seconds(total)));
        board.push('\n');
    }

    board
}

pub fn format_stale_banner(loaded_at: Option<NaiveDateTime>) -> String {
    match loaded_at {
        Some(loaded_at) => format_warning_message(&format!(
            "Record store offline. Showing data from {}",
            loaded_at.format("%Y-%m-%d %H:%M:%S")
        )),
        None => format_warning_message("Record store offline. No data could be loaded"),
    }
}

pub fn format_error_message(error: &str) -> String {
    format!("[error] {}", error)
}

pub fn format_warning_message(message: &str) -> String {
    format!("[warn] {}", message)
}

pub fn format_success_message(message: &str) -> String {
    format!("[ok] {}", message)
}

pub fn format_info_message(message: &str) -> String {
    format!("[info] {}", message)
}
