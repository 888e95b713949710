//! Time accounting for the study room: rollover, check-in/out and live totals.
//!
//! Everything here is pure. Callers load records from the store, pass them
//! in with the current wall-clock time, and persist whatever comes back.

pub mod error;
pub mod projection;
pub mod record;
pub mod registration;
pub mod rollover;
pub mod session;

pub use error::AttendanceError;
pub use projection::{LiveTotal, daily_leaderboard, monthly_leaderboard, project_live_totals};
pub use record::{StudentRecord, normalize_code};
pub use registration::register;
pub use rollover::scan_and_rollover;
pub use session::{SessionEvent, Toggle, toggle_session};
