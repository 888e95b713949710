use crate::kiosk::StudyRoom;
use crate::utils::format::{format_error_message, format_info_message, format_success_message};

/// Register a new student
pub async fn register(room: &StudyRoom, code: &str, name: &str, password: &str) -> String {
    match room.register(code, name, password, room.now().date()).await {
        Ok(record) => format_success_message(&format!(
            "Registered {} with code {}",
            record.name, record.code
        )),
        Err(e) => format_error_message(&e.to_string()),
    }
}

/// Remove a student
pub async fn remove(room: &StudyRoom, code: &str, password: &str) -> String {
    match room.remove(code, password).await {
        Ok(()) => format_success_message(&format!("Removed student {}", code.trim())),
        Err(e) => format_error_message(&e.to_string()),
    }
}

/// Run the daily rollover now
pub async fn rollover(room: &StudyRoom) -> String {
    let today = room.now().date();

    match room.rollover(today).await {
        Ok(rolled) if rolled.is_empty() => {
            format_info_message(&format!("All records are already on {}", today))
        }
        Ok(rolled) => format_success_message(&format!(
            "Rolled over {} record(s) to {}",
            rolled.len(),
            today
        )),
        Err(e) => format_error_message(&e.to_string()),
    }
}
