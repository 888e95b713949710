use crate::engine::error::AttendanceError;
use crate::engine::record::normalize_code;

pub const MAX_CODE_LEN: usize = 20;
pub const MAX_NAME_LEN: usize = 40;

pub fn validate_code(raw: &str) -> Result<String, AttendanceError> {
    let code = normalize_code(raw);

    if code.is_empty() {
        return Err(AttendanceError::InvalidInput("code must not be empty".into()));
    }

    if code.chars().count() > MAX_CODE_LEN {
        return Err(AttendanceError::InvalidInput(format!(
            "code must be at most {} characters",
            MAX_CODE_LEN
        )));
    }

    if !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(AttendanceError::InvalidInput(
            "code may only contain letters, digits and '-'".into(),
        ));
    }

    Ok(code)
}

pub fn validate_name(raw: &str) -> Result<String, AttendanceError> {
    let name = raw.trim();

    if name.is_empty() {
        return Err(AttendanceError::InvalidInput("name must not be empty".into()));
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(AttendanceError::InvalidInput(format!(
            "name must be at most {} characters",
            MAX_NAME_LEN
        )));
    }

    Ok(name.to_string())
}
