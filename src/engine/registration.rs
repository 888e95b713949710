use crate::engine::error::AttendanceError;
use crate::engine::record::StudentRecord;
use crate::engine::session::find_by_code;
use crate::utils::validation::{validate_code, validate_name};
use chrono::NaiveDate;

/// Build a fresh record for `code`, rejecting codes already on the roster.
pub fn register(
    records: &[StudentRecord],
    code: &str,
    name: &str,
    today: NaiveDate,
) -> Result<StudentRecord, AttendanceError> {
    let code = validate_code(code)?;
    let name = validate_name(name)?;

    if find_by_code(records, &code).is_some() {
        return Err(AttendanceError::DuplicateCode(code));
    }

    Ok(StudentRecord::new(code, name, today))
}
