use super::ValidationError;

const MAX_TITLE_LENGTH: usize = 255;

/// Title, description and location must be non-blank. Only `title` has an
/// upper bound; descriptions are free text.
pub fn validate_event_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::FieldEmpty(field));
    }

    if field == "title" && value.chars().count() > MAX_TITLE_LENGTH {
        return Err(ValidationError::FieldTooLong(field, MAX_TITLE_LENGTH));
    }

    Ok(())
}

pub fn validate_capacity(max_participants: i64) -> Result<(), ValidationError> {
    if max_participants < 1 {
        return Err(ValidationError::CapacityTooSmall);
    }
    Ok(())
}
