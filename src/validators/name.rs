use super::ValidationError;

const MAX_NAME_LENGTH: usize = 100;

/// `field` names the input in error messages, e.g. `"firstName"`.
pub fn validate_name(field: &'static str, name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::NameEmpty(field));
    }

    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::NameTooLong(field));
    }

    Ok(())
}
