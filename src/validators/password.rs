use super::ValidationError;

/// Length bounds for new passwords.
///
/// ```
/// use eventdesk::validators::PasswordPolicy;
///
/// let policy = PasswordPolicy::default();
/// assert!(policy.validate("password123").is_ok());
/// assert!(policy.validate("short").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub max_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            max_length: 128,
        }
    }
}

impl PasswordPolicy {
    pub fn validate(&self, password: &str) -> Result<(), ValidationError> {
        if password.is_empty() {
            return Err(ValidationError::PasswordEmpty);
        }

        let len = password.chars().count();
        if len < self.min_length {
            return Err(ValidationError::PasswordTooShort(self.min_length));
        }
        if len > self.max_length {
            return Err(ValidationError::PasswordTooLong(self.max_length));
        }

        Ok(())
    }
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    PasswordPolicy::default().validate(password)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_bounds() {
        assert_eq!(validate_password(""), Err(ValidationError::PasswordEmpty));
        assert_eq!(validate_password("1234567"), Err(ValidationError::PasswordTooShort(8)));
        assert!(validate_password("12345678").is_ok());
        assert_eq!(
            validate_password(&"p".repeat(129)),
            Err(ValidationError::PasswordTooLong(128))
        );
    }

    #[test]
    fn test_custom_policy() {
        let policy = PasswordPolicy {
            min_length: 12,
            max_length: 64,
        };
        assert!(policy.validate("password123").is_err());
        assert!(policy.validate("password1234").is_ok());
    }
}
