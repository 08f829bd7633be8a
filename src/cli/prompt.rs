//! Interactive account prompts

use std::io;

use crate::errors::{AppError, Result};

/// Prompt for a password without echoing it
pub fn prompt_password() -> Result<String> {
    let password = rpassword::prompt_password("Password: ")
        .map_err(|e| AppError::Io(io::Error::new(io::ErrorKind::Other, e)))?;

    if password.is_empty() {
        return Err(AppError::generic("Password cannot be empty"));
    }
    Ok(password)
}

/// Check an email address before sending it to the backend
pub fn validate_email(email: &str) -> Result<()> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(AppError::generic(format!(
            "'{}' does not look like an email address",
            email
        )))
    }
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.trim().split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.contains('.')
        && !email.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("a.b+bikes@mail.example.org"));

        assert!(!is_valid_email("ada"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ada@localhost"));
        assert!(!is_valid_email("ada@.com"));
        assert!(!is_valid_email("ada lovelace@example.com"));
        assert!(validate_email("nope").is_err());
    }
}
