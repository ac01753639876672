//! Identity normalization and field rules applied before an account is stored.

use crate::entities::user::{EMAIL_MAX_LENGTH, NAME_MAX_LENGTH};
use crate::error::{AccountError, ValidationKind};

/// Canonicalize an email address for storage and uniqueness comparison.
///
/// Surrounding whitespace is removed and the domain part (everything after the
/// last `@`) is lowercased. The local part is kept as given since mailbox names
/// may be case sensitive. Input without an `@` is only trimmed.
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}

/// Check a normalized email against the column length.
pub fn validate_email(email: &str) -> Result<(), AccountError> {
    if email.chars().count() > EMAIL_MAX_LENGTH {
        return Err(AccountError::validation(
            ValidationKind::InvalidEmail,
            format!("Email must be {EMAIL_MAX_LENGTH} characters or fewer."),
        ));
    }
    Ok(())
}

/// Characters allowed in a username besides letters and digits.
const USERNAME_EXTRA_CHARS: [char; 5] = ['@', '.', '+', '-', '_'];

/// Check the optional username against its length limit and character set.
pub fn validate_username(username: &str) -> Result<(), AccountError> {
    let length = username.chars().count();
    if length == 0 || length > NAME_MAX_LENGTH {
        return Err(AccountError::validation(
            ValidationKind::InvalidUsername,
            format!("Username must be between 1 and {NAME_MAX_LENGTH} characters."),
        ));
    }

    if let Some(bad) = username
        .chars()
        .find(|c| !c.is_alphanumeric() && !USERNAME_EXTRA_CHARS.contains(c))
    {
        return Err(AccountError::validation(
            ValidationKind::InvalidUsername,
            format!(
                "Username may contain only letters, digits and @/./+/-/_ characters (found '{bad}')."
            ),
        ));
    }

    Ok(())
}

/// Check a display name (first or last name) against its length limit.
pub fn validate_display_name(field: &str, value: &str) -> Result<(), AccountError> {
    if value.chars().count() > NAME_MAX_LENGTH {
        return Err(AccountError::validation(
            ValidationKind::InvalidName,
            format!("The {field} field must be {NAME_MAX_LENGTH} characters or fewer."),
        ));
    }
    Ok(())
}
