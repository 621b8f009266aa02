//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement, so limits live here.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: product, category, user, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, reasons (nota de transição, descrição de produto, etc.)
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone numbers, NIF, etc.
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;
pub const MIN_PASSWORD_LEN: usize = 8;

/// Delivery addresses
pub const MAX_ADDRESS_LEN: usize = 500;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value {
        if v.len() > max_len {
            return Err(AppError::validation(format!(
                "{field} is too long ({} chars, max {max_len})",
                v.len()
            )));
        }
    }
    Ok(())
}

/// Validação mínima de e-mail (formato completo fica para o provedor de envio)
pub fn validate_email(value: &str) -> Result<(), AppError> {
    validate_required_text(value, "email", MAX_EMAIL_LEN)?;
    let ok = value.contains('@')
        && !value.starts_with('@')
        && !value.ends_with('@')
        && !value.contains(char::is_whitespace);
    if !ok {
        return Err(AppError::validation(format!("Invalid email: {value}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Tomate", "nome", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("   ", "nome", MAX_NAME_LEN).is_err());
        assert!(validate_required_text(&"x".repeat(201), "nome", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn test_optional_text() {
        assert!(validate_optional_text(&None, "nota", MAX_NOTE_LEN).is_ok());
        assert!(validate_optional_text(&Some("ok".into()), "nota", MAX_NOTE_LEN).is_ok());
        assert!(validate_optional_text(&Some("x".repeat(501)), "nota", MAX_NOTE_LEN).is_err());
    }

    #[test]
    fn test_email() {
        assert!(validate_email("maria@exemplo.ao").is_ok());
        assert!(validate_email("sem-arroba").is_err());
        assert!(validate_email("@exemplo.ao").is_err());
        assert!(validate_email("com espaco@x.ao").is_err());
    }
}
