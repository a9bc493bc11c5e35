//! Validation helpers shared by the request-input checks in the backend

use rust_decimal::Decimal;

/// Reject negative quantities, prices, and thresholds.
pub fn validate_non_negative(value: Decimal) -> Result<(), &'static str> {
    if value < Decimal::ZERO {
        return Err("must not be negative");
    }
    Ok(())
}

/// Names for catalog entities must be non-empty after trimming.
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("must not be empty");
    }
    Ok(())
}

/// Email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("must be a valid email address")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_values_rejected() {
        assert!(validate_non_negative(Decimal::from(-1)).is_err());
        assert!(validate_non_negative(Decimal::ZERO).is_ok());
    }

    #[test]
    fn blank_names_rejected() {
        assert!(validate_name("  ").is_err());
        assert!(validate_name("Beans").is_ok());
    }
}
