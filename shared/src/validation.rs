//! Validation utilities for the Smart Gear Manufacturing platform

use rust_decimal::Decimal;

/// Validate a requested/received quantity is strictly positive
pub fn validate_positive_quantity(quantity: Decimal) -> Result<(), &'static str> {
    if quantity <= Decimal::ZERO {
        return Err("Quantity must be positive");
    }
    Ok(())
}

/// Validate a stock level is non-negative (on-hand counts may be zero)
pub fn validate_non_negative_quantity(quantity: Decimal) -> Result<(), &'static str> {
    if quantity < Decimal::ZERO {
        return Err("Quantity cannot be negative");
    }
    Ok(())
}

/// Validate a department name is present
pub fn validate_department(department: &str) -> Result<(), &'static str> {
    if department.trim().is_empty() {
        return Err("Department is required");
    }
    Ok(())
}

/// Validate an item display name is present
pub fn validate_item_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Item name is required");
    }
    Ok(())
}

/// Validate an inventory item code (2-32 characters, uppercase
/// alphanumeric with dashes, e.g. `RS`, `LUB`, `AUTO-SUPPORTB-1A2B3C4D`)
pub fn validate_item_code(code: &str) -> Result<(), &'static str> {
    if code.len() < 2 {
        return Err("Item code must be at least 2 characters");
    }
    if code.len() > 32 {
        return Err("Item code must be at most 32 characters");
    }
    if !code
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-')
    {
        return Err("Item code must be uppercase alphanumeric");
    }
    Ok(())
}

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_positive_quantity() {
        assert!(validate_positive_quantity(dec!(0.5)).is_ok());
        assert!(validate_positive_quantity(dec!(0)).is_err());
        assert!(validate_positive_quantity(dec!(-3)).is_err());
    }

    #[test]
    fn test_non_negative_quantity() {
        assert!(validate_non_negative_quantity(dec!(0)).is_ok());
        assert!(validate_non_negative_quantity(dec!(12.5)).is_ok());
        assert!(validate_non_negative_quantity(dec!(-0.01)).is_err());
    }

    #[test]
    fn test_department_required() {
        assert!(validate_department("manufacturing").is_ok());
        assert!(validate_department("").is_err());
        assert!(validate_department("   ").is_err());
    }

    #[test]
    fn test_item_name_required() {
        assert!(validate_item_name("Support bearings").is_ok());
        assert!(validate_item_name("").is_err());
    }

    #[test]
    fn test_item_code_format() {
        assert!(validate_item_code("RS").is_ok());
        assert!(validate_item_code("LUB").is_ok());
        assert!(validate_item_code("AUTO-SUPPORTB-1A2B3C4D").is_ok());
        assert!(validate_item_code("x").is_err()); // too short
        assert!(validate_item_code("lub").is_err()); // lowercase
        assert!(validate_item_code("A B").is_err()); // whitespace
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("purchaser@example.com").is_ok());
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("no@domain").is_err());
    }
}
