//! # Validation Module
//!
//! Input validation utilities for Gamerack.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: THIS MODULE (Rust, before any lookup)                        │
//! │  ├── Shape checks: positive ids, digit-only cpf/phone, day counts      │
//! │  └── Runs before a single store call is made                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  ├── UNIQUE constraints (cpf, game name)                               │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use gamerack_core::validation::{validate_days_rented, validate_cpf};
//!
//! validate_days_rented(3).unwrap();
//! validate_cpf("12345678901").unwrap();
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Identifier Validators
// =============================================================================

/// Validates a record identifier.
///
/// Ids are store-assigned positive rowids; zero and negatives are never
/// handed out, so they are rejected before any lookup runs.
pub fn validate_id(field: &str, id: i64) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates the agreed rental length.
///
/// ## Example
/// ```rust
/// use gamerack_core::validation::validate_days_rented;
///
/// assert!(validate_days_rented(3).is_ok());
/// assert!(validate_days_rented(0).is_err());
/// assert!(validate_days_rented(-2).is_err());
/// ```
pub fn validate_days_rented(days: i64) -> ValidationResult<()> {
    if days <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "daysRented".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a customer name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most 200 characters
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    validate_name("name", name)
}

/// Validates a game name. Same shape rules as customer names; uniqueness
/// is the catalog's concern, not this module's.
pub fn validate_game_name(name: &str) -> ValidationResult<()> {
    validate_name("name", name)
}

fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a cpf (national id).
///
/// ## Rules
/// - Exactly 11 characters
/// - ASCII digits only
///
/// ## Example
/// ```rust
/// use gamerack_core::validation::validate_cpf;
///
/// assert!(validate_cpf("12345678901").is_ok());
/// assert!(validate_cpf("123").is_err());
/// assert!(validate_cpf("12345678 01").is_err());
/// ```
pub fn validate_cpf(cpf: &str) -> ValidationResult<()> {
    if cpf.len() != 11 || !cpf.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "cpf".to_string(),
            reason: "must be exactly 11 digits".to_string(),
        });
    }
    Ok(())
}

/// Validates a contact phone.
///
/// ## Rules
/// - 10 or 11 characters (landline or mobile)
/// - ASCII digits only
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    if !(10..=11).contains(&phone.len()) || !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must be 10 or 11 digits".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a catalog per-day price.
pub fn validate_price_per_day(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "pricePerDay".to_string(),
        });
    }
    Ok(())
}

/// Validates a game's total stock.
pub fn validate_stock_total(stock: i64) -> ValidationResult<()> {
    if stock <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "stockTotal".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_id() {
        assert!(validate_id("customerId", 1).is_ok());
        assert!(validate_id("customerId", 0).is_err());
        assert!(validate_id("gameId", -5).is_err());
    }

    #[test]
    fn test_validate_days_rented() {
        assert!(validate_days_rented(1).is_ok());
        assert!(validate_days_rented(30).is_ok());
        assert!(validate_days_rented(0).is_err());
        assert!(validate_days_rented(-1).is_err());
    }

    #[test]
    fn test_validate_names() {
        assert!(validate_customer_name("Joana Lima").is_ok());
        assert!(validate_customer_name("   ").is_err());
        assert!(validate_game_name("Catan").is_ok());
        assert!(validate_game_name(&"x".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_cpf() {
        assert!(validate_cpf("12345678901").is_ok());
        assert!(validate_cpf("1234567890").is_err()); // 10 digits
        assert!(validate_cpf("123456789012").is_err()); // 12 digits
        assert!(validate_cpf("1234567890a").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("2133334444").is_ok()); // landline
        assert!(validate_phone("21999998888").is_ok()); // mobile
        assert!(validate_phone("213333444").is_err());
        assert!(validate_phone("21-99999888").is_err());
    }

    #[test]
    fn test_validate_catalog_numbers() {
        assert!(validate_price_per_day(100).is_ok());
        assert!(validate_price_per_day(0).is_err());
        assert!(validate_stock_total(1).is_ok());
        assert!(validate_stock_total(-3).is_err());
    }
}
