//! Common validation utilities.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Lightweight email shape check. Full RFC validation is intentionally
    /// out of scope; uniqueness is enforced at the database level.
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

/// Validates that a latitude value is within valid range (-90 to 90).
pub fn validate_latitude(lat: f64) -> Result<(), ValidationError> {
    if (-90.0..=90.0).contains(&lat) {
        Ok(())
    } else {
        let mut err = ValidationError::new("latitude_range");
        err.message = Some("Latitude must be between -90 and 90".into());
        Err(err)
    }
}

/// Validates that a longitude value is within valid range (-180 to 180).
pub fn validate_longitude(lon: f64) -> Result<(), ValidationError> {
    if (-180.0..=180.0).contains(&lon) {
        Ok(())
    } else {
        let mut err = ValidationError::new("longitude_range");
        err.message = Some("Longitude must be between -180 and 180".into());
        Err(err)
    }
}

/// Validates that a delivery weight is strictly positive.
pub fn validate_weight_kg(weight: f64) -> Result<(), ValidationError> {
    if weight > 0.0 && weight.is_finite() {
        Ok(())
    } else {
        let mut err = ValidationError::new("weight_range");
        err.message = Some("Weight must be greater than zero".into());
        Err(err)
    }
}

/// Validates that a points rate is non-negative and finite.
pub fn validate_points_rate(rate: f64) -> Result<(), ValidationError> {
    if rate >= 0.0 && rate.is_finite() {
        Ok(())
    } else {
        let mut err = ValidationError::new("rate_range");
        err.message = Some("Points per kg must be non-negative".into());
        Err(err)
    }
}

/// Validates the shape of an email address.
pub fn validate_email_format(email: &str) -> Result<(), ValidationError> {
    if EMAIL_REGEX.is_match(email) {
        Ok(())
    } else {
        let mut err = ValidationError::new("email_format");
        err.message = Some("Invalid email address".into());
        Err(err)
    }
}

/// Normalizes an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Latitude tests
    #[test]
    fn test_validate_latitude() {
        assert!(validate_latitude(0.0).is_ok());
        assert!(validate_latitude(90.0).is_ok());
        assert!(validate_latitude(-90.0).is_ok());
        assert!(validate_latitude(90.1).is_err());
        assert!(validate_latitude(-90.1).is_err());
    }

    #[test]
    fn test_validate_latitude_error_message() {
        let err = validate_latitude(100.0).unwrap_err();
        assert_eq!(
            err.message.unwrap().to_string(),
            "Latitude must be between -90 and 90"
        );
    }

    // Longitude tests
    #[test]
    fn test_validate_longitude() {
        assert!(validate_longitude(0.0).is_ok());
        assert!(validate_longitude(180.0).is_ok());
        assert!(validate_longitude(-180.0).is_ok());
        assert!(validate_longitude(180.1).is_err());
        assert!(validate_longitude(-180.1).is_err());
    }

    // Weight tests
    #[test]
    fn test_validate_weight_kg() {
        assert!(validate_weight_kg(0.5).is_ok());
        assert!(validate_weight_kg(120.0).is_ok());
        assert!(validate_weight_kg(0.0).is_err());
        assert!(validate_weight_kg(-1.0).is_err());
        assert!(validate_weight_kg(f64::NAN).is_err());
        assert!(validate_weight_kg(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_weight_error_message() {
        let err = validate_weight_kg(0.0).unwrap_err();
        assert_eq!(
            err.message.unwrap().to_string(),
            "Weight must be greater than zero"
        );
    }

    // Rate tests
    #[test]
    fn test_validate_points_rate() {
        assert!(validate_points_rate(0.0).is_ok());
        assert!(validate_points_rate(12.5).is_ok());
        assert!(validate_points_rate(-0.1).is_err());
        assert!(validate_points_rate(f64::NAN).is_err());
    }

    // Email tests
    #[test]
    fn test_validate_email_format() {
        assert!(validate_email_format("ana@example.com").is_ok());
        assert!(validate_email_format("a.b+c@sub.domain.org").is_ok());
        assert!(validate_email_format("no-at-sign").is_err());
        assert!(validate_email_format("two@@example.com").is_err());
        assert!(validate_email_format("space in@example.com").is_err());
        assert!(validate_email_format("missing@tld").is_err());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ana@Example.COM "), "ana@example.com");
        assert_eq!(normalize_email("ana@example.com"), "ana@example.com");
    }
}
