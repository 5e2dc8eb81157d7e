//! Record validation mirroring the backend's constraints
//!
//! Running the same checks before a round-trip lets the front end show
//! per-field messages without waiting for a 400 from the server. The
//! messages match the backend's so the two sources read the same.

use crate::error::{ApiError, FieldErrors};
use crate::types::{Boat, NewBoat};

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;

/// Trait for records that can be checked before they are sent
pub trait Validate {
    /// Collect every field error; an empty map means the record is valid
    fn field_errors(&self) -> FieldErrors;

    /// Validate the record
    ///
    /// # Errors
    ///
    /// Returns a validation-class [`ApiError`] naming every offending field
    fn validate(&self) -> Result<(), ApiError> {
        let errors = self.field_errors();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation(errors))
        }
    }
}

impl Validate for NewBoat {
    fn field_errors(&self) -> FieldErrors {
        boat_field_errors(&self.name, &self.description)
    }
}

impl Validate for Boat {
    fn field_errors(&self) -> FieldErrors {
        boat_field_errors(&self.name, &self.description)
    }
}

fn boat_field_errors(name: &str, description: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if let Err(message) = validators::validate_not_blank(name, "Name")
        .and_then(|()| validators::validate_length(name, NAME_MIN_CHARS, NAME_MAX_CHARS, "Name"))
    {
        errors.insert("name".to_string(), message);
    }

    if let Err(message) =
        validators::validate_max_length(description, DESCRIPTION_MAX_CHARS, "Description")
    {
        errors.insert("description".to_string(), message);
    }

    errors
}

/// Common validation helpers
pub mod validators {
    /// Validate that a string has non-whitespace content
    pub fn validate_not_blank(value: &str, field: &str) -> Result<(), String> {
        if value.trim().is_empty() {
            return Err(format!("{field} is required"));
        }
        Ok(())
    }

    /// Validate that a string's character count lies within `min..=max`
    pub fn validate_length(value: &str, min: usize, max: usize, field: &str) -> Result<(), String> {
        let len = value.chars().count();
        if len < min || len > max {
            return Err(format!(
                "{field} must be between {min} and {max} characters"
            ));
        }
        Ok(())
    }

    /// Validate that a string does not exceed `max` characters
    pub fn validate_max_length(value: &str, max: usize, field: &str) -> Result<(), String> {
        if value.chars().count() > max {
            return Err(format!("{field} cannot exceed {max} characters"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn valid_boat_passes() {
        assert!(NewBoat::new("Aurora", "A small sloop").validate().is_ok());
        assert!(NewBoat::new("Ab", "").validate().is_ok());
    }

    #[test]
    fn blank_name_is_required() {
        let err = NewBoat::new("   ", "").validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
        assert_eq!(err.message(), ApiError::VALIDATION_FAILED);
        assert_eq!(
            err.field_errors().unwrap().get("name").map(String::as_str),
            Some("Name is required")
        );
    }

    #[test]
    fn name_length_is_bounded() {
        let errors = NewBoat::new("A", "").field_errors();
        assert_eq!(
            errors.get("name").map(String::as_str),
            Some("Name must be between 2 and 100 characters")
        );

        let errors = NewBoat::new("x".repeat(101), "").field_errors();
        assert!(errors.contains_key("name"));

        assert!(NewBoat::new("x".repeat(100), "").field_errors().is_empty());
    }

    #[test]
    fn description_length_is_bounded() {
        let boat = NewBoat::new("Aurora", "d".repeat(501)).with_id(3);
        let errors = boat.field_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get("description").map(String::as_str),
            Some("Description cannot exceed 500 characters")
        );
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // Two characters, four bytes
        assert!(NewBoat::new("ÉÉ", "").field_errors().is_empty());
    }

    #[test]
    fn all_offending_fields_are_reported() {
        let errors = NewBoat::new("", "d".repeat(600)).field_errors();
        assert_eq!(errors.len(), 2);
    }
}
