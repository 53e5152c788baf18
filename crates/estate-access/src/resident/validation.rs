//! Form validation for resident data.
//!
//! Validation collects every failing field so a form can show all of its
//! errors at once.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{NewResident, ResidentField, ResidentUpdate};
use crate::error::{Error, Result};

/// Minimum name length, in characters.
pub const NAME_MIN_CHARS: usize = 2;

/// Maximum name length, in characters.
pub const NAME_MAX_CHARS: usize = 100;

/// A validation failure on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// The field that failed.
    pub field: ResidentField,
    /// Human-readable message.
    pub message: String,
}

impl FieldError {
    /// Create a new field error.
    #[must_use]
    pub fn new(field: ResidentField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn check_name(name: &str, errors: &mut Vec<FieldError>) {
    let len = name.trim().chars().count();
    if len < NAME_MIN_CHARS {
        errors.push(FieldError::new(
            ResidentField::Name,
            format!("Name must be at least {NAME_MIN_CHARS} characters"),
        ));
    } else if len > NAME_MAX_CHARS {
        errors.push(FieldError::new(
            ResidentField::Name,
            format!("Name must be less than {NAME_MAX_CHARS} characters"),
        ));
    }
}

fn check_house_number(house_number: &str, errors: &mut Vec<FieldError>) {
    if house_number.trim().is_empty() {
        errors.push(FieldError::new(
            ResidentField::HouseNumber,
            "House number is required",
        ));
    }
}

fn check_last_visit(last_visit: &DateTime<Utc>, now: DateTime<Utc>, errors: &mut Vec<FieldError>) {
    if *last_visit > now {
        errors.push(FieldError::new(
            ResidentField::LastVisit,
            "Last visit cannot be in the future",
        ));
    }
}

fn finish(errors: Vec<FieldError>) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(errors))
    }
}

impl NewResident {
    /// Validate the form data against the current time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] listing every invalid field.
    pub fn validate(&self) -> Result<()> {
        self.validate_at(Utc::now())
    }

    /// Validate the form data against `now`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] listing every invalid field.
    pub fn validate_at(&self, now: DateTime<Utc>) -> Result<()> {
        let mut errors = Vec::new();
        check_name(&self.name, &mut errors);
        check_house_number(&self.house_number, &mut errors);
        check_last_visit(&self.last_visit, now, &mut errors);
        finish(errors)
    }
}

impl ResidentUpdate {
    /// Validate the present fields against the current time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] listing every invalid field.
    pub fn validate(&self) -> Result<()> {
        self.validate_at(Utc::now())
    }

    /// Validate the present fields against `now`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] listing every invalid field.
    pub fn validate_at(&self, now: DateTime<Utc>) -> Result<()> {
        let mut errors = Vec::new();
        if let Some(name) = &self.name {
            check_name(name, &mut errors);
        }
        if let Some(house_number) = &self.house_number {
            check_house_number(house_number, &mut errors);
        }
        if let Some(last_visit) = &self.last_visit {
            check_last_visit(last_visit, now, &mut errors);
        }
        finish(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resident::AccessType;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 28, 12, 0, 0).unwrap()
    }

    fn valid() -> NewResident {
        NewResident::new("John Smith", "101", AccessType::Resident)
            .with_last_visit(now() - Duration::hours(3))
    }

    #[test]
    fn test_valid_new_resident() {
        assert!(valid().validate_at(now()).is_ok());
    }

    #[test]
    fn test_name_too_short() {
        let mut new = valid();
        new.name = "J".to_string();
        let err = new.validate_at(now()).unwrap_err();
        assert_eq!(err.field_errors().len(), 1);
        assert_eq!(err.field_errors()[0].field, ResidentField::Name);
        assert_eq!(
            err.field_errors()[0].message,
            "Name must be at least 2 characters"
        );
    }

    #[test]
    fn test_name_whitespace_only_is_too_short() {
        let mut new = valid();
        new.name = "    ".to_string();
        assert!(new.validate_at(now()).is_err());
    }

    #[test]
    fn test_name_length_boundaries() {
        let mut new = valid();
        new.name = "x".repeat(NAME_MAX_CHARS);
        assert!(new.validate_at(now()).is_ok());

        new.name = "x".repeat(NAME_MAX_CHARS + 1);
        let err = new.validate_at(now()).unwrap_err();
        assert!(err.to_string().contains("less than 100"));
    }

    #[test]
    fn test_name_counts_characters_not_bytes() {
        let mut new = valid();
        new.name = "Zoë".to_string();
        assert!(new.validate_at(now()).is_ok());
        new.name = "é".to_string();
        assert!(new.validate_at(now()).is_err());
    }

    #[test]
    fn test_house_number_required() {
        let mut new = valid();
        new.house_number = " ".to_string();
        let err = new.validate_at(now()).unwrap_err();
        assert_eq!(err.field_errors()[0].field, ResidentField::HouseNumber);
    }

    #[test]
    fn test_last_visit_in_future_rejected() {
        let new = valid().with_last_visit(now() + Duration::minutes(1));
        let err = new.validate_at(now()).unwrap_err();
        assert_eq!(err.field_errors()[0].field, ResidentField::LastVisit);
    }

    #[test]
    fn test_last_visit_exactly_now_accepted() {
        let new = valid().with_last_visit(now());
        assert!(new.validate_at(now()).is_ok());
    }

    #[test]
    fn test_all_errors_collected() {
        let new = NewResident::new("", "", AccessType::Visitor)
            .with_last_visit(now() + Duration::days(1));
        let err = new.validate_at(now()).unwrap_err();
        let fields: Vec<_> = err.field_errors().iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                ResidentField::Name,
                ResidentField::HouseNumber,
                ResidentField::LastVisit
            ]
        );
    }

    #[test]
    fn test_update_validates_only_present_fields() {
        assert!(ResidentUpdate::default().validate_at(now()).is_ok());

        let update = ResidentUpdate {
            house_number: Some(String::new()),
            ..ResidentUpdate::default()
        };
        let err = update.validate_at(now()).unwrap_err();
        assert_eq!(err.field_errors().len(), 1);
        assert_eq!(err.field_errors()[0].field, ResidentField::HouseNumber);
    }

    #[test]
    fn test_field_error_display() {
        let err = FieldError::new(ResidentField::HouseNumber, "House number is required");
        assert_eq!(err.to_string(), "houseNumber: House number is required");
    }
}
