//! Core resident types for estate-access.
//!
//! A [`Resident`] is the only domain record: a person with an access
//! classification tied to a house number. Records are created from a
//! [`NewResident`] (the id is assigned by the storage layer), changed through
//! a [`ResidentUpdate`], and never carry history.

mod seed;
mod validation;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub use seed::seed_residents;
pub use validation::{FieldError, NAME_MAX_CHARS, NAME_MIN_CHARS};

/// Classification of a resident, used for filtering and display styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessType {
    /// Lives on the estate.
    Resident,
    /// Granted temporary access.
    Visitor,
    /// Works on the estate.
    Staff,
}

impl AccessType {
    /// Every access type, in display order.
    pub const ALL: [AccessType; 3] = [Self::Resident, Self::Visitor, Self::Staff];

    /// The canonical name of this access type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resident => "Resident",
            Self::Visitor => "Visitor",
            Self::Staff => "Staff",
        }
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "resident" => Ok(Self::Resident),
            "visitor" => Ok(Self::Visitor),
            "staff" => Ok(Self::Staff),
            _ => Err(Error::UnknownAccessType(s.to_string())),
        }
    }
}

/// A sortable, validatable resident column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResidentField {
    /// Display name.
    Name,
    /// House number.
    HouseNumber,
    /// Access classification.
    AccessType,
    /// Time of the most recent visit.
    LastVisit,
}

impl ResidentField {
    /// Column heading used when rendering tables.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::HouseNumber => "House Number",
            Self::AccessType => "Access Type",
            Self::LastVisit => "Last Visit",
        }
    }

    /// The field's key in the JSON document.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::HouseNumber => "houseNumber",
            Self::AccessType => "accessType",
            Self::LastVisit => "lastVisit",
        }
    }
}

impl fmt::Display for ResidentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ResidentField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "name" => Ok(Self::Name),
            "housenumber" | "house" => Ok(Self::HouseNumber),
            "accesstype" | "type" => Ok(Self::AccessType),
            "lastvisit" => Ok(Self::LastVisit),
            _ => Err(Error::UnknownColumn(s.to_string())),
        }
    }
}

/// A stored resident record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resident {
    /// Opaque identifier assigned by the storage layer. Never changes.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Identifier of the physical unit.
    pub house_number: String,
    /// Access classification.
    pub access_type: AccessType,
    /// Time of the most recent visit.
    #[serde(with = "timestamp")]
    pub last_visit: DateTime<Utc>,
}

impl Resident {
    /// Build a stored record from submitted form data and an assigned id.
    #[must_use]
    pub fn from_new(id: impl Into<String>, new: NewResident) -> Self {
        Self {
            id: id.into(),
            name: new.name,
            house_number: new.house_number,
            access_type: new.access_type,
            last_visit: new.last_visit,
        }
    }

    /// Check whether the name or house number contains `query`, ignoring case.
    #[must_use]
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query)
            || self.house_number.to_lowercase().contains(&query)
    }
}

/// Form data for a new resident. Has no id until stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewResident {
    /// Display name.
    pub name: String,
    /// Identifier of the physical unit.
    pub house_number: String,
    /// Access classification.
    pub access_type: AccessType,
    /// Time of the most recent visit.
    #[serde(with = "timestamp")]
    pub last_visit: DateTime<Utc>,
}

impl NewResident {
    /// Create form data with the last visit set to now.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        house_number: impl Into<String>,
        access_type: AccessType,
    ) -> Self {
        Self {
            name: name.into(),
            house_number: house_number.into(),
            access_type,
            last_visit: Utc::now(),
        }
    }

    /// Set the last visit time.
    #[must_use]
    pub fn with_last_visit(mut self, last_visit: DateTime<Utc>) -> Self {
        self.last_visit = last_visit;
        self
    }

    /// Trim surrounding whitespace from the text fields.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            house_number: self.house_number.trim().to_string(),
            ..self
        }
    }
}

/// A partial update. Absent fields are left unchanged; the id cannot change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResidentUpdate {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New house number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub house_number: Option<String>,
    /// New access classification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_type: Option<AccessType>,
    /// New last visit time.
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "optional_timestamp"
    )]
    pub last_visit: Option<DateTime<Utc>>,
}

impl ResidentUpdate {
    /// Check if the update changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.house_number.is_none()
            && self.access_type.is_none()
            && self.last_visit.is_none()
    }

    /// Trim surrounding whitespace from the text fields that are present.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.map(|n| n.trim().to_string()),
            house_number: self.house_number.map(|h| h.trim().to_string()),
            ..self
        }
    }

    /// Merge the present fields into `resident`.
    pub fn apply_to(&self, resident: &mut Resident) {
        if let Some(name) = &self.name {
            resident.name.clone_from(name);
        }
        if let Some(house_number) = &self.house_number {
            resident.house_number.clone_from(house_number);
        }
        if let Some(access_type) = self.access_type {
            resident.access_type = access_type;
        }
        if let Some(last_visit) = self.last_visit {
            resident.last_visit = last_visit;
        }
    }
}

/// Parse a visit timestamp.
///
/// Accepts RFC 3339 (`2025-10-27T14:30:00Z`) and offset-less local forms
/// (`2025-10-27T14:30:00`, `2025-10-27 14:30`), the latter read as UTC.
#[must_use]
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Format a visit timestamp the way it is stored.
#[must_use]
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_timestamp(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_timestamp(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw}")))
    }
}

mod optional_timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        s: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => super::timestamp::serialize(value, s),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        #[derive(Deserialize)]
        struct Wrapper(#[serde(with = "super::timestamp")] DateTime<Utc>);

        Ok(Option::<Wrapper>::deserialize(d)?.map(|Wrapper(dt)| dt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Resident {
        Resident {
            id: "1".to_string(),
            name: "John Smith".to_string(),
            house_number: "101".to_string(),
            access_type: AccessType::Resident,
            last_visit: Utc.with_ymd_and_hms(2025, 10, 27, 14, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_access_type_display() {
        assert_eq!(AccessType::Resident.to_string(), "Resident");
        assert_eq!(AccessType::Visitor.to_string(), "Visitor");
        assert_eq!(AccessType::Staff.to_string(), "Staff");
    }

    #[test]
    fn test_access_type_parse_is_case_insensitive() {
        assert_eq!("visitor".parse::<AccessType>().unwrap(), AccessType::Visitor);
        assert_eq!("STAFF".parse::<AccessType>().unwrap(), AccessType::Staff);
        assert_eq!(" Resident ".parse::<AccessType>().unwrap(), AccessType::Resident);
    }

    #[test]
    fn test_access_type_parse_unknown() {
        let err = "guest".parse::<AccessType>().unwrap_err();
        assert!(matches!(err, Error::UnknownAccessType(ref s) if s == "guest"));
    }

    #[test]
    fn test_resident_field_parse_variants() {
        assert_eq!("houseNumber".parse::<ResidentField>().unwrap(), ResidentField::HouseNumber);
        assert_eq!("house_number".parse::<ResidentField>().unwrap(), ResidentField::HouseNumber);
        assert_eq!("last-visit".parse::<ResidentField>().unwrap(), ResidentField::LastVisit);
        assert_eq!("Name".parse::<ResidentField>().unwrap(), ResidentField::Name);
        assert!("email".parse::<ResidentField>().is_err());
    }

    #[test]
    fn test_resident_json_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["houseNumber"], "101");
        assert_eq!(json["accessType"], "Resident");
        assert_eq!(json["lastVisit"], "2025-10-27T14:30:00Z");
    }

    #[test]
    fn test_resident_accepts_offsetless_timestamp() {
        let json = r#"{"id":"3","name":"Mike Davis","houseNumber":"103",
            "accessType":"Visitor","lastVisit":"2025-10-26T16:45:00"}"#;
        let resident: Resident = serde_json::from_str(json).unwrap();
        assert_eq!(
            resident.last_visit,
            Utc.with_ymd_and_hms(2025, 10, 26, 16, 45, 0).unwrap()
        );
    }

    #[test]
    fn test_resident_rejects_garbage_timestamp() {
        let json = r#"{"id":"3","name":"Mike","houseNumber":"103",
            "accessType":"Visitor","lastVisit":"yesterday"}"#;
        assert!(serde_json::from_str::<Resident>(json).is_err());
    }

    #[test]
    fn test_parse_timestamp_forms() {
        let expected = Utc.with_ymd_and_hms(2025, 10, 27, 14, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2025-10-27T14:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2025-10-27T16:30:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-10-27T14:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-10-27 14:30"), Some(expected));
        assert_eq!(parse_timestamp("not a date"), None);
    }

    #[test]
    fn test_matches_query() {
        let resident = sample();
        assert!(resident.matches_query("john"));
        assert!(resident.matches_query("SMITH"));
        assert!(resident.matches_query("10"));
        assert!(!resident.matches_query("205"));
        assert!(resident.matches_query(""));
    }

    #[test]
    fn test_update_apply_to_changes_only_present_fields() {
        let mut resident = sample();
        let update = ResidentUpdate {
            access_type: Some(AccessType::Staff),
            ..ResidentUpdate::default()
        };
        update.apply_to(&mut resident);

        assert_eq!(resident.access_type, AccessType::Staff);
        assert_eq!(resident.name, "John Smith");
        assert_eq!(resident.id, "1");
    }

    #[test]
    fn test_update_is_empty() {
        assert!(ResidentUpdate::default().is_empty());
        let update = ResidentUpdate {
            name: Some("X".to_string()),
            ..ResidentUpdate::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_update_deserializes_partial_document() {
        let update: ResidentUpdate =
            serde_json::from_str(r#"{"lastVisit":"2025-10-20T08:00:00"}"#).unwrap();
        assert!(update.name.is_none());
        assert_eq!(
            update.last_visit,
            Some(Utc.with_ymd_and_hms(2025, 10, 20, 8, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_new_resident_normalized_trims() {
        let new = NewResident::new("  Ada Lovelace ", " 12B ", AccessType::Visitor).normalized();
        assert_eq!(new.name, "Ada Lovelace");
        assert_eq!(new.house_number, "12B");
    }

    #[test]
    fn test_from_new_assigns_id() {
        let new = NewResident::new("Ada", "12", AccessType::Staff);
        let resident = Resident::from_new("abc", new.clone());
        assert_eq!(resident.id, "abc");
        assert_eq!(resident.name, new.name);
        assert_eq!(resident.last_visit, new.last_visit);
    }
}
