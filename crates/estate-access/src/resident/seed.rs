//! Sample residents used to initialize an empty store.

use chrono::{DateTime, TimeZone, Utc};

use super::{AccessType, Resident};

fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

fn resident(
    id: &str,
    name: &str,
    house_number: &str,
    access_type: AccessType,
    last_visit: DateTime<Utc>,
) -> Resident {
    Resident {
        id: id.to_string(),
        name: name.to_string(),
        house_number: house_number.to_string(),
        access_type,
        last_visit,
    }
}

/// The sample resident list written to a fresh store.
#[must_use]
pub fn seed_residents() -> Vec<Resident> {
    vec![
        resident("1", "John Smith", "101", AccessType::Resident, at(27, 14, 30)),
        resident("2", "Sarah Johnson", "102", AccessType::Resident, at(27, 9, 15)),
        resident("3", "Mike Davis", "103", AccessType::Visitor, at(26, 16, 45)),
        resident("4", "Emma Wilson", "104", AccessType::Staff, at(27, 8, 0)),
        resident("5", "Robert Brown", "105", AccessType::Resident, at(25, 11, 20)),
        resident("6", "Lisa Anderson", "106", AccessType::Visitor, at(27, 13, 0)),
        resident("7", "James Taylor", "107", AccessType::Staff, at(27, 7, 30)),
        resident("8", "Patricia Martinez", "108", AccessType::Resident, at(24, 15, 10)),
    ]
}
