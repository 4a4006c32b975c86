// models/src/availability.rs

use serde::{Deserialize, Serialize};

/// A doctor-declared window of bookable capacity.
///
/// `max_capacity` is computed once at creation. `booked_slots` is carried on
/// the record but the appointment workflow never consults or updates it;
/// capacity is informational only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySlot {
    pub slot_id: String,
    pub doctor_username: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub slots_per_hour: u32,
    pub max_capacity: u32,
    pub booked_slots: u32,
    pub created_date: String,
}

/// Slot creation input; the ledger validates the range, computes capacity,
/// and stamps the creation date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSlot {
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub slots_per_hour: u32,
}
