// lib/src/availability.rs
//
// Per-doctor bookable time slots. Capacity is computed once at creation and
// is informational only: the appointment workflow never consults or
// decrements it, so approvals can exceed a window's capacity.

use std::sync::Arc;

use log::info;
use models::errors::{HospitalError, HospitalResult};
use models::{AvailabilitySlot, IdGenerator, IdKind, NewSlot};

use crate::collections::Store;
use crate::util;

pub struct AvailabilityLedger {
    store: Arc<Store>,
    ids: Arc<dyn IdGenerator>,
}

impl AvailabilityLedger {
    pub fn new(store: Arc<Store>, ids: Arc<dyn IdGenerator>) -> Self {
        AvailabilityLedger { store, ids }
    }

    /// Adds a slot for the doctor. The range is validated here rather than
    /// trusted from the caller: `start_time` must be strictly before
    /// `end_time` or the call fails with `InvalidRange`.
    pub async fn add_slot(&self, doctor_username: &str, slot: NewSlot) -> HospitalResult<String> {
        let start = util::minutes_since_midnight(&slot.start_time)?;
        let end = util::minutes_since_midnight(&slot.end_time)?;
        if start >= end {
            return Err(HospitalError::InvalidRange(
                "End time must be after start time".to_string(),
            ));
        }
        if slot.slots_per_hour == 0 {
            return Err(HospitalError::Validation(
                "Slots per hour must be greater than zero".to_string(),
            ));
        }

        // floor(duration_minutes / (60 / slots_per_hour)), in integer math.
        let max_capacity = (end - start) * slot.slots_per_hour / 60;

        let slot_id = self.ids.mint(IdKind::Slot);
        let record = AvailabilitySlot {
            slot_id: slot_id.clone(),
            doctor_username: doctor_username.to_string(),
            date: slot.date,
            start_time: slot.start_time,
            end_time: slot.end_time,
            slots_per_hour: slot.slots_per_hour,
            max_capacity,
            booked_slots: 0,
            created_date: util::today(),
        };

        self.store
            .slots
            .mutate(move |slots| {
                slots.push(record);
                Ok(())
            })
            .await?;
        info!("Added availability slot {} for {}", slot_id, doctor_username);
        Ok(slot_id)
    }

    pub async fn list_slots(&self, doctor_username: &str) -> HospitalResult<Vec<AvailabilitySlot>> {
        let slots = self.store.slots.load().await?;
        Ok(slots
            .into_iter()
            .filter(|s| s.doctor_username == doctor_username)
            .collect())
    }

    pub async fn list_all_slots(&self) -> HospitalResult<Vec<AvailabilitySlot>> {
        self.store.slots.load().await
    }

    pub async fn remove_slot(&self, slot_id: &str) -> HospitalResult<()> {
        let slot_id = slot_id.to_string();
        self.store
            .slots
            .mutate(move |slots| {
                let before = slots.len();
                slots.retain(|s| s.slot_id != slot_id);
                if slots.len() < before {
                    Ok(())
                } else {
                    Err(HospitalError::NotFound("Slot not found".to_string()))
                }
            })
            .await
    }
}
