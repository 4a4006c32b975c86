// lib/src/patients.rs
//
// CRUD over the two patient collections. Front-desk and portal records share
// a schema but live in separate collections; duplicate detection is scoped
// to the collection a registration targets.

use std::sync::Arc;

use log::info;
use models::errors::{HospitalError, HospitalResult};
use models::{IdGenerator, IdKind, NewPatient, PatientOrigin, PatientPatch, PatientRecord};

use crate::collections::{Collection, Store};
use crate::util;

pub struct PatientRegistry {
    store: Arc<Store>,
    ids: Arc<dyn IdGenerator>,
}

impl PatientRegistry {
    pub fn new(store: Arc<Store>, ids: Arc<dyn IdGenerator>) -> Self {
        PatientRegistry { store, ids }
    }

    fn collection(&self, origin: PatientOrigin) -> &Collection<PatientRecord> {
        match origin {
            PatientOrigin::FrontDesk => &self.store.front_desk_patients,
            PatientOrigin::Portal => &self.store.portal_patients,
        }
    }

    /// Registers a patient into the collection of the given origin. Fails
    /// with `Duplicate` when the email or mobile number collides with an
    /// existing record in that collection; the stored collection is left
    /// unchanged on failure.
    pub async fn register(
        &self,
        origin: PatientOrigin,
        patient: NewPatient,
    ) -> HospitalResult<String> {
        let id = self.ids.mint(IdKind::Patient);
        let registration_date = util::today();
        let minted = id.clone();
        self.collection(origin)
            .mutate(move |records| {
                let collision = records.iter().any(|existing| {
                    existing.email == patient.email
                        || existing.mobile_number == patient.mobile_number
                });
                if collision {
                    return Err(HospitalError::Duplicate(
                        "Patient with this email or mobile number already exists".to_string(),
                    ));
                }
                records.push(patient.into_record(origin, minted, registration_date));
                Ok(())
            })
            .await?;
        info!("Registered patient {}", id);
        Ok(id)
    }

    pub async fn get_all(&self, origin: PatientOrigin) -> HospitalResult<Vec<PatientRecord>> {
        self.collection(origin).load().await
    }

    /// Looks a patient up by either identifier field, across both
    /// collections.
    pub async fn get_by_id(&self, id: &str) -> HospitalResult<Option<PatientRecord>> {
        for origin in [PatientOrigin::FrontDesk, PatientOrigin::Portal] {
            let records = self.collection(origin).load().await?;
            if let Some(found) = records.into_iter().find(|p| p.matches_id(id)) {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    /// Case-insensitive substring search on full name or identifier, across
    /// both collections.
    pub async fn search(&self, term: &str) -> HospitalResult<Vec<PatientRecord>> {
        let needle = term.to_lowercase();
        let mut results = Vec::new();
        for origin in [PatientOrigin::FrontDesk, PatientOrigin::Portal] {
            let records = self.collection(origin).load().await?;
            results.extend(records.into_iter().filter(|p| {
                p.full_name.to_lowercase().contains(&needle)
                    || p.id()
                        .map(|id| id.to_lowercase().contains(&needle))
                        .unwrap_or(false)
            }));
        }
        Ok(results)
    }

    /// Applies a partial update to the record with the given id. Fails with
    /// `NotFound` when no record in either collection matches.
    pub async fn update(&self, id: &str, patch: PatientPatch) -> HospitalResult<()> {
        let id = id.to_string();
        match self
            .patch_in(PatientOrigin::FrontDesk, id.clone(), patch.clone())
            .await
        {
            Err(HospitalError::NotFound(_)) => self.patch_in(PatientOrigin::Portal, id, patch).await,
            other => other,
        }
    }

    async fn patch_in(
        &self,
        origin: PatientOrigin,
        id: String,
        patch: PatientPatch,
    ) -> HospitalResult<()> {
        self.collection(origin)
            .mutate(move |records| match records.iter_mut().find(|p| p.matches_id(&id)) {
                Some(record) => {
                    patch.apply_to(record);
                    Ok(())
                }
                None => Err(HospitalError::NotFound("Patient not found".to_string())),
            })
            .await
    }

    /// Removes the record with the given id. Fails with `NotFound` when no
    /// record in either collection matches.
    pub async fn delete(&self, id: &str) -> HospitalResult<()> {
        let id = id.to_string();
        match self.delete_in(PatientOrigin::FrontDesk, id.clone()).await {
            Err(HospitalError::NotFound(_)) => self.delete_in(PatientOrigin::Portal, id).await,
            other => other,
        }
    }

    async fn delete_in(&self, origin: PatientOrigin, id: String) -> HospitalResult<()> {
        self.collection(origin)
            .mutate(move |records| {
                let before = records.len();
                records.retain(|p| !p.matches_id(&id));
                if records.len() < before {
                    Ok(())
                } else {
                    Err(HospitalError::NotFound("Patient not found".to_string()))
                }
            })
            .await
    }
}
