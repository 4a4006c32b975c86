// lib/src/collections.rs
//
// Typed views over the storage substrate. Each collection is one JSON blob
// under one key, loaded in full and written back in full; every engine
// operation is one such cycle.

use std::marker::PhantomData;
use std::sync::Arc;

use models::errors::HospitalResult;
use models::{
    AdminAccount, AppointmentRequest, ApprovedAppointment, AvailabilitySlot, Doctor, PatientRecord,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::storage_engine::StorageEngine;

/// Storage keys of the seven persisted collections.
pub mod keys {
    pub const HOSPITAL_ADMIN: &str = "hospitalAdmin";
    pub const HOSPITAL_DOCTORS: &str = "hospitalDoctors";
    pub const HOSPITAL_PATIENTS: &str = "hospitalPatients";
    pub const PATIENT_USERS: &str = "patientUsers";
    pub const DOCTOR_AVAILABILITY: &str = "doctorAvailability";
    pub const APPOINTMENT_REQUESTS: &str = "appointmentRequests";
    pub const APPROVED_APPOINTMENTS: &str = "approvedAppointments";
}

/// A list-of-records collection. `mutate` serializes every
/// read-modify-write cycle behind a per-collection mutex; the lock is
/// released on all exit paths, and a failing mutation leaves the stored
/// collection untouched.
#[derive(Debug)]
pub struct Collection<T> {
    name: &'static str,
    storage: Arc<dyn StorageEngine>,
    guard: Mutex<()>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(name: &'static str, storage: Arc<dyn StorageEngine>) -> Self {
        Collection {
            name,
            storage,
            guard: Mutex::new(()),
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Reads the entire collection; a missing key reads as empty.
    pub async fn load(&self) -> HospitalResult<Vec<T>> {
        match self.storage.retrieve(self.name.as_bytes()).await? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(Vec::new()),
        }
    }

    /// Writes the entire collection back.
    pub async fn store(&self, records: &[T]) -> HospitalResult<()> {
        let bytes = serde_json::to_vec(records)?;
        self.storage.insert(self.name.as_bytes(), &bytes).await
    }

    pub async fn exists(&self) -> HospitalResult<bool> {
        Ok(self.storage.retrieve(self.name.as_bytes()).await?.is_some())
    }

    /// Runs one read → mutate → write cycle as a critical section. When the
    /// closure errors, the write is skipped and the error propagates.
    pub async fn mutate<F, R>(&self, op: F) -> HospitalResult<R>
    where
        F: FnOnce(&mut Vec<T>) -> HospitalResult<R>,
    {
        let _guard = self.guard.lock().await;
        let mut records = self.load().await?;
        let out = op(&mut records)?;
        self.store(&records).await?;
        Ok(out)
    }
}

/// A single-record collection; the admin credential record is the only one.
#[derive(Debug)]
pub struct Singleton<T> {
    name: &'static str,
    storage: Arc<dyn StorageEngine>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Singleton<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(name: &'static str, storage: Arc<dyn StorageEngine>) -> Self {
        Singleton {
            name,
            storage,
            _marker: PhantomData,
        }
    }

    pub async fn load(&self) -> HospitalResult<Option<T>> {
        match self.storage.retrieve(self.name.as_bytes()).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    pub async fn store(&self, record: &T) -> HospitalResult<()> {
        let bytes = serde_json::to_vec(record)?;
        self.storage.insert(self.name.as_bytes(), &bytes).await
    }
}

/// All seven collections over one storage engine. Components share a single
/// `Store` so each collection has exactly one write lock.
#[derive(Debug)]
pub struct Store {
    pub admin: Singleton<AdminAccount>,
    pub doctors: Collection<Doctor>,
    pub front_desk_patients: Collection<PatientRecord>,
    pub portal_patients: Collection<PatientRecord>,
    pub slots: Collection<AvailabilitySlot>,
    pub requests: Collection<AppointmentRequest>,
    pub appointments: Collection<ApprovedAppointment>,
}

impl Store {
    pub fn new(storage: Arc<dyn StorageEngine>) -> Self {
        Store {
            admin: Singleton::new(keys::HOSPITAL_ADMIN, storage.clone()),
            doctors: Collection::new(keys::HOSPITAL_DOCTORS, storage.clone()),
            front_desk_patients: Collection::new(keys::HOSPITAL_PATIENTS, storage.clone()),
            portal_patients: Collection::new(keys::PATIENT_USERS, storage.clone()),
            slots: Collection::new(keys::DOCTOR_AVAILABILITY, storage.clone()),
            requests: Collection::new(keys::APPOINTMENT_REQUESTS, storage.clone()),
            appointments: Collection::new(keys::APPROVED_APPOINTMENTS, storage),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Collection;
    use crate::storage_engine::InMemoryStorage;
    use models::errors::HospitalError;
    use std::sync::Arc;

    fn collection() -> Collection<String> {
        Collection::new("testRecords", Arc::new(InMemoryStorage::new()))
    }

    #[tokio::test]
    async fn missing_collection_loads_as_empty() {
        let records = collection();
        assert!(records.load().await.unwrap().is_empty());
        assert!(!records.exists().await.unwrap());
    }

    #[tokio::test]
    async fn mutate_persists_the_closure_result() {
        let records = collection();
        records
            .mutate(|items| {
                items.push("first".to_string());
                Ok(())
            })
            .await
            .unwrap();
        assert_eq!(records.load().await.unwrap(), vec!["first".to_string()]);
    }

    #[tokio::test]
    async fn failed_mutation_leaves_the_collection_unchanged() {
        let records = collection();
        records.store(&["kept".to_string()]).await.unwrap();

        let result = records
            .mutate(|items| {
                items.clear();
                Err::<(), _>(HospitalError::Validation("refused".to_string()))
            })
            .await;

        assert!(matches!(result, Err(HospitalError::Validation(_))));
        assert_eq!(records.load().await.unwrap(), vec!["kept".to_string()]);
    }
}
