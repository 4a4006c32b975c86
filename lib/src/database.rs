// lib/src/database.rs

use std::sync::Arc;

use log::{debug, info};
use models::errors::HospitalResult;
use models::{
    AppointmentRequest, ApprovedAppointment, AvailabilitySlot, ClockIdGenerator, Credentials,
    Doctor, IdGenerator, NewAppointmentRequest, NewPatient, NewSlot, PatientOrigin, PatientPatch,
    PatientRecord, Role, Session,
};

use crate::appointments::AppointmentEngine;
use crate::availability::AvailabilityLedger;
use crate::collections::Store;
use crate::config::{HospitalConfig, SeedConfig};
use crate::identity::IdentityStore;
use crate::patients::PatientRegistry;
use crate::storage_engine::{create_storage, StorageEngine};

/// The front-desk engine behind one storage instance. The presentation layer
/// calls these methods and renders the returned values; nothing here touches
/// a display surface.
pub struct HospitalDatabase {
    storage: Arc<dyn StorageEngine>,
    store: Arc<Store>,
    identity: IdentityStore,
    patients: PatientRegistry,
    availability: AvailabilityLedger,
    appointments: AppointmentEngine,
}

impl HospitalDatabase {
    /// Opens storage per the configuration, seeds missing collections, and
    /// wires the components together.
    pub async fn open(config: HospitalConfig) -> HospitalResult<Self> {
        Self::open_with_generator(config, Arc::new(ClockIdGenerator::new())).await
    }

    /// Like `open`, with an injected id generator. Tests pass a
    /// deterministic one.
    pub async fn open_with_generator(
        config: HospitalConfig,
        ids: Arc<dyn IdGenerator>,
    ) -> HospitalResult<Self> {
        let storage = create_storage(&config)?;
        storage.connect().await?;
        let store = Arc::new(Store::new(storage.clone()));
        seed(&store, &config.seed).await?;
        info!("Hospital database ready");
        Ok(HospitalDatabase {
            storage,
            store: store.clone(),
            identity: IdentityStore::new(store.clone()),
            patients: PatientRegistry::new(store.clone(), ids.clone()),
            availability: AvailabilityLedger::new(store.clone(), ids.clone()),
            appointments: AppointmentEngine::new(store, ids),
        })
    }

    pub async fn flush(&self) -> HospitalResult<()> {
        self.storage.flush().await
    }

    // --- Identity ---

    pub async fn authenticate(
        &self,
        role: Role,
        credentials: &Credentials,
    ) -> HospitalResult<Session> {
        self.identity.authenticate(role, credentials).await
    }

    pub async fn current_session(&self) -> Option<Session> {
        self.identity.current_session().await
    }

    pub async fn end_session(&self) {
        self.identity.end_session().await
    }

    pub async fn all_doctors(&self) -> HospitalResult<Vec<Doctor>> {
        self.store.doctors.load().await
    }

    // --- Patient registry ---

    pub async fn register_patient(
        &self,
        origin: PatientOrigin,
        patient: NewPatient,
    ) -> HospitalResult<String> {
        self.patients.register(origin, patient).await
    }

    pub async fn all_patients(&self, origin: PatientOrigin) -> HospitalResult<Vec<PatientRecord>> {
        self.patients.get_all(origin).await
    }

    pub async fn patient_by_id(&self, id: &str) -> HospitalResult<Option<PatientRecord>> {
        self.patients.get_by_id(id).await
    }

    pub async fn search_patients(&self, term: &str) -> HospitalResult<Vec<PatientRecord>> {
        self.patients.search(term).await
    }

    pub async fn update_patient(&self, id: &str, patch: PatientPatch) -> HospitalResult<()> {
        self.patients.update(id, patch).await
    }

    pub async fn delete_patient(&self, id: &str) -> HospitalResult<()> {
        self.patients.delete(id).await
    }

    // --- Availability ledger ---

    pub async fn add_availability_slot(
        &self,
        doctor_username: &str,
        slot: NewSlot,
    ) -> HospitalResult<String> {
        self.availability.add_slot(doctor_username, slot).await
    }

    pub async fn availability_for_doctor(
        &self,
        doctor_username: &str,
    ) -> HospitalResult<Vec<AvailabilitySlot>> {
        self.availability.list_slots(doctor_username).await
    }

    pub async fn all_availability(&self) -> HospitalResult<Vec<AvailabilitySlot>> {
        self.availability.list_all_slots().await
    }

    pub async fn remove_availability_slot(&self, slot_id: &str) -> HospitalResult<()> {
        self.availability.remove_slot(slot_id).await
    }

    // --- Appointment workflow ---

    pub async fn submit_appointment_request(
        &self,
        request: NewAppointmentRequest,
    ) -> HospitalResult<String> {
        self.appointments.submit_request(request).await
    }

    pub async fn approve_appointment_request(
        &self,
        request_id: &str,
        admin_notes: &str,
        chosen_date: Option<&str>,
        chosen_time: Option<&str>,
    ) -> HospitalResult<String> {
        self.appointments
            .approve_request(request_id, admin_notes, chosen_date, chosen_time)
            .await
    }

    pub async fn reject_appointment_request(
        &self,
        request_id: &str,
        reason: &str,
    ) -> HospitalResult<()> {
        self.appointments.reject_request(request_id, reason).await
    }

    pub async fn cancel_appointment_request(&self, request_id: &str) -> HospitalResult<()> {
        self.appointments.cancel_request(request_id).await
    }

    pub async fn cancel_appointment(
        &self,
        appointment_id: &str,
        reason: &str,
    ) -> HospitalResult<()> {
        self.appointments
            .cancel_appointment(appointment_id, reason)
            .await
    }

    pub async fn complete_appointment(
        &self,
        appointment_id: &str,
        notes: &str,
    ) -> HospitalResult<()> {
        self.appointments
            .complete_appointment(appointment_id, notes)
            .await
    }

    pub async fn all_appointment_requests(&self) -> HospitalResult<Vec<AppointmentRequest>> {
        self.appointments.all_requests().await
    }

    pub async fn appointment_requests_for_doctor(
        &self,
        doctor_username: &str,
    ) -> HospitalResult<Vec<AppointmentRequest>> {
        self.appointments.requests_for_doctor(doctor_username).await
    }

    pub async fn appointment_requests_for_patient(
        &self,
        patient_user_id: &str,
    ) -> HospitalResult<Vec<AppointmentRequest>> {
        self.appointments
            .requests_for_patient(patient_user_id)
            .await
    }

    pub async fn all_appointments(&self) -> HospitalResult<Vec<ApprovedAppointment>> {
        self.appointments.all_appointments().await
    }

    pub async fn appointments_for_patient(
        &self,
        patient_user_id: &str,
    ) -> HospitalResult<Vec<ApprovedAppointment>> {
        self.appointments
            .appointments_for_patient(patient_user_id)
            .await
    }

    pub async fn schedule_for_doctor(
        &self,
        doctor_username: &str,
    ) -> HospitalResult<Vec<ApprovedAppointment>> {
        self.appointments.schedule_for_doctor(doctor_username).await
    }
}

/// Creates any missing collection, mirroring first-run initialization: the
/// admin record and doctor roster come from the seed configuration, every
/// other collection starts empty. Existing data is never overwritten.
async fn seed(store: &Store, seed: &SeedConfig) -> HospitalResult<()> {
    if store.admin.load().await?.is_none() {
        debug!("Seeding admin account");
        store.admin.store(&seed.admin).await?;
    }
    if !store.doctors.exists().await? {
        debug!("Seeding doctor roster ({} entries)", seed.doctors.len());
        store.doctors.store(&seed.doctors).await?;
    }
    if !store.front_desk_patients.exists().await? {
        store.front_desk_patients.store(&[]).await?;
    }
    if !store.portal_patients.exists().await? {
        store.portal_patients.store(&[]).await?;
    }
    if !store.slots.exists().await? {
        store.slots.store(&[]).await?;
    }
    if !store.requests.exists().await? {
        store.requests.store(&[]).await?;
    }
    if !store.appointments.exists().await? {
        store.appointments.store(&[]).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::HospitalDatabase;
    use crate::config::HospitalConfig;
    use models::{
        NewAppointmentRequest, NewPatient, NewSlot, PatientOrigin, SequentialIdGenerator,
    };
    use std::sync::Arc;
    use tempfile::TempDir;

    async fn in_memory_db() -> HospitalDatabase {
        HospitalDatabase::open_with_generator(
            HospitalConfig::in_memory(),
            Arc::new(SequentialIdGenerator::new()),
        )
        .await
        .unwrap()
    }

    fn portal_patient(email: &str, mobile: &str) -> NewPatient {
        NewPatient {
            full_name: "Asha Rao".to_string(),
            age: 34,
            gender: "Female".to_string(),
            blood_group: "O+".to_string(),
            email: email.to_string(),
            mobile_number: mobile.to_string(),
            password: Some("secret1".to_string()),
            address: None,
            city: None,
            state: None,
            zip_code: None,
            medical_history: None,
            allergies: None,
            medications: None,
            surgeries: None,
            emergency_contact: None,
            emergency_phone: None,
        }
    }

    fn request_for(doctor: &str, dates: &[&str], times: &[&str]) -> NewAppointmentRequest {
        NewAppointmentRequest {
            patient_user_id: "PAT000000".to_string(),
            patient_name: "Asha Rao".to_string(),
            patient_email: "asha@example.com".to_string(),
            patient_mobile: "5550001111".to_string(),
            doctor_username: doctor.to_string(),
            reason: "Checkup".to_string(),
            notes: String::new(),
            preferred_dates: dates.iter().map(|s| s.to_string()).collect(),
            preferred_times: times.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn open_seeds_the_default_roster() {
        let db = in_memory_db().await;
        let doctors = db.all_doctors().await.unwrap();
        assert_eq!(doctors.len(), 4);
        assert_eq!(doctors[0].username, "doctor1");
        assert!(db.all_patients(PatientOrigin::Portal).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn reopening_a_database_preserves_data_and_reseeds_nothing() {
        let dir = TempDir::new().unwrap();
        let submitted;
        {
            let db = HospitalDatabase::open_with_generator(
                HospitalConfig::sled_at(dir.path()),
                Arc::new(SequentialIdGenerator::new()),
            )
            .await
            .unwrap();
            db.register_patient(PatientOrigin::Portal, portal_patient("a@example.com", "1"))
                .await
                .unwrap();
            submitted = db
                .submit_appointment_request(request_for(
                    "doctor1",
                    &["2024-06-01", "2024-06-02"],
                    &["10:00"],
                ))
                .await
                .unwrap();
            db.flush().await.unwrap();
        }

        let db = HospitalDatabase::open(HospitalConfig::sled_at(dir.path()))
            .await
            .unwrap();
        let patients = db.all_patients(PatientOrigin::Portal).await.unwrap();
        assert_eq!(patients.len(), 1);

        let requests = db.all_appointment_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].request_id, submitted);
        assert_eq!(
            requests[0].preferred_dates,
            vec!["2024-06-01".to_string(), "2024-06-02".to_string()]
        );
        assert_eq!(requests[0].preferred_times, vec!["10:00".to_string()]);
        assert_eq!(db.all_doctors().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn stored_requests_round_trip_verbatim_in_order() {
        let db = in_memory_db().await;
        let mut ids = Vec::new();
        for i in 0..5 {
            let request = request_for(
                "doctor1",
                &["2024-06-01", "2024-06-02", "2024-06-03"],
                &["09:00", &format!("1{}:30", i)],
            );
            ids.push(db.submit_appointment_request(request).await.unwrap());
        }

        let stored = db.all_appointment_requests().await.unwrap();
        assert_eq!(stored.len(), 5);
        for (i, request) in stored.iter().enumerate() {
            assert_eq!(request.request_id, ids[i]);
            assert_eq!(request.preferred_dates.len(), 3);
            assert_eq!(request.preferred_times[1], format!("1{}:30", i));
        }
    }

    #[tokio::test]
    async fn capacity_is_not_enforced_against_approvals() {
        let db = in_memory_db().await;
        // One bookable appointment in the window...
        db.add_availability_slot(
            "doctor1",
            NewSlot {
                date: "2024-06-01".to_string(),
                start_time: "09:00".to_string(),
                end_time: "10:00".to_string(),
                slots_per_hour: 1,
            },
        )
        .await
        .unwrap();

        // ...yet two approvals for that date both succeed, and the slot's
        // booked counter never moves.
        for _ in 0..2 {
            let id = db
                .submit_appointment_request(request_for("doctor1", &["2024-06-01"], &["09:00"]))
                .await
                .unwrap();
            db.approve_appointment_request(&id, "", Some("2024-06-01"), Some("09:00"))
                .await
                .unwrap();
        }

        assert_eq!(db.schedule_for_doctor("doctor1").await.unwrap().len(), 2);
        let slots = db.availability_for_doctor("doctor1").await.unwrap();
        assert_eq!(slots[0].max_capacity, 1);
        assert_eq!(slots[0].booked_slots, 0);
    }
}
