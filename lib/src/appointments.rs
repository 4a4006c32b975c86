// lib/src/appointments.rs
//
// The request/appointment state machines.
//
//   (none) --submit--> Pending --approve--> Approved   [creates appointment]
//                      Pending --reject---> Rejected
//                      Pending --cancel---> Cancelled
//
//   Approved --complete--> Completed
//   Approved --cancel----> Cancelled
//
// Approval touches two collections: the request is validated and flipped
// inside the requests critical section, then the appointment is appended to
// its own collection. There is no cross-collection transaction; a failure
// between the two writes leaves an approved request without an appointment.

use std::sync::Arc;

use chrono::NaiveDate;
use log::info;
use models::errors::{HospitalError, HospitalResult};
use models::{
    AppointmentRequest, AppointmentStatus, ApprovedAppointment, IdGenerator, IdKind,
    NewAppointmentRequest, RequestStatus,
};

use crate::collections::Store;
use crate::util;

pub struct AppointmentEngine {
    store: Arc<Store>,
    ids: Arc<dyn IdGenerator>,
}

impl AppointmentEngine {
    pub fn new(store: Arc<Store>, ids: Arc<dyn IdGenerator>) -> Self {
        AppointmentEngine { store, ids }
    }

    /// Submits a request on behalf of a patient. The doctor must resolve to
    /// a roster entry and both preference lists must be non-empty; the
    /// doctor's display name and specialization are denormalized onto the
    /// record.
    pub async fn submit_request(&self, new: NewAppointmentRequest) -> HospitalResult<String> {
        let doctors = self.store.doctors.load().await?;
        let doctor = doctors
            .iter()
            .find(|d| d.username == new.doctor_username)
            .ok_or_else(|| {
                HospitalError::Validation(format!("Unknown doctor '{}'", new.doctor_username))
            })?;
        if new.preferred_dates.is_empty() {
            return Err(HospitalError::Validation(
                "At least one preferred date is required".to_string(),
            ));
        }
        if new.preferred_times.is_empty() {
            return Err(HospitalError::Validation(
                "At least one preferred time is required".to_string(),
            ));
        }

        let request_id = self.ids.mint(IdKind::Request);
        let record = AppointmentRequest {
            request_id: request_id.clone(),
            patient_user_id: new.patient_user_id,
            patient_name: new.patient_name,
            patient_email: new.patient_email,
            patient_mobile: new.patient_mobile,
            doctor_username: doctor.username.clone(),
            doctor_name: doctor.name.clone(),
            specialization: doctor.specialization.clone(),
            reason: new.reason,
            notes: new.notes,
            preferred_dates: new.preferred_dates,
            preferred_times: new.preferred_times,
            status: RequestStatus::Pending,
            request_date: util::today(),
            request_time: util::time_now(),
            rejection_reason: None,
            rejection_date: None,
            cancellation_date: None,
        };

        self.store
            .requests
            .mutate(move |requests| {
                requests.push(record);
                Ok(())
            })
            .await?;
        info!("Appointment request {} submitted", request_id);
        Ok(request_id)
    }

    /// Approves a pending request, creating the scheduled appointment.
    ///
    /// A chosen date/time, when supplied, must come from the request's
    /// preference lists. Only `Pending` requests can be approved; a request
    /// that is unknown or already settled reports `NotFound`, so approving
    /// the same id twice fails the second time.
    pub async fn approve_request(
        &self,
        request_id: &str,
        admin_notes: &str,
        chosen_date: Option<&str>,
        chosen_time: Option<&str>,
    ) -> HospitalResult<String> {
        let appointment_id = self.ids.mint(IdKind::Appointment);
        let lookup_id = request_id.to_string();
        let date = chosen_date.map(str::to_string);
        let time = chosen_time.map(str::to_string);

        let approved = self
            .store
            .requests
            .mutate(move |requests| {
                let request = requests
                    .iter_mut()
                    .find(|r| r.request_id == lookup_id)
                    .ok_or_else(|| HospitalError::NotFound("Request not found".to_string()))?;
                if request.status != RequestStatus::Pending {
                    return Err(HospitalError::NotFound(format!(
                        "No pending request with id {}",
                        lookup_id
                    )));
                }
                if let Some(ref d) = date {
                    if !request.preferred_dates.iter().any(|p| p == d) {
                        return Err(HospitalError::InvalidSelection(format!(
                            "Date '{}' is not among the requested dates",
                            d
                        )));
                    }
                }
                if let Some(ref t) = time {
                    if !request.preferred_times.iter().any(|p| p == t) {
                        return Err(HospitalError::InvalidSelection(format!(
                            "Time '{}' is not among the requested times",
                            t
                        )));
                    }
                }
                request.status = RequestStatus::Approved;
                Ok(request.clone())
            })
            .await?;

        let mut appointment = ApprovedAppointment::from_request(
            &approved,
            appointment_id.clone(),
            util::today(),
            admin_notes.to_string(),
        );
        appointment.appointment_date = chosen_date.map(str::to_string);
        appointment.appointment_time = chosen_time.map(str::to_string);

        self.store
            .appointments
            .mutate(move |appointments| {
                appointments.push(appointment);
                Ok(())
            })
            .await?;
        info!(
            "Request {} approved as appointment {}",
            request_id, appointment_id
        );
        Ok(appointment_id)
    }

    /// Rejects a pending request. The reason is required; an empty reason
    /// fails validation and leaves the request untouched.
    pub async fn reject_request(&self, request_id: &str, reason: &str) -> HospitalResult<()> {
        if reason.trim().is_empty() {
            return Err(HospitalError::Validation(
                "Please provide a reason for rejection".to_string(),
            ));
        }
        let lookup_id = request_id.to_string();
        let reason = reason.to_string();
        self.store
            .requests
            .mutate(move |requests| {
                let request = requests
                    .iter_mut()
                    .find(|r| r.request_id == lookup_id)
                    .ok_or_else(|| HospitalError::NotFound("Request not found".to_string()))?;
                if request.status != RequestStatus::Pending {
                    return Err(HospitalError::InvalidState(format!(
                        "Request {} is already {}",
                        lookup_id, request.status
                    )));
                }
                request.status = RequestStatus::Rejected;
                request.rejection_reason = Some(reason);
                request.rejection_date = Some(util::today());
                Ok(())
            })
            .await
    }

    /// Cancels a request. Only valid while the request is still pending.
    pub async fn cancel_request(&self, request_id: &str) -> HospitalResult<()> {
        let lookup_id = request_id.to_string();
        self.store
            .requests
            .mutate(move |requests| {
                let request = requests
                    .iter_mut()
                    .find(|r| r.request_id == lookup_id)
                    .ok_or_else(|| HospitalError::NotFound("Request not found".to_string()))?;
                if request.status != RequestStatus::Pending {
                    return Err(HospitalError::InvalidState(format!(
                        "Request {} is already {}",
                        lookup_id, request.status
                    )));
                }
                request.status = RequestStatus::Cancelled;
                request.cancellation_date = Some(util::today());
                Ok(())
            })
            .await
    }

    /// Cancels a scheduled appointment. Only valid from `Approved`.
    pub async fn cancel_appointment(
        &self,
        appointment_id: &str,
        reason: &str,
    ) -> HospitalResult<()> {
        let lookup_id = appointment_id.to_string();
        let reason = reason.to_string();
        self.store
            .appointments
            .mutate(move |appointments| {
                let appointment = appointments
                    .iter_mut()
                    .find(|a| a.appointment_id == lookup_id)
                    .ok_or_else(|| HospitalError::NotFound("Appointment not found".to_string()))?;
                if appointment.status != AppointmentStatus::Approved {
                    return Err(HospitalError::InvalidState(format!(
                        "Appointment {} is already {}",
                        lookup_id, appointment.status
                    )));
                }
                appointment.status = AppointmentStatus::Cancelled;
                appointment.cancellation_reason = Some(reason);
                appointment.cancellation_date = Some(util::today());
                Ok(())
            })
            .await
    }

    /// Marks a scheduled appointment as completed. Only valid from
    /// `Approved`.
    pub async fn complete_appointment(
        &self,
        appointment_id: &str,
        notes: &str,
    ) -> HospitalResult<()> {
        let lookup_id = appointment_id.to_string();
        let notes = notes.to_string();
        self.store
            .appointments
            .mutate(move |appointments| {
                let appointment = appointments
                    .iter_mut()
                    .find(|a| a.appointment_id == lookup_id)
                    .ok_or_else(|| HospitalError::NotFound("Appointment not found".to_string()))?;
                if appointment.status != AppointmentStatus::Approved {
                    return Err(HospitalError::InvalidState(format!(
                        "Appointment {} is already {}",
                        lookup_id, appointment.status
                    )));
                }
                appointment.status = AppointmentStatus::Completed;
                appointment.completion_notes = Some(notes);
                appointment.completion_date = Some(util::today());
                Ok(())
            })
            .await
    }

    // --- Queries ---

    pub async fn all_requests(&self) -> HospitalResult<Vec<AppointmentRequest>> {
        self.store.requests.load().await
    }

    pub async fn requests_for_doctor(
        &self,
        doctor_username: &str,
    ) -> HospitalResult<Vec<AppointmentRequest>> {
        let requests = self.store.requests.load().await?;
        Ok(requests
            .into_iter()
            .filter(|r| r.doctor_username == doctor_username)
            .collect())
    }

    pub async fn requests_for_patient(
        &self,
        patient_user_id: &str,
    ) -> HospitalResult<Vec<AppointmentRequest>> {
        let requests = self.store.requests.load().await?;
        Ok(requests
            .into_iter()
            .filter(|r| r.patient_user_id == patient_user_id)
            .collect())
    }

    pub async fn all_appointments(&self) -> HospitalResult<Vec<ApprovedAppointment>> {
        self.store.appointments.load().await
    }

    pub async fn appointments_for_patient(
        &self,
        patient_user_id: &str,
    ) -> HospitalResult<Vec<ApprovedAppointment>> {
        let appointments = self.store.appointments.load().await?;
        Ok(appointments
            .into_iter()
            .filter(|a| a.patient_user_id == patient_user_id)
            .collect())
    }

    /// A doctor's working schedule: appointments still in `Approved`, sorted
    /// ascending by appointment date. Same-day entries keep their insertion
    /// order; undated entries sort last.
    pub async fn schedule_for_doctor(
        &self,
        doctor_username: &str,
    ) -> HospitalResult<Vec<ApprovedAppointment>> {
        let appointments = self.store.appointments.load().await?;
        let mut schedule: Vec<ApprovedAppointment> = appointments
            .into_iter()
            .filter(|a| {
                a.doctor_username == doctor_username && a.status == AppointmentStatus::Approved
            })
            .collect();
        schedule.sort_by_key(appointment_date_key);
        Ok(schedule)
    }
}

fn appointment_date_key(appointment: &ApprovedAppointment) -> (bool, Option<NaiveDate>) {
    let parsed = appointment
        .appointment_date
        .as_deref()
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());
    (parsed.is_none(), parsed)
}

#[cfg(test)]
mod tests {
    use super::AppointmentEngine;
    use crate::collections::Store;
    use crate::storage_engine::InMemoryStorage;
    use models::errors::HospitalError;
    use models::{
        AppointmentStatus, Doctor, NewAppointmentRequest, RequestStatus, SequentialIdGenerator,
    };
    use std::sync::Arc;

    async fn engine() -> AppointmentEngine {
        let store = Arc::new(Store::new(Arc::new(InMemoryStorage::new())));
        store
            .doctors
            .store(&[Doctor {
                username: "doctor1".to_string(),
                password: "doc123".to_string(),
                name: "Dr. Sharma".to_string(),
                specialization: "Cardiology".to_string(),
            }])
            .await
            .unwrap();
        AppointmentEngine::new(store, Arc::new(SequentialIdGenerator::new()))
    }

    fn request(doctor: &str) -> NewAppointmentRequest {
        NewAppointmentRequest {
            patient_user_id: "PAT000000".to_string(),
            patient_name: "Asha Rao".to_string(),
            patient_email: "asha@example.com".to_string(),
            patient_mobile: "5550001111".to_string(),
            doctor_username: doctor.to_string(),
            reason: "Chest pain".to_string(),
            notes: "Prefers mornings".to_string(),
            preferred_dates: vec!["2024-06-01".to_string(), "2024-06-02".to_string()],
            preferred_times: vec!["10:00".to_string(), "14:00".to_string()],
        }
    }

    #[tokio::test]
    async fn submitted_requests_start_pending_with_unique_ids() {
        let engine = engine().await;
        let first = engine.submit_request(request("doctor1")).await.unwrap();
        let second = engine.submit_request(request("doctor1")).await.unwrap();
        assert_ne!(first, second);

        let requests = engine.all_requests().await.unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|r| r.status == RequestStatus::Pending));
        assert_eq!(requests[0].doctor_name, "Dr. Sharma");
        assert_eq!(requests[0].specialization, "Cardiology");
        assert!(!requests[0].request_date.is_empty());
    }

    #[tokio::test]
    async fn submit_requires_a_known_doctor_and_preferences() {
        let engine = engine().await;

        let unknown = engine.submit_request(request("doctor9")).await;
        assert!(matches!(unknown, Err(HospitalError::Validation(_))));

        let mut no_dates = request("doctor1");
        no_dates.preferred_dates.clear();
        assert!(matches!(
            engine.submit_request(no_dates).await,
            Err(HospitalError::Validation(_))
        ));

        let mut no_times = request("doctor1");
        no_times.preferred_times.clear();
        assert!(matches!(
            engine.submit_request(no_times).await,
            Err(HospitalError::Validation(_))
        ));

        assert!(engine.all_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn approval_creates_one_appointment_and_flips_the_request() {
        let engine = engine().await;
        let request_id = engine.submit_request(request("doctor1")).await.unwrap();

        let appointment_id = engine
            .approve_request(&request_id, "Approved by Dr. Sharma", None, None)
            .await
            .unwrap();

        let appointments = engine.all_appointments().await.unwrap();
        assert_eq!(appointments.len(), 1);
        assert_eq!(appointments[0].appointment_id, appointment_id);
        assert_eq!(appointments[0].request_id, request_id);
        assert_eq!(appointments[0].status, AppointmentStatus::Approved);
        assert_eq!(appointments[0].admin_notes, "Approved by Dr. Sharma");

        let requests = engine.all_requests().await.unwrap();
        assert_eq!(requests[0].status, RequestStatus::Approved);
    }

    #[tokio::test]
    async fn approving_twice_fails_the_second_time() {
        let engine = engine().await;
        let request_id = engine.submit_request(request("doctor1")).await.unwrap();
        engine
            .approve_request(&request_id, "", None, None)
            .await
            .unwrap();

        let again = engine.approve_request(&request_id, "", None, None).await;
        assert!(matches!(again, Err(HospitalError::NotFound(_))));
        assert_eq!(engine.all_appointments().await.unwrap().len(), 1);

        let unknown = engine.approve_request("REQ999999", "", None, None).await;
        assert!(matches!(unknown, Err(HospitalError::NotFound(_))));
    }

    #[tokio::test]
    async fn approval_with_a_chosen_date_and_time_schedules_them() {
        let engine = engine().await;
        let mut submission = request("doctor1");
        submission.preferred_dates = vec!["2024-06-01".to_string()];
        submission.preferred_times = vec!["10:00".to_string()];
        let request_id = engine.submit_request(submission).await.unwrap();

        engine
            .approve_request(&request_id, "ok", Some("2024-06-01"), Some("10:00"))
            .await
            .unwrap();

        let appointments = engine.all_appointments().await.unwrap();
        assert_eq!(appointments.len(), 1);
        assert_eq!(appointments[0].status, AppointmentStatus::Approved);
        assert_eq!(appointments[0].appointment_date.as_deref(), Some("2024-06-01"));
        assert_eq!(appointments[0].appointment_time.as_deref(), Some("10:00"));
        assert_eq!(
            engine.all_requests().await.unwrap()[0].status,
            RequestStatus::Approved
        );
    }

    #[tokio::test]
    async fn a_selection_outside_the_preferences_writes_nothing() {
        let engine = engine().await;
        let request_id = engine.submit_request(request("doctor1")).await.unwrap();

        let bad_date = engine
            .approve_request(&request_id, "", Some("2024-07-01"), None)
            .await;
        assert!(matches!(bad_date, Err(HospitalError::InvalidSelection(_))));

        let bad_time = engine
            .approve_request(&request_id, "", None, Some("23:00"))
            .await;
        assert!(matches!(bad_time, Err(HospitalError::InvalidSelection(_))));

        assert!(engine.all_appointments().await.unwrap().is_empty());
        assert_eq!(
            engine.all_requests().await.unwrap()[0].status,
            RequestStatus::Pending
        );
    }

    #[tokio::test]
    async fn rejection_requires_a_reason() {
        let engine = engine().await;
        let request_id = engine.submit_request(request("doctor1")).await.unwrap();

        let empty = engine.reject_request(&request_id, "   ").await;
        assert!(matches!(empty, Err(HospitalError::Validation(_))));
        assert_eq!(
            engine.all_requests().await.unwrap()[0].status,
            RequestStatus::Pending
        );

        engine
            .reject_request(&request_id, "No availability")
            .await
            .unwrap();
        let requests = engine.all_requests().await.unwrap();
        assert_eq!(requests[0].status, RequestStatus::Rejected);
        assert_eq!(
            requests[0].rejection_reason.as_deref(),
            Some("No availability")
        );
        assert!(requests[0].rejection_date.is_some());

        let again = engine.reject_request(&request_id, "again").await;
        assert!(matches!(again, Err(HospitalError::InvalidState(_))));

        let unknown = engine.reject_request("REQ999999", "reason").await;
        assert!(matches!(unknown, Err(HospitalError::NotFound(_))));
    }

    #[tokio::test]
    async fn cancel_request_is_only_valid_while_pending() {
        let engine = engine().await;
        let request_id = engine.submit_request(request("doctor1")).await.unwrap();
        engine.cancel_request(&request_id).await.unwrap();
        let requests = engine.all_requests().await.unwrap();
        assert_eq!(requests[0].status, RequestStatus::Cancelled);
        assert!(requests[0].cancellation_date.is_some());

        let again = engine.cancel_request(&request_id).await;
        assert!(matches!(again, Err(HospitalError::InvalidState(_))));

        let approved_id = engine.submit_request(request("doctor1")).await.unwrap();
        engine
            .approve_request(&approved_id, "", None, None)
            .await
            .unwrap();
        let after_approval = engine.cancel_request(&approved_id).await;
        assert!(matches!(after_approval, Err(HospitalError::InvalidState(_))));
    }

    #[tokio::test]
    async fn appointments_only_leave_approved_once() {
        let engine = engine().await;
        let request_id = engine.submit_request(request("doctor1")).await.unwrap();
        let appointment_id = engine
            .approve_request(&request_id, "", None, None)
            .await
            .unwrap();

        engine
            .complete_appointment(&appointment_id, "Follow up in two weeks")
            .await
            .unwrap();
        let appointments = engine.all_appointments().await.unwrap();
        assert_eq!(appointments[0].status, AppointmentStatus::Completed);
        assert_eq!(
            appointments[0].completion_notes.as_deref(),
            Some("Follow up in two weeks")
        );

        let cancel_completed = engine
            .cancel_appointment(&appointment_id, "changed plans")
            .await;
        assert!(matches!(
            cancel_completed,
            Err(HospitalError::InvalidState(_))
        ));

        let second_request = engine.submit_request(request("doctor1")).await.unwrap();
        let second = engine
            .approve_request(&second_request, "", None, None)
            .await
            .unwrap();
        engine
            .cancel_appointment(&second, "Cancelled by patient")
            .await
            .unwrap();
        let complete_cancelled = engine.complete_appointment(&second, "notes").await;
        assert!(matches!(
            complete_cancelled,
            Err(HospitalError::InvalidState(_))
        ));

        let unknown = engine.cancel_appointment("APT999999", "reason").await;
        assert!(matches!(unknown, Err(HospitalError::NotFound(_))));
    }

    #[tokio::test]
    async fn schedule_sorts_by_date_and_keeps_insertion_order_on_ties() {
        let engine = engine().await;
        // Three approvals on two dates; the two same-day entries must keep
        // their approval order.
        for (date, time) in [
            ("2024-06-02", "10:00"),
            ("2024-06-01", "10:00"),
            ("2024-06-02", "14:00"),
        ] {
            let mut submission = request("doctor1");
            submission.preferred_dates = vec![date.to_string()];
            submission.preferred_times = vec![time.to_string()];
            let id = engine.submit_request(submission).await.unwrap();
            engine
                .approve_request(&id, "", Some(date), Some(time))
                .await
                .unwrap();
        }

        let schedule = engine.schedule_for_doctor("doctor1").await.unwrap();
        let listed: Vec<(&str, &str)> = schedule
            .iter()
            .map(|a| {
                (
                    a.appointment_date.as_deref().unwrap(),
                    a.appointment_time.as_deref().unwrap(),
                )
            })
            .collect();
        assert_eq!(
            listed,
            vec![
                ("2024-06-01", "10:00"),
                ("2024-06-02", "10:00"),
                ("2024-06-02", "14:00"),
            ]
        );

        // Cancelled appointments drop off the schedule.
        let victim = schedule[0].appointment_id.clone();
        engine.cancel_appointment(&victim, "sick").await.unwrap();
        assert_eq!(engine.schedule_for_doctor("doctor1").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn queries_scope_by_doctor_and_patient() {
        let engine = engine().await;
        engine.submit_request(request("doctor1")).await.unwrap();
        let mut other = request("doctor1");
        other.patient_user_id = "PAT000099".to_string();
        engine.submit_request(other).await.unwrap();

        assert_eq!(engine.requests_for_doctor("doctor1").await.unwrap().len(), 2);
        assert_eq!(engine.requests_for_doctor("doctor2").await.unwrap().len(), 0);
        assert_eq!(
            engine.requests_for_patient("PAT000099").await.unwrap().len(),
            1
        );
    }
}
