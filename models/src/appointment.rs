// models/src/appointment.rs

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle of a patient-submitted request. `Pending` is the only state
/// with outgoing transitions; the other three are terminal.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl RequestStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Approved => "Approved",
            RequestStatus::Rejected => "Rejected",
            RequestStatus::Cancelled => "Cancelled",
        };
        write!(f, "{}", s)
    }
}

/// Lifecycle of the scheduled artifact derived from an approved request.
/// `Approved` is the only state with outgoing transitions.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Approved,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, AppointmentStatus::Approved)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppointmentStatus::Approved => "Approved",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Cancelled => "Cancelled",
        };
        write!(f, "{}", s)
    }
}

/// A patient's appointment ask, pre-approval. Patient and doctor display
/// fields are denormalized onto the record at submission so lists render
/// without cross-collection lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    pub request_id: String,
    pub patient_user_id: String,
    pub patient_name: String,
    pub patient_email: String,
    pub patient_mobile: String,
    pub doctor_username: String,
    pub doctor_name: String,
    pub specialization: String,
    pub reason: String,
    pub notes: String,
    pub preferred_dates: Vec<String>,
    pub preferred_times: Vec<String>,
    pub status: RequestStatus,
    pub request_date: String,
    pub request_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancellation_date: Option<String>,
}

/// Submission input for the workflow engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointmentRequest {
    pub patient_user_id: String,
    pub patient_name: String,
    pub patient_email: String,
    pub patient_mobile: String,
    pub doctor_username: String,
    pub reason: String,
    #[serde(default)]
    pub notes: String,
    pub preferred_dates: Vec<String>,
    pub preferred_times: Vec<String>,
}

/// The approved, scheduled artifact. Carries a fresh identifier plus a
/// back-reference to the originating request; every request field is copied
/// over at approval time. `appointment_date`/`appointment_time` are only set
/// when the approver picked a concrete value from the preference lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovedAppointment {
    pub appointment_id: String,
    pub request_id: String,
    pub patient_user_id: String,
    pub patient_name: String,
    pub patient_email: String,
    pub patient_mobile: String,
    pub doctor_username: String,
    pub doctor_name: String,
    pub specialization: String,
    pub reason: String,
    pub notes: String,
    pub preferred_dates: Vec<String>,
    pub preferred_times: Vec<String>,
    pub status: AppointmentStatus,
    pub approval_date: String,
    pub admin_notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointment_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointment_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancellation_date: Option<String>,
}

impl ApprovedAppointment {
    /// Builds the appointment from an approved request, copying every
    /// request field verbatim.
    pub fn from_request(
        request: &AppointmentRequest,
        appointment_id: String,
        approval_date: String,
        admin_notes: String,
    ) -> Self {
        ApprovedAppointment {
            appointment_id,
            request_id: request.request_id.clone(),
            patient_user_id: request.patient_user_id.clone(),
            patient_name: request.patient_name.clone(),
            patient_email: request.patient_email.clone(),
            patient_mobile: request.patient_mobile.clone(),
            doctor_username: request.doctor_username.clone(),
            doctor_name: request.doctor_name.clone(),
            specialization: request.specialization.clone(),
            reason: request.reason.clone(),
            notes: request.notes.clone(),
            preferred_dates: request.preferred_dates.clone(),
            preferred_times: request.preferred_times.clone(),
            status: AppointmentStatus::Approved,
            approval_date,
            admin_notes,
            appointment_date: None,
            appointment_time: None,
            completion_notes: None,
            completion_date: None,
            cancellation_reason: None,
            cancellation_date: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AppointmentStatus, RequestStatus};

    #[test]
    fn pending_is_the_only_open_request_state() {
        assert!(!RequestStatus::Pending.is_terminal());
        assert!(RequestStatus::Approved.is_terminal());
        assert!(RequestStatus::Rejected.is_terminal());
        assert!(RequestStatus::Cancelled.is_terminal());
    }

    #[test]
    fn statuses_serialize_as_display_strings() {
        assert_eq!(
            serde_json::to_string(&RequestStatus::Pending).unwrap(),
            "\"Pending\""
        );
        assert_eq!(
            serde_json::to_string(&AppointmentStatus::Completed).unwrap(),
            "\"Completed\""
        );
    }
}
