// models/src/patient.rs

use serde::{Deserialize, Serialize};

/// Which door a patient record came through. Front-desk records are entered
/// by the admin and carry `patientId`; portal records are self-registered and
/// carry `patientUserId`. The two variants are stored in separate
/// collections.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum PatientOrigin {
    FrontDesk,
    Portal,
}

/// A stored patient record. The wire names match the persisted collection
/// schema, so data written by an earlier deployment reads back unchanged.
/// Exactly one of `patient_id` / `patient_user_id` is set, according to the
/// record's origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_user_id: Option<String>,
    pub full_name: String,
    pub age: u32,
    pub gender: String,
    pub blood_group: String,
    pub email: String,
    pub mobile_number: String,
    /// Portal accounts only; compared verbatim at login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allergies: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medications: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surgeries: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_phone: Option<String>,
    pub registration_date: String,
}

impl PatientRecord {
    /// The record's identifier, whichever variant field carries it.
    pub fn id(&self) -> Option<&str> {
        self.patient_id
            .as_deref()
            .or(self.patient_user_id.as_deref())
    }

    pub fn origin(&self) -> PatientOrigin {
        if self.patient_id.is_some() {
            PatientOrigin::FrontDesk
        } else {
            PatientOrigin::Portal
        }
    }

    pub fn matches_id(&self, id: &str) -> bool {
        self.patient_id.as_deref() == Some(id) || self.patient_user_id.as_deref() == Some(id)
    }
}

/// Registration input, before an identifier and registration date are
/// assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPatient {
    pub full_name: String,
    pub age: u32,
    pub gender: String,
    pub blood_group: String,
    pub email: String,
    pub mobile_number: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub medical_history: Option<String>,
    #[serde(default)]
    pub allergies: Option<String>,
    #[serde(default)]
    pub medications: Option<String>,
    #[serde(default)]
    pub surgeries: Option<String>,
    #[serde(default)]
    pub emergency_contact: Option<String>,
    #[serde(default)]
    pub emergency_phone: Option<String>,
}

impl NewPatient {
    /// Builds the stored record. The caller supplies the minted id and the
    /// registration date stamp; `origin` decides which identifier field the
    /// id lands in.
    pub fn into_record(
        self,
        origin: PatientOrigin,
        id: String,
        registration_date: String,
    ) -> PatientRecord {
        let (patient_id, patient_user_id) = match origin {
            PatientOrigin::FrontDesk => (Some(id), None),
            PatientOrigin::Portal => (None, Some(id)),
        };
        PatientRecord {
            patient_id,
            patient_user_id,
            full_name: self.full_name,
            age: self.age,
            gender: self.gender,
            blood_group: self.blood_group,
            email: self.email,
            mobile_number: self.mobile_number,
            password: self.password,
            address: self.address,
            city: self.city,
            state: self.state,
            zip_code: self.zip_code,
            medical_history: self.medical_history,
            allergies: self.allergies,
            medications: self.medications,
            surgeries: self.surgeries,
            emergency_contact: self.emergency_contact,
            emergency_phone: self.emergency_phone,
            registration_date,
        }
    }
}

/// Partial update for an existing record. Only supplied fields are applied;
/// identifiers and the registration date are never patched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientPatch {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub blood_group: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub mobile_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub medical_history: Option<String>,
    #[serde(default)]
    pub allergies: Option<String>,
    #[serde(default)]
    pub medications: Option<String>,
    #[serde(default)]
    pub surgeries: Option<String>,
    #[serde(default)]
    pub emergency_contact: Option<String>,
    #[serde(default)]
    pub emergency_phone: Option<String>,
}

impl PatientPatch {
    pub fn apply_to(&self, record: &mut PatientRecord) {
        if let Some(ref v) = self.full_name {
            record.full_name = v.clone();
        }
        if let Some(v) = self.age {
            record.age = v;
        }
        if let Some(ref v) = self.gender {
            record.gender = v.clone();
        }
        if let Some(ref v) = self.blood_group {
            record.blood_group = v.clone();
        }
        if let Some(ref v) = self.email {
            record.email = v.clone();
        }
        if let Some(ref v) = self.mobile_number {
            record.mobile_number = v.clone();
        }
        if let Some(ref v) = self.address {
            record.address = Some(v.clone());
        }
        if let Some(ref v) = self.city {
            record.city = Some(v.clone());
        }
        if let Some(ref v) = self.state {
            record.state = Some(v.clone());
        }
        if let Some(ref v) = self.zip_code {
            record.zip_code = Some(v.clone());
        }
        if let Some(ref v) = self.medical_history {
            record.medical_history = Some(v.clone());
        }
        if let Some(ref v) = self.allergies {
            record.allergies = Some(v.clone());
        }
        if let Some(ref v) = self.medications {
            record.medications = Some(v.clone());
        }
        if let Some(ref v) = self.surgeries {
            record.surgeries = Some(v.clone());
        }
        if let Some(ref v) = self.emergency_contact {
            record.emergency_contact = Some(v.clone());
        }
        if let Some(ref v) = self.emergency_phone {
            record.emergency_phone = Some(v.clone());
        }
    }
}
