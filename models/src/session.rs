// models/src/session.rs

use std::fmt;

use serde::{Deserialize, Serialize};

/// The three fixed roles. Admin is a single static account, doctors come
/// from the seeded roster, patients register themselves through the portal.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Doctor,
    Patient,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Admin => "admin",
            Role::Doctor => "doctor",
            Role::Patient => "patient",
        };
        write!(f, "{}", s)
    }
}

/// The single static admin credential record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminAccount {
    pub username: String,
    pub password: String,
    pub name: String,
}

/// A login attempt. `login` is a username for admin/doctor roles and an
/// email address for patients; the password is compared verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

/// The current authenticated identity. One session exists per process at
/// most; authenticating again silently replaces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub role: Role,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_number: Option<String>,
}

impl Session {
    pub fn admin(name: &str) -> Self {
        Session {
            role: Role::Admin,
            name: name.to_string(),
            username: None,
            specialization: None,
            email: None,
            patient_user_id: None,
            mobile_number: None,
        }
    }

    pub fn doctor(name: &str, username: &str, specialization: &str) -> Self {
        Session {
            role: Role::Doctor,
            name: name.to_string(),
            username: Some(username.to_string()),
            specialization: Some(specialization.to_string()),
            email: None,
            patient_user_id: None,
            mobile_number: None,
        }
    }

    pub fn patient(name: &str, email: &str, patient_user_id: &str, mobile_number: &str) -> Self {
        Session {
            role: Role::Patient,
            name: name.to_string(),
            username: None,
            specialization: None,
            email: Some(email.to_string()),
            patient_user_id: Some(patient_user_id.to_string()),
            mobile_number: Some(mobile_number.to_string()),
        }
    }
}
