// models/src/doctor.rs

use serde::{Deserialize, Serialize};

/// A roster entry. Doctors are seeded reference data: no generated ids, no
/// lifecycle beyond the seed. The username doubles as the stable key other
/// records point at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub username: String,
    pub password: String,
    pub name: String,
    pub specialization: String,
}
