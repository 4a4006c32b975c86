// lib/src/config.rs

use std::fs;
use std::path::{Path, PathBuf};

use models::{AdminAccount, Doctor};
use serde::{Deserialize, Serialize};

use models::errors::{HospitalError, HospitalResult};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageEngineType {
    Sled,
    InMemory,
}

/// Records seeded into storage the first time a database is opened. Seeding
/// never overwrites collections that already exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedConfig {
    pub admin: AdminAccount,
    pub doctors: Vec<Doctor>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        let doctor = |username: &str, name: &str, specialization: &str| Doctor {
            username: username.to_string(),
            password: "doc123".to_string(),
            name: name.to_string(),
            specialization: specialization.to_string(),
        };
        SeedConfig {
            admin: AdminAccount {
                username: "admin".to_string(),
                password: "admin123".to_string(),
                name: "Admin".to_string(),
            },
            doctors: vec![
                doctor("doctor1", "Dr. Sharma", "Cardiology"),
                doctor("doctor2", "Dr. Patel", "Neurology"),
                doctor("doctor3", "Dr. Singh", "General Medicine"),
                doctor("doctor4", "Dr. Verma", "Pediatrics"),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HospitalConfig {
    #[serde(default = "default_engine_type")]
    pub storage_engine_type: StorageEngineType,
    #[serde(default)]
    pub data_directory: Option<PathBuf>,
    #[serde(default)]
    pub seed: SeedConfig,
}

fn default_engine_type() -> StorageEngineType {
    StorageEngineType::Sled
}

impl Default for HospitalConfig {
    fn default() -> Self {
        HospitalConfig {
            storage_engine_type: StorageEngineType::Sled,
            data_directory: None,
            seed: SeedConfig::default(),
        }
    }
}

impl HospitalConfig {
    /// An in-memory configuration with the default seed; what tests use.
    pub fn in_memory() -> Self {
        HospitalConfig {
            storage_engine_type: StorageEngineType::InMemory,
            data_directory: None,
            seed: SeedConfig::default(),
        }
    }

    pub fn sled_at(data_directory: impl Into<PathBuf>) -> Self {
        HospitalConfig {
            storage_engine_type: StorageEngineType::Sled,
            data_directory: Some(data_directory.into()),
            seed: SeedConfig::default(),
        }
    }
}

/// Loads a configuration from a YAML file. Missing sections fall back to the
/// compiled-in defaults.
pub fn load_config_from_yaml(path: &Path) -> HospitalResult<HospitalConfig> {
    let content = fs::read_to_string(path)?;
    serde_yaml::from_str(&content)
        .map_err(|e| HospitalError::Config(format!("Failed to parse {:?}: {}", path, e)))
}

#[cfg(test)]
mod tests {
    use super::{load_config_from_yaml, SeedConfig, StorageEngineType};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn default_seed_matches_the_shipped_roster() {
        let seed = SeedConfig::default();
        assert_eq!(seed.admin.username, "admin");
        assert_eq!(seed.doctors.len(), 4);
        assert_eq!(seed.doctors[0].specialization, "Cardiology");
    }

    #[test]
    fn yaml_config_fills_missing_sections_from_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "storage_engine_type: inmemory").unwrap();
        let config = load_config_from_yaml(file.path()).unwrap();
        assert_eq!(config.storage_engine_type, StorageEngineType::InMemory);
        assert_eq!(config.seed.doctors.len(), 4);
        assert!(config.data_directory.is_none());
    }
}
