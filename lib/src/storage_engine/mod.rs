// lib/src/storage_engine/mod.rs

pub mod inmemory_storage;
pub mod sled_storage;
pub mod storage_engine;

pub use inmemory_storage::InMemoryStorage;
pub use sled_storage::{open_sled_db, SledStorage};
pub use storage_engine::StorageEngine;

use std::sync::Arc;

use models::errors::{HospitalError, HospitalResult};

use crate::config::{HospitalConfig, StorageEngineType};

/// Creates a storage engine instance based on the provided configuration.
///
/// Sled is the default engine; InMemory exists for tests and ephemeral use.
pub fn create_storage(config: &HospitalConfig) -> HospitalResult<Arc<dyn StorageEngine>> {
    match config.storage_engine_type {
        StorageEngineType::Sled => {
            let data_directory = config.data_directory.as_ref().ok_or_else(|| {
                HospitalError::Config("Sled storage requires a data directory path.".to_string())
            })?;
            let db = open_sled_db(data_directory)?;
            Ok(Arc::new(SledStorage::new(db)?))
        }
        StorageEngineType::InMemory => Ok(Arc::new(InMemoryStorage::new())),
    }
}
