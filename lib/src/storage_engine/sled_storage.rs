// lib/src/storage_engine/sled_storage.rs

use std::fs;
use std::path::Path;

use async_trait::async_trait;
use log::{error, info};
use models::errors::{HospitalError, HospitalResult};

use super::storage_engine::StorageEngine;

/// Opens (or creates) the sled database backing persistent deployments.
pub fn open_sled_db(path: &Path) -> HospitalResult<sled::Db> {
    if !path.exists() {
        info!("Creating database directory at {:?}", path);
        fs::create_dir_all(path)?;
    } else if !path.is_dir() {
        error!("Path {:?} exists but is not a directory", path);
        return Err(HospitalError::Storage(format!(
            "Path {:?} is not a directory",
            path
        )));
    }

    let db = sled::Config::new().path(path).open().map_err(|e| {
        error!("Failed to open sled database at {:?}: {}", path, e);
        HospitalError::Storage(format!(
            "Failed to open sled database at {:?}: {}. Ensure the directory is accessible.",
            path, e
        ))
    })?;
    info!("Opened sled database at {:?}", path);
    Ok(db)
}

/// Sled-backed implementation of the `StorageEngine` trait.
#[derive(Debug)]
pub struct SledStorage {
    db: sled::Db,
}

impl SledStorage {
    pub fn new(db: sled::Db) -> HospitalResult<Self> {
        Ok(SledStorage { db })
    }
}

#[async_trait]
impl StorageEngine for SledStorage {
    async fn connect(&self) -> HospitalResult<()> {
        Ok(())
    }

    async fn insert(&self, key: &[u8], value: &[u8]) -> HospitalResult<()> {
        self.db.insert(key, value)?;
        Ok(())
    }

    async fn retrieve(&self, key: &[u8]) -> HospitalResult<Option<Vec<u8>>> {
        Ok(self.db.get(key)?.map(|ivec| ivec.to_vec()))
    }

    async fn delete(&self, key: &[u8]) -> HospitalResult<()> {
        self.db.remove(key)?;
        Ok(())
    }

    async fn flush(&self) -> HospitalResult<()> {
        self.db.flush_async().await?;
        Ok(())
    }
}
