// lib/src/storage_engine/storage_engine.rs

use std::fmt::Debug;

use async_trait::async_trait;
use models::errors::HospitalResult;

/// Byte-oriented key-value substrate the engine persists its collections in.
/// Implementations must be cheap per call: every engine operation performs a
/// full read or write of one collection blob.
#[async_trait]
pub trait StorageEngine: Debug + Send + Sync + 'static {
    async fn connect(&self) -> HospitalResult<()>;
    async fn insert(&self, key: &[u8], value: &[u8]) -> HospitalResult<()>;
    async fn retrieve(&self, key: &[u8]) -> HospitalResult<Option<Vec<u8>>>;
    async fn delete(&self, key: &[u8]) -> HospitalResult<()>;
    async fn flush(&self) -> HospitalResult<()>;
}
