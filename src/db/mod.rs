//! Database layer (Firestore, plus an in-memory store for tests and local runs).

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryStore;

use crate::error::AppError;
use crate::models::CamperRecord;
use std::future::Future;

/// Collection names as constants.
pub mod collections {
    /// Camper records (keyed by user id)
    pub const CAMPERS: &str = "campers";
}

/// Read/write access to camper records.
///
/// One document per user id. Records are only ever created or merged,
/// never deleted.
pub trait CamperStore: Clone + Send + Sync + 'static {
    /// Fetch the record for a user, if one exists.
    fn get_camper(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Option<CamperRecord>, AppError>> + Send;

    /// Write a new record, replacing anything stored under the id.
    fn create_camper(
        &self,
        user_id: &str,
        record: &CamperRecord,
    ) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Merge `major` into an existing record, leaving other fields alone.
    fn merge_camper_major(
        &self,
        user_id: &str,
        major: &str,
    ) -> impl Future<Output = Result<(), AppError>> + Send;
}
