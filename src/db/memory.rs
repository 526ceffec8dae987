// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory camper store.
//!
//! Used by tests and for running the API locally without Firestore.
//! Counts writes so callers can check the procedure's write budget.

use crate::db::CamperStore;
use crate::error::AppError;
use crate::models::CamperRecord;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct MemoryStore {
    records: Arc<DashMap<String, CamperRecord>>,
    reads: Arc<AtomicUsize>,
    writes: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
    failing_writes: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record without counting it as a write.
    pub fn insert(&self, user_id: &str, record: CamperRecord) {
        self.records.insert(user_id.to_string(), record);
    }

    pub fn record(&self, user_id: &str) -> Option<CamperRecord> {
        self.records.get(user_id).map(|r| r.value().clone())
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make every later call fail, as an unreachable backend would.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Make writes fail while reads keep working.
    pub fn set_failing_writes(&self, failing: bool) {
        self.failing_writes.store(failing, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), AppError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::Database("store unavailable".to_string()));
        }
        Ok(())
    }

    fn check_writable(&self) -> Result<(), AppError> {
        self.check_available()?;
        if self.failing_writes.load(Ordering::SeqCst) {
            return Err(AppError::Database("write rejected".to_string()));
        }
        Ok(())
    }
}

impl CamperStore for MemoryStore {
    async fn get_camper(&self, user_id: &str) -> Result<Option<CamperRecord>, AppError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        Ok(self.record(user_id))
    }

    async fn create_camper(&self, user_id: &str, record: &CamperRecord) -> Result<(), AppError> {
        self.check_writable()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.records.insert(user_id.to_string(), record.clone());
        Ok(())
    }

    async fn merge_camper_major(&self, user_id: &str, major: &str) -> Result<(), AppError> {
        self.check_writable()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.records
            .entry(user_id.to_string())
            .or_default()
            .major = Some(major.to_string());
        Ok(())
    }
}
