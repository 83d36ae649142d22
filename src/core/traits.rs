//! Core trait definitions for prompt management
//!
//! These traits define the fundamental operations that can be performed
//! on prompts, providing a unified interface for different implementations.

use crate::core::data::PromptRecord;
use crate::utils::error::AppResult;

/// Persistent storage for prompt records
///
/// Every record lives in exactly one place; where that is depends on the
/// record's privacy flag.
pub trait PromptStore {
    /// Persist a new record. Fails with `DuplicateId` if the id is taken.
    fn create(&self, record: &PromptRecord) -> AppResult<()>;

    /// Every readable record. Unreadable documents are skipped.
    fn list_all(&self) -> AppResult<Vec<PromptRecord>>;

    fn get(&self, id: &str) -> AppResult<PromptRecord>;

    /// Apply `mutator` to the stored record and write it back, moving the
    /// backing document when its location changes.
    fn update<F>(&self, id: &str, mutator: F) -> AppResult<PromptRecord>
    where
        F: FnOnce(&mut PromptRecord);

    fn delete(&self, id: &str) -> AppResult<()>;

    /// Record one use of a prompt
    fn increment_usage(&self, id: &str) -> AppResult<PromptRecord> {
        self.update(id, |record| {
            record.usage_count += 1;
            record.last_used = Some(chrono::Utc::now());
        })
    }

    /// Flip the favorite flag and return the new state
    fn toggle_favorite(&self, id: &str) -> AppResult<PromptRecord> {
        self.update(id, |record| record.favorite = !record.favorite)
    }
}
