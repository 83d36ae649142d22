//! Core operations implementation
//!
//! This module provides the central hub for prompt management operations,
//! combining configuration, storage, search and metadata suggestion.

use crate::config::Config;
use crate::core::{
    data::{PromptCollection, PromptRecord, PromptStats},
    traits::PromptStore,
};
use crate::store::FileStore;
use crate::suggest::Suggester;
use crate::utils::error::{AppError, AppResult, report_error};
use crate::utils::search::{SearchEngine, SearchOutcome};

/// Narrowing applied to plain listings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListFilter {
    pub favorites_only: bool,
    /// `Some(true)` for private prompts only, `Some(false)` for public only
    pub privacy: Option<bool>,
    pub category: Option<String>,
}

impl ListFilter {
    pub fn matches(&self, record: &PromptRecord) -> bool {
        (!self.favorites_only || record.favorite)
            && self.privacy.is_none_or(|private| record.private == private)
            && self
                .category
                .as_deref()
                .is_none_or(|category| record.category.eq_ignore_ascii_case(category))
    }
}

/// Main operations hub used by the command handlers
pub struct PromptOperations {
    config: Config,
    store: FileStore,
    engine: SearchEngine,
}

impl PromptOperations {
    pub fn new(config: Config) -> Self {
        Self {
            store: FileStore::from_config(&config),
            engine: SearchEngine::new(&config.search),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &FileStore {
        &self.store
    }

    pub fn suggester(&self) -> Suggester {
        Suggester::from_config(&self.config.ai)
    }

    pub fn ensure_storage_exists(&self) -> AppResult<()> {
        self.store.ensure_roots()
    }

    /// All readable prompts, newest first. Unreadable files are reported and skipped.
    pub fn load_collection(&self) -> AppResult<PromptCollection> {
        let report = self.store.scan()?;
        for err in &report.skipped {
            report_error(err);
        }

        let mut prompts: Vec<PromptRecord> =
            report.entries.into_iter().map(|entry| entry.record).collect();
        prompts.sort_by(|a, b| {
            b.created()
                .cmp(&a.created())
                .then_with(|| a.id().cmp(b.id()))
        });
        Ok(PromptCollection::new(prompts))
    }

    /// Resolve a full id, an id prefix or an exact title to a stored prompt
    pub fn resolve(&self, identifier: &str) -> AppResult<PromptRecord> {
        self.load_collection()?
            .find(identifier)
            .cloned()
            .ok_or_else(|| AppError::NotFound(identifier.to_string()))
    }

    pub fn list(&self, filter: &ListFilter) -> AppResult<Vec<PromptRecord>> {
        Ok(self
            .load_collection()?
            .prompts
            .into_iter()
            .filter(|record| filter.matches(record))
            .collect())
    }

    pub fn search(&self, query: &str, favorites_only: bool) -> AppResult<SearchOutcome> {
        let collection = self.load_collection()?;
        Ok(self.engine.search(query, &collection.prompts, favorites_only))
    }

    pub fn add(&self, record: &PromptRecord) -> AppResult<()> {
        self.ensure_storage_exists()?;
        self.store.create(record)
    }

    pub fn update<F>(&self, id: &str, mutator: F) -> AppResult<PromptRecord>
    where
        F: FnOnce(&mut PromptRecord),
    {
        self.store.update(id, mutator)
    }

    /// Count a use of the prompt (copy, export)
    pub fn record_use(&self, id: &str) -> AppResult<PromptRecord> {
        self.store.increment_usage(id)
    }

    pub fn toggle_favorite(&self, id: &str) -> AppResult<PromptRecord> {
        self.store.toggle_favorite(id)
    }

    /// Move a prompt between the public and private roots
    pub fn set_privacy(&self, id: &str, private: bool) -> AppResult<PromptRecord> {
        self.store.update(id, |record| record.private = private)
    }

    pub fn delete(&self, id: &str) -> AppResult<()> {
        self.store.delete(id)
    }

    pub fn stats(&self) -> AppResult<PromptStats> {
        Ok(self.load_collection()?.stats())
    }

    pub fn all_tags(&self) -> AppResult<Vec<String>> {
        Ok(self.load_collection()?.all_tags())
    }

    pub fn categories(&self) -> AppResult<Vec<String>> {
        Ok(self.load_collection()?.categories())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use tempfile::TempDir;

    fn operations() -> (TempDir, PromptOperations) {
        let temp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.general.prompts_dir = temp.path().join("prompts");
        config.ai.enabled = false;
        (temp, PromptOperations::new(config))
    }

    fn add(ops: &PromptOperations, title: &str, minutes_ago: i64) -> PromptRecord {
        let record = PromptRecord::new(title, format!("{} body", title))
            .with_created(Utc::now() - Duration::minutes(minutes_ago));
        ops.add(&record).unwrap();
        record
    }

    #[test]
    fn test_collection_is_newest_first() {
        let (_temp, ops) = operations();
        add(&ops, "Old", 30);
        add(&ops, "New", 1);
        add(&ops, "Middle", 10);

        let titles: Vec<String> = ops
            .load_collection()
            .unwrap()
            .prompts
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["New", "Middle", "Old"]);
    }

    #[test]
    fn test_resolve() {
        let (_temp, ops) = operations();
        let record = add(&ops, "Editor", 0);

        assert_eq!(ops.resolve(record.short_id()).unwrap().id(), record.id());
        assert_eq!(ops.resolve("editor").unwrap().id(), record.id());
        assert_eq!(
            ops.resolve("missing"),
            Err(AppError::NotFound("missing".to_string()))
        );
    }

    #[test]
    fn test_list_filter() {
        let (_temp, ops) = operations();
        let a = add(&ops, "A", 0);
        let b = add(&ops, "B", 1);
        ops.toggle_favorite(a.id()).unwrap();
        ops.set_privacy(b.id(), true).unwrap();
        ops.update(b.id(), |r| r.category = "Work".to_string()).unwrap();

        let favorites = ops
            .list(&ListFilter {
                favorites_only: true,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].id(), a.id());

        let private = ops
            .list(&ListFilter {
                privacy: Some(true),
                category: Some("work".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(private.len(), 1);
        assert_eq!(private[0].id(), b.id());
    }

    #[test]
    fn test_search_and_usage() {
        let (_temp, ops) = operations();
        let record = add(&ops, "Release notes", 0);
        add(&ops, "Poem", 1);

        let outcome = ops.search("release", false).unwrap();
        assert_eq!(outcome.len(), 1);

        ops.record_use(record.id()).unwrap();
        let stats = ops.stats().unwrap();
        assert_eq!(stats.total_prompts, 2);
        assert_eq!(stats.total_usage, 1);
    }

    #[test]
    fn test_offline_suggester_when_disabled() {
        let (_temp, ops) = operations();
        assert!(!ops.suggester().is_online());
    }
}
