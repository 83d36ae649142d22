//! Flat-file JSON storage for prompt records
//!
//! Records are split into a public and a private root so the public one can be
//! tracked in git. Each record is one pretty-printed JSON document at
//! `<root>/<category>/<title>_<id8>.json`.

use crate::config::Config;
use crate::core::data::{DEFAULT_CATEGORY, PromptRecord};
use crate::core::traits::PromptStore;
use crate::utils::error::{AppError, AppResult};
use crate::utils::format::take_bytes;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

// Leaves room for `_<id8>.json.tmp` under the common 255-byte name limit
const MAX_SLUG_BYTES: usize = 180;

/// A record together with the document it was read from
#[derive(Debug, Clone)]
pub struct StoredEntry {
    pub record: PromptRecord,
    pub path: PathBuf,
}

/// Result of reading both roots
#[derive(Debug, Default)]
pub struct ScanReport {
    pub entries: Vec<StoredEntry>,
    /// Documents that could not be read, as `CorruptRecord` or `Io` errors
    pub skipped: Vec<AppError>,
}

#[derive(Debug, Clone)]
pub struct FileStore {
    public_root: PathBuf,
    private_root: PathBuf,
}

impl FileStore {
    pub fn new(public_root: impl Into<PathBuf>, private_root: impl Into<PathBuf>) -> Self {
        Self {
            public_root: public_root.into(),
            private_root: private_root.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.public_dir(), config.private_dir())
    }

    pub fn root_for(&self, private: bool) -> &Path {
        if private {
            &self.private_root
        } else {
            &self.public_root
        }
    }

    pub fn ensure_roots(&self) -> AppResult<()> {
        for root in [&self.public_root, &self.private_root] {
            fs::create_dir_all(root).map_err(|e| {
                AppError::Io(format!("Failed to create {}: {}", root.display(), e))
            })?;
        }
        Ok(())
    }

    /// Where a record with this state belongs
    pub fn path_for(&self, record: &PromptRecord) -> PathBuf {
        let file_name = format!("{}_{}.json", slug(&record.title, "untitled"), record.short_id());
        self.root_for(record.private)
            .join(slug(&record.category, DEFAULT_CATEGORY))
            .join(file_name)
    }

    /// Read every `*.json` document under both roots
    pub fn scan(&self) -> AppResult<ScanReport> {
        let mut report = ScanReport::default();

        for root in [&self.public_root, &self.private_root] {
            if !root.exists() {
                continue;
            }

            let mut paths: Vec<PathBuf> = Vec::new();
            for entry in WalkDir::new(root).follow_links(false) {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        warn!(root = %root.display(), error = %e, "Skipping unreadable path");
                        report.skipped.push(AppError::Io(e.to_string()));
                        continue;
                    }
                };
                let path = entry.path();
                if entry.file_type().is_file()
                    && path.extension().is_some_and(|ext| ext == "json")
                {
                    paths.push(path.to_path_buf());
                }
            }
            paths.sort();

            for path in paths {
                match read_record(&path) {
                    Ok(record) => report.entries.push(StoredEntry { record, path }),
                    Err(err) => {
                        warn!(path = %path.display(), error = %err, "Skipping prompt file");
                        report.skipped.push(err);
                    }
                }
            }
        }

        debug!(
            loaded = report.entries.len(),
            skipped = report.skipped.len(),
            "Scanned prompt store"
        );
        Ok(report)
    }

    fn locate(&self, id: &str) -> AppResult<StoredEntry> {
        self.scan()?
            .entries
            .into_iter()
            .find(|entry| entry.record.id() == id)
            .ok_or_else(|| AppError::NotFound(id.to_string()))
    }

    fn write(&self, record: &PromptRecord) -> AppResult<PathBuf> {
        let path = self.path_for(record);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::Io(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        atomic_write(&path, record)?;
        debug!(id = record.id(), path = %path.display(), "Wrote prompt");
        Ok(path)
    }

    /// Remove a now-empty category directory, never a root
    fn prune_empty_dir(&self, dir: Option<&Path>) {
        if let Some(dir) = dir
            && dir != self.public_root
            && dir != self.private_root
        {
            let _ = fs::remove_dir(dir);
        }
    }
}

impl PromptStore for FileStore {
    fn create(&self, record: &PromptRecord) -> AppResult<()> {
        record.validate()?;

        if self
            .scan()?
            .entries
            .iter()
            .any(|entry| entry.record.id() == record.id())
        {
            return Err(AppError::DuplicateId(record.id().to_string()));
        }

        self.write(record)?;
        Ok(())
    }

    fn list_all(&self) -> AppResult<Vec<PromptRecord>> {
        Ok(self
            .scan()?
            .entries
            .into_iter()
            .map(|entry| entry.record)
            .collect())
    }

    fn get(&self, id: &str) -> AppResult<PromptRecord> {
        self.locate(id).map(|entry| entry.record)
    }

    fn update<F>(&self, id: &str, mutator: F) -> AppResult<PromptRecord>
    where
        F: FnOnce(&mut PromptRecord),
    {
        let StoredEntry {
            record: original,
            path: old_path,
        } = self.locate(id)?;

        let mut updated = original.clone();
        mutator(&mut updated);

        if !updated.same_identity(&original) {
            return Err(AppError::Validation(
                "Prompt id, content and creation time cannot be changed".to_string(),
            ));
        }
        updated.validate()?;

        let new_path = self.write(&updated)?;
        if new_path != old_path {
            fs::remove_file(&old_path).map_err(|e| {
                AppError::Io(format!("Failed to remove {}: {}", old_path.display(), e))
            })?;
            self.prune_empty_dir(old_path.parent());
            debug!(from = %old_path.display(), to = %new_path.display(), "Moved prompt");
        }

        Ok(updated)
    }

    fn delete(&self, id: &str) -> AppResult<()> {
        let entry = self.locate(id)?;
        fs::remove_file(&entry.path).map_err(|e| {
            AppError::Io(format!("Failed to remove {}: {}", entry.path.display(), e))
        })?;
        self.prune_empty_dir(entry.path.parent());
        debug!(id, path = %entry.path.display(), "Deleted prompt");
        Ok(())
    }
}

fn read_record(path: &Path) -> AppResult<PromptRecord> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    serde_json::from_str(&content).map_err(|e| AppError::CorruptRecord {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Serialize to a sibling temp file, sync it, then rename over the target
fn atomic_write(path: &Path, record: &PromptRecord) -> AppResult<()> {
    let temp_path = path.with_extension("json.tmp");

    let file = File::create(&temp_path)
        .map_err(|e| AppError::Io(format!("Failed to create temp file: {}", e)))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, record)
        .map_err(|e| AppError::System(format!("Failed to serialize prompt: {}", e)))?;
    writer
        .write_all(b"\n")
        .and_then(|_| writer.flush())
        .map_err(|e| AppError::Io(format!("Failed to flush: {}", e)))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| AppError::Io(format!("Failed to sync: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        AppError::Io(format!("Failed to rename into {}: {}", path.display(), e))
    })
}

/// File-system safe form of a title or category
pub fn slug(text: &str, fallback: &str) -> String {
    let kept: String = text
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(*c, ' ' | '-' | '_'))
        .collect();
    let slug = kept.trim().replace(' ', "_").to_lowercase();
    let slug = take_bytes(&slug, MAX_SLUG_BYTES).to_string();
    if slug.is_empty() {
        fallback.to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, FileStore) {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path().join("public"), temp.path().join("private"));
        store.ensure_roots().unwrap();
        (temp, store)
    }

    fn json_files(root: &Path) -> Vec<PathBuf> {
        WalkDir::new(root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(|e| e.path().to_path_buf())
            .collect()
    }

    fn record(title: &str) -> PromptRecord {
        let mut record = PromptRecord::new(title, format!("Content of {}", title));
        record.category = "Writing Help".to_string();
        record
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("Strategy Coach: v2!", "untitled"), "strategy_coach_v2");
        assert_eq!(slug("  ", "general"), "general");
        assert_eq!(slug("../../etc", "untitled"), "etc");
        assert_eq!(slug(&"x".repeat(300), "untitled").len(), MAX_SLUG_BYTES);
        let wide = slug(&"提示词管理".repeat(20), "untitled");
        assert!(wide.len() <= MAX_SLUG_BYTES);
        assert!(wide.starts_with("提示词管理"));
    }

    #[test]
    fn test_create_with_long_multibyte_title() {
        let (_temp, store) = store();
        let mut rec = record(&"提示词管理".repeat(20));
        rec.category = "分类".repeat(100);
        store.create(&rec).unwrap();

        let path = store.path_for(&rec);
        assert!(path.exists());
        assert!(path.file_name().unwrap().len() < 255);
        assert_eq!(store.get(rec.id()).unwrap(), rec);
    }

    #[test]
    fn test_create_places_record_by_privacy() {
        let (_temp, store) = store();
        let mut secret = record("Secret");
        secret.private = true;
        let open = record("Open");

        store.create(&secret).unwrap();
        store.create(&open).unwrap();

        let private_files = json_files(store.root_for(true));
        assert_eq!(private_files.len(), 1);
        assert_eq!(private_files[0], store.path_for(&secret));
        assert!(private_files[0].starts_with(store.root_for(true).join("writing_help")));
        assert_eq!(json_files(store.root_for(false)), vec![store.path_for(&open)]);
    }

    #[test]
    fn test_create_rejects_duplicate_and_invalid() {
        let (_temp, store) = store();
        let rec = record("Once");
        store.create(&rec).unwrap();

        let mut moved = rec.clone();
        moved.private = true;
        assert_eq!(
            store.create(&moved),
            Err(AppError::DuplicateId(rec.id().to_string()))
        );

        let blank = PromptRecord::new("Blank", "   ");
        assert!(matches!(store.create(&blank), Err(AppError::Validation(_))));
        assert_eq!(store.list_all().unwrap().len(), 1);
    }

    #[test]
    fn test_update_keeps_exactly_one_copy() {
        let (_temp, store) = store();
        let rec = record("Mover");
        store.create(&rec).unwrap();

        let updated = store
            .update(rec.id(), |r| {
                r.private = true;
                r.category = "Business".to_string();
                r.title = "Renamed".to_string();
            })
            .unwrap();

        let all = store.list_all().unwrap();
        assert_eq!(all.iter().filter(|r| r.id() == rec.id()).count(), 1);
        assert!(json_files(store.root_for(false)).is_empty());
        assert_eq!(json_files(store.root_for(true)), vec![store.path_for(&updated)]);
        assert!(!store.root_for(false).join("writing_help").exists());

        let back = store.update(rec.id(), |r| r.private = false).unwrap();
        assert!(json_files(store.root_for(true)).is_empty());
        assert_eq!(json_files(store.root_for(false)), vec![store.path_for(&back)]);
        assert_eq!(store.get(rec.id()).unwrap(), back);
    }

    #[test]
    fn test_update_cannot_change_content() {
        let (_temp, store) = store();
        let rec = record("Fixed");
        store.create(&rec).unwrap();

        let result = store.update(rec.id(), |r| {
            let mut replacement = PromptRecord::new("Fixed", "Different text");
            replacement.category = r.category.clone();
            *r = replacement;
        });
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(store.get(rec.id()).unwrap().content(), rec.content());

        let retitled = store.update(rec.id(), |r| r.title = "New".to_string()).unwrap();
        assert_eq!(retitled.content(), rec.content());
        assert_eq!(retitled.created(), rec.created());
    }

    #[test]
    fn test_update_validation_leaves_store_untouched() {
        let (_temp, store) = store();
        let rec = record("Hot");
        store.create(&rec).unwrap();

        let result = store.update(rec.id(), |r| r.technical_notes.temperature = Some(3.0));
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(store.get(rec.id()).unwrap(), rec);
    }

    #[test]
    fn test_delete_then_not_found() {
        let (_temp, store) = store();
        let rec = record("Gone");
        store.create(&rec).unwrap();

        store.delete(rec.id()).unwrap();
        assert_eq!(
            store.get(rec.id()),
            Err(AppError::NotFound(rec.id().to_string()))
        );
        assert!(matches!(store.delete(rec.id()), Err(AppError::NotFound(_))));
        assert!(matches!(
            store.update(rec.id(), |r| r.favorite = true),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_increment_usage_and_favorite() {
        let (_temp, store) = store();
        let rec = record("Used");
        store.create(&rec).unwrap();

        store.increment_usage(rec.id()).unwrap();
        let used = store.increment_usage(rec.id()).unwrap();
        assert_eq!(used.usage_count, 2);
        assert!(used.last_used.is_some());

        assert!(store.toggle_favorite(rec.id()).unwrap().favorite);
        assert!(!store.toggle_favorite(rec.id()).unwrap().favorite);
        assert_eq!(store.get(rec.id()).unwrap().usage_count, 2);
    }

    #[test]
    fn test_corrupt_files_are_skipped() {
        let (_temp, store) = store();
        let rec = record("Good");
        store.create(&rec).unwrap();

        let bad_dir = store.root_for(false).join("general");
        fs::create_dir_all(&bad_dir).unwrap();
        fs::write(bad_dir.join("broken.json"), "{ not json").unwrap();
        fs::write(bad_dir.join("notes.txt"), "ignored").unwrap();
        fs::write(bad_dir.join("half.json.tmp"), "{").unwrap();

        let report = store.scan().unwrap();
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert!(matches!(report.skipped[0], AppError::CorruptRecord { .. }));
        assert_eq!(store.list_all().unwrap(), vec![rec]);
    }

    #[test]
    fn test_missing_roots_list_empty() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path().join("a"), temp.path().join("b"));
        assert!(store.list_all().unwrap().is_empty());
    }
}
