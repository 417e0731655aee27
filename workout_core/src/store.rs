//! Workout template persistence with file locking.
//!
//! Each template is stored as a JSON document at `<dir>/<id>.json`.
//! Documents are decoded through the template's validating constructor, so a
//! corrupt or hand-edited file surfaces as an error instead of an invalid
//! aggregate.
//!
//! Read-modify-write goes through [`JsonFileStore::update`], which holds an
//! exclusive lock on `<dir>/<id>.lock` from load to save. Concurrent updates
//! of one template therefore apply one after the other.

use crate::template::WorkoutTemplate;
use crate::{Error, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// Load/save boundary for workout templates
pub trait TemplateStore {
    fn load(&self, id: Uuid) -> Result<WorkoutTemplate>;
    fn save(&mut self, template: &WorkoutTemplate) -> Result<()>;
    fn list(&self) -> Result<Vec<WorkoutTemplate>>;
}

/// One JSON document per template in a directory
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    pub fn lock_path_for(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{id}.lock"))
    }

    /// Load a template, apply a command, and save the result
    ///
    /// Nothing is written when `f` fails.
    pub fn update<F>(&mut self, id: Uuid, f: F) -> Result<WorkoutTemplate>
    where
        F: FnOnce(&WorkoutTemplate) -> Result<WorkoutTemplate>,
    {
        self.update_then(id, f, |_, _| {})
    }

    /// Like [`update`](Self::update), running `saved` with the previous and
    /// new template before the per-template lock is released
    pub fn update_then<F, G>(&mut self, id: Uuid, f: F, saved: G) -> Result<WorkoutTemplate>
    where
        F: FnOnce(&WorkoutTemplate) -> Result<WorkoutTemplate>,
        G: FnOnce(&WorkoutTemplate, &WorkoutTemplate),
    {
        if !self.path_for(id).exists() {
            return Err(Error::TemplateNotFound(id));
        }

        std::fs::create_dir_all(&self.dir)?;
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path_for(id))?;
        lock.lock_exclusive()?;

        let result = self.load(id).and_then(|current| {
            let next = f(&current)?;
            self.save(&next)?;
            saved(&current, &next);
            Ok(next)
        });

        lock.unlock()?;
        result
    }

    fn read_document(path: &Path) -> Result<WorkoutTemplate> {
        let file = File::open(path)?;

        // Acquire shared lock for reading
        file.lock_shared()?;
        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        read?;

        let template = serde_json::from_str::<WorkoutTemplate>(&contents)?;
        Ok(template)
    }
}

impl TemplateStore for JsonFileStore {
    fn load(&self, id: Uuid) -> Result<WorkoutTemplate> {
        let path = self.path_for(id);
        if !path.exists() {
            return Err(Error::TemplateNotFound(id));
        }

        let template = Self::read_document(&path)?;
        tracing::debug!("Loaded workout template {} from {:?}", id, path);
        Ok(template)
    }

    /// Atomically writes the document by:
    /// 1. Writing to a temp file in the same directory
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    fn save(&mut self, template: &WorkoutTemplate) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(template.id());

        // Same directory as the target so the rename is atomic
        let temp = NamedTempFile::new_in(&self.dir)?;
        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string_pretty(template)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;

        temp.persist(&path).map_err(|e| Error::Io(e.error))?;

        tracing::info!(
            "Saved workout template {} ({}) to {:?}",
            template.id(),
            template.status(),
            path
        );
        Ok(())
    }

    /// All readable templates, ordered by scheduled date
    ///
    /// Unreadable documents are skipped with a warning.
    fn list(&self) -> Result<Vec<WorkoutTemplate>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut templates = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            match Self::read_document(&path) {
                Ok(template) => templates.push(template),
                Err(e) => {
                    tracing::warn!("Skipping unreadable template {:?}: {}", path, e);
                }
            }
        }

        templates.sort_by_key(|t| (t.scheduled_date(), t.id()));
        tracing::debug!("Listed {} templates from {:?}", templates.len(), self.dir);
        Ok(templates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::WorkoutActivity;
    use crate::goals::WorkoutGoals;
    use crate::lifecycle::WorkoutStatus;
    use crate::template::{Importance, NewTemplate, WorkoutCategory, WorkoutType};
    use chrono::{Duration, TimeZone, Utc};

    fn create_test_template(days_ahead: i64) -> WorkoutTemplate {
        WorkoutTemplate::create(NewTemplate {
            id: None,
            plan_id: Uuid::new_v4(),
            week_number: 1,
            day_of_week: 2,
            scheduled_date: Utc.with_ymd_and_hms(2024, 5, 1, 6, 30, 0).unwrap()
                + Duration::days(days_ahead),
            title: "Easy run".into(),
            workout_type: WorkoutType::Easy,
            category: WorkoutCategory::Endurance,
            goals: WorkoutGoals::new("Aerobic base").unwrap(),
            activities: vec![
                WorkoutActivity::create_warmup(10.0, 0).unwrap(),
                WorkoutActivity::create_distance_run("Easy run", 6000.0, None, 1).unwrap(),
            ],
            importance: Importance::Recommended,
            coach_notes: None,
        })
        .unwrap()
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        crate::logging::init_test();
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(temp_dir.path().join("templates"));

        let template = create_test_template(0);
        store.save(&template).unwrap();

        let loaded = store.load(template.id()).unwrap();
        assert_eq!(loaded, template);
    }

    #[test]
    fn test_load_missing_template() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(temp_dir.path());

        let id = Uuid::new_v4();
        let err = store.load(id).unwrap_err();
        assert!(matches!(err, Error::TemplateNotFound(missing) if missing == id));
    }

    #[test]
    fn test_corrupted_document_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(temp_dir.path());

        let id = Uuid::new_v4();
        std::fs::write(store.path_for(id), "{ invalid json }").unwrap();

        assert!(matches!(store.load(id), Err(Error::Json(_))));
    }

    #[test]
    fn test_update_applies_command() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(temp_dir.path());

        let template = create_test_template(0);
        store.save(&template).unwrap();

        let started = store
            .update(template.id(), |t| t.start(t.scheduled_date()))
            .unwrap();
        assert_eq!(started.status(), WorkoutStatus::InProgress);

        let reloaded = store.load(template.id()).unwrap();
        assert_eq!(reloaded.status(), WorkoutStatus::InProgress);
    }

    #[test]
    fn test_failed_update_writes_nothing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(temp_dir.path());

        let template = create_test_template(0);
        store.save(&template).unwrap();

        let result = store.update(template.id(), |t| t.skip(""));
        assert!(result.is_err());
        assert_eq!(store.load(template.id()).unwrap(), template);
    }

    #[test]
    fn test_update_missing_template() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(temp_dir.path());

        let id = Uuid::new_v4();
        let err = store.update(id, |t| Ok(t.clone())).unwrap_err();
        assert!(matches!(err, Error::TemplateNotFound(missing) if missing == id));
        assert!(!store.lock_path_for(id).exists());
    }

    #[test]
    fn test_update_then_sees_both_versions() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(temp_dir.path());

        let template = create_test_template(0);
        store.save(&template).unwrap();

        let mut seen = None;
        store
            .update_then(
                template.id(),
                |t| t.start(t.scheduled_date()),
                |before, after| seen = Some((before.status(), after.status())),
            )
            .unwrap();
        assert_eq!(
            seen,
            Some((WorkoutStatus::Scheduled, WorkoutStatus::InProgress))
        );

        let mut called = false;
        let result = store.update_then(template.id(), |t| t.start(t.scheduled_date()), |_, _| {
            called = true
        });
        assert!(result.is_err());
        assert!(!called);
    }

    #[test]
    fn test_concurrent_updates_apply_in_turn() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path().to_path_buf();

        let template = create_test_template(0);
        JsonFileStore::new(&dir).save(&template).unwrap();
        let id = template.id();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let dir = dir.clone();
                std::thread::spawn(move || {
                    let mut store = JsonFileStore::new(dir);
                    store
                        .update(id, |t| t.add_coach_notes(&format!("note {i}")))
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let notes = JsonFileStore::new(&dir)
            .load(id)
            .unwrap()
            .coach_notes()
            .unwrap()
            .to_string();
        assert_eq!(notes.lines().count(), 8, "Lost an update: {notes:?}");
    }

    #[test]
    fn test_list_sorted_by_date() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(temp_dir.path());

        let later = create_test_template(3);
        let sooner = create_test_template(1);
        store.save(&later).unwrap();
        store.save(&sooner).unwrap();
        std::fs::write(temp_dir.path().join("notes.txt"), "ignore me").unwrap();
        std::fs::write(temp_dir.path().join("broken.json"), "{").unwrap();

        let listed = store.list().unwrap();
        let ids: Vec<_> = listed.iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec![sooner.id(), later.id()]);
    }

    #[test]
    fn test_atomic_save_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(temp_dir.path());

        let template = create_test_template(0);
        store.save(&template).unwrap();
        store.save(&template).unwrap();

        store.update(template.id(), |t| Ok(t.clone())).unwrap();

        let entries: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name())
            .collect();
        assert_eq!(entries.len(), 2, "Expected the document and its lock: {entries:?}");
    }
}
