//! Lifecycle journal.
//!
//! Every status transition is appended as one JSON line to a journal file,
//! with file locking so several processes can record transitions safely.

use crate::lifecycle::{LifecycleCommand, WorkoutStatus};
use crate::template::WorkoutTemplate;
use crate::Result;
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// One recorded status transition
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LifecycleEvent {
    pub template_id: Uuid,
    pub command: LifecycleCommand,
    pub from: WorkoutStatus,
    pub to: WorkoutStatus,
    pub at: DateTime<Utc>,
}

impl LifecycleEvent {
    /// Event describing the move from `before` to `after`
    pub fn between(
        before: &WorkoutTemplate,
        after: &WorkoutTemplate,
        command: LifecycleCommand,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            template_id: after.id(),
            command,
            from: before.status(),
            to: after.status(),
            at,
        }
    }
}

/// Sink for lifecycle events
pub trait JournalSink {
    fn append(&mut self, event: &LifecycleEvent) -> Result<()>;
}

/// JSONL-based journal with file locking
pub struct JsonlJournal {
    path: PathBuf,
}

impl JsonlJournal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl JournalSink for JsonlJournal {
    fn append(&mut self, event: &LifecycleEvent) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        let dangling = ends_mid_line(&file)?;
        let mut writer = std::io::BufWriter::new(&file);
        if dangling {
            // A previous writer died mid-line; keep this event on its own line
            tracing::warn!("Journal {:?} ends with a partial line", self.path);
            writer.write_all(b"\n")?;
        }
        let line = serde_json::to_string(event)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        file.unlock()?;

        tracing::debug!(
            "Journaled {} for {} ({} -> {})",
            event.command,
            event.template_id,
            event.from,
            event.to
        );
        Ok(())
    }
}

fn ends_mid_line(mut file: &File) -> Result<bool> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::Start(len - 1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

/// Read all events from a journal file
pub fn read_events(path: &Path) -> Result<Vec<LifecycleEvent>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut events = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<LifecycleEvent>(&line) {
            Ok(event) => events.push(event),
            Err(e) => {
                tracing::warn!("Failed to parse journal event at line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} events from journal", events.len());
    Ok(events)
}

/// Events recorded for one template, oldest first
pub fn events_for(path: &Path, template_id: Uuid) -> Result<Vec<LifecycleEvent>> {
    let mut events: Vec<_> = read_events(path)?
        .into_iter()
        .filter(|e| e.template_id == template_id)
        .collect();
    events.sort_by_key(|e| e.at);
    Ok(events)
}
