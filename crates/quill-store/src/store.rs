use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use quill_core::{Entity, Trail};

use crate::error::StoreError;

const EXTENSION: &str = "jsonl";

/// Trail files under one directory.
pub struct TrailStore {
    dir: PathBuf,
}

impl TrailStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;
        Ok(Self { dir })
    }

    /// The directory where trail files are stored.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Append a trail to its entity's file.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidTrail` for a trail without an ID, or
    /// `StoreError::Io` if the write fails.
    pub fn append(&self, trail: &Trail) -> Result<(), StoreError> {
        if trail.is_transient() {
            return Err(StoreError::InvalidTrail(format!(
                "trail for {} {} has no id",
                trail.entity_name, trail.primary_key
            )));
        }

        let path = self.entity_path(&trail.entity_name);
        serde_jsonlines::append_json_lines(&path, [trail]).map_err(|e| StoreError::io(&path, e))
    }

    /// Every readable trail in the store, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the directory or a file cannot be read.
    pub fn load_all(&self) -> Result<Vec<Trail>, StoreError> {
        let mut trails = Vec::new();
        for path in self.trail_files()? {
            trails.extend(read_trails(&path)?);
        }
        sort_chronologically(&mut trails);
        Ok(trails)
    }

    /// Trails of one audited record, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the entity's file exists but cannot be read.
    pub fn history(&self, entity_name: &str, primary_key: &str) -> Result<Vec<Trail>, StoreError> {
        let path = self.entity_path(entity_name);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let mut trails: Vec<Trail> = read_trails(&path)?
            .into_iter()
            .filter(|t| t.entity_name == entity_name && t.primary_key == primary_key)
            .collect();
        sort_chronologically(&mut trails);
        Ok(trails)
    }

    /// Look a trail up by ID.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if a file cannot be read.
    pub fn find(&self, id: &str) -> Result<Option<Trail>, StoreError> {
        for path in self.trail_files()? {
            if let Some(trail) = read_trails(&path)?.into_iter().find(|t| t.id == id) {
                return Ok(Some(trail));
            }
        }
        Ok(None)
    }

    /// Clear `actor_id` on every trail referencing `actor_id`.
    ///
    /// Affected files are rewritten through a temporary file. Lines that do
    /// not reference the actor, including unreadable ones, are kept byte for
    /// byte. Returns the number of trails changed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if a file cannot be read or rewritten.
    pub fn detach_actor(&self, actor_id: &str) -> Result<usize, StoreError> {
        let mut detached = 0;
        for path in self.trail_files()? {
            detached += detach_in_file(&path, actor_id)?;
        }
        tracing::debug!("Detached actor {actor_id} from {detached} trail(s)");
        Ok(detached)
    }

    fn entity_path(&self, entity_name: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{EXTENSION}", file_stem(entity_name)))
    }

    fn trail_files(&self) -> Result<Vec<PathBuf>, StoreError> {
        let entries = fs::read_dir(&self.dir).map_err(|e| StoreError::io(&self.dir, e))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| StoreError::io(&self.dir, e))?.path();
            if path.extension().and_then(|e| e.to_str()) == Some(EXTENSION) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

/// File stem for an entity name: anything outside `[A-Za-z0-9_-]` becomes `_`.
fn file_stem(entity_name: &str) -> String {
    entity_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn sort_chronologically(trails: &mut [Trail]) {
    trails.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));
}

fn read_trails(path: &Path) -> Result<Vec<Trail>, StoreError> {
    let file = File::open(path).map_err(|e| StoreError::io(path, e))?;

    let mut trails = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| StoreError::io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Trail>(&line) {
            Ok(trail) => trails.push(trail),
            Err(e) => tracing::warn!(
                "Skipping unreadable trail at {}:{}: {e}",
                path.display(),
                idx + 1
            ),
        }
    }
    Ok(trails)
}

fn detach_in_file(path: &Path, actor_id: &str) -> Result<usize, StoreError> {
    let file = File::open(path).map_err(|e| StoreError::io(path, e))?;

    let mut lines = Vec::new();
    let mut detached = 0;
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| StoreError::io(path, e))?;
        match serde_json::from_str::<Trail>(&line) {
            Ok(mut trail) if trail.actor_id.as_deref() == Some(actor_id) => {
                trail.actor_id = None;
                let rewritten = serde_json::to_string(&trail)
                    .map_err(|e| StoreError::io(path, e.into()))?;
                lines.push(rewritten);
                detached += 1;
            }
            _ => lines.push(line),
        }
    }

    if detached > 0 {
        let tmp = path.with_extension(format!("{EXTENSION}.tmp"));
        write_lines(&tmp, &lines)?;
        fs::rename(&tmp, path).map_err(|e| StoreError::io(path, e))?;
    }
    Ok(detached)
}

fn write_lines(path: &Path, lines: &[String]) -> Result<(), StoreError> {
    let file = File::create(path).map_err(|e| StoreError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    for line in lines {
        writeln!(writer, "{line}").map_err(|e| StoreError::io(path, e))?;
    }
    writer.flush().map_err(|e| StoreError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_stem_replaces_unsafe_characters() {
        assert_eq!(file_stem("Ticket"), "Ticket");
        assert_eq!(file_stem("billing::Invoice"), "billing__Invoice");
        assert_eq!(file_stem("../etc/passwd"), "___etc_passwd");
        assert_eq!(file_stem("order-line_2"), "order-line_2");
    }
}
