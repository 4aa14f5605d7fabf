//! Append-only score log

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{unix_now, StoreError};

const SCORES_FILE: &str = "scores.json";

/// One finished, clean run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
    /// Seconds since the Unix epoch at settlement
    pub timestamp: u64,
}

/// The score log. Append-only; flagged runs never reach it.
pub trait ScoreLog {
    fn append(&mut self, name: &str, score: u32) -> Result<(), StoreError>;

    /// Top `n` entries, best first. Ties keep insertion order, so the earlier
    /// run outranks a later equal one.
    fn top_n(&self, n: usize) -> Result<Vec<ScoreEntry>, StoreError>;
}

fn ranked(entries: &[ScoreEntry], n: usize) -> Vec<ScoreEntry> {
    let mut ranked: Vec<ScoreEntry> = entries.to_vec();
    // Stable sort keeps ties in insertion order
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked.truncate(n);
    ranked
}

/// In-memory backend for tests
#[derive(Debug, Default)]
pub struct MemoryScores {
    entries: Vec<ScoreEntry>,
    fail_next: bool,
}

impl MemoryScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next append fail once
    pub fn fail_next(&mut self) {
        self.fail_next = true;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ScoreLog for MemoryScores {
    fn append(&mut self, name: &str, score: u32) -> Result<(), StoreError> {
        if self.fail_next {
            self.fail_next = false;
            return Err(StoreError::Unavailable("injected failure".into()));
        }
        self.entries.push(ScoreEntry {
            name: name.to_string(),
            score,
            timestamp: unix_now(),
        });
        Ok(())
    }

    fn top_n(&self, n: usize) -> Result<Vec<ScoreEntry>, StoreError> {
        Ok(ranked(&self.entries, n))
    }
}

/// JSON-file backend, rewritten on every append
#[derive(Debug)]
pub struct JsonScores {
    dir: PathBuf,
    entries: Vec<ScoreEntry>,
}

impl JsonScores {
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(SCORES_FILE);
        let entries = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        log::info!("opened score log at {:?} ({} entries)", path, entries.len());
        Ok(Self { dir: dir.to_path_buf(), entries })
    }

    fn save(&self) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(&self.entries)?;
        fs::write(self.dir.join(SCORES_FILE), text)?;
        Ok(())
    }
}

impl ScoreLog for JsonScores {
    fn append(&mut self, name: &str, score: u32) -> Result<(), StoreError> {
        self.entries.push(ScoreEntry {
            name: name.to_string(),
            score,
            timestamp: unix_now(),
        });
        self.save()
    }

    fn top_n(&self, n: usize) -> Result<Vec<ScoreEntry>, StoreError> {
        Ok(ranked(&self.entries, n))
    }
}
