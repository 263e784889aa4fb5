/// Persistent ranking: one best score per player name.
///
/// Stored as a JSON object `{ "name": score }` written in ranking order. Kept
/// sorted descending by score (ties by name) and capped to the configured
/// number of entries.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::error::LeaderboardError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u32,
}

#[derive(Clone, Debug)]
pub struct Leaderboard {
    path: PathBuf,
    cap: usize,
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// An empty board bound to `path`. Nothing is read until [`Self::load`].
    pub fn new(path: impl Into<PathBuf>, cap: usize) -> Self {
        Self {
            path: path.into(),
            cap,
            entries: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn best(&self, name: &str) -> Option<u32> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.score)
    }

    /// Replace the in-memory board with the stored one. A missing or corrupt
    /// file leaves the board empty.
    pub fn load(&mut self) {
        self.entries = match read_board(&self.path) {
            Ok(stored) => {
                info!(path = %self.path.display(), entries = stored.len(), "leaderboard loaded");
                stored
            }
            Err(err) => {
                warn!(error = %err, "leaderboard unavailable, starting empty");
                Vec::new()
            }
        };
        self.normalize();
    }

    /// Merge `(name, score)` into the in-memory board only.
    pub fn record(&mut self, name: &str, score: u32) {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.score = entry.score.max(score),
            None => self.entries.push(LeaderboardEntry {
                name: name.to_string(),
                score,
            }),
        }
        self.normalize();
    }

    /// Merge `(name, score)` into the stored board and write it back, best
    /// score first. A corrupt stored file is logged and overwritten.
    pub fn save(&mut self, name: &str, score: u32) -> Result<(), LeaderboardError> {
        self.entries = match read_board(&self.path) {
            Ok(stored) => stored,
            Err(LeaderboardError::Read { ref source, .. })
                if source.kind() == io::ErrorKind::NotFound =>
            {
                Vec::new()
            }
            Err(err) => {
                warn!(error = %err, "stored leaderboard unreadable, overwriting");
                Vec::new()
            }
        };
        self.record(name, score);

        let map: Map<String, Value> = self
            .entries
            .iter()
            .map(|e| (e.name.clone(), Value::from(e.score)))
            .collect();
        let json = serde_json::to_string(&map)?;
        std::fs::write(&self.path, json).map_err(|source| LeaderboardError::Write {
            path: self.path.clone(),
            source,
        })?;
        info!(name, score, path = %self.path.display(), "score saved");
        Ok(())
    }

    fn normalize(&mut self) {
        self.entries
            .sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.name.cmp(&b.name)));
        self.entries.truncate(self.cap);
    }
}

fn read_board(path: &Path) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
    let raw = std::fs::read_to_string(path).map_err(|source| LeaderboardError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let map: HashMap<String, u32> =
        serde_json::from_str(&raw).map_err(|source| LeaderboardError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(map
        .into_iter()
        .map(|(name, score)| LeaderboardEntry { name, score })
        .collect())
}
