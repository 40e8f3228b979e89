//! High score storage
//!
//! The whole persisted state is one whole number kept as ASCII decimal text in
//! `high-score.txt` under the platform's user-data directory:
//! - Linux: `$XDG_DATA_HOME/meteor-storm` or `~/.local/share/meteor-storm`
//! - macOS: `~/Library/Application Support/Meteor Storm`
//! - Windows: `%APPDATA%\Meteor Storm`

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{GameError, Result};

pub const SCORE_FILE_NAME: &str = "high-score.txt";

/// Read/write access to the persisted high score
pub trait ScoreStore {
    fn read(&mut self) -> Result<u32>;
    fn write(&mut self, score: u32) -> Result<()>;
}

/// Score kept in a text file on disk
#[derive(Debug, Clone)]
pub struct ScoreFile {
    path: PathBuf,
}

impl ScoreFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Score file in the platform data directory
    pub fn in_data_dir() -> Result<Self> {
        Ok(Self::new(default_data_dir()?.join(SCORE_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for ScoreFile {
    /// Creates the directory and a `0` file when either is missing
    fn read(&mut self) -> Result<u32> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| GameError::io(dir, e))?;
        }
        if !self.path.exists() {
            fs::write(&self.path, "0").map_err(|e| GameError::io(&self.path, e))?;
            log::info!("Created high score file at {}", self.path.display());
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| GameError::io(&self.path, e))?;
        contents.trim().parse::<u32>().map_err(|_| GameError::ParseScore {
            path: self.path.clone(),
            contents,
        })
    }

    fn write(&mut self, score: u32) -> Result<()> {
        fs::write(&self.path, score.to_string()).map_err(|e| GameError::io(&self.path, e))?;
        log::info!("High score {} saved to {}", score, self.path.display());
        Ok(())
    }
}

/// In-memory store for tests and headless runs without a data directory
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    pub value: u32,
    /// Every successful write, oldest first
    pub writes: Vec<u32>,
    /// Fail every read and write
    pub broken: bool,
}

impl MemoryScoreStore {
    pub fn with_value(value: u32) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }
}

impl ScoreStore for MemoryScoreStore {
    fn read(&mut self) -> Result<u32> {
        if self.broken {
            return Err(GameError::io(
                "<memory>",
                std::io::Error::other("store unavailable"),
            ));
        }
        Ok(self.value)
    }

    fn write(&mut self, score: u32) -> Result<()> {
        if self.broken {
            return Err(GameError::io(
                "<memory>",
                std::io::Error::other("store unavailable"),
            ));
        }
        self.value = score;
        self.writes.push(score);
        Ok(())
    }
}

/// Platform-conventional user-data directory for this game
pub fn default_data_dir() -> Result<PathBuf> {
    let env = |key: &str| std::env::var_os(key).filter(|v| !v.is_empty()).map(PathBuf::from);

    if cfg!(target_os = "windows") {
        return env("APPDATA")
            .map(|p| p.join("Meteor Storm"))
            .ok_or(GameError::NoDataDir);
    }
    if cfg!(target_os = "macos") {
        return env("HOME")
            .map(|p| p.join("Library/Application Support/Meteor Storm"))
            .ok_or(GameError::NoDataDir);
    }
    env("XDG_DATA_HOME")
        .or_else(|| env("HOME").map(|home| home.join(".local/share")))
        .map(|p| p.join("meteor-storm"))
        .ok_or(GameError::NoDataDir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(SCORE_FILE_NAME);
        let mut store = ScoreFile::new(&path);

        assert_eq!(store.read().unwrap(), 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), "0");
    }

    #[test]
    fn test_read_trims_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SCORE_FILE_NAME);
        fs::write(&path, "  1234\n").unwrap();
        assert_eq!(ScoreFile::new(&path).read().unwrap(), 1234);
    }

    #[test]
    fn test_write_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SCORE_FILE_NAME);
        fs::write(&path, "999999 extra").unwrap();

        let mut store = ScoreFile::new(&path);
        store.write(42).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "42");
        assert_eq!(store.read().unwrap(), 42);
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SCORE_FILE_NAME);
        fs::write(&path, "lots").unwrap();
        let err = ScoreFile::new(&path).read().unwrap_err();
        assert!(matches!(err, GameError::ParseScore { .. }));
    }

    #[test]
    fn test_memory_store_records_writes() {
        let mut store = MemoryScoreStore::with_value(7);
        assert_eq!(store.read().unwrap(), 7);
        store.write(9).unwrap();
        assert_eq!(store.writes, vec![9]);

        store.broken = true;
        assert!(store.read().is_err());
        assert!(store.write(10).is_err());
    }
}
