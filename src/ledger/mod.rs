//! Seen-users ledger
//!
//! Flat text file with one user name per line. The file is the only copy of
//! the ledger: every lookup scans it from the start, so edits made by hand
//! (or by another reset) are picked up immediately.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Users already greeted during the current session
#[derive(Debug, Clone)]
pub struct SeenUsers {
    path: PathBuf,
}

impl SeenUsers {
    /// Create a ledger backed by `path`. The file is not touched until the
    /// first operation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Truncate the ledger to empty, creating the file if needed
    pub fn reset(&self) -> Result<(), LedgerError> {
        File::create(&self.path).map_err(|e| self.io_error(e))?;
        log::debug!("Reset user list at {}", self.path.display());
        Ok(())
    }

    /// Whether `user_name` has a line of its own in the ledger.
    ///
    /// Matching is exact and case-sensitive; only surrounding whitespace
    /// (including a `\r` left by CRLF files) is ignored. A missing file is
    /// treated as an empty ledger.
    pub fn contains(&self, user_name: &str) -> Result<bool, LedgerError> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(self.io_error(e)),
        };

        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| self.io_error(e))?;
            if line.trim() == user_name {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Append `user_name` to the ledger. Callers check [`contains`] first;
    /// no de-duplication happens here.
    ///
    /// [`contains`]: SeenUsers::contains
    pub fn add(&self, user_name: &str) -> Result<(), LedgerError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;

        writeln!(file, "{}", user_name).map_err(|e| self.io_error(e))?;
        Ok(())
    }

    /// Every non-empty entry, in the order it was added
    pub fn entries(&self) -> Result<Vec<String>, LedgerError> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        let mut entries = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| self.io_error(e))?;
            let name = line.trim();
            if !name.is_empty() {
                entries.push(name.to_string());
            }
        }
        Ok(entries)
    }

    fn io_error(&self, source: io::Error) -> LedgerError {
        LedgerError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Ledger errors
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("User list I/O failed for {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
}
