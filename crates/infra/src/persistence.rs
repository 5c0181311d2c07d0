//! Shared persistence error and file helpers for the file-backed stores.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Storage failure while loading or writing the catalog or the ledger.
///
/// These are **infrastructure errors**: the current action is abandoned and the
/// caller is told, but the process keeps running.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt record in {} at line {line}: {reason}", path.display())]
    Corrupt {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("failed to encode record: {0}")]
    Encode(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl PersistenceError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Read a whole file, treating a missing file as empty.
pub(crate) fn read_optional(path: &Path) -> Result<String, PersistenceError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(contents),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(err) => Err(PersistenceError::io(path, err)),
    }
}

/// Replace `path` with `contents` in one step: write a sibling temporary file,
/// fsync it, then rename it over the target.
pub(crate) fn write_atomically(path: &Path, contents: &[u8]) -> Result<(), PersistenceError> {
    let tmp = temporary_sibling(path);

    let result = (|| -> Result<(), PersistenceError> {
        let mut file = File::create(&tmp).map_err(|e| PersistenceError::io(&tmp, e))?;
        file.write_all(contents)
            .map_err(|e| PersistenceError::io(&tmp, e))?;
        file.sync_all().map_err(|e| PersistenceError::io(&tmp, e))?;
        fs::rename(&tmp, path).map_err(|e| PersistenceError::io(path, e))
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn temporary_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "catalog".into());
    name.push(".tmp");
    path.with_file_name(name)
}


#[cfg(test)]
mod tests {
    use super::test_support::ScratchDir;
    use super::*;

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = ScratchDir::new();
        assert_eq!(read_optional(&dir.path("absent.txt")).unwrap(), "");
    }

    #[test]
    fn atomic_write_replaces_contents_and_leaves_no_temp_file() {
        let dir = ScratchDir::new();
        let path = dir.path("drinks.txt");
        write_atomically(&path, b"first\n").unwrap();
        write_atomically(&path, b"second\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second\n");
        assert!(!dir.path("drinks.txt.tmp").exists());
    }

    #[test]
    fn atomic_write_into_missing_directory_fails_with_io_error() {
        let dir = ScratchDir::new();
        let path = dir.path("missing/drinks.txt");
        let err = write_atomically(&path, b"x").unwrap_err();
        assert!(matches!(err, PersistenceError::Io { .. }));
    }
}
