use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use vending_sales::OrderRecord;

use super::codec::{LedgerFormat, decode_ledger, encode_entry};
use super::r#trait::OrderLedger;
use crate::persistence::{PersistenceError, read_optional};

/// File-backed ledger. Appends are fsynced before `append` returns.
///
/// A failed append truncates the file back to its previous length. A partial last
/// line left by a crash is cut off before the next entry is written.
#[derive(Debug, Clone)]
pub struct FileOrderLedger {
    path: PathBuf,
    format: LedgerFormat,
}

impl FileOrderLedger {
    pub fn new(path: impl Into<PathBuf>, format: LedgerFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> LedgerFormat {
        self.format
    }
}

impl OrderLedger for FileOrderLedger {
    fn append(&self, record: &OrderRecord) -> Result<(), PersistenceError> {
        let entry = encode_entry(record, self.format)?;

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| PersistenceError::io(&self.path, e))?;
        let start = trim_partial_line(&mut file, &self.path)
            .map_err(|e| PersistenceError::io(&self.path, e))?;

        if let Err(err) = file
            .write_all(entry.as_bytes())
            .and_then(|()| file.sync_all())
        {
            if let Err(rollback) = file.set_len(start).and_then(|()| file.sync_all()) {
                tracing::error!(
                    path = %self.path.display(),
                    error = %rollback,
                    "could not truncate ledger after failed append"
                );
            }
            return Err(PersistenceError::io(&self.path, err));
        }

        tracing::debug!(
            path = %self.path.display(),
            format = %self.format,
            grand_total = %record.grand_total,
            "ledger entry appended"
        );
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<OrderRecord>, PersistenceError> {
        let contents = read_optional(&self.path)?;
        decode_ledger(&self.path, &contents)
    }
}

const TAIL_CHUNK: u64 = 4096;

/// Cut the file back to just after its last newline. Returns the resulting length.
fn trim_partial_line(file: &mut File, path: &Path) -> io::Result<u64> {
    let len = file.metadata()?.len();
    let mut end = len;
    let mut buf = vec![0u8; TAIL_CHUNK as usize];

    while end > 0 {
        let start = end.saturating_sub(TAIL_CHUNK);
        let chunk = &mut buf[..(end - start) as usize];
        file.seek(SeekFrom::Start(start))?;
        file.read_exact(chunk)?;
        if let Some(pos) = chunk.iter().rposition(|b| *b == b'\n') {
            end = start + pos as u64 + 1;
            break;
        }
        end = start;
    }

    if end < len {
        tracing::warn!(
            path = %path.display(),
            dropped_bytes = len - end,
            "truncating partial line at end of ledger"
        );
        file.set_len(end)?;
    }
    Ok(end)
}
