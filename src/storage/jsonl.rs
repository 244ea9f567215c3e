//! JSONL record files with lock-based concurrency
//!
//! Every file-backed store keeps its records as one JSON object per line.
//! Mutations take an exclusive lock on a sidecar `.lock` file for the whole
//! read-modify-write, then replace the data file via temp file + atomic
//! rename. The sidecar is locked (rather than the data file) because the
//! rename swaps the data file's inode out from under any held lock.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::service::StoreError;

/// A held advisory lock on a store's sidecar lock file
///
/// The lock is released when the guard drops.
pub(crate) struct Flock {
    _file: File,
}

impl Flock {
    /// Takes a shared lock for reading
    pub fn shared(data_path: &Path) -> Result<Self, StoreError> {
        let file = Self::open_lock_file(data_path)?;
        file.lock_shared()?;
        Ok(Self { _file: file })
    }

    /// Takes an exclusive lock for a read-modify-write
    pub fn exclusive(data_path: &Path) -> Result<Self, StoreError> {
        let file = Self::open_lock_file(data_path)?;
        file.lock_exclusive()?;
        Ok(Self { _file: file })
    }

    fn open_lock_file(data_path: &Path) -> Result<File, StoreError> {
        let lock_path = lock_path(data_path);
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)?)
    }
}

fn lock_path(data_path: &Path) -> PathBuf {
    let mut os = data_path.as_os_str().to_os_string();
    os.push(".lock");
    PathBuf::from(os)
}

/// Reads all records from a JSONL file; a missing file is an empty store
///
/// Callers must hold a [`Flock`] for the duration.
pub(crate) fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut records = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let record: T = serde_json::from_str(&line).map_err(|e| {
            StoreError::Corrupt(format!("{} line {}: {}", path.display(), line_num + 1, e))
        })?;
        records.push(record);
    }

    Ok(records)
}

/// Rewrites a JSONL file from the given records (temp file + atomic rename)
///
/// Callers must hold an exclusive [`Flock`] for the duration.
pub(crate) fn write_records<T, I>(path: &Path, records: I) -> Result<(), StoreError>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("jsonl.tmp");

    {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)?;
        let mut writer = BufWriter::new(file);

        for record in records {
            let line = serde_json::to_string(&record)
                .map_err(|e| StoreError::Corrupt(format!("serialize record: {}", e)))?;
            writeln!(writer, "{}", line)?;
        }

        writer.flush()?;
    }

    fs::rename(&temp_path, path)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Rec {
        name: String,
        n: u32,
    }

    fn rec(name: &str, n: u32) -> Rec {
        Rec {
            name: name.to_string(),
            n,
        }
    }

    #[test]
    fn missing_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let records: Vec<Rec> = read_records(&dir.path().join("absent.jsonl")).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn write_then_read_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("recs.jsonl");

        write_records(&path, [rec("a", 1), rec("b", 2)]).unwrap();

        let loaded: Vec<Rec> = read_records(&path).unwrap();
        assert_eq!(loaded, vec![rec("a", 1), rec("b", 2)]);
    }

    #[test]
    fn rewrite_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("recs.jsonl");

        write_records(&path, [rec("a", 1)]).unwrap();
        write_records(&path, [rec("b", 2)]).unwrap();

        assert!(!path.with_extension("jsonl.tmp").exists());
        let loaded: Vec<Rec> = read_records(&path).unwrap();
        assert_eq!(loaded, vec![rec("b", 2)]);
    }

    #[test]
    fn corrupt_line_is_reported_with_location() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("recs.jsonl");
        std::fs::write(&path, "{\"name\":\"ok\",\"n\":1}\nnot json\n").unwrap();

        let err = read_records::<Rec>(&path).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn blank_lines_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("recs.jsonl");
        std::fs::write(&path, "\n{\"name\":\"ok\",\"n\":1}\n\n").unwrap();

        let loaded: Vec<Rec> = read_records(&path).unwrap();
        assert_eq!(loaded, vec![rec("ok", 1)]);
    }

    #[test]
    fn lock_guards_are_reentrant_for_readers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("recs.jsonl");

        let _a = Flock::shared(&path).unwrap();
        let _b = Flock::shared(&path).unwrap();
    }
}
