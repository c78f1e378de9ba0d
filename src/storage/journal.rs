//! Append-only mutation journal.
//!
//! Every committed mutation is one framed record:
//!
//! ```text
//! +------------------+
//! | Payload Length   | (u32 LE)
//! +------------------+
//! | Payload          | (JSON-encoded journal record)
//! +------------------+
//! | Checksum         | (u32 LE, crc32 of the payload)
//! +------------------+
//! ```
//!
//! Appends are fsynced before the in-memory tables change, so the journal is
//! the durable source of truth: startup replays it from the beginning through
//! the same apply path as live writes.
//!
//! A checksum mismatch is data corruption and fatal. A truncated record at
//! the tail is a torn write from a crash: replay stops there and the torn
//! bytes are trimmed before the next append.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::errors::{StorageError, StorageResult};
use crate::model::{City, Country, CountryLanguage};

/// Upper bound on a single journal payload. Anything larger is corruption,
/// not data: the biggest legitimate record is one country row.
const MAX_PAYLOAD_LEN: u32 = 1 << 20;

/// One journalled mutation. Delete-country carries only the key; the cascade
/// is recomputed during apply so that replay and live execution agree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum JournalEntry {
    InsertCountry { country: Country },
    ReplaceCountry { country: Country },
    DeleteCountry { code: String },
    InsertCity { city: City },
    ReplaceCity { city: City },
    DeleteCity { id: i64 },
    InsertLanguage { language: CountryLanguage },
    ReplaceLanguage { language: CountryLanguage },
    DeleteLanguage { country_code: String, language: String },
}

/// On-disk record: the entry plus its commit timestamp.
#[derive(Debug, Serialize, Deserialize)]
struct JournalRecord {
    ts: String,
    #[serde(flatten)]
    entry: JournalEntry,
}

impl JournalRecord {
    fn now(entry: &JournalEntry) -> Self {
        let ts: DateTime<Utc> = Utc::now();
        Self {
            ts: ts.to_rfc3339_opts(SecondsFormat::Millis, true),
            entry: entry.clone(),
        }
    }
}

/// Append-only journal writer with fsync after every record.
#[derive(Debug)]
pub struct JournalWriter {
    path: PathBuf,
    file: File,
}

impl JournalWriter {
    /// Opens or creates `<data_dir>/journal.dat`, creating the directory
    /// if needed.
    pub fn open(data_dir: &Path) -> StorageResult<Self> {
        if !data_dir.exists() {
            fs::create_dir_all(data_dir).map_err(|e| {
                StorageError::io_error(
                    format!("failed to create data directory: {}", data_dir.display()),
                    e,
                )
            })?;
        }

        let path = data_dir.join("journal.dat");
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                StorageError::io_error(
                    format!("failed to open journal: {}", path.display()),
                    e,
                )
            })?;

        Ok(Self { path, file })
    }

    /// Returns the journal file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Trims the file to `len` bytes. Used once at startup to drop a torn
    /// tail record left by a crash.
    pub fn truncate_to(&mut self, len: u64) -> StorageResult<()> {
        self.file
            .set_len(len)
            .map_err(|e| StorageError::io_error("failed to trim torn journal tail", e))
    }

    /// Appends one entry and fsyncs. The caller must not mutate the tables
    /// until this returns Ok.
    pub fn append(&mut self, entry: &JournalEntry) -> StorageResult<()> {
        let payload = serde_json::to_vec(&JournalRecord::now(entry))
            .map_err(|e| StorageError::write_failed_no_source(format!("encode failed: {}", e)))?;

        let mut frame = Vec::with_capacity(payload.len() + 8);
        frame.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        frame.extend_from_slice(&payload);
        frame.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());

        self.file
            .write_all(&frame)
            .map_err(|e| StorageError::write_failed("journal append failed", e))?;
        self.file
            .sync_data()
            .map_err(|e| StorageError::write_failed("journal fsync failed", e))?;

        Ok(())
    }
}

/// Sequential journal reader used for startup replay.
pub struct JournalReader {
    reader: BufReader<File>,
    /// Offset of the byte after the last fully-read record.
    valid_len: u64,
}

impl JournalReader {
    /// Opens the journal at `path` for replay.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let file = File::open(path).map_err(|e| {
            StorageError::read_failed(format!("failed to open journal: {}", path.display()), e)
        })?;
        Ok(Self {
            reader: BufReader::new(file),
            valid_len: 0,
        })
    }

    /// Bytes covered by complete, verified records. After replay the writer
    /// truncates the file to this length.
    pub fn valid_len(&self) -> u64 {
        self.valid_len
    }

    /// Reads the next record. `Ok(None)` at a clean end of file or at a torn
    /// tail record; a checksum or decode failure is corruption.
    pub fn read_next(&mut self) -> StorageResult<Option<JournalEntry>> {
        let mut len_buf = [0u8; 4];
        match read_exact_or_eof(&mut self.reader, &mut len_buf)? {
            ReadOutcome::Eof | ReadOutcome::Partial => return Ok(None),
            ReadOutcome::Full => {}
        }

        let len = u32::from_le_bytes(len_buf);
        if len == 0 || len > MAX_PAYLOAD_LEN {
            return Err(StorageError::corruption_at_offset(
                self.valid_len,
                format!("implausible record length {}", len),
            ));
        }

        let mut payload = vec![0u8; len as usize];
        match read_exact_or_eof(&mut self.reader, &mut payload)? {
            ReadOutcome::Eof | ReadOutcome::Partial => return Ok(None),
            ReadOutcome::Full => {}
        }

        let mut crc_buf = [0u8; 4];
        match read_exact_or_eof(&mut self.reader, &mut crc_buf)? {
            ReadOutcome::Eof | ReadOutcome::Partial => return Ok(None),
            ReadOutcome::Full => {}
        }

        let expected = u32::from_le_bytes(crc_buf);
        let actual = crc32fast::hash(&payload);
        if expected != actual {
            return Err(StorageError::corruption_at_offset(
                self.valid_len,
                format!("checksum mismatch: stored {:08x}, computed {:08x}", expected, actual),
            ));
        }

        let record: JournalRecord = serde_json::from_slice(&payload).map_err(|e| {
            StorageError::corruption_at_offset(self.valid_len, format!("undecodable record: {}", e))
        })?;

        self.valid_len += 8 + u64::from(len);
        Ok(Some(record.entry))
    }
}

enum ReadOutcome {
    Full,
    Partial,
    Eof,
}

/// Fills `buf` completely, or reports a clean EOF / short read at the tail.
fn read_exact_or_eof(reader: &mut impl Read, buf: &mut [u8]) -> StorageResult<ReadOutcome> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader
            .read(&mut buf[filled..])
            .map_err(|e| StorageError::read_failed("journal read failed", e))?;
        if n == 0 {
            return Ok(if filled == 0 {
                ReadOutcome::Eof
            } else {
                ReadOutcome::Partial
            });
        }
        filled += n;
    }
    Ok(ReadOutcome::Full)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry() -> JournalEntry {
        JournalEntry::DeleteCity { id: 42 }
    }

    #[test]
    fn test_append_then_replay_round_trip() {
        let tmp = TempDir::new().unwrap();
        let mut writer = JournalWriter::open(tmp.path()).unwrap();
        writer.append(&entry()).unwrap();
        writer
            .append(&JournalEntry::DeleteLanguage {
                country_code: "XYZ".to_string(),
                language: "Testish".to_string(),
            })
            .unwrap();

        let mut reader = JournalReader::open(&tmp.path().join("journal.dat")).unwrap();
        assert_eq!(reader.read_next().unwrap(), Some(entry()));
        assert!(matches!(
            reader.read_next().unwrap(),
            Some(JournalEntry::DeleteLanguage { .. })
        ));
        assert_eq!(reader.read_next().unwrap(), None);
    }

    #[test]
    fn test_torn_tail_stops_replay() {
        let tmp = TempDir::new().unwrap();
        let mut writer = JournalWriter::open(tmp.path()).unwrap();
        writer.append(&entry()).unwrap();
        let path = writer.path().to_path_buf();
        let full_len = fs::metadata(&path).unwrap().len();

        writer.append(&entry()).unwrap();
        drop(writer);

        // Chop the second record in half, as a crash mid-append would.
        let torn_len = full_len + 3;
        let file = OpenOptions::new().write(true).open(&path).unwrap();
        file.set_len(torn_len).unwrap();

        let mut reader = JournalReader::open(&path).unwrap();
        assert!(reader.read_next().unwrap().is_some());
        assert!(reader.read_next().unwrap().is_none());
        assert_eq!(reader.valid_len(), full_len);
    }

    #[test]
    fn test_checksum_mismatch_is_fatal_corruption() {
        let tmp = TempDir::new().unwrap();
        let mut writer = JournalWriter::open(tmp.path()).unwrap();
        writer.append(&entry()).unwrap();
        let path = writer.path().to_path_buf();
        drop(writer);

        // Flip one payload byte.
        let mut bytes = fs::read(&path).unwrap();
        bytes[6] ^= 0xFF;
        fs::write(&path, bytes).unwrap();

        let mut reader = JournalReader::open(&path).unwrap();
        let err = reader.read_next().unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_empty_journal_replays_nothing() {
        let tmp = TempDir::new().unwrap();
        let writer = JournalWriter::open(tmp.path()).unwrap();
        let mut reader = JournalReader::open(writer.path()).unwrap();
        assert_eq!(reader.read_next().unwrap(), None);
        assert_eq!(reader.valid_len(), 0);
    }
}
