// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only log backing the ledger
//!
//! One JSON entry per line, each carrying a CRC32 of its record. A crash in the
//! middle of an append leaves at most one torn line at the end of the file;
//! opening the log cuts it off. An invalid line anywhere else is corruption and
//! refuses to open.

use courier_core::ReplayRecord;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur in WAL operations
#[derive(Debug, Error)]
pub enum WalError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("corrupted entry at line {line}: {reason}")]
    Corrupted { line: u64, reason: String },
}

/// A single line of the log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalEntry {
    /// Monotonically increasing sequence number
    pub seq: u64,
    pub record: ReplayRecord,
    /// CRC32 of the serialized record
    pub checksum: u32,
}

impl WalEntry {
    /// Create an entry with computed checksum
    pub fn new(seq: u64, record: ReplayRecord) -> Result<Self, WalError> {
        let checksum = Self::calculate_checksum(&record)?;
        Ok(Self {
            seq,
            record,
            checksum,
        })
    }

    fn calculate_checksum(record: &ReplayRecord) -> Result<u32, WalError> {
        let json = serde_json::to_string(record)?;
        Ok(crc32fast::hash(json.as_bytes()))
    }

    /// Verify the checksum matches the record
    pub fn verify(&self) -> bool {
        Self::calculate_checksum(&self.record).is_ok_and(|sum| sum == self.checksum)
    }

    /// Parse and verify one line of the log
    fn from_line(line: &[u8], line_number: u64) -> Result<Self, WalError> {
        let text = std::str::from_utf8(line).map_err(|e| WalError::Corrupted {
            line: line_number,
            reason: e.to_string(),
        })?;
        let entry: WalEntry = serde_json::from_str(text).map_err(|e| WalError::Corrupted {
            line: line_number,
            reason: e.to_string(),
        })?;
        if !entry.verify() {
            return Err(WalError::Corrupted {
                line: line_number,
                reason: "checksum mismatch".to_string(),
            });
        }
        Ok(entry)
    }
}

/// Outcome of scanning the log contents
struct Scan {
    records: Vec<ReplayRecord>,
    last_seq: u64,
    /// Byte length covering every valid entry
    valid_len: u64,
    /// The final valid entry is missing its newline
    unterminated: bool,
}

fn scan(bytes: &[u8]) -> Result<Scan, WalError> {
    let mut records = Vec::new();
    let mut last_seq = 0;
    let mut valid_len = 0;
    let mut unterminated = false;
    let mut offset = 0;
    let mut line_number = 0;

    while offset < bytes.len() {
        let (line, next, terminated) = match bytes[offset..].iter().position(|&b| b == b'\n') {
            Some(i) => (&bytes[offset..offset + i], offset + i + 1, true),
            None => (&bytes[offset..], bytes.len(), false),
        };
        line_number += 1;

        if line.iter().all(u8::is_ascii_whitespace) {
            if terminated {
                valid_len = next;
            }
            offset = next;
            continue;
        }

        match WalEntry::from_line(line, line_number) {
            Ok(entry) => {
                last_seq = last_seq.max(entry.seq);
                records.push(entry.record);
                valid_len = next;
                unterminated = !terminated;
            }
            Err(e) => {
                let rest = &bytes[next..];
                if rest.iter().all(u8::is_ascii_whitespace) {
                    // Torn final append; everything before it stands
                    tracing::warn!(line = line_number, error = %e, "discarding torn ledger tail");
                    break;
                }
                return Err(e);
            }
        }
        offset = next;
    }

    Ok(Scan {
        records,
        last_seq,
        valid_len: valid_len as u64,
        unterminated,
    })
}

/// Write-ahead log of replay records
pub struct Wal {
    file: File,
    sequence: u64,
}

impl Wal {
    /// Open or create a log at the given path.
    ///
    /// Returns the log positioned for appending together with every record it
    /// already holds. A torn final line is truncated away.
    pub fn open(path: &Path) -> Result<(Self, Vec<ReplayRecord>), WalError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .read(true)
            .open(path)?;

        let bytes = std::fs::read(path)?;
        let scan = scan(&bytes)?;

        if scan.valid_len < bytes.len() as u64 {
            tracing::warn!(
                path = %path.display(),
                discarded_bytes = bytes.len() as u64 - scan.valid_len,
                "truncating ledger to last valid entry"
            );
            file.set_len(scan.valid_len)?;
            file.sync_all()?;
        }
        if scan.unterminated {
            file.write_all(b"\n")?;
            file.sync_all()?;
        }

        Ok((
            Self {
                file,
                sequence: scan.last_seq,
            },
            scan.records,
        ))
    }

    /// Append a record and fsync before returning
    pub fn append(&mut self, record: &ReplayRecord) -> Result<u64, WalError> {
        let seq = self.sequence + 1;
        let entry = WalEntry::new(seq, record.clone())?;
        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');
        self.file.write_all(line.as_bytes())?;
        self.file.sync_all()?;
        self.sequence = seq;
        Ok(seq)
    }

    /// Get the current sequence number
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Read all records without modifying the file
    pub fn replay(path: &Path) -> Result<Vec<ReplayRecord>, WalError> {
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(scan(&bytes)?.records)
    }
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
