//! Storage error types.
//!
//! Error codes:
//! - ATLAS_STORAGE_IO_ERROR (ERROR severity)
//! - ATLAS_JOURNAL_WRITE_FAILED (ERROR severity)
//! - ATLAS_JOURNAL_READ_FAILED (ERROR severity)
//! - ATLAS_DATA_CORRUPTION (FATAL severity)
//! - ATLAS_DUPLICATE_KEY (ERROR severity)
//! - ATLAS_FOREIGN_KEY_VIOLATION (ERROR severity)
//! - ATLAS_MISSING_ROW (ERROR severity)
//! - ATLAS_LOCK_POISONED (ERROR severity)
//!
//! The constraint codes (duplicate key, foreign key, missing row) are the
//! storage-layer backstop: repositories pre-check the same conditions for
//! better error messages, but the store is the authority.

use std::fmt;
use std::io;

/// Severity levels for storage errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation fails, server continues.
    Error,
    /// The process must terminate.
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Storage-specific error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorCode {
    /// Disk I/O failure.
    AtlasStorageIoError,
    /// Journal append failed.
    AtlasJournalWriteFailed,
    /// Journal read failed.
    AtlasJournalReadFailed,
    /// Journal checksum failure.
    AtlasDataCorruption,
    /// Unique constraint violated.
    AtlasDuplicateKey,
    /// Foreign-key constraint violated.
    AtlasForeignKeyViolation,
    /// Mutation addressed a row that does not exist.
    AtlasMissingRow,
    /// A table lock was poisoned by a panicking writer.
    AtlasLockPoisoned,
}

impl StorageErrorCode {
    /// Returns the stable string code.
    pub fn code(&self) -> &'static str {
        match self {
            StorageErrorCode::AtlasStorageIoError => "ATLAS_STORAGE_IO_ERROR",
            StorageErrorCode::AtlasJournalWriteFailed => "ATLAS_JOURNAL_WRITE_FAILED",
            StorageErrorCode::AtlasJournalReadFailed => "ATLAS_JOURNAL_READ_FAILED",
            StorageErrorCode::AtlasDataCorruption => "ATLAS_DATA_CORRUPTION",
            StorageErrorCode::AtlasDuplicateKey => "ATLAS_DUPLICATE_KEY",
            StorageErrorCode::AtlasForeignKeyViolation => "ATLAS_FOREIGN_KEY_VIOLATION",
            StorageErrorCode::AtlasMissingRow => "ATLAS_MISSING_ROW",
            StorageErrorCode::AtlasLockPoisoned => "ATLAS_LOCK_POISONED",
        }
    }

    /// Returns the severity level for this error.
    pub fn severity(&self) -> Severity {
        match self {
            StorageErrorCode::AtlasDataCorruption => Severity::Fatal,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for StorageErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Storage error with full context.
#[derive(Debug)]
pub struct StorageError {
    code: StorageErrorCode,
    message: String,
    details: Option<String>,
    source: Option<io::Error>,
}

impl StorageError {
    /// Disk I/O failure.
    pub fn io_error(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StorageErrorCode::AtlasStorageIoError,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    /// Journal append failure.
    pub fn write_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StorageErrorCode::AtlasJournalWriteFailed,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    /// Journal append failure without an I/O source.
    pub fn write_failed_no_source(message: impl Into<String>) -> Self {
        Self {
            code: StorageErrorCode::AtlasJournalWriteFailed,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Journal read failure.
    pub fn read_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StorageErrorCode::AtlasJournalReadFailed,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    /// Data corruption (FATAL).
    pub fn data_corruption(message: impl Into<String>) -> Self {
        Self {
            code: StorageErrorCode::AtlasDataCorruption,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Data corruption with byte offset context.
    pub fn corruption_at_offset(offset: u64, reason: impl Into<String>) -> Self {
        Self {
            code: StorageErrorCode::AtlasDataCorruption,
            message: reason.into(),
            details: Some(format!("byte_offset: {}", offset)),
            source: None,
        }
    }

    /// Unique-constraint violation.
    pub fn duplicate_key(table: &str, key: impl fmt::Display) -> Self {
        Self {
            code: StorageErrorCode::AtlasDuplicateKey,
            message: format!("duplicate key in table '{}'", table),
            details: Some(format!("key: {}", key)),
            source: None,
        }
    }

    /// Foreign-key violation.
    pub fn foreign_key_violation(table: &str, reference: impl fmt::Display) -> Self {
        Self {
            code: StorageErrorCode::AtlasForeignKeyViolation,
            message: format!("foreign key violated in table '{}'", table),
            details: Some(format!("reference: {}", reference)),
            source: None,
        }
    }

    /// Mutation addressed a missing row.
    pub fn missing_row(table: &str, key: impl fmt::Display) -> Self {
        Self {
            code: StorageErrorCode::AtlasMissingRow,
            message: format!("row not present in table '{}'", table),
            details: Some(format!("key: {}", key)),
            source: None,
        }
    }

    /// A lock guard was poisoned.
    pub fn lock_poisoned() -> Self {
        Self {
            code: StorageErrorCode::AtlasLockPoisoned,
            message: "table lock poisoned".into(),
            details: None,
            source: None,
        }
    }

    /// Returns the error code.
    pub fn code(&self) -> StorageErrorCode {
        self.code
    }

    /// Returns the severity level.
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns additional error details.
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Whether the process must terminate.
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }

    /// Whether this is a constraint violation rather than an I/O failure.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self.code,
            StorageErrorCode::AtlasDuplicateKey
                | StorageErrorCode::AtlasForeignKeyViolation
                | StorageErrorCode::AtlasMissingRow
        )
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
