// In: src/error.rs

//! This module defines the single, unified error type for the entire costar library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.

use serde::Serialize;
use thiserror::Error;

/// Which lookup table an unresolved reference was looked up in.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    Film,
    Person,
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferenceKind::Film => write!(f, "film"),
            ReferenceKind::Person => write!(f, "person"),
        }
    }
}

#[derive(Error, Debug)]
pub enum CostarError {
    // =========================================================================
    // === Caller Preconditions (rejected before any streaming work starts)
    // =========================================================================
    #[error("Invalid pattern choice {0}: expected a number from 1 to 8")]
    InvalidChoice(usize),

    #[error("Invalid result count {0}: expected a number from 1 to 10")]
    InvalidResultCount(usize),

    #[error("Invalid rating range [{min}, {max}]: bounds must lie in 0.0..=10.0 and min < max")]
    InvalidRatingRange { min: f64, max: f64 },

    #[error("Invalid year range [{min}, {max}]: bounds must lie in 1900..=2018 and min < max")]
    InvalidYearRange { min: i32, max: i32 },

    // =========================================================================
    // === Recoverable, Result-Level Conditions
    // =========================================================================
    #[error("Requested {requested} pairs but only {available} distinct pairs were found")]
    InsufficientResults { requested: usize, available: usize },

    #[error("Unresolved {kind} reference: {id}")]
    UnresolvedReference { kind: ReferenceKind, id: String },

    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    // =========================================================================
    // === Structural / Setup Errors
    // =========================================================================
    #[error("Required column '{0}' is missing from the input table")]
    MissingColumn(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal logic error (this is a bug): {0}")]
    InternalError(String),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error originating from the Arrow library (CSV decoding, batch assembly).
    #[error("Arrow operation failed: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// An error originating from the underlying I/O subsystem (e.g., file not found).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from the Serde JSON library, typically while loading a config file.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

impl CostarError {
    /// Returns `true` for failures a caller should report and move past rather
    /// than treat as fatal.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CostarError::InsufficientResults { .. }
                | CostarError::UnresolvedReference { .. }
                | CostarError::MalformedRecord(_)
        )
    }
}

/// Crate-wide result alias.
pub type Result<T, E = CostarError> = std::result::Result<T, E>;
