//! Error taxonomy for the normalization core.
//!
//! Only two failure classes ever leave [`normalize`](crate::normalize):
//! a schema mismatch on a required field, or a policy collaborator
//! failure passed through untouched. Everything else (missing optional
//! columns, malformed metadata, non-numeric scores) is recovered locally
//! to a null or default value and never surfaces as an error.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, NormalizeError>;

/// Failure normalizing a single source row.
#[derive(Error, Debug)]
pub enum NormalizeError {
    /// A required field (`id`, `url`, `source`, `license`) is absent from
    /// the schema, out of range for the row, or null where a value is
    /// mandatory. Fatal for the record; no partial document is produced.
    #[error("schema mismatch: field '{field}' {reason}")]
    SchemaMismatch { field: String, reason: String },

    /// A category or authority collaborator failed. The normalizer does
    /// not own retry or fallback policy for collaborators, so the error
    /// propagates to the caller as-is.
    #[error("collaborator failure: {0}")]
    Collaborator(#[from] anyhow::Error),
}

impl NormalizeError {
    pub(crate) fn missing(field: &str) -> Self {
        Self::SchemaMismatch {
            field: field.to_string(),
            reason: "is not present in the schema".to_string(),
        }
    }

    pub(crate) fn out_of_range(field: &str, position: usize, row_len: usize) -> Self {
        Self::SchemaMismatch {
            field: field.to_string(),
            reason: format!("maps to position {position} but the row has {row_len} columns"),
        }
    }

    pub(crate) fn null(field: &str) -> Self {
        Self::SchemaMismatch {
            field: field.to_string(),
            reason: "is null but has no sensible default".to_string(),
        }
    }

    pub(crate) fn wrong_type(field: &str, expected: &str) -> Self {
        Self::SchemaMismatch {
            field: field.to_string(),
            reason: format!("is not {expected}"),
        }
    }
}
