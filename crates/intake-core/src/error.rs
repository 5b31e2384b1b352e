//! Error types for submission extraction and validation.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ExtractionError`.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Errors that can occur while extracting and validating a submission.
///
/// Every failure in the pipeline maps to exactly one variant so the caller
/// can hand the submitter a targeted message. Underlying I/O and archive
/// library errors are translated at the point of detection; none of them
/// surface raw.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Input is neither a directory nor a recognized archive format.
    #[error("{path} is an invalid file type")]
    InvalidFileType {
        /// The path that failed classification.
        path: PathBuf,
    },

    /// An archive or required submission file is missing, unreadable, or
    /// malformed.
    #[error("{path} does not exist, is not readable, or is malformed")]
    FailedToExtract {
        /// The file that could not be read.
        path: PathBuf,
    },

    /// Directory entry count does not line up with the declared team size.
    #[error("found {entries} directory entries for {members} team members")]
    ExtraneousPublicKey {
        /// Declared team member count.
        members: usize,
        /// Entries actually present in the submission root.
        entries: usize,
    },

    /// `metadata.json` contents are not valid JSON.
    #[error("malformed metadata.json: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// Team member list is empty or a member entry is missing or has an
    /// inaccessible required field.
    #[error("team member validation failed: {reason}")]
    Validation {
        /// What failed, in submitter-facing terms.
        reason: String,
    },

    /// Hostname does not satisfy the label grammar.
    #[error("invalid hostname {hostname:?}")]
    InvalidHostname {
        /// The rejected hostname value.
        hostname: String,
    },

    /// Required top-level metadata fields are absent or unusable.
    #[error("invalid metadata: required fields missing or not text: {}", .fields.join(", "))]
    InvalidMetadata {
        /// The offending field names.
        fields: Vec<String>,
    },
}

impl ExtractionError {
    /// Returns `true` if this error indicates a problem with the submission
    /// contents rather than with reading it off disk.
    ///
    /// # Examples
    ///
    /// ```
    /// use intake_core::ExtractionError;
    ///
    /// let err = ExtractionError::InvalidHostname {
    ///     hostname: "-bad".into(),
    /// };
    /// assert!(err.is_validation_failure());
    ///
    /// let err = ExtractionError::FailedToExtract {
    ///     path: "team.tar.gz".into(),
    /// };
    /// assert!(!err.is_validation_failure());
    /// ```
    #[must_use]
    pub const fn is_validation_failure(&self) -> bool {
        matches!(
            self,
            Self::ExtraneousPublicKey { .. }
                | Self::Validation { .. }
                | Self::InvalidHostname { .. }
                | Self::InvalidMetadata { .. }
        )
    }
}
