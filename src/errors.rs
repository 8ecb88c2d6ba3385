/*!
 * Error types for the magmerge application.
 *
 * Merge failures are contained at the smallest affected unit (one issue or one
 * volume); only a missing input root aborts a whole run. The variants below
 * mirror that taxonomy, using the thiserror crate for ergonomic definitions.
 */

use thiserror::Error;

/// Errors that can occur while merging publication lines into volumes
#[derive(Error, Debug)]
pub enum MergeError {
    /// Input root or a publication line directory does not exist
    #[error("Input directory not found: {0}")]
    InputMissing(String),

    /// An issue file could not be read
    #[error("Failed to read issue {file}: {reason}")]
    IssueRead {
        /// Issue filename
        file: String,
        /// Underlying failure
        reason: String,
    },

    /// An issue file contained nothing but whitespace
    #[error("Issue {0} is empty")]
    EmptyIssue(String),

    /// A volume could not be persisted
    #[error("Failed to write volume {file}: {reason}")]
    VolumeWrite {
        /// Target volume filename
        file: String,
        /// Underlying failure
        reason: String,
    },

    /// A publication line produced no readable issues
    #[error("Publication line {0} has no non-empty issues")]
    EmptyLine(String),

    /// A date pattern failed to compile or has the wrong shape
    #[error("Invalid date pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// Offending pattern source
        pattern: String,
        /// Why it was rejected
        reason: String,
    },
}

impl MergeError {
    /// Whether this error only affects a single issue or volume
    pub fn is_contained(&self) -> bool {
        matches!(
            self,
            Self::IssueRead { .. } | Self::EmptyIssue(_) | Self::VolumeWrite { .. } | Self::EmptyLine(_)
        )
    }
}

/// Application-level errors reported before a run starts
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from the merge engine
    #[error("Merge error: {0}")]
    Merge(#[from] MergeError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}
