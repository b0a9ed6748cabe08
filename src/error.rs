//! Error types for calculator configuration, solving and problem files.

use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can make a calculator operation fail.
///
/// Infeasible coverage is not an error: it is reported as a valid cover with
/// a fraction below one.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration was attempted after the first solve froze the calculator.
    #[error("calculator is already computing; configuration is closed")]
    ComputePhase,

    #[error("picture limit of {max} reached")]
    PictureLimit { max: usize },

    #[error("expected {expected} values, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("binary value at element {element} must be 0 or 1, got {value}")]
    NonBinaryValue { element: usize, value: u32 },

    #[error("value {value} at element {element} exceeds maximum {max}")]
    ValueOutOfRange { element: usize, value: u32, max: u32 },

    #[error("required cover was already set")]
    RequiredCoverAlreadySet,

    #[error("no pictures were added")]
    NoPictures,

    #[error("cover limit must lie strictly between 0 and 1, got {0}")]
    InvalidCoverLimit(f64),

    #[error("size limit must be positive")]
    InvalidSizeLimit,

    #[error("picture index {index} out of range ({count} pictures)")]
    UnknownPicture { index: usize, count: usize },

    /// A previous computation was aborted and its state released.
    #[error("calculator was aborted by an earlier failure and can only be dropped")]
    Unusable,

    /// An internal invariant of the search was violated.
    #[error("internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
}

impl Error {
    /// Returns true for errors raised by the caller's misuse of the API, as
    /// opposed to failures inside a running computation.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::ComputePhase
                | Error::PictureLimit { .. }
                | Error::LengthMismatch { .. }
                | Error::NonBinaryValue { .. }
                | Error::ValueOutOfRange { .. }
                | Error::RequiredCoverAlreadySet
                | Error::NoPictures
                | Error::InvalidCoverLimit(_)
                | Error::InvalidSizeLimit
                | Error::UnknownPicture { .. }
        )
    }
}
