use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// Failures locating or decoding a signature in a buffer
pub enum ScanError {
    /// No occurrence of the marker yielded a field
    #[error("marker not found")]
    NotFound,
    /// The signature's decode rule produced a different kind of field
    #[error("unexpected field kind for this record")]
    UnexpectedField,
    /// The marker was found but the buffer ends before its field does
    #[error("field truncated - needed {needed} bytes but only {available} remain")]
    Truncated {
        /// Bytes the field declares
        needed: usize,
        /// Bytes left in the buffer
        available: usize,
    },
}

#[derive(Error, Debug)]
/// Errors encountered extracting the device and account identifiers
pub enum IdentityError {
    /// A companion config file could not be read
    #[error("Could not read {path:?} - {source}")]
    Io {
        /// File that failed to read
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },
    /// A record is missing or malformed
    #[error("Malformed config {path:?} - {field} {source}")]
    Format {
        /// File that was scanned
        path: PathBuf,
        /// Name of the signature being decoded
        field: &'static str,
        /// What went wrong in the scan
        source: ScanError,
    },
    /// The device identifier is not valid UTF-8
    #[error("Malformed config {path:?} - device id is not valid text")]
    InvalidText {
        /// File that was scanned
        path: PathBuf,
    },
    /// No account identifier records were found
    #[error("No account id found in {path:?}")]
    NoAccountIds {
        /// File that was scanned
        path: PathBuf,
    },
}
