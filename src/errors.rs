//! Error types for mmdb-rs

pub use crate::binary::errors::{IdentityError, ScanError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
/// Failures reported by the encrypted database engine
pub enum EngineError {
    /// SQLCipher returned an error
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    /// The database file could not be accessed
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The path cannot be passed to the engine as SQL text
    #[error("Path {0:?} is not valid UTF-8")]
    NonUtf8Path(PathBuf),
    /// Failure reported by an engine without a richer error type
    #[error("{0}")]
    Other(String),
}

#[derive(Error, Debug)]
/// Errors opening the encrypted source database
pub enum OpenError {
    /// The engine could not open the file
    #[error("Failed to open {path:?} - {source}")]
    Engine {
        /// Source database path
        path: PathBuf,
        /// Underlying engine error
        source: EngineError,
    },
}

#[derive(Error, Debug)]
/// Errors applying or verifying the database key
pub enum KeyError {
    /// The supplied hex key is malformed
    #[error("Invalid hex key - {0}")]
    InvalidHexKey(String),
    /// `PRAGMA key` failed
    #[error("Failed to assign key - {0}")]
    Apply(#[source] EngineError),
    /// `PRAGMA cipher_compatibility` failed
    #[error("Failed to set cipher compatibility {version} - {source}")]
    Compatibility {
        /// Requested compatibility version
        version: u8,
        /// Underlying engine error
        source: EngineError,
    },
    /// `PRAGMA cipher_use_hmac = OFF` failed
    #[error("Failed to turn off hmac - {0}")]
    DisableHmac(#[source] EngineError),
    /// The test query failed, the key is wrong or the file is not a database
    #[error("Key rejected, test query failed - wrong key or corrupt database - {0}")]
    Rejected(#[source] EngineError),
}

#[derive(Error, Debug)]
/// Errors writing the plaintext copy
pub enum ExportError {
    /// The output file already exists and overwriting was not requested
    #[error("Output {path:?} already exists")]
    OutputExists {
        /// Output database path
        path: PathBuf,
    },
    /// The output path names the source database itself
    #[error("Output {path:?} is the source database")]
    OutputIsSource {
        /// Output database path
        path: PathBuf,
    },
    /// An existing output could not be removed before exporting
    #[error("Could not remove existing output {path:?} - {source}")]
    RemoveExisting {
        /// Output database path
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },
    /// The output could not be attached to the source connection
    #[error("Failed to attach database {path:?} - {source}")]
    Attach {
        /// Output database path
        path: PathBuf,
        /// Underlying engine error
        source: EngineError,
    },
    /// `sqlcipher_export` failed
    #[error("Failed to export plaintext data - {0}")]
    Export(#[source] EngineError),
    /// The output could not be detached after exporting
    #[error("Failed to detach database - {0}")]
    Detach(#[source] EngineError),
}

#[derive(Error, Debug)]
/// Wrapper error type for this library
pub enum Error {
    /// Failed reading the device or account identifier
    #[error("Could not recover key: {0}")]
    Identity(#[from] IdentityError),
    /// Failed opening the source database
    #[error("Could not open database: {0}")]
    Open(#[from] OpenError),
    /// The key could not be applied or was wrong
    #[error("Could not unlock database: {0}")]
    Key(#[from] KeyError),
    /// Failed producing the plaintext copy
    #[error("Could not export database: {0}")]
    Export(#[from] ExportError),
    /// The source database did not close cleanly
    #[error("Could not close database: {0}")]
    Close(#[source] EngineError),
}
