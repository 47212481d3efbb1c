//! The encrypted database engine, seen through the few operations the
//! conversion needs

use crate::errors::EngineError;
use crate::utils;
use log::debug;
use rusqlite::{Connection, OpenFlags};
use std::io;
use std::path::Path;

type Result<T> = std::result::Result<T, EngineError>;

/// Opens encrypted database handles
pub trait CipherEngine {
    /// Handle to one open database
    type Handle: CipherHandle;

    /// Open an existing database file, no key is applied
    fn open(&self, path: &Path) -> Result<Self::Handle>;
}

/// An open encrypted database
pub trait CipherHandle {
    /// Run one or more SQL statements, discarding any rows
    fn execute(&mut self, statement: &str) -> Result<()>;

    /// Attach the file at `path` as an unencrypted database named `alias`
    fn attach(&mut self, path: &Path, alias: &str) -> Result<()> {
        let path = path
            .to_str()
            .ok_or_else(|| EngineError::NonUtf8Path(path.to_path_buf()))?;
        self.execute(&format!(
            "ATTACH DATABASE {} AS {} KEY '';",
            utils::quote_literal(path),
            alias
        ))
    }

    /// Detach the database named `alias`
    fn detach(&mut self, alias: &str) -> Result<()> {
        self.execute(&format!("DETACH DATABASE {};", alias))
    }

    /// Release the handle
    fn close(self) -> Result<()>;
}

/// SQLCipher, linked through rusqlite
#[derive(Debug, Default, Clone, Copy)]
pub struct SqlCipher;

impl CipherEngine for SqlCipher {
    type Handle = SqlCipherHandle;

    fn open(&self, path: &Path) -> Result<SqlCipherHandle> {
        // CREATE is needed for ATTACH to make the output, so refuse a missing source here
        if !path.is_file() {
            return Err(EngineError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                "no such database file",
            )));
        }
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(SqlCipherHandle { conn })
    }
}

/// Connection to a SQLCipher database
#[derive(Debug)]
pub struct SqlCipherHandle {
    conn: Connection,
}

impl CipherHandle for SqlCipherHandle {
    fn execute(&mut self, statement: &str) -> Result<()> {
        debug!("{}", loggable(statement));
        self.conn.execute_batch(statement)?;
        Ok(())
    }

    fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_conn, e)| EngineError::Sqlite(e))
    }
}

/// Statement as shown in the log, with key material removed
fn loggable(statement: &str) -> &str {
    if statement.trim_start().to_ascii_uppercase().starts_with("PRAGMA KEY") {
        "PRAGMA key = <redacted>;"
    } else {
        statement
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_pragma_is_redacted() {
        assert_eq!(
            loggable("PRAGMA key = \"x'00ff'\";"),
            "PRAGMA key = <redacted>;"
        );
        assert_eq!(loggable("  pragma KEY = \"abc\";"), "PRAGMA key = <redacted>;");
        assert_eq!(
            loggable("ATTACH DATABASE 'out.db' AS plaintext KEY '';"),
            "ATTACH DATABASE 'out.db' AS plaintext KEY '';"
        );
    }

    #[test]
    fn open_refuses_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("EnMicroMsg.db");
        let err = SqlCipher.open(&path).unwrap_err();
        assert!(matches!(err, EngineError::Io(_)));
        assert!(!path.exists());
    }

    #[test]
    fn attach_creates_plaintext_output() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source.db");
        let conn = Connection::open(&source).unwrap();
        conn.execute_batch("PRAGMA key = \"abc1234\"; CREATE TABLE t (x INTEGER);")
            .unwrap();
        conn.close().unwrap();

        let out = dir.path().join("out.db");
        let mut handle = SqlCipher.open(&source).unwrap();
        handle.execute("PRAGMA key = \"abc1234\";").unwrap();
        handle.attach(&out, "plaintext").unwrap();
        handle.detach("plaintext").unwrap();
        handle.close().unwrap();
        assert!(out.exists());
    }
}
