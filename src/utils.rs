//! Utilities to help working with mmdb-rs

use crate::binary::{ACCOUNT_CONFIG_FILE, DEVICE_CONFIG_FILE};
use std::path::{Path, PathBuf};

/// Quote `value` as an SQL string literal
pub(crate) fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Quote `value` as an SQL identifier, also accepted by `PRAGMA key`
pub(crate) fn quote_identifier(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Paths of the device and account config files that sit beside `database`
pub fn companion_paths<P: AsRef<Path>>(database: P) -> (PathBuf, PathBuf) {
    let dir = database.as_ref().parent().unwrap_or_else(|| Path::new(""));
    (dir.join(DEVICE_CONFIG_FILE), dir.join(ACCOUNT_CONFIG_FILE))
}
