#![deny(missing_docs)]

//! Recover the key of an encrypted MicroMsg database and export a
//! plaintext copy of it.
//!
//! The client encrypts `EnMicroMsg.db` with SQLCipher. The passphrase is
//! the first 7 hex characters of `md5(<device id><account id>)`, and both
//! identifiers can be recovered from two config files the client keeps in
//! the same directory:
//!
//! * `CompatibleInfo.cfg` holds the device identifier
//! * `systemInfo.cfg` holds one or more account identifiers
//!
//! # Recovering the key
//!
//! ```no_run
//! # fn main() -> Result<(), mmdb_rs::Error> {
//! let key = mmdb_rs::recover_key(
//!     "/sdcard/MicroMsg/CompatibleInfo.cfg",
//!     "/sdcard/MicroMsg/systemInfo.cfg",
//! )?;
//! println!("{}", key.cipher_key_prefix());
//! # Ok(())
//! # }
//! ```
//!
//! # Exporting a plaintext copy
//!
//! A [`Config`] describes one conversion. [`Config::derived`] looks for
//! the config files beside the database; [`Config::explicit`] uses a raw
//! key instead and never reads them.
//!
//! ```no_run
//! use mmdb_rs::Config;
//!
//! # fn main() -> Result<(), mmdb_rs::Error> {
//! let config = Config::derived("/sdcard/MicroMsg/EnMicroMsg.db", "plain.db");
//! mmdb_rs::convert(&config)?;
//! # Ok(())
//! # }
//! ```
//!
//! The engine is reached only through the [`CipherEngine`] and
//! [`CipherHandle`] traits, [`convert_with`] accepts any implementation.
//!
//! [`CipherEngine`]: crate::engine::CipherEngine
//! [`CipherHandle`]: crate::engine::CipherHandle

pub mod binary;
pub mod convert;
pub mod crypto;
pub mod engine;
pub mod errors;
pub mod logger;
mod utils;

pub use binary::{extract_identity, ExtractedIdentity};
pub use convert::{convert, convert_with, recover_key, Config, KeySource};
pub use crypto::{derive, CipherKey, DerivedKey, HexKey};
pub use errors::Error;
pub use utils::companion_paths;
