//! Database key derivation and key literals

use crate::errors::KeyError;
use crate::utils;
use log::info;
use md5::{Digest, Md5};

/// Number of hex characters of the token digest used as the passphrase
pub const KEY_PREFIX_LEN: usize = 7;

/// Hex encoded MD5 digest of `data`
pub(crate) fn md5_hex(data: &str) -> String {
    hex::encode(Md5::digest(data.as_bytes()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Key material derived from a device and account identifier
pub struct DerivedKey {
    token: String,
    cipher_key_prefix: String,
    directory_hash: String,
}

impl DerivedKey {
    /// Device id immediately followed by the decimal account id
    pub fn token(&self) -> &str {
        &self.token
    }

    /// First 7 hex characters of the MD5 of the token, the database passphrase
    pub fn cipher_key_prefix(&self) -> &str {
        &self.cipher_key_prefix
    }

    /// MD5 of `mm<account id>`, the name of the account's data directory
    pub fn directory_hash(&self) -> &str {
        &self.directory_hash
    }
}

/// Derive the database key for the given device and account
pub fn derive(device_id: &str, account_id: i32) -> DerivedKey {
    let token = format!("{}{}", device_id, account_id);
    let cipher_key_prefix = md5_hex(&token)[..KEY_PREFIX_LEN].to_string();
    let directory_hash = md5_hex(&format!("mm{}", account_id));
    info!(
        "token: {}, key: {}, dir name: {}",
        token, cipher_key_prefix, directory_hash
    );
    DerivedKey {
        token,
        cipher_key_prefix,
        directory_hash,
    }
}

#[derive(Clone, PartialEq, Eq)]
/// A raw database key given as hex
pub struct HexKey(String);

impl HexKey {
    /// Validate a hex encoded key
    pub fn parse(hex_key: &str) -> Result<HexKey, KeyError> {
        let hex_key = hex_key.trim();
        if hex_key.is_empty() {
            return Err(KeyError::InvalidHexKey("key is empty".to_string()));
        }
        hex::decode(hex_key).map_err(|e| KeyError::InvalidHexKey(e.to_string()))?;
        Ok(HexKey(hex_key.to_string()))
    }

    /// Hex digits of the key
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for HexKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("HexKey(..)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Key handed to the database engine
pub enum CipherKey {
    /// A passphrase the engine runs through its own KDF
    Passphrase(String),
    /// Raw key bytes, bypassing the engine's KDF
    Raw(HexKey),
}

impl CipherKey {
    /// Quoted value for `PRAGMA key = ...`
    pub(crate) fn pragma_value(&self) -> String {
        match self {
            CipherKey::Passphrase(passphrase) => utils::quote_identifier(passphrase),
            CipherKey::Raw(key) => format!("\"x'{}'\"", key.as_str()),
        }
    }
}

impl From<&DerivedKey> for CipherKey {
    fn from(key: &DerivedKey) -> CipherKey {
        CipherKey::Passphrase(key.cipher_key_prefix.clone())
    }
}

impl From<HexKey> for CipherKey {
    fn from(key: HexKey) -> CipherKey {
        CipherKey::Raw(key)
    }
}
