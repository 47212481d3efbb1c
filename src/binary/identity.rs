use super::errors::{IdentityError, ScanError};
use super::scan::{find_field, DecodedField};
use super::signature::{Signature, ACCOUNT_ID, DEVICE_ID};
use log::{info, warn};
use std::fs;
use std::path::Path;

type Result<T> = std::result::Result<T, IdentityError>;

/// Config file holding the device identifier, next to the database
pub const DEVICE_CONFIG_FILE: &str = "CompatibleInfo.cfg";
/// Config file holding the account identifiers, next to the database
pub const ACCOUNT_CONFIG_FILE: &str = "systemInfo.cfg";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Identifiers recovered from the companion config files
///
/// Always holds at least one account id
pub struct ExtractedIdentity {
    device_id: String,
    account_ids: Vec<i32>,
}

impl ExtractedIdentity {
    /// Device identifier (IMEI) of the phone the database came from
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Every account id in the order it appears in the file
    pub fn account_ids(&self) -> &[i32] {
        &self.account_ids
    }

    /// Account id used for key derivation, the first one found
    pub fn account_id(&self) -> i32 {
        self.account_ids[0]
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| IdentityError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn format_error(path: &Path, signature: &Signature, source: ScanError) -> IdentityError {
    IdentityError::Format {
        path: path.to_path_buf(),
        field: signature.name,
        source,
    }
}

/// Read the device identifier from a `CompatibleInfo.cfg` file
pub fn read_device_id<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let buffer = read_file(path)?;
    let field = match find_field(&buffer, &DEVICE_ID) {
        Ok(DecodedField::Bytes(field)) => field,
        Ok(DecodedField::Integers(_)) => {
            return Err(format_error(path, &DEVICE_ID, ScanError::UnexpectedField))
        }
        Err(source) => return Err(format_error(path, &DEVICE_ID, source)),
    };
    String::from_utf8(field.to_vec()).map_err(|_| IdentityError::InvalidText {
        path: path.to_path_buf(),
    })
}

/// Read every account identifier from a `systemInfo.cfg` file
pub fn read_account_ids<P: AsRef<Path>>(path: P) -> Result<Vec<i32>> {
    let path = path.as_ref();
    let buffer = read_file(path)?;
    match find_field(&buffer, &ACCOUNT_ID) {
        Ok(DecodedField::Integers(account_ids)) => {
            for uin in &account_ids {
                info!("Found {}: {}", ACCOUNT_ID.name, uin);
            }
            Ok(account_ids)
        }
        Ok(DecodedField::Bytes(_)) => Err(format_error(
            path,
            &ACCOUNT_ID,
            ScanError::UnexpectedField,
        )),
        Err(ScanError::NotFound) => Err(IdentityError::NoAccountIds {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(format_error(path, &ACCOUNT_ID, source)),
    }
}

/// Read the device and account identifiers from their config files
///
/// The device config is read first; if it fails the account config is
/// never opened.
pub fn extract_identity<P, Q>(device_config: P, account_config: Q) -> Result<ExtractedIdentity>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let device_id = read_device_id(device_config)?;
    let account_ids = read_account_ids(account_config)?;
    if account_ids.len() > 1 {
        warn!(
            "Found {} account ids, using the first ({})",
            account_ids.len(),
            account_ids[0]
        );
    }
    Ok(ExtractedIdentity {
        device_id,
        account_ids,
    })
}
