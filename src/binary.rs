//! Companion config files and the signatures used to scan them

pub(crate) mod errors;
mod identity;
mod scan;
pub mod signature;

pub use identity::{
    extract_identity, read_account_ids, read_device_id, ExtractedIdentity,
    ACCOUNT_CONFIG_FILE, DEVICE_CONFIG_FILE,
};
pub use scan::{find_field, find_marker, read_length_prefixed, DecodedField, FixedWidthFields};
pub use signature::{DecodeRule, Signature};
