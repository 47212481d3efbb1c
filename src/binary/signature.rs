//! Byte signatures for the MicroMsg companion config files
//!
//! Both `CompatibleInfo.cfg` and `systemInfo.cfg` are Java object
//! serialization streams written by the client. The records are not
//! documented, the markers below were recovered by comparing dumps from
//! several devices. `73 71 00 7e 00 02` is a `TC_OBJECT` + `TC_REFERENCE`
//! back-reference to the boxed value class both files use for their map
//! entries.

/// How the bytes following a marker are decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeRule {
    /// A 2-byte big-endian length followed by that many bytes of text
    LengthPrefixed,
    /// A fixed prefix followed by a big-endian signed 32-bit integer
    FixedWidth {
        /// Bytes that must immediately follow the marker
        prefix: &'static [u8],
    },
}

/// A fixed byte pattern plus the rule used to decode what follows it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    /// Human readable name used in diagnostics
    pub name: &'static str,
    /// Bytes to search for
    pub marker: &'static [u8],
    /// Decoding applied after the marker
    pub rule: DecodeRule,
}

const VALUE_REFERENCE: [u8; 6] = [0x73, 0x71, 0x00, 0x7e, 0x00, 0x02];

/// Device identifier (IMEI) in `CompatibleInfo.cfg`
///
/// Map key `0x0102` followed by `TC_STRING` (`0x74`).
pub const DEVICE_ID: Signature = Signature {
    name: "device id",
    marker: &[
        0x73, 0x71, 0x00, 0x7e, 0x00, 0x02, 0x00, 0x00, 0x01, 0x02, 0x74,
    ],
    rule: DecodeRule::LengthPrefixed,
};

/// Account identifier (uin) in `systemInfo.cfg`
///
/// Map key `1`, followed by another value reference whose payload is the uin.
pub const ACCOUNT_ID: Signature = Signature {
    name: "account id",
    marker: &[0x73, 0x71, 0x00, 0x7e, 0x00, 0x02, 0x00, 0x00, 0x00, 0x01],
    rule: DecodeRule::FixedWidth {
        prefix: &VALUE_REFERENCE,
    },
};
