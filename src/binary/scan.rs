use super::errors::ScanError;
use super::signature::{DecodeRule, Signature};

type Result<T> = std::result::Result<T, ScanError>;

const LENGTH_SIZE: usize = 2;
const INTEGER_SIZE: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
/// A field decoded from after a signature marker
pub enum DecodedField<'a> {
    /// Payload of a length-prefixed field, borrowed from the scanned buffer
    Bytes(&'a [u8]),
    /// Every fixed-width integer found, in buffer order
    Integers(Vec<i32>),
}

/// Offset of the first occurrence of `marker` at or after `from`
pub fn find_marker(buffer: &[u8], marker: &[u8], from: usize) -> Option<usize> {
    if marker.is_empty() || from >= buffer.len() {
        return None;
    }
    buffer[from..]
        .windows(marker.len())
        .position(|window| window == marker)
        .map(|pos| pos + from)
}

/// Decode the field described by `signature` from `buffer`
///
/// A length-prefixed field is absent when the first marker sits at offset
/// zero, as a valid record always has object stream framing before it. Fixed-width
/// fields collect every occurrence in the buffer.
pub fn find_field<'a>(buffer: &'a [u8], signature: &Signature) -> Result<DecodedField<'a>> {
    match signature.rule {
        DecodeRule::LengthPrefixed => {
            read_length_prefixed(buffer, signature.marker).map(DecodedField::Bytes)
        }
        DecodeRule::FixedWidth { prefix } => {
            let values: Vec<i32> = FixedWidthFields::new(buffer, signature.marker, prefix).collect();
            if values.is_empty() {
                Err(ScanError::NotFound)
            } else {
                Ok(DecodedField::Integers(values))
            }
        }
    }
}

/// Read the length-prefixed payload following the first `marker`
///
/// Fails with [`ScanError::NotFound`] if that first marker is at offset zero,
/// even when a later one exists.
pub fn read_length_prefixed<'a>(buffer: &'a [u8], marker: &[u8]) -> Result<&'a [u8]> {
    let pos = find_marker(buffer, marker, 0)
        .filter(|&pos| pos > 0)
        .ok_or(ScanError::NotFound)?;
    let rest = &buffer[pos + marker.len()..];
    if rest.len() < LENGTH_SIZE {
        return Err(ScanError::Truncated {
            needed: LENGTH_SIZE,
            available: rest.len(),
        });
    }
    let len = u16::from_be_bytes([rest[0], rest[1]]) as usize;
    let rest = &rest[LENGTH_SIZE..];
    if rest.len() < len {
        return Err(ScanError::Truncated {
            needed: len,
            available: rest.len(),
        });
    }
    Ok(&rest[..len])
}

/// Iterator over the big-endian `i32` values that follow `marker` + `prefix`
///
/// Occurrences not followed by the prefix, or too close to the end of the
/// buffer, are skipped and scanning resumes just past their marker.
#[derive(Debug, Clone)]
pub struct FixedWidthFields<'a> {
    buffer: &'a [u8],
    marker: &'a [u8],
    prefix: &'a [u8],
    pos: usize,
}

impl<'a> FixedWidthFields<'a> {
    /// Scan `buffer` from the start
    pub fn new(buffer: &'a [u8], marker: &'a [u8], prefix: &'a [u8]) -> FixedWidthFields<'a> {
        FixedWidthFields {
            buffer,
            marker,
            prefix,
            pos: 0,
        }
    }
}

impl<'a> Iterator for FixedWidthFields<'a> {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        loop {
            let found = find_marker(self.buffer, self.marker, self.pos)?;
            let start = found + self.marker.len();
            self.pos = start;
            let rest = &self.buffer[start..];
            let field_size = self.prefix.len() + INTEGER_SIZE;
            if rest.len() >= field_size && rest.starts_with(self.prefix) {
                let bytes: [u8; INTEGER_SIZE] = rest[self.prefix.len()..field_size]
                    .try_into()
                    .ok()?;
                self.pos = start + field_size;
                return Some(i32::from_be_bytes(bytes));
            }
        }
    }
}
