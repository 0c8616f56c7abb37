//! Deduplicating WBXML string table.

use std::collections::HashMap;

use super::error::{EncodingError, EncodingResult};

/// NUL-terminated strings addressed by byte offset.
///
/// Each distinct string is stored once; offsets follow first use.
#[derive(Debug, Default)]
pub struct StringTable {
    offsets: HashMap<String, u32>,
    bytes: Vec<u8>,
}

impl StringTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the offset of `value`, appending it on first use.
    pub fn intern(&mut self, value: &str) -> EncodingResult<u32> {
        if let Some(&offset) = self.offsets.get(value) {
            return Ok(offset);
        }

        let offset = u32::try_from(self.bytes.len()).map_err(|_| EncodingError::LengthOverflow {
            field: "string table",
            length: self.bytes.len(),
        })?;
        self.bytes.extend_from_slice(value.as_bytes());
        self.bytes.push(0x00);
        self.offsets.insert(value.to_string(), offset);
        Ok(offset)
    }

    /// Size of the table in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if nothing has been interned.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The encoded table.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}
