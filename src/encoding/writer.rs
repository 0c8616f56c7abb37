//! Byte writer for WBXML primitives.

use super::error::{EncodingError, EncodingResult};
use crate::tokens::{ENTITY, OPAQUE, STR_I, STR_T};

/// Appends WBXML primitives to a byte buffer.
///
/// The writer knows the wire shapes (`mb_u_int32`, inline strings, opaque data) but
/// nothing about code pages or the element tree.
#[derive(Debug, Default)]
pub struct WbxmlWriter {
    buffer: Vec<u8>,
}

impl WbxmlWriter {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Creates a writer with a pre-allocated buffer.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Writes a single byte.
    pub fn write_u8(&mut self, byte: u8) {
        self.buffer.push(byte);
    }

    /// Writes raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Writes a multi-byte unsigned integer.
    ///
    /// Seven bits per byte, most significant group first; every byte but the last
    /// has its high bit set.
    pub fn write_mb_u_int32(&mut self, value: u32) {
        let mut groups = [0u8; 5];
        let mut count = 0;
        let mut remaining = value;
        loop {
            groups[count] = (remaining & 0x7F) as u8;
            count += 1;
            remaining >>= 7;
            if remaining == 0 {
                break;
            }
        }
        for index in (0..count).rev() {
            let continuation = if index > 0 { 0x80 } else { 0x00 };
            self.buffer.push(groups[index] | continuation);
        }
    }

    /// Writes a length or offset as `mb_u_int32`, failing if it does not fit.
    pub fn write_length(&mut self, field: &'static str, length: usize) -> EncodingResult<()> {
        let value = u32::try_from(length)
            .map_err(|_| EncodingError::LengthOverflow { field, length })?;
        self.write_mb_u_int32(value);
        Ok(())
    }

    /// Writes `STR_I` followed by the NUL-terminated string.
    pub fn write_inline_str(&mut self, value: &str) {
        self.buffer.push(STR_I);
        self.write_termstr(value);
    }

    /// Writes `STR_T` followed by a string table offset.
    pub fn write_table_ref(&mut self, offset: u32) {
        self.buffer.push(STR_T);
        self.write_mb_u_int32(offset);
    }

    /// Writes a string followed by its NUL terminator.
    pub fn write_termstr(&mut self, value: &str) {
        self.buffer.extend_from_slice(value.as_bytes());
        self.buffer.push(0x00);
    }

    /// Writes `OPAQUE`, the data length and the data.
    pub fn write_opaque(&mut self, data: &[u8]) -> EncodingResult<()> {
        self.buffer.push(OPAQUE);
        self.write_length("opaque data", data.len())?;
        self.buffer.extend_from_slice(data);
        Ok(())
    }

    /// Writes `ENTITY` followed by the code point.
    pub fn write_entity(&mut self, code_point: u32) {
        self.buffer.push(ENTITY);
        self.write_mb_u_int32(code_point);
    }

    /// Finishes writing and returns the buffer.
    pub fn finish(self) -> Vec<u8> {
        self.buffer
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true if nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
