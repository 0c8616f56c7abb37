//! Trait definitions for encodable nodes.

use super::encoder::EncoderState;
use super::error::EncodingResult;

/// A part of the document tree that writes itself into the WBXML body.
///
/// Implementations get the per-call [`EncoderState`], which tracks the active code
/// pages and the string table alongside the output buffer.
pub trait Encodable {
    /// Encode into the state's body buffer.
    fn encode(&self, state: &mut EncoderState<'_>) -> EncodingResult<()>;
}
