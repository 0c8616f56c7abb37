//! WBXML encoding of XML element trees.
//!
//! [`Encoder`] walks an [`Element`](crate::Element) tree once, depth-first, and
//! writes the header, the string table and the tokenized body. Code-page state lives
//! in a per-call [`EncoderState`], so an encoder can be reused and shared.

/// Encoder configuration.
pub mod config;

/// Error types for encoding operations.
pub mod error;

/// Byte writer for WBXML primitives.
pub mod writer;

/// Deduplicating string table.
pub mod string_table;

mod encoder;
mod traits;

#[cfg(test)]
mod tests;

pub use config::{Charset, EncoderConfig, PublicId, UnknownNamespacePolicy, WbxmlVersion};
pub use encoder::{Encoder, EncoderState};
pub use error::{EncodingError, EncodingResult, MalformedInputError};
pub use string_table::StringTable;
pub use writer::WbxmlWriter;
