//! # wbxml
//!
//! Encodes XML documents into WBXML (WAP Binary XML), with the Exchange ActiveSync
//! code pages built in.
//!
//! An encoding is driven by a [`CodePageDictionary`], which maps each XML namespace
//! to a code page and each element or attribute name to a one-byte token. Names the
//! dictionary does not know are written as LITERAL string table references, so no
//! content is ever dropped.
//!
//! ## Quick start
//!
//! ```rust
//! use wbxml::{CodePageDictionary, encode_xml};
//!
//! let xml = r#"<FolderSync xmlns="FolderHierarchy:"><SyncKey>0</SyncKey></FolderSync>"#;
//! let bytes = encode_xml(xml, CodePageDictionary::activesync()).unwrap();
//!
//! assert_eq!(bytes, b"\x03\x01j\x00\x00\x07VR\x030\x00\x01\x01");
//! ```
//!
//! Trees can also be built directly, which is the only way to produce `OPAQUE` and
//! `ENTITY` nodes:
//!
//! ```rust
//! use wbxml::{CodePageDictionary, Element, encode_element};
//!
//! let sync = Element::namespaced("AirSync:", "Sync")
//!     .with_child(Element::namespaced("AirSync:", "SyncKey").with_text("0"));
//! let bytes = encode_element(&sync, CodePageDictionary::activesync()).unwrap();
//!
//! assert_eq!(bytes, b"\x03\x01j\x00EK\x030\x00\x01\x01");
//! ```
//!
//! ## Features
//!
//! - `serde` (default): serde support for the element tree and configuration, and
//!   [`EncodingReport`].
//! - `base64`: base64 output through `data-encoding`.
//! - `cli`: the `wbxml` command-line tool.

pub mod dictionary;
pub mod document;
pub mod encoding;
pub mod fmt;
pub mod parser;
#[cfg(feature = "serde")]
pub mod serde;
pub mod tokens;

pub use dictionary::{
    CodePage, CodePageBuilder, CodePageDictionary, DictionaryBuilder, DictionaryError, Resolution,
    TokenKind,
};
pub use document::{Element, MAX_DEPTH, Node, qualified_name};
pub use encoding::{
    Charset, Encoder, EncoderConfig, EncodingError, EncodingResult, MalformedInputError, PublicId,
    UnknownNamespacePolicy, WbxmlVersion,
};
pub use parser::parse_document;

#[cfg(feature = "serde")]
pub use crate::serde::EncodingReport;

/// Encodes XML text with `dictionary` and the default configuration.
pub fn encode_xml(xml: &str, dictionary: &CodePageDictionary) -> EncodingResult<Vec<u8>> {
    Encoder::from_xml(xml, dictionary, EncoderConfig::default())?.encode()
}

/// Encodes an element tree with `dictionary` and the default configuration.
///
/// The tree is cloned; build an [`Encoder`] directly to hand over ownership.
pub fn encode_element(element: &Element, dictionary: &CodePageDictionary) -> EncodingResult<Vec<u8>> {
    Encoder::new(element.clone(), dictionary, EncoderConfig::default())?.encode()
}
