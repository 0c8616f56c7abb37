//! Error types for encoding operations.

use thiserror::Error;

use crate::dictionary::DictionaryError;

/// Result type for encoding operations.
pub type EncodingResult<T> = Result<T, EncodingError>;

/// Errors that can occur while building an encoder or encoding a document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// The dictionary is misconfigured.
    #[error("dictionary configuration error: {0}")]
    Dictionary(#[from] DictionaryError),

    /// An element or attribute uses a namespace the dictionary does not know, and
    /// the encoder was configured to reject those.
    #[error("unsupported namespace `{namespace}` for `{name}`")]
    UnsupportedNamespace {
        /// The namespace URI.
        namespace: String,
        /// The local name that used it.
        name: String,
    },

    /// Public identifier 0 is reserved for a string table reference.
    #[error("public identifier 0 is reserved, use a literal public identifier instead")]
    ReservedPublicId,

    /// The input document violates the structural contract.
    #[error("malformed input: {0}")]
    MalformedInput(#[from] MalformedInputError),

    /// A length or string table offset does not fit an `mb_u_int32`.
    #[error("{field} of {length} bytes exceeds the 32-bit limit")]
    LengthOverflow {
        /// What was being measured.
        field: &'static str,
        /// The actual length.
        length: usize,
    },
}

/// Problems with the input document, detected before any byte is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedInputError {
    /// The input text is empty or only whitespace.
    #[error("document is empty")]
    EmptyDocument,

    /// The input text is not well-formed XML.
    #[error("XML is not well-formed: {0}")]
    Xml(String),

    /// An element or attribute has an empty name.
    #[error("empty element or attribute name")]
    EmptyName,

    /// A name is not valid Clark notation.
    #[error("invalid qualified name `{0}`")]
    InvalidQualifiedName(String),

    /// A string contains NUL, which terminates WBXML inline strings.
    #[error("string contains a NUL character: `{0}`")]
    NulInString(String),

    /// A string is not representable in the configured US-ASCII charset.
    #[error("string is not ASCII: `{0}`")]
    NonAsciiString(String),

    /// Elements are nested deeper than the encoder accepts.
    #[error("elements are nested more than {limit} levels deep")]
    TooDeep {
        /// The maximum nesting depth.
        limit: usize,
    },

    /// An entity node does not hold a Unicode scalar value.
    #[error("entity U+{0:04X} is not a valid character")]
    InvalidEntity(u32),
}
