//! Error types for code-page dictionary construction.

use thiserror::Error;

/// Kind of token a code page entry assigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A tag token.
    Tag,
    /// An attribute start token.
    Attribute,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Tag => f.write_str("tag"),
            TokenKind::Attribute => f.write_str("attribute"),
        }
    }
}

/// Errors detected while building a [`CodePageDictionary`](super::CodePageDictionary).
///
/// These are configuration errors: they are raised once, when the dictionary is
/// built, and never while encoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DictionaryError {
    /// Two code pages were registered with the same index.
    #[error("code page {page} is defined more than once")]
    DuplicatePage {
        /// The repeated page index.
        page: u8,
    },

    /// A namespace URI was assigned to two code pages.
    #[error("namespace `{namespace}` is mapped to code pages {first} and {second}")]
    DuplicateNamespace {
        /// The namespace URI.
        namespace: String,
        /// The page that registered it first.
        first: u8,
        /// The page that registered it again.
        second: u8,
    },

    /// A code page has an empty namespace URI.
    #[error("code page {page} has an empty namespace")]
    EmptyNamespace {
        /// The page index.
        page: u8,
    },

    /// A code page defines no tags at all.
    #[error("code page {page} defines no tags")]
    EmptyCodePage {
        /// The page index.
        page: u8,
    },

    /// An entry with an empty name.
    #[error("code page {page} has a {kind} entry with an empty name")]
    EmptyName {
        /// The page index.
        page: u8,
        /// Tag or attribute.
        kind: TokenKind,
    },

    /// The same token was assigned to two names within one page.
    #[error("{kind} token 0x{token:02X} on code page {page} is assigned to both `{first}` and `{second}`")]
    DuplicateToken {
        /// The page index.
        page: u8,
        /// Tag or attribute.
        kind: TokenKind,
        /// The repeated token.
        token: u8,
        /// The name that claimed the token first.
        first: String,
        /// The name that claimed it again.
        second: String,
    },

    /// The same name was given two tokens within one page.
    #[error("{kind} `{name}` is defined more than once on code page {page}")]
    DuplicateName {
        /// The page index.
        page: u8,
        /// Tag or attribute.
        kind: TokenKind,
        /// The repeated name.
        name: String,
    },

    /// A token outside the range a code page may use.
    #[error("{kind} token 0x{token:02X} for `{name}` on code page {page} is out of range")]
    TokenOutOfRange {
        /// The page index.
        page: u8,
        /// Tag or attribute.
        kind: TokenKind,
        /// The offending name.
        name: String,
        /// The offending token.
        token: u8,
    },
}
