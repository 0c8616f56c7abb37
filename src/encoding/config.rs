//! Encoder configuration.
//!
//! Everything here is fixed when an [`Encoder`](super::Encoder) is built.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::tokens::{CHARSET_US_ASCII, CHARSET_UTF8, PUBLIC_ID_UNKNOWN};

/// WBXML version written in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WbxmlVersion {
    /// WBXML 1.1
    V1_1,
    /// WBXML 1.2
    V1_2,
    /// WBXML 1.3, used by ActiveSync.
    #[default]
    V1_3,
}

impl WbxmlVersion {
    /// The header byte: major version minus one in the high nibble, minor in the low.
    pub fn byte(self) -> u8 {
        match self {
            WbxmlVersion::V1_1 => 0x01,
            WbxmlVersion::V1_2 => 0x02,
            WbxmlVersion::V1_3 => 0x03,
        }
    }
}

impl std::fmt::Display for WbxmlVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let version = match self {
            WbxmlVersion::V1_1 => "1.1",
            WbxmlVersion::V1_2 => "1.2",
            WbxmlVersion::V1_3 => "1.3",
        };
        f.write_str(version)
    }
}

impl std::str::FromStr for WbxmlVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1.1" => Ok(WbxmlVersion::V1_1),
            "1.2" => Ok(WbxmlVersion::V1_2),
            "1.3" => Ok(WbxmlVersion::V1_3),
            other => Err(format!("unsupported WBXML version `{other}`")),
        }
    }
}

/// Document public identifier.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PublicId {
    /// `0x01`, unknown or missing public identifier. ActiveSync uses this.
    #[default]
    Unknown,
    /// A well-known numeric identifier. `0` is reserved and rejected by the encoder.
    Known(u32),
    /// A textual identifier stored in the string table.
    Literal(String),
}

impl PublicId {
    /// The numeric value written in the header, `None` for literals.
    pub fn numeric(&self) -> Option<u32> {
        match self {
            PublicId::Unknown => Some(PUBLIC_ID_UNKNOWN),
            PublicId::Known(id) => Some(*id),
            PublicId::Literal(_) => None,
        }
    }
}

/// Character set of the document strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Charset {
    /// UTF-8 (MIBenum 106).
    #[default]
    Utf8,
    /// US-ASCII (MIBenum 3). Non-ASCII strings are rejected.
    UsAscii,
}

impl Charset {
    /// IANA MIBenum written in the header.
    pub fn mib_enum(self) -> u32 {
        match self {
            Charset::Utf8 => CHARSET_UTF8,
            Charset::UsAscii => CHARSET_US_ASCII,
        }
    }
}

/// What to do with elements and attributes in namespaces the dictionary lacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UnknownNamespacePolicy {
    /// Encode the local name as LITERAL without switching code pages.
    #[default]
    Literal,
    /// Fail with [`EncodingError::UnsupportedNamespace`](super::EncodingError::UnsupportedNamespace).
    Reject,
}

/// Options fixed at encoder construction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EncoderConfig {
    /// Header version.
    pub version: WbxmlVersion,
    /// Header public identifier.
    pub public_id: PublicId,
    /// Header charset.
    pub charset: Charset,
    /// Handling of unknown namespaces.
    pub unknown_namespaces: UnknownNamespacePolicy,
    /// Intern text and attribute values in the string table and reference them
    /// with `STR_T` instead of writing them inline.
    pub string_table: bool,
    /// Drop whitespace-only text next to sibling elements when parsing XML text.
    pub ignore_whitespace: bool,
}

impl EncoderConfig {
    /// Configuration matching what ActiveSync clients expect: WBXML 1.3, unknown
    /// public identifier, UTF-8, inline strings.
    pub fn activesync() -> Self {
        Self::default()
    }
}
