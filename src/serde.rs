//! JSON reports of encoded documents.

use std::fmt::LowerHex;

use data_encoding::BASE64;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::encoding::config::{Charset, EncoderConfig, PublicId, WbxmlVersion};
use crate::fmt::{format_escaped, format_hex};

/// The result of an encoding together with the header settings that produced it.
///
/// Serializes to a flat object with the bytes in hex, base64 and escaped form.
///
/// # Example
///
/// ```rust
/// use wbxml::{CodePageDictionary, EncoderConfig, EncodingReport, encode_xml};
///
/// let xml = r#"<FolderSync xmlns="FolderHierarchy:"><SyncKey>0</SyncKey></FolderSync>"#;
/// let bytes = encode_xml(xml, CodePageDictionary::activesync()).unwrap();
/// let report = EncodingReport::new(&EncoderConfig::default(), bytes);
///
/// let json = serde_json::to_value(&report).unwrap();
/// assert_eq!(json["length"], 13);
/// assert_eq!(json["base64"], "AwFqAAAHVlIDMAABAQ==");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingReport {
    version: WbxmlVersion,
    public_id: PublicId,
    charset: Charset,
    bytes: Vec<u8>,
}

impl EncodingReport {
    /// Create a report for `bytes` encoded with `config`.
    pub fn new(config: &EncoderConfig, bytes: Vec<u8>) -> Self {
        Self {
            version: config.version,
            public_id: config.public_id.clone(),
            charset: config.charset,
            bytes,
        }
    }

    /// The encoded document.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the report, returning the encoded document.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl Serialize for EncodingReport {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        #[inline]
        fn as_hex<T>(value: T) -> String
        where
            T: LowerHex,
        {
            format!("0x{:02x}", value)
        }

        let mut state = serializer.serialize_struct("EncodingReport", 7)?;
        state.serialize_field("length", &self.bytes.len())?;
        state.serialize_field("version", &self.version.to_string())?;
        match &self.public_id {
            PublicId::Literal(public_id) => state.serialize_field("public_id", public_id)?,
            other => state.serialize_field("public_id", &other.numeric().map(as_hex))?,
        }
        state.serialize_field("charset", &self.charset.mib_enum())?;
        state.serialize_field("hex", &format_hex(&self.bytes))?;
        state.serialize_field("base64", &BASE64.encode(&self.bytes))?;
        state.serialize_field("escaped", &format_escaped(&self.bytes))?;
        state.end()
    }
}
