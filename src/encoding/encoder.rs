//! The WBXML encoder and its per-call state.

use log::{debug, trace};

use super::config::{EncoderConfig, PublicId, UnknownNamespacePolicy};
use super::error::{EncodingError, EncodingResult, MalformedInputError};
use super::string_table::StringTable;
use super::traits::Encodable;
use super::writer::WbxmlWriter;
use crate::dictionary::{CodePageDictionary, Resolution};
use crate::document::{Element, Node};
use crate::fmt::format_preview;
use crate::parser::parse_document;
use crate::tokens::{END, LITERAL, PUBLIC_ID_UNKNOWN, SWITCH_PAGE, tag_byte};

/// Encodes one XML document to WBXML with a given dictionary.
///
/// The document is parsed and checked when the encoder is built. [`Encoder::encode`]
/// does not mutate the encoder, so repeated calls return the same bytes.
///
/// # Example
///
/// ```rust
/// use wbxml::{CodePageDictionary, Encoder, EncoderConfig};
///
/// let xml = r#"<FolderSync xmlns="FolderHierarchy:"><SyncKey>0</SyncKey></FolderSync>"#;
/// let encoder = Encoder::from_xml(
///     xml,
///     CodePageDictionary::activesync(),
///     EncoderConfig::activesync(),
/// )
/// .unwrap();
///
/// assert_eq!(
///     encoder.encode().unwrap(),
///     b"\x03\x01j\x00\x00\x07VR\x030\x00\x01\x01".to_vec()
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Encoder<'d> {
    document: Element,
    dictionary: &'d CodePageDictionary,
    config: EncoderConfig,
}

impl<'d> Encoder<'d> {
    /// Create an encoder for an element tree.
    pub fn new(
        document: Element,
        dictionary: &'d CodePageDictionary,
        config: EncoderConfig,
    ) -> EncodingResult<Self> {
        document.validate(config.charset)?;
        match &config.public_id {
            PublicId::Known(0) => return Err(EncodingError::ReservedPublicId),
            PublicId::Literal(public_id) if public_id.contains('\0') => {
                return Err(MalformedInputError::NulInString(public_id.replace('\0', "\\0")).into());
            }
            _ => {}
        }

        debug!(
            "created encoder for <{}> ({} pages, version {:#04x})",
            document.name,
            dictionary.pages().count(),
            config.version.byte()
        );

        Ok(Self {
            document,
            dictionary,
            config,
        })
    }

    /// Parse XML text and create an encoder for it.
    pub fn from_xml(
        xml: &str,
        dictionary: &'d CodePageDictionary,
        config: EncoderConfig,
    ) -> EncodingResult<Self> {
        let document = parse_document(xml, config.ignore_whitespace)?;
        Self::new(document, dictionary, config)
    }

    /// Encode the document.
    ///
    /// Either the complete byte string or an error is returned, never a prefix.
    pub fn encode(&self) -> EncodingResult<Vec<u8>> {
        let mut state = EncoderState::new(self.dictionary, &self.config)?;
        self.document.encode(&mut state)?;
        let bytes = state.finish()?;
        debug!("encoded <{}> into {}", self.document.name, format_preview(&bytes));
        Ok(bytes)
    }

    /// The root element.
    pub fn document(&self) -> &Element {
        &self.document
    }

    /// The dictionary used for token lookups.
    pub fn dictionary(&self) -> &'d CodePageDictionary {
        self.dictionary
    }

    /// The encoder configuration.
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }
}

/// Mutable state of a single [`Encoder::encode`] call.
#[derive(Debug)]
pub struct EncoderState<'a> {
    dictionary: &'a CodePageDictionary,
    config: &'a EncoderConfig,
    body: WbxmlWriter,
    strings: StringTable,
    tag_page: u8,
    attribute_page: u8,
    public_id_index: Option<u32>,
}

impl<'a> EncoderState<'a> {
    fn new(dictionary: &'a CodePageDictionary, config: &'a EncoderConfig) -> EncodingResult<Self> {
        let mut strings = StringTable::new();
        let public_id_index = match &config.public_id {
            PublicId::Literal(public_id) => Some(strings.intern(public_id)?),
            PublicId::Unknown | PublicId::Known(_) => None,
        };

        Ok(Self {
            dictionary,
            config,
            body: WbxmlWriter::new(),
            strings,
            tag_page: 0,
            attribute_page: 0,
            public_id_index,
        })
    }

    /// Write an element's tag byte, switching the tag page when needed.
    ///
    /// Returns the page unqualified attributes of this element resolve against.
    fn write_tag(&mut self, name: &str, has_attributes: bool, has_content: bool) -> EncodingResult<u8> {
        match self.dictionary.resolve(name, self.tag_page) {
            Resolution::Token { page, token } => {
                self.switch_tag_page(page, name);
                self.body.write_u8(tag_byte(token, has_attributes, has_content));
            }
            Resolution::Literal { page, name } => {
                self.switch_tag_page(page, name);
                debug!("no token for tag `{name}` on page {page}, writing LITERAL");
                self.write_literal(name, has_attributes, has_content)?;
            }
            Resolution::UnknownNamespace { namespace, name } => {
                self.check_namespace(namespace, name)?;
                debug!("unknown namespace `{namespace}` for tag `{name}`, writing LITERAL");
                self.write_literal(name, has_attributes, has_content)?;
            }
        }
        Ok(self.tag_page)
    }

    fn write_attribute(&mut self, name: &str, value: &str, element_page: u8) -> EncodingResult<()> {
        match self.dictionary.resolve_attribute(name, element_page) {
            Resolution::Token { page, token } => {
                self.switch_attribute_page(page, name);
                self.body.write_u8(token);
            }
            Resolution::Literal { page, name } => {
                self.switch_attribute_page(page, name);
                debug!("no token for attribute `{name}` on page {page}, writing LITERAL");
                self.write_literal(name, false, false)?;
            }
            Resolution::UnknownNamespace { namespace, name } => {
                self.check_namespace(namespace, name)?;
                debug!("unknown namespace `{namespace}` for attribute `{name}`, writing LITERAL");
                self.write_literal(name, false, false)?;
            }
        }

        if !value.is_empty() {
            self.write_string(value)?;
        }
        Ok(())
    }

    fn switch_tag_page(&mut self, page: u8, name: &str) {
        if page != self.tag_page {
            trace!("tag page {} -> {} for {}", self.tag_page, page, name);
            self.body.write_u8(SWITCH_PAGE);
            self.body.write_u8(page);
            self.tag_page = page;
        }
    }

    fn switch_attribute_page(&mut self, page: u8, name: &str) {
        if page != self.attribute_page {
            trace!("attribute page {} -> {} for {}", self.attribute_page, page, name);
            self.body.write_u8(SWITCH_PAGE);
            self.body.write_u8(page);
            self.attribute_page = page;
        }
    }

    fn write_literal(&mut self, name: &str, has_attributes: bool, has_content: bool) -> EncodingResult<()> {
        let offset = self.strings.intern(name)?;
        self.body.write_u8(tag_byte(LITERAL, has_attributes, has_content));
        self.body.write_mb_u_int32(offset);
        Ok(())
    }

    fn check_namespace(&self, namespace: &str, name: &str) -> EncodingResult<()> {
        match self.config.unknown_namespaces {
            UnknownNamespacePolicy::Literal => Ok(()),
            UnknownNamespacePolicy::Reject => Err(EncodingError::UnsupportedNamespace {
                namespace: namespace.to_string(),
                name: name.to_string(),
            }),
        }
    }

    /// Inline string, or a string table reference when interning is on.
    fn write_string(&mut self, value: &str) -> EncodingResult<()> {
        if self.config.string_table {
            let offset = self.strings.intern(value)?;
            self.body.write_table_ref(offset);
        } else {
            self.body.write_inline_str(value);
        }
        Ok(())
    }

    /// Assemble header, string table and body.
    fn finish(self) -> EncodingResult<Vec<u8>> {
        let mut output = WbxmlWriter::with_capacity(self.strings.len() + self.body.len() + 8);
        output.write_u8(self.config.version.byte());
        match self.public_id_index {
            Some(index) => {
                output.write_u8(0x00);
                output.write_mb_u_int32(index);
            }
            None => {
                let public_id = self.config.public_id.numeric().unwrap_or(PUBLIC_ID_UNKNOWN);
                output.write_mb_u_int32(public_id);
            }
        }
        output.write_mb_u_int32(self.config.charset.mib_enum());
        output.write_length("string table", self.strings.len())?;
        output.write_bytes(self.strings.as_bytes());
        output.write_bytes(&self.body.finish());
        Ok(output.finish())
    }
}

impl Encodable for Element {
    fn encode(&self, state: &mut EncoderState<'_>) -> EncodingResult<()> {
        let has_attributes = self.has_attributes();
        let has_content = self.has_content();
        let element_page = state.write_tag(&self.name, has_attributes, has_content)?;

        if has_attributes {
            for (name, value) in &self.attributes {
                state.write_attribute(name, value, element_page)?;
            }
            state.body.write_u8(END);
        }

        if has_content {
            for child in &self.children {
                child.encode(state)?;
            }
            state.body.write_u8(END);
        }

        Ok(())
    }
}

impl Encodable for Node {
    fn encode(&self, state: &mut EncoderState<'_>) -> EncodingResult<()> {
        match self {
            Node::Element(element) => element.encode(state),
            Node::Text(text) => state.write_string(text),
            Node::Opaque(data) => state.body.write_opaque(data),
            Node::Entity(code_point) => {
                state.body.write_entity(*code_point);
                Ok(())
            }
        }
    }
}
