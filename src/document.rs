//! XML element tree accepted by the encoder.
//!
//! Names use Clark notation: `{namespace-uri}local` for qualified names and a bare
//! `local` for unqualified ones. Attributes and children keep their document order.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::encoding::config::Charset;
use crate::encoding::error::MalformedInputError;

/// Deepest element nesting the encoder accepts, counting the root as level 1.
pub const MAX_DEPTH: usize = 1000;

/// Splits a Clark-notation name into `(namespace, local)`.
///
/// Returns `None` for unqualified names and for names whose brace is never closed.
pub(crate) fn split_qualified(name: &str) -> Option<(&str, &str)> {
    let rest = name.strip_prefix('{')?;
    rest.split_once('}')
}

/// Formats a namespace and local name in Clark notation.
pub fn qualified_name(namespace: &str, local: &str) -> String {
    format!("{{{namespace}}}{local}")
}

/// A child of an [`Element`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Node {
    /// A nested element.
    Element(Element),
    /// Character data.
    Text(String),
    /// Binary data written as `OPAQUE`.
    Opaque(Vec<u8>),
    /// A character entity written as `ENTITY`.
    Entity(u32),
}

/// An XML element.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Element {
    /// Qualified name in Clark notation.
    pub name: String,
    /// Attributes as `(qualified name, value)` pairs.
    #[cfg_attr(feature = "serde", serde(default))]
    pub attributes: Vec<(String, String)>,
    /// Child nodes.
    #[cfg_attr(feature = "serde", serde(default))]
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element from a Clark-notation name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create an element in `namespace`.
    pub fn namespaced(namespace: &str, local: &str) -> Self {
        Self::new(qualified_name(namespace, local))
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Add a child element.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Add a text node.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Add an opaque data node.
    pub fn with_opaque(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.children.push(Node::Opaque(data.into()));
        self
    }

    /// Add a character entity node.
    pub fn with_entity(mut self, code_point: u32) -> Self {
        self.children.push(Node::Entity(code_point));
        self
    }

    /// Namespace URI of the element, if qualified.
    pub fn namespace(&self) -> Option<&str> {
        split_qualified(&self.name).map(|(namespace, _)| namespace)
    }

    /// Local part of the element name.
    pub fn local_name(&self) -> &str {
        split_qualified(&self.name).map_or(self.name.as_str(), |(_, local)| local)
    }

    /// Whether the element carries an attribute list.
    pub fn has_attributes(&self) -> bool {
        !self.attributes.is_empty()
    }

    /// Whether the element carries content. An empty text node counts.
    pub fn has_content(&self) -> bool {
        !self.children.is_empty()
    }

    /// Child elements, skipping other nodes.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Check the structural contract the encoder relies on.
    ///
    /// Names must be non-empty and well-formed Clark notation, strings must not
    /// contain NUL (the WBXML string terminator), and with a US-ASCII charset every
    /// string must be ASCII. Elements may nest at most [`MAX_DEPTH`] levels.
    pub fn validate(&self, charset: Charset) -> Result<(), MalformedInputError> {
        let mut pending = vec![(self, 1)];

        while let Some((element, depth)) = pending.pop() {
            if depth > MAX_DEPTH {
                return Err(MalformedInputError::TooDeep { limit: MAX_DEPTH });
            }
            validate_name(&element.name)?;
            check_string(&element.name, charset)?;

            for (name, value) in &element.attributes {
                validate_name(name)?;
                check_string(name, charset)?;
                check_string(value, charset)?;
            }

            for child in &element.children {
                match child {
                    Node::Element(child) => pending.push((child, depth + 1)),
                    Node::Text(text) => check_string(text, charset)?,
                    Node::Opaque(_) => {}
                    Node::Entity(code_point) => {
                        if char::from_u32(*code_point).is_none() {
                            return Err(MalformedInputError::InvalidEntity(*code_point));
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), MalformedInputError> {
    let local = if name.starts_with('{') {
        match split_qualified(name) {
            Some((_, local)) => local,
            None => return Err(MalformedInputError::InvalidQualifiedName(name.to_string())),
        }
    } else {
        name
    };

    if local.is_empty() {
        return Err(if name.is_empty() {
            MalformedInputError::EmptyName
        } else {
            MalformedInputError::InvalidQualifiedName(name.to_string())
        });
    }
    if local.contains(['{', '}']) {
        return Err(MalformedInputError::InvalidQualifiedName(name.to_string()));
    }
    Ok(())
}

fn check_string(value: &str, charset: Charset) -> Result<(), MalformedInputError> {
    if value.contains('\0') {
        return Err(MalformedInputError::NulInString(value.replace('\0', "\\0")));
    }
    if charset == Charset::UsAscii && !value.is_ascii() {
        return Err(MalformedInputError::NonAsciiString(value.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_qualified() {
        assert_eq!(
            split_qualified("{FolderHierarchy:}FolderSync"),
            Some(("FolderHierarchy:", "FolderSync"))
        );
        assert_eq!(split_qualified("FolderHierarchy:FolderSync"), None);
        assert_eq!(split_qualified("{broken"), None);
    }

    #[test]
    fn test_element_names() {
        let element = Element::namespaced("AirSync:", "Sync");
        assert_eq!(element.name, "{AirSync:}Sync");
        assert_eq!(element.namespace(), Some("AirSync:"));
        assert_eq!(element.local_name(), "Sync");

        let bare = Element::new("Sync");
        assert_eq!(bare.namespace(), None);
        assert_eq!(bare.local_name(), "Sync");
    }

    #[test]
    fn test_empty_text_counts_as_content() {
        let element = Element::new("SyncKey").with_text("");
        assert!(element.has_content());
        assert!(!Element::new("SyncKey").has_content());
    }

    #[test]
    fn test_validate_accepts_well_formed_tree() {
        let element = Element::namespaced("AirSync:", "Sync")
            .with_attribute("id", "1")
            .with_child(Element::namespaced("AirSync:", "SyncKey").with_text("0"))
            .with_opaque(vec![0, 1, 2])
            .with_entity(0xE9);
        assert_eq!(element.validate(Charset::Utf8), Ok(()));
    }

    #[test]
    fn test_validate_rejects_bad_names() {
        assert_eq!(
            Element::new("").validate(Charset::Utf8),
            Err(MalformedInputError::EmptyName)
        );
        assert_eq!(
            Element::new("{AirSync:Sync").validate(Charset::Utf8),
            Err(MalformedInputError::InvalidQualifiedName("{AirSync:Sync".to_string()))
        );
        assert_eq!(
            Element::new("{AirSync:}").validate(Charset::Utf8),
            Err(MalformedInputError::InvalidQualifiedName("{AirSync:}".to_string()))
        );

        let nested = Element::new("Sync").with_child(Element::new("Bad}Name"));
        assert!(matches!(
            nested.validate(Charset::Utf8),
            Err(MalformedInputError::InvalidQualifiedName(_))
        ));
    }

    #[test]
    fn test_validate_rejects_nul_and_non_ascii() {
        let nul = Element::new("Sync").with_text("a\0b");
        assert!(matches!(
            nul.validate(Charset::Utf8),
            Err(MalformedInputError::NulInString(_))
        ));

        let accented = Element::new("Sync").with_text("café");
        assert_eq!(accented.validate(Charset::Utf8), Ok(()));
        assert_eq!(
            accented.validate(Charset::UsAscii),
            Err(MalformedInputError::NonAsciiString("café".to_string()))
        );
    }

    #[test]
    fn test_validate_rejects_surrogate_entity() {
        let element = Element::new("Sync").with_entity(0xD800);
        assert_eq!(
            element.validate(Charset::Utf8),
            Err(MalformedInputError::InvalidEntity(0xD800))
        );
    }

    fn nested(depth: usize) -> Element {
        (1..depth).fold(Element::new("Sync"), |inner, _| Element::new("Sync").with_child(inner))
    }

    #[test]
    fn test_validate_limits_depth() {
        assert_eq!(nested(MAX_DEPTH).validate(Charset::Utf8), Ok(()));
        assert_eq!(
            nested(MAX_DEPTH + 1).validate(Charset::Utf8),
            Err(MalformedInputError::TooDeep { limit: MAX_DEPTH })
        );
    }
}
