//! XML text to [`Element`] tree conversion.
//!
//! Namespaces are resolved by `roxmltree`, so every name comes out in Clark notation
//! and `xmlns` declarations never show up as attributes. Comments and processing
//! instructions are dropped. Documents nested deeper than [`MAX_DEPTH`] are rejected
//! before `roxmltree` sees them.

use roxmltree::{Document, Node as XmlNode, ParsingOptions};

use crate::document::{Element, MAX_DEPTH, Node, qualified_name};
use crate::encoding::error::MalformedInputError;

/// Parses XML text into an element tree.
///
/// With `ignore_whitespace`, whitespace-only text nodes are dropped from elements
/// that also have element children, which removes the indentation of
/// pretty-printed documents. Text of leaf elements is always kept.
///
/// # Example
///
/// ```rust
/// use wbxml::parse_document;
///
/// let root = parse_document(
///     r#"<FolderSync xmlns="FolderHierarchy:"><SyncKey>0</SyncKey></FolderSync>"#,
///     false,
/// )
/// .unwrap();
///
/// assert_eq!(root.name, "{FolderHierarchy:}FolderSync");
/// assert_eq!(root.child_elements().next().unwrap().name, "{FolderHierarchy:}SyncKey");
/// ```
pub fn parse_document(xml: &str, ignore_whitespace: bool) -> Result<Element, MalformedInputError> {
    if xml.trim().is_empty() {
        return Err(MalformedInputError::EmptyDocument);
    }
    if nesting_exceeds(xml, MAX_DEPTH) {
        return Err(MalformedInputError::TooDeep { limit: MAX_DEPTH });
    }

    let options = ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };
    let document = Document::parse_with_options(xml, options)
        .map_err(|e| MalformedInputError::Xml(e.to_string()))?;

    convert_element(document.root_element(), ignore_whitespace, 1)
}

fn convert_element(
    node: XmlNode<'_, '_>,
    ignore_whitespace: bool,
    depth: usize,
) -> Result<Element, MalformedInputError> {
    // entity expansion can nest deeper than the raw text shows
    if depth > MAX_DEPTH {
        return Err(MalformedInputError::TooDeep { limit: MAX_DEPTH });
    }

    let mut element = Element::new(xml_name(node.tag_name().namespace(), node.tag_name().name()));

    element.attributes = node
        .attributes()
        .map(|attribute| {
            (
                xml_name(attribute.namespace(), attribute.name()),
                attribute.value().to_string(),
            )
        })
        .collect();

    let drop_whitespace = ignore_whitespace && node.children().any(|child| child.is_element());

    for child in node.children() {
        if child.is_element() {
            element.children.push(Node::Element(convert_element(
                child,
                ignore_whitespace,
                depth + 1,
            )?));
        } else if child.is_text() {
            let text = child.text().unwrap_or_default();
            if drop_whitespace && text.trim().is_empty() {
                continue;
            }
            element.children.push(Node::Text(text.to_string()));
        }
    }

    Ok(element)
}

/// Whether the start tags of `xml` nest deeper than `limit`.
///
/// Comments, CDATA sections, processing instructions and declarations are skipped.
/// Unterminated markup stops the scan and is left for the XML parser to report.
fn nesting_exceeds(xml: &str, limit: usize) -> bool {
    let mut depth = 0usize;
    let mut rest = xml;

    while let Some(start) = rest.find('<') {
        rest = &rest[start..];

        if let Some(after) = skip_section(rest) {
            rest = after;
            continue;
        }
        if let Some(after) = rest.strip_prefix("</") {
            depth = depth.saturating_sub(1);
            rest = after;
            continue;
        }

        let Some(end) = markup_end(rest) else {
            return false;
        };
        let is_declaration = rest.starts_with("<!");
        if !is_declaration && !rest[..end].ends_with('/') {
            depth += 1;
            if depth > limit {
                return true;
            }
        }
        rest = &rest[end + 1..];
    }

    false
}

fn skip_section(rest: &str) -> Option<&str> {
    for (open, close) in [("<!--", "-->"), ("<![CDATA[", "]]>"), ("<?", "?>")] {
        if let Some(body) = rest.strip_prefix(open) {
            return Some(body.find(close).map_or("", |end| &body[end + close.len()..]));
        }
    }
    None
}

/// Index of the `>` closing the markup at the start of `rest`, ignoring quoted values.
fn markup_end(rest: &str) -> Option<usize> {
    let mut quote = None;
    for (index, byte) in rest.bytes().enumerate() {
        match (quote, byte) {
            (None, b'"' | b'\'') => quote = Some(byte),
            (Some(open), _) if open == byte => quote = None,
            (None, b'>') => return Some(index),
            _ => {}
        }
    }
    None
}

fn xml_name(namespace: Option<&str>, local: &str) -> String {
    match namespace {
        Some(namespace) => qualified_name(namespace, local),
        None => local.to_string(),
    }
}
