//! Code-page dictionaries mapping XML names to WBXML tokens.
//!
//! A dictionary holds one [`CodePage`] per XML namespace. Each page assigns one-byte
//! tokens to tag names and, optionally, to attribute names. Dictionaries are
//! validated once when they are built and are immutable afterwards, so a single
//! instance can be shared by any number of encoders.

use std::collections::{BTreeMap, HashMap};

use log::debug;

use crate::document::split_qualified;
use crate::tokens::{MAX_ATTRIBUTE_TOKEN, MAX_TAG_TOKEN, MIN_PAGE_TOKEN};

/// Error types for dictionary construction.
pub mod error;

mod activesync;


pub use error::{DictionaryError, TokenKind};

/// How a qualified name maps onto the wire.
///
/// Returned by [`CodePageDictionary::resolve`] and
/// [`CodePageDictionary::resolve_attribute`]; every variant needs handling, which is
/// where the LITERAL fallback lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// The name has a token on `page`.
    Token {
        /// Code page holding the token.
        page: u8,
        /// The token, without flag bits.
        token: u8,
    },
    /// The namespace is known (or the name is unqualified) but the name has no token.
    Literal {
        /// Code page of the namespace, which the LITERAL is written under.
        page: u8,
        /// Local name to write to the string table.
        name: &'a str,
    },
    /// The namespace URI is not part of the dictionary.
    UnknownNamespace {
        /// The unrecognised namespace URI.
        namespace: &'a str,
        /// The local name.
        name: &'a str,
    },
}

/// A single code page: the tokens of one namespace.
#[derive(Debug, Clone)]
pub struct CodePage {
    index: u8,
    namespace: String,
    aliases: Vec<String>,
    tags: HashMap<String, u8>,
    tag_names: BTreeMap<u8, String>,
    attributes: HashMap<String, u8>,
    attribute_names: BTreeMap<u8, String>,
}

impl CodePage {
    /// The page index written after `SWITCH_PAGE`.
    pub fn index(&self) -> u8 {
        self.index
    }

    /// The primary namespace URI of this page.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Additional namespace URIs that select this page.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Tag token for `name`.
    pub fn tag_token(&self, name: &str) -> Option<u8> {
        self.tags.get(name).copied()
    }

    /// Tag name for `token`.
    pub fn tag_name(&self, token: u8) -> Option<&str> {
        self.tag_names.get(&token).map(String::as_str)
    }

    /// Attribute start token for `name`.
    pub fn attribute_token(&self, name: &str) -> Option<u8> {
        self.attributes.get(name).copied()
    }

    /// Attribute name for `token`.
    pub fn attribute_name(&self, token: u8) -> Option<&str> {
        self.attribute_names.get(&token).map(String::as_str)
    }

    /// Tags of this page, ordered by token.
    pub fn tags(&self) -> impl Iterator<Item = (u8, &str)> {
        self.tag_names
            .iter()
            .map(|(token, name)| (*token, name.as_str()))
    }
}

/// Builder for a single [`CodePage`].
///
/// Entries are only checked when the owning [`DictionaryBuilder`] is built.
#[derive(Debug, Clone)]
pub struct CodePageBuilder {
    index: u8,
    namespace: String,
    aliases: Vec<String>,
    tags: Vec<(String, u8)>,
    attributes: Vec<(String, u8)>,
}

impl CodePageBuilder {
    /// Start a page with its index and primary namespace URI.
    pub fn new(index: u8, namespace: impl Into<String>) -> Self {
        Self {
            index,
            namespace: namespace.into(),
            aliases: Vec::new(),
            tags: Vec::new(),
            attributes: Vec::new(),
        }
    }

    /// Register another namespace URI that selects this page.
    pub fn alias(mut self, namespace: impl Into<String>) -> Self {
        self.aliases.push(namespace.into());
        self
    }

    /// Add a single tag.
    pub fn tag(mut self, name: impl Into<String>, token: u8) -> Self {
        self.tags.push((name.into(), token));
        self
    }

    /// Add a table of tags.
    pub fn tags(mut self, tags: &[(&str, u8)]) -> Self {
        self.tags
            .extend(tags.iter().map(|(name, token)| (name.to_string(), *token)));
        self
    }

    /// Add a single attribute start token.
    pub fn attribute(mut self, name: impl Into<String>, token: u8) -> Self {
        self.attributes.push((name.into(), token));
        self
    }

    /// Add a table of attribute start tokens.
    pub fn attributes(mut self, attributes: &[(&str, u8)]) -> Self {
        self.attributes
            .extend(attributes.iter().map(|(name, token)| (name.to_string(), *token)));
        self
    }

    fn build(self) -> Result<CodePage, DictionaryError> {
        let page = self.index;
        if self.namespace.is_empty() || self.aliases.iter().any(String::is_empty) {
            return Err(DictionaryError::EmptyNamespace { page });
        }
        if self.tags.is_empty() {
            return Err(DictionaryError::EmptyCodePage { page });
        }

        let (tags, tag_names) = index_entries(page, TokenKind::Tag, self.tags, MAX_TAG_TOKEN)?;
        let (attributes, attribute_names) = index_entries(
            page,
            TokenKind::Attribute,
            self.attributes,
            MAX_ATTRIBUTE_TOKEN,
        )?;

        Ok(CodePage {
            index: page,
            namespace: self.namespace,
            aliases: self.aliases,
            tags,
            tag_names,
            attributes,
            attribute_names,
        })
    }
}

type EntryMaps = (HashMap<String, u8>, BTreeMap<u8, String>);

fn index_entries(
    page: u8,
    kind: TokenKind,
    entries: Vec<(String, u8)>,
    max_token: u8,
) -> Result<EntryMaps, DictionaryError> {
    let mut by_name: HashMap<String, u8> = HashMap::with_capacity(entries.len());
    let mut by_token: BTreeMap<u8, String> = BTreeMap::new();

    for (name, token) in entries {
        if name.is_empty() {
            return Err(DictionaryError::EmptyName { page, kind });
        }
        if !(MIN_PAGE_TOKEN..=max_token).contains(&token) {
            return Err(DictionaryError::TokenOutOfRange {
                page,
                kind,
                name,
                token,
            });
        }
        if let Some(first) = by_token.get(&token) {
            return Err(DictionaryError::DuplicateToken {
                page,
                kind,
                token,
                first: first.clone(),
                second: name,
            });
        }
        if by_name.contains_key(&name) {
            return Err(DictionaryError::DuplicateName { page, kind, name });
        }
        by_name.insert(name.clone(), token);
        by_token.insert(token, name);
    }

    Ok((by_name, by_token))
}

/// Builder for a [`CodePageDictionary`].
#[derive(Debug, Clone, Default)]
pub struct DictionaryBuilder {
    pages: Vec<CodePageBuilder>,
}

impl DictionaryBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a code page.
    pub fn page(mut self, page: CodePageBuilder) -> Self {
        self.pages.push(page);
        self
    }

    /// Validate every page and assemble the dictionary.
    pub fn build(self) -> Result<CodePageDictionary, DictionaryError> {
        let mut pages: BTreeMap<u8, CodePage> = BTreeMap::new();
        let mut namespaces: HashMap<String, u8> = HashMap::new();

        for builder in self.pages {
            let page = builder.build()?;
            let index = page.index;
            if pages.contains_key(&index) {
                return Err(DictionaryError::DuplicatePage { page: index });
            }

            for namespace in std::iter::once(&page.namespace).chain(page.aliases.iter()) {
                if let Some(&first) = namespaces.get(namespace) {
                    return Err(DictionaryError::DuplicateNamespace {
                        namespace: namespace.clone(),
                        first,
                        second: index,
                    });
                }
                namespaces.insert(namespace.clone(), index);
            }

            pages.insert(index, page);
        }

        debug!(
            "built code-page dictionary with {} pages and {} namespaces",
            pages.len(),
            namespaces.len()
        );

        Ok(CodePageDictionary { pages, namespaces })
    }
}

/// Maps XML namespaces and names to WBXML code pages and tokens.
///
/// # Example
///
/// ```rust
/// use wbxml::dictionary::{CodePageBuilder, CodePageDictionary, Resolution};
///
/// let dictionary = CodePageDictionary::builder()
///     .page(CodePageBuilder::new(0, "urn:notes").tags(&[("Note", 0x05), ("Body", 0x06)]))
///     .build()
///     .unwrap();
///
/// assert_eq!(dictionary.code_page_for("urn:notes"), Some(0));
/// assert_eq!(dictionary.token_for(0, "Body"), Some(0x06));
/// assert_eq!(
///     dictionary.resolve("{urn:notes}Note", 0),
///     Resolution::Token { page: 0, token: 0x05 }
/// );
/// ```
#[derive(Debug, Clone)]
pub struct CodePageDictionary {
    pages: BTreeMap<u8, CodePage>,
    namespaces: HashMap<String, u8>,
}

impl CodePageDictionary {
    /// Start building a dictionary.
    pub fn builder() -> DictionaryBuilder {
        DictionaryBuilder::new()
    }

    /// The Exchange ActiveSync dictionary, built once per process.
    ///
    /// # Panics
    ///
    /// If the built-in tables fail validation, which [`Self::try_activesync`]
    /// reports as an error instead.
    pub fn activesync() -> &'static CodePageDictionary {
        Self::try_activesync().expect("ActiveSync code pages are well formed")
    }

    /// The Exchange ActiveSync dictionary, or the error its tables failed with.
    pub fn try_activesync() -> Result<&'static CodePageDictionary, DictionaryError> {
        activesync::dictionary()
    }

    /// Namespace URI embedded in a Clark-notation name.
    ///
    /// Returns `None` when the name carries no `{uri}` prefix, or when `known` is
    /// given and differs from the embedded URI.
    pub fn get_ns<'a>(qualified: &'a str, known: Option<&str>) -> Option<&'a str> {
        let (namespace, _) = split_qualified(qualified)?;
        match known {
            Some(known) if known != namespace => None,
            _ => Some(namespace),
        }
    }

    /// Strips `{namespace}` from `qualified` when it matches, otherwise returns the
    /// name unchanged.
    pub fn get_tag<'a>(qualified: &'a str, namespace: Option<&str>) -> &'a str {
        match (namespace, split_qualified(qualified)) {
            (Some(namespace), Some((embedded, local))) if namespace == embedded => local,
            _ => qualified,
        }
    }

    /// Code page selected by a namespace URI, aliases included.
    pub fn code_page_for(&self, namespace: &str) -> Option<u8> {
        self.namespaces.get(namespace).copied()
    }

    /// Tag token of `name` on `page`.
    pub fn token_for(&self, page: u8, name: &str) -> Option<u8> {
        self.pages.get(&page)?.tag_token(name)
    }

    /// Attribute start token of `name` on `page`.
    pub fn attribute_token_for(&self, page: u8, name: &str) -> Option<u8> {
        self.pages.get(&page)?.attribute_token(name)
    }

    /// Tag name of `token` on `page`.
    pub fn tag_name_for(&self, page: u8, token: u8) -> Option<&str> {
        self.pages.get(&page)?.tag_name(token)
    }

    /// Attribute name of `token` on `page`.
    pub fn attribute_name_for(&self, page: u8, token: u8) -> Option<&str> {
        self.pages.get(&page)?.attribute_name(token)
    }

    /// Primary namespace URI of `page`.
    pub fn namespace_for(&self, page: u8) -> Option<&str> {
        self.pages.get(&page).map(CodePage::namespace)
    }

    /// The code page with index `page`.
    pub fn page(&self, page: u8) -> Option<&CodePage> {
        self.pages.get(&page)
    }

    /// All code pages, ordered by index.
    pub fn pages(&self) -> impl Iterator<Item = &CodePage> {
        self.pages.values()
    }

    /// Resolve an element name.
    ///
    /// Unqualified names are looked up on `active_page`, the page currently selected
    /// in the output stream.
    pub fn resolve<'a>(&self, qualified: &'a str, active_page: u8) -> Resolution<'a> {
        self.resolve_with(qualified, active_page, |page, name| self.token_for(page, name))
    }

    /// Resolve an attribute name.
    ///
    /// Unqualified attributes belong to the page of their element.
    pub fn resolve_attribute<'a>(&self, qualified: &'a str, element_page: u8) -> Resolution<'a> {
        self.resolve_with(qualified, element_page, |page, name| {
            self.attribute_token_for(page, name)
        })
    }

    fn resolve_with<'a>(
        &self,
        qualified: &'a str,
        default_page: u8,
        lookup: impl Fn(u8, &str) -> Option<u8>,
    ) -> Resolution<'a> {
        let namespace = Self::get_ns(qualified, None);
        let name = Self::get_tag(qualified, namespace);

        let page = match namespace {
            Some(namespace) => match self.code_page_for(namespace) {
                Some(page) => page,
                None => return Resolution::UnknownNamespace { namespace, name },
            },
            None => default_page,
        };

        match lookup(page, name) {
            Some(token) => Resolution::Token { page, token },
            None => Resolution::Literal { page, name },
        }
    }
}
