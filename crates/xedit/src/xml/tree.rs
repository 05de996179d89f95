//! Lossless XML tree
//!
//! Every node owns the whitespace that precedes it (its *prefix*) and enough
//! of its literal syntax to be printed back byte-for-byte. Child tags are
//! reference counted so an edited tree shares every untouched subtree with
//! the tree it was derived from.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::xml::escape;

/// XML document
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Document {
    /// Input started with a UTF-8 byte order mark
    pub bom: bool,
    /// Top-level content in source order. Holds exactly one tag.
    pub content: Vec<Content>,
    /// Whitespace after the last top-level node
    pub eof: String,
}

/// XML content node
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Content {
    Tag(Arc<Tag>),
    Text(Text),
    Comment(Comment),
    CData(CData),
    ProcessingInstruction(ProcessingInstruction),
    Doctype(Doctype),
}

/// XML element
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Tag {
    pub prefix: String,
    pub name: String,
    pub attributes: IndexMap<String, Attribute>,
    /// Whitespace between the last attribute and `>` or `/>`
    pub before_end: String,
    pub content: Vec<Content>,
    pub closing: Closing,
}

/// How a tag is closed
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Closing {
    /// `<name/>`
    #[default]
    SelfClosing,
    /// `<name>...</name>`
    Paired {
        /// Whitespace before `</`
        prefix: String,
        /// Whitespace between the closing name and `>`
        before_end: String,
    },
}

/// Attribute value with the syntax it was written in
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Attribute {
    pub prefix: String,
    pub before_eq: String,
    pub after_eq: String,
    pub quote: Quote,
    /// Value exactly as written, entities not decoded
    pub raw: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Quote {
    #[default]
    Double,
    Single,
}

impl Quote {
    pub const fn as_char(self) -> char {
        match self {
            Self::Double => '"',
            Self::Single => '\'',
        }
    }
}

/// Character data between tags
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Text {
    pub prefix: String,
    /// Raw text, entities not decoded. Never starts or ends with whitespace.
    pub text: String,
}

/// `<!-- ... -->`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Comment {
    pub prefix: String,
    pub text: String,
}

/// `<![CDATA[ ... ]]>`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CData {
    pub prefix: String,
    pub text: String,
}

/// `<?target ... ?>`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ProcessingInstruction {
    pub prefix: String,
    /// Everything between `<?` and `?>`
    pub body: String,
}

/// `<!DOCTYPE ...>`, kept verbatim and never interpreted
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Doctype {
    pub prefix: String,
    /// Everything between `<!DOCTYPE` and the final `>`
    pub body: String,
}

impl Document {
    /// The root element
    pub fn root(&self) -> Option<&Arc<Tag>> {
        self.content.iter().find_map(Content::as_tag)
    }

    /// Copy of this document with the root element replaced
    pub fn with_root(&self, root: Arc<Tag>) -> Self {
        let mut root = Some(root);
        let content = self
            .content
            .iter()
            .map(|content| match content {
                Content::Tag(_) => root.take().map_or_else(|| content.clone(), Content::Tag),
                other => other.clone(),
            })
            .collect();
        Self {
            bom: self.bom,
            content,
            eof: self.eof.clone(),
        }
    }
}

impl Content {
    pub fn as_tag(&self) -> Option<&Arc<Tag>> {
        match self {
            Self::Tag(tag) => Some(tag),
            _ => None,
        }
    }
}

impl From<Tag> for Content {
    fn from(tag: Tag) -> Self {
        Self::Tag(Arc::new(tag))
    }
}

impl Tag {
    /// A detached, self-closing tag with no prefix and no attributes
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            prefix: String::new(),
            name: name.into(),
            attributes: IndexMap::new(),
            before_end: String::new(),
            content: Vec::new(),
            closing: Closing::SelfClosing,
        }
    }

    pub const fn is_self_closing(&self) -> bool {
        matches!(self.closing, Closing::SelfClosing)
    }

    /// Child tags in order
    pub fn child_tags(&self) -> impl Iterator<Item = &Arc<Tag>> {
        self.content.iter().filter_map(Content::as_tag)
    }

    /// First child tag with the given name
    pub fn child(&self, name: &str) -> Option<&Arc<Tag>> {
        self.child_tags().find(|tag| tag.name == name)
    }

    /// Every child tag with the given name, in order
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Arc<Tag>> {
        self.child_tags().filter(move |tag| tag.name == name)
    }

    pub fn has_child(&self, name: &str) -> bool {
        self.child(name).is_some()
    }

    /// Decoded text of a tag whose only content is character data.
    ///
    /// `<version> 1.0 </version>` yields `"1.0"`; tags with child elements
    /// yield `None`.
    pub fn value(&self) -> Option<String> {
        let mut value = String::new();
        for content in &self.content {
            match content {
                Content::Text(text) => {
                    value.push_str(&text.prefix);
                    value.push_str(&escape::decode(&text.text));
                }
                Content::CData(cdata) => {
                    value.push_str(&cdata.prefix);
                    value.push_str(&cdata.text);
                }
                Content::Comment(_) => {}
                _ => return None,
            }
        }
        Some(value.trim().to_string())
    }

    /// Decoded value of the named attribute
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.get(name).map(|attr| attr.value().into_owned())
    }

    pub fn with_prefix(&self, prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..self.clone()
        }
    }

    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Copy of this tag with its children replaced.
    ///
    /// A self-closing tag given children becomes a paired tag whose closing
    /// tag has no prefix.
    pub fn with_content(&self, content: Vec<Content>) -> Self {
        let closing = match &self.closing {
            Closing::SelfClosing if !content.is_empty() => Closing::Paired {
                prefix: String::new(),
                before_end: String::new(),
            },
            closing => closing.clone(),
        };
        Self {
            content,
            closing,
            ..self.clone()
        }
    }

    /// Copy of this tag with `child` added after every existing child
    pub fn with_appended_child(&self, child: impl Into<Content>) -> Self {
        let mut content = self.content.clone();
        content.push(child.into());
        self.with_content(content)
    }

    /// Copy of this tag with the attribute set.
    ///
    /// An existing attribute keeps its position, spacing and quote style; a
    /// new one is appended as ` name="value"`.
    pub fn with_attribute(&self, name: impl Into<String>, value: &str) -> Self {
        let mut attributes = self.attributes.clone();
        let name = name.into();
        match attributes.get_mut(&name) {
            Some(existing) => existing.set_value(value),
            None => {
                attributes.insert(name, Attribute::new(value));
            }
        }
        Self {
            attributes,
            ..self.clone()
        }
    }
}

impl Attribute {
    /// A new attribute written as ` name="value"`
    pub fn new(value: &str) -> Self {
        Self {
            prefix: " ".to_string(),
            before_eq: String::new(),
            after_eq: String::new(),
            quote: Quote::Double,
            raw: escape::escape_attribute(value).into_owned(),
        }
    }

    /// Decoded value
    pub fn value(&self) -> std::borrow::Cow<'_, str> {
        escape::decode(&self.raw)
    }

    fn set_value(&mut self, value: &str) {
        let escaped = escape::escape_attribute(value);
        self.raw = match self.quote {
            Quote::Double => escaped.into_owned(),
            Quote::Single => escaped.replace('\'', "&apos;"),
        };
    }
}

impl Text {
    pub fn new(prefix: impl Into<String>, text: &str) -> Self {
        Self {
            prefix: prefix.into(),
            text: escape::escape_text(text).into_owned(),
        }
    }

    /// Decoded character data
    pub fn decoded(&self) -> std::borrow::Cow<'_, str> {
        escape::decode(&self.text)
    }
}
