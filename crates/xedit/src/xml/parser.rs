//! Lossless XML parser implementation

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, instrument};

use crate::error::{Error, ErrorKind, Result};
use crate::lexer::cursor::{is_whitespace, Cursor};
use crate::xml::tree::{
    Attribute, CData, Closing, Comment, Content, Doctype, Document, ProcessingInstruction, Quote,
    Tag, Text,
};

/// Nesting ceiling applied whatever the configured depth. Parsing itself
/// keeps open elements on the heap, but walking, printing, comparing and
/// dropping a tree recurse once per level.
pub const MAX_DEPTH: u16 = 1024;

const BOM: &[u8] = "\u{FEFF}".as_bytes();

/// Configuration for the XML parser
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Maximum element nesting depth (0 means [`MAX_DEPTH`])
    pub max_depth: u16,
    /// Maximum input size in bytes (0 means unlimited)
    pub max_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: 256,
            max_size: 16 * 1024 * 1024, // 16 MB default
        }
    }
}

impl Config {
    /// Create a new config with no size limit and the deepest nesting allowed
    pub const fn unlimited() -> Self {
        Self {
            max_depth: 0,
            max_size: 0,
        }
    }

    /// Create a new config with specific limits
    pub const fn new(max_depth: u16, max_size: usize) -> Self {
        Self {
            max_depth,
            max_size,
        }
    }

    /// Nesting depth actually enforced, never above [`MAX_DEPTH`]
    pub const fn depth_limit(&self) -> u16 {
        if self.max_depth == 0 || self.max_depth > MAX_DEPTH {
            MAX_DEPTH
        } else {
            self.max_depth
        }
    }
}

/// XML parser
#[derive(Debug)]
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    config: Config,
}

/// An element whose end tag has not been reached yet
#[derive(Debug)]
struct OpenElement {
    prefix: String,
    name: String,
    attributes: IndexMap<String, Attribute>,
    before_end: String,
    content: Vec<Content>,
    // Whitespace trailing a text run belongs to whatever follows it.
    carry: String,
}

impl OpenElement {
    fn close(self, closing: Closing) -> Tag {
        Tag {
            prefix: self.prefix,
            name: self.name,
            attributes: self.attributes,
            before_end: self.before_end,
            content: self.content,
            closing,
        }
    }
}

/// Hand a finished tag to the innermost open element. Returns it back when
/// nothing is open, i.e. it was the outermost one.
fn attach(open: &mut [OpenElement], tag: Tag) -> Option<Tag> {
    match open.last_mut() {
        Some(parent) => {
            parent.content.push(Content::from(tag));
            None
        }
        None => Some(tag),
    }
}

impl<'a> Parser<'a> {
    /// Create a new parser with default configuration
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_config(input, Config::default())
    }

    /// Create a new parser with custom configuration
    pub const fn with_config(input: &'a [u8], config: Config) -> Self {
        Self {
            cursor: Cursor::new(input),
            config,
        }
    }

    /// Parse a complete document
    #[instrument(level = "debug", skip(self), fields(len = self.cursor.remaining().len()))]
    pub fn parse(&mut self) -> Result<Document> {
        self.check_input()?;

        let bom = self.cursor.starts_with(BOM);
        if bom {
            self.cursor.advance_by(BOM.len());
        }

        let mut content = Vec::new();
        let mut has_root = false;
        let eof = loop {
            let prefix = self.whitespace()?;
            if self.cursor.is_eof() {
                break prefix;
            }
            if self.cursor.current() != Some(b'<') {
                let kind = if has_root {
                    ErrorKind::TrailingContent
                } else {
                    self.expected("'<'")
                };
                return Err(self.error_here(kind));
            }

            let start = self.cursor.position();
            let node = self.parse_markup(prefix, true)?;
            if let Content::Tag(_) = node {
                if has_root {
                    return Err(Error::at(ErrorKind::MultipleRoots, start));
                }
                has_root = true;
            }
            content.push(node);
        };

        if !has_root {
            return Err(self.error_here(ErrorKind::MissingRoot));
        }

        debug!(nodes = content.len(), "parsed document");
        Ok(Document { bom, content, eof })
    }

    /// Parse input consisting of exactly one element, optionally surrounded
    /// by whitespace. The returned tag has an empty prefix.
    pub fn parse_fragment(&mut self) -> Result<Tag> {
        self.check_input()?;

        self.cursor.skip_whitespace();
        if self.cursor.current() != Some(b'<') || !self.at_tag_start() {
            return Err(self.error_here(ErrorKind::NotAFragment));
        }
        let tag = self.parse_element(String::new())?;

        self.cursor.skip_whitespace();
        if !self.cursor.is_eof() {
            return Err(self.error_here(ErrorKind::NotAFragment));
        }
        Ok(tag)
    }

    fn check_input(&self) -> Result<()> {
        let input = self.cursor.remaining();
        if self.config.max_size > 0 && input.len() > self.config.max_size {
            return Err(self.error_here(ErrorKind::TooLarge {
                max: self.config.max_size,
            }));
        }
        std::str::from_utf8(input).map_err(|e| {
            let mut cursor = self.cursor.clone();
            cursor.advance_by(e.valid_up_to());
            Error::at(ErrorKind::InvalidUtf8, cursor.position())
        })?;
        Ok(())
    }

    /// `<` followed by a name start character
    fn at_tag_start(&self) -> bool {
        self.cursor.peek(1).is_some_and(is_name_start)
    }

    fn parse_markup(&mut self, prefix: String, top_level: bool) -> Result<Content> {
        if self.at_tag_start() {
            return self.parse_element(prefix).map(Content::from);
        }
        self.parse_leaf(prefix, top_level)
    }

    /// Markup other than an element: comments, CDATA, doctype and PIs
    fn parse_leaf(&mut self, prefix: String, top_level: bool) -> Result<Content> {
        if self.cursor.starts_with(b"<!--") {
            return self.parse_comment(prefix).map(Content::Comment);
        }
        if self.cursor.starts_with(b"<![CDATA[") && !top_level {
            return self.parse_cdata(prefix).map(Content::CData);
        }
        if self.cursor.starts_with(b"<!DOCTYPE") && top_level {
            return self.parse_doctype(prefix).map(Content::Doctype);
        }
        if self.cursor.starts_with(b"<?") {
            return self
                .parse_processing_instruction(prefix)
                .map(Content::ProcessingInstruction);
        }
        if self.cursor.starts_with(b"</") {
            let start = self.cursor.position();
            self.cursor.advance_by(2);
            let found = self.parse_name().unwrap_or_default();
            return Err(Error::at(ErrorKind::UnexpectedClosingTag { found }, start));
        }

        self.cursor.advance();
        let kind = self.expected("element name");
        Err(self.error_here(kind))
    }

    /// Parse one element and everything nested in it.
    ///
    /// Open elements live on an explicit stack, so input nesting never
    /// reaches the call stack.
    fn parse_element(&mut self, prefix: String) -> Result<Tag> {
        let mut open: Vec<OpenElement> = Vec::new();
        if let Some(tag) = self.parse_start_tag(prefix, &mut open)? {
            return Ok(tag);
        }

        while let Some(current) = open.last_mut() {
            let mut prefix = std::mem::take(&mut current.carry);
            prefix.push_str(&self.whitespace()?);

            if self.cursor.is_eof() {
                break;
            }

            if self.cursor.starts_with(b"</") {
                let closing = self.parse_end_tag(&current.name, prefix)?;
                if let Some(element) = open.pop() {
                    if let Some(tag) = attach(&mut open, element.close(closing)) {
                        return Ok(tag);
                    }
                }
            } else if self.at_tag_start() {
                if let Some(tag) = self.parse_start_tag(prefix, &mut open)? {
                    return Ok(tag);
                }
            } else if self.cursor.current() == Some(b'<') {
                let node = self.parse_leaf(prefix, false)?;
                current.content.push(node);
            } else {
                let (text, trailing) = self.parse_text()?;
                current.content.push(Content::Text(Text { prefix, text }));
                current.carry = trailing;
            }
        }

        Err(self.error_here(ErrorKind::Unterminated {
            construct: "element",
        }))
    }

    /// Parse a start tag. An empty-element tag is attached to its parent at
    /// once, any other is pushed onto `open`. Returns the tag when it is
    /// complete and nothing encloses it.
    fn parse_start_tag(
        &mut self,
        prefix: String,
        open: &mut Vec<OpenElement>,
    ) -> Result<Option<Tag>> {
        let max = self.config.depth_limit();
        if open.len() >= usize::from(max) {
            return Err(self.error_here(ErrorKind::TooDeep { max }));
        }

        self.expect_byte(b'<')?;
        let name = self.parse_name()?;
        let (attributes, before_end) = self.parse_attributes()?;
        let element = OpenElement {
            prefix,
            name,
            attributes,
            before_end,
            content: Vec::new(),
            carry: String::new(),
        };

        if self.cursor.consume(b'/') {
            self.expect_byte(b'>')?;
            return Ok(attach(open, element.close(Closing::SelfClosing)));
        }
        self.expect_byte(b'>')?;
        open.push(element);
        Ok(None)
    }

    /// Parse `</name>` closing the element named `expected`
    fn parse_end_tag(&mut self, expected: &str, prefix: String) -> Result<Closing> {
        let start = self.cursor.position();
        self.cursor.advance_by(2);
        let found = self.parse_name()?;
        if found != expected {
            return Err(Error::at(
                ErrorKind::UnmatchedClosingTag {
                    expected: expected.to_string(),
                    found,
                },
                start,
            ));
        }
        let before_end = self.whitespace()?;
        self.expect_byte(b'>')?;
        Ok(Closing::Paired { prefix, before_end })
    }

    /// Parse attributes up to `>` or `/>`, returning them with the whitespace
    /// that precedes the end of the start tag.
    fn parse_attributes(&mut self) -> Result<(IndexMap<String, Attribute>, String)> {
        let mut attributes = IndexMap::new();

        loop {
            let prefix = self.whitespace()?;
            match self.cursor.current() {
                Some(b'/' | b'>') => return Ok((attributes, prefix)),
                Some(_) if prefix.is_empty() => {
                    return Err(self.error_here(ErrorKind::InvalidAttribute));
                }
                Some(_) => {}
                None => {
                    return Err(self.error_here(ErrorKind::Unterminated { construct: "tag" }));
                }
            }

            let start = self.cursor.position();
            let name = self
                .parse_name()
                .map_err(|_| self.error_here(ErrorKind::InvalidAttribute))?;
            let before_eq = self.whitespace()?;
            if !self.cursor.consume(b'=') {
                return Err(self.error_here(ErrorKind::InvalidAttribute));
            }
            let after_eq = self.whitespace()?;
            let (quote, raw) = self.parse_attribute_value()?;

            if attributes.contains_key(&name) {
                return Err(Error::at(ErrorKind::DuplicateAttribute { name }, start));
            }
            attributes.insert(
                name,
                Attribute {
                    prefix,
                    before_eq,
                    after_eq,
                    quote,
                    raw,
                },
            );
        }
    }

    fn parse_attribute_value(&mut self) -> Result<(Quote, String)> {
        let quote = match self.cursor.current() {
            Some(b'"') => Quote::Double,
            Some(b'\'') => Quote::Single,
            None => return Err(self.error_here(ErrorKind::Unterminated { construct: "tag" })),
            _ => return Err(self.error_here(ErrorKind::InvalidAttribute)),
        };
        self.cursor.advance();

        let delimiter = match quote {
            Quote::Double => b'"',
            Quote::Single => b'\'',
        };
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == delimiter {
                let raw = bytes_to_string(self.cursor.slice_from(start))?;
                self.cursor.advance();
                return Ok((quote, raw));
            }
            if b == b'<' {
                return Err(self.error_here(ErrorKind::InvalidAttribute));
            }
            self.cursor.advance();
        }

        Err(self.error_here(ErrorKind::Unterminated {
            construct: "attribute value",
        }))
    }

    /// Character data up to the next `<`, split into the text proper and its
    /// trailing whitespace.
    fn parse_text(&mut self) -> Result<(String, String)> {
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == b'<' {
                break;
            }
            self.cursor.advance();
        }

        let raw = bytes_to_string(self.cursor.slice_from(start))?;
        let text_len = raw.trim_end_matches(is_whitespace_char).len();
        let trailing = raw.get(text_len..).unwrap_or_default().to_string();
        let mut text = raw;
        text.truncate(text_len);
        Ok((text, trailing))
    }

    fn parse_comment(&mut self, prefix: String) -> Result<Comment> {
        let text = self.delimited(b"<!--", b"-->", "comment")?;
        Ok(Comment { prefix, text })
    }

    fn parse_cdata(&mut self, prefix: String) -> Result<CData> {
        let text = self.delimited(b"<![CDATA[", b"]]>", "CDATA section")?;
        Ok(CData { prefix, text })
    }

    fn parse_processing_instruction(&mut self, prefix: String) -> Result<ProcessingInstruction> {
        let body = self.delimited(b"<?", b"?>", "processing instruction")?;
        Ok(ProcessingInstruction { prefix, body })
    }

    fn parse_doctype(&mut self, prefix: String) -> Result<Doctype> {
        let start_pos = self.cursor.position();
        self.cursor.advance_by(b"<!DOCTYPE".len());
        let start = self.cursor.pos();

        // An internal subset may contain '>' inside brackets or quotes.
        let mut brackets = 0usize;
        let mut quote = None;
        while let Some(b) = self.cursor.current() {
            match (quote, b) {
                (Some(q), b) if b == q => quote = None,
                (Some(_), _) => {}
                (None, b'"' | b'\'') => quote = Some(b),
                (None, b'[') => brackets += 1,
                (None, b']') => brackets = brackets.saturating_sub(1),
                (None, b'>') if brackets == 0 => {
                    let body = bytes_to_string(self.cursor.slice_from(start))?;
                    self.cursor.advance();
                    return Ok(Doctype { prefix, body });
                }
                _ => {}
            }
            self.cursor.advance();
        }

        Err(Error::at(
            ErrorKind::Unterminated {
                construct: "doctype",
            },
            start_pos,
        ))
    }

    /// Raw text between `open` and `close`
    fn delimited(
        &mut self,
        open: &[u8],
        close: &[u8],
        construct: &'static str,
    ) -> Result<String> {
        let start_pos = self.cursor.position();
        self.cursor.advance_by(open.len());
        let start = self.cursor.pos();
        if !self.cursor.skip_past(close) {
            return Err(Error::at(ErrorKind::Unterminated { construct }, start_pos));
        }
        let raw = self.cursor.slice_from(start);
        let body = raw.get(..raw.len() - close.len()).unwrap_or_default();
        bytes_to_string(body)
    }

    fn parse_name(&mut self) -> Result<String> {
        let start = self.cursor.pos();

        match self.cursor.current() {
            Some(first) if is_name_start(first) => self.cursor.advance(),
            _ => return Err(self.error_here(ErrorKind::InvalidName)),
        }
        while let Some(b) = self.cursor.current() {
            if is_name_char(b) {
                self.cursor.advance();
            } else {
                break;
            }
        }

        bytes_to_string(self.cursor.slice_from(start))
    }

    fn whitespace(&mut self) -> Result<String> {
        let start = self.cursor.pos();
        self.cursor.skip_whitespace();
        bytes_to_string(self.cursor.slice_from(start))
    }

    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        if self.cursor.consume(expected) {
            Ok(())
        } else {
            let kind = self.expected(&format!("'{}'", char::from(expected)));
            Err(self.error_here(kind))
        }
    }

    fn expected(&self, expected: &str) -> ErrorKind {
        let found = match self.cursor.current() {
            None => "end of input".to_string(),
            Some(b) if b.is_ascii_graphic() => format!("'{}'", char::from(b)),
            Some(b) if b.is_ascii() => format!("byte 0x{b:02x}"),
            Some(_) => "non-ascii character".to_string(),
        };
        ErrorKind::Expected {
            expected: expected.to_string(),
            found,
        }
    }

    fn error_here(&self, kind: ErrorKind) -> Error {
        Error::at(kind, self.cursor.position())
    }
}

/// Parse a document with the default configuration
pub fn parse(text: &str) -> Result<Document> {
    Parser::new(text.as_bytes()).parse()
}

/// Parse a document with custom limits
pub fn parse_with_config(text: &str, config: Config) -> Result<Document> {
    Parser::with_config(text.as_bytes(), config).parse()
}

/// Parse a document and return its root as a shared tag
pub fn parse_root(text: &str) -> Result<Arc<Tag>> {
    let doc = parse(text)?;
    doc.root()
        .cloned()
        .ok_or_else(|| Error::at(ErrorKind::MissingRoot, Default::default()))
}

fn bytes_to_string(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|_| Error::at(ErrorKind::InvalidUtf8, Default::default()))
}

fn is_whitespace_char(c: char) -> bool {
    c.is_ascii() && u8::try_from(c).is_ok_and(is_whitespace)
}

fn is_name_start(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || !b.is_ascii()
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root_of(input: &str) -> Result<Arc<Tag>> {
        parse_root(input)
    }

    #[test]
    fn test_parse_simple_element() -> Result<()> {
        let root = root_of("<root></root>")?;
        assert_eq!(root.name, "root");
        assert!(root.content.is_empty());
        assert!(!root.is_self_closing());
        Ok(())
    }

    #[test]
    fn test_parse_with_attributes() -> Result<()> {
        let root = root_of("<root id=\"1\"  name = 'test'></root>")?;
        assert_eq!(root.attribute("id"), Some("1".to_string()));
        let name = root.attributes.get("name");
        assert_eq!(name.map(|a| a.quote), Some(Quote::Single));
        assert_eq!(name.map(|a| a.prefix.as_str()), Some("  "));
        assert_eq!(name.map(|a| a.before_eq.as_str()), Some(" "));
        assert_eq!(name.map(|a| a.after_eq.as_str()), Some(" "));
        Ok(())
    }

    #[test]
    fn test_attribute_order_preserved() -> Result<()> {
        let root = root_of("<root z=\"1\" a=\"2\" m=\"3\"/>")?;
        let names: Vec<&str> = root.attributes.keys().map(String::as_str).collect();
        assert_eq!(names, ["z", "a", "m"]);
        Ok(())
    }

    #[test]
    fn test_parse_nested_with_prefixes() -> Result<()> {
        let root = root_of("<parent>\n    <artifactId>foo</artifactId>\n</parent>")?;
        let child = root.child("artifactId");
        assert_eq!(child.map(|c| c.prefix.as_str()), Some("\n    "));
        assert_eq!(child.and_then(|c| c.value()), Some("foo".to_string()));
        assert_eq!(
            root.closing,
            Closing::Paired {
                prefix: "\n".to_string(),
                before_end: String::new(),
            }
        );
        Ok(())
    }

    #[test]
    fn test_text_trailing_whitespace_moves_to_next_prefix() -> Result<()> {
        let root = root_of("<a>hello  <b/> world\n</a>")?;
        match root.content.as_slice() {
            [Content::Text(first), Content::Tag(b), Content::Text(second)] => {
                assert_eq!(first.text, "hello");
                assert_eq!(b.prefix, "  ");
                assert_eq!(second.prefix, " ");
                assert_eq!(second.text, "world");
            }
            other => panic!("unexpected content: {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_parse_self_closing() -> Result<()> {
        let root = root_of("<root><child /></root>")?;
        let child = root.child("child");
        assert_eq!(child.map(|c| c.is_self_closing()), Some(true));
        assert_eq!(child.map(|c| c.before_end.as_str()), Some(" "));
        Ok(())
    }

    #[test]
    fn test_nested_same_name() -> Result<()> {
        let root = root_of("<a><a><a/></a></a>")?;
        let inner = root.child("a").and_then(|a| a.child("a"));
        assert!(inner.is_some());
        Ok(())
    }

    #[test]
    fn test_prolog_comment_and_eof() -> Result<()> {
        let doc = parse("<?xml version=\"1.0\"?>\n<!-- c -->\n<root/>\n")?;
        assert_eq!(doc.content.len(), 3);
        assert_eq!(doc.eof, "\n");
        match doc.content.first() {
            Some(Content::ProcessingInstruction(pi)) => {
                assert_eq!(pi.body, "xml version=\"1.0\"");
            }
            other => panic!("unexpected content: {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_doctype_with_internal_subset() -> Result<()> {
        let doc = parse("<!DOCTYPE note [<!ENTITY x \"y>\">]>\n<note/>")?;
        match doc.content.first() {
            Some(Content::Doctype(doctype)) => {
                assert_eq!(doctype.body, " note [<!ENTITY x \"y>\">]");
            }
            other => panic!("unexpected content: {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_cdata_kept_raw() -> Result<()> {
        let root = root_of("<s><![CDATA[a < b]]></s>")?;
        assert_eq!(root.value(), Some("a < b".to_string()));
        Ok(())
    }

    #[test]
    fn test_mismatched_closing_tag() {
        let err = parse("<parent><artifactId>foo</parent>").err();
        assert!(matches!(
            err.as_ref().map(Error::kind),
            Some(ErrorKind::UnmatchedClosingTag { expected, found })
                if expected == "artifactId" && found == "parent"
        ));
        assert_eq!(err.map(|e| e.position().offset), Some(23));
    }

    #[test]
    fn test_unterminated_constructs() {
        let cases = [
            ("<root", ErrorKind::Unterminated { construct: "tag" }),
            ("<root>", ErrorKind::Unterminated { construct: "element" }),
            (
                "<root><!-- x",
                ErrorKind::Unterminated {
                    construct: "comment",
                },
            ),
            (
                "<root a=\"x",
                ErrorKind::Unterminated {
                    construct: "attribute value",
                },
            ),
        ];
        for (input, kind) in cases {
            let err = parse(input).err();
            assert_eq!(err.as_ref().map(Error::kind), Some(&kind), "input: {input}");
        }
    }

    #[test]
    fn test_invalid_attribute_syntax() {
        for input in ["<root a></root>", "<root a=x/>", "<root a=\"1\"b=\"2\"/>"] {
            let err = parse(input).err();
            assert_eq!(
                err.as_ref().map(Error::kind),
                Some(&ErrorKind::InvalidAttribute),
                "input: {input}"
            );
        }
    }

    #[test]
    fn test_duplicate_attribute() {
        let err = parse("<root a=\"1\" a=\"2\"/>").err();
        assert!(matches!(
            err.as_ref().map(Error::kind),
            Some(ErrorKind::DuplicateAttribute { name }) if name == "a"
        ));
    }

    #[test]
    fn test_document_shape_errors() {
        assert_eq!(
            parse("  ").err().map(|e| e.kind().clone()),
            Some(ErrorKind::MissingRoot)
        );
        assert_eq!(
            parse("<a/><b/>").err().map(|e| e.kind().clone()),
            Some(ErrorKind::MultipleRoots)
        );
        assert_eq!(
            parse("<a/> tail").err().map(|e| e.kind().clone()),
            Some(ErrorKind::TrailingContent)
        );
        assert!(matches!(
            parse("</a>").err().map(|e| e.kind().clone()),
            Some(ErrorKind::UnexpectedClosingTag { .. })
        ));
    }

    #[test]
    fn test_max_depth_exceeded() {
        let input = format!("{}{}", "<a>".repeat(5), "</a>".repeat(5));
        let mut parser = Parser::with_config(input.as_bytes(), Config::new(4, 0));
        let err = parser.parse().err();
        assert_eq!(
            err.map(|e| e.kind().clone()),
            Some(ErrorKind::TooDeep { max: 4 })
        );

        let mut parser = Parser::with_config(input.as_bytes(), Config::new(5, 0));
        assert!(parser.parse().is_ok());
    }

    #[test]
    fn test_max_size_exceeded() {
        let mut parser = Parser::with_config(b"<root></root>", Config::new(0, 4));
        assert_eq!(
            parser.parse().err().map(|e| e.kind().clone()),
            Some(ErrorKind::TooLarge { max: 4 })
        );
    }

    #[test]
    fn test_invalid_utf8() {
        let mut parser = Parser::new(b"<root>\xff</root>");
        let err = parser.parse().err();
        assert_eq!(err.as_ref().map(Error::kind), Some(&ErrorKind::InvalidUtf8));
        assert_eq!(err.map(|e| e.position().offset), Some(6));
    }

    fn nested(depth: usize) -> String {
        format!("{}{}", "<a>".repeat(depth), "</a>".repeat(depth))
    }

    #[test]
    fn test_unlimited_config_stops_at_ceiling() {
        let depth = usize::from(MAX_DEPTH);
        let input = nested(depth);
        let mut parser = Parser::with_config(input.as_bytes(), Config::unlimited());
        assert!(parser.parse().is_ok());

        let input = nested(depth + 1);
        let mut parser = Parser::with_config(input.as_bytes(), Config::unlimited());
        assert_eq!(
            parser.parse().err().map(|e| e.kind().clone()),
            Some(ErrorKind::TooDeep { max: MAX_DEPTH })
        );
    }

    #[test]
    fn test_depth_limit_clamped() {
        assert_eq!(Config::new(0, 0).depth_limit(), MAX_DEPTH);
        assert_eq!(Config::new(u16::MAX, 0).depth_limit(), MAX_DEPTH);
        assert_eq!(Config::new(12, 0).depth_limit(), 12);
        assert_eq!(Config::default().depth_limit(), 256);
    }

    #[test]
    fn test_very_deep_input_is_an_error() {
        let input = nested(60_000);
        let mut parser = Parser::with_config(input.as_bytes(), Config::new(u16::MAX, 0));
        assert_eq!(
            parser.parse().err().map(|e| e.kind().clone()),
            Some(ErrorKind::TooDeep { max: MAX_DEPTH })
        );
    }

    #[test]
    fn test_default_depth_on_worker_thread() {
        let max = usize::from(Config::default().max_depth);
        let worker = std::thread::spawn(move || {
            let input = nested(max);
            let doc = parse(&input).map(|doc| crate::xml::print(&doc) == input);
            let too_deep = parse(&nested(max + 1)).err().map(|e| e.kind().clone());
            (doc, too_deep)
        });
        let (round_trip, too_deep) = worker.join().unwrap_or_else(|_| panic!("worker panicked"));
        assert_eq!(round_trip, Ok(true));
        assert_eq!(too_deep, Some(ErrorKind::TooDeep { max: 256 }));
    }

    #[test]
    fn test_byte_order_mark() -> Result<()> {
        let input = "\u{FEFF}<?xml version=\"1.0\"?>\n<project/>\n";
        let doc = parse(input)?;
        assert!(doc.bom);
        assert_eq!(doc.root().map(|t| t.name.as_str()), Some("project"));
        assert_eq!(crate::xml::print(&doc), input);

        assert!(!parse("<project/>")?.bom);
        Ok(())
    }

    #[test]
    fn test_byte_order_mark_only_at_start() {
        assert!(parse("<a/>\u{FEFF}").is_err());
        assert!(parse(" \u{FEFF}<a/>").is_err());
    }
}
