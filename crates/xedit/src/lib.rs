//! xedit - format-preserving structural editing for XML build manifests
//!
//! Documents are parsed into a tree that keeps every byte of formatting,
//! edited through a visitor that replaces nodes copy-on-write, and printed
//! back so that untouched regions come out exactly as they went in.
//!
//! # Quick Start
//!
//! ```
//! use xedit::{DisableParentRelativePath, Recipe};
//! # fn main() -> Result<(), xedit::Error> {
//! let pom = "<project>\n  <parent>\n    <artifactId>p</artifactId>\n  </parent>\n</project>\n";
//! let edited = DisableParentRelativePath::new().apply(pom)?;
//! assert!(edited.contains("</artifactId>\n    <relativePath/>\n  </parent>"));
//! assert_eq!(DisableParentRelativePath::new().apply(&edited)?, edited);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, ErrorKind, ParseError, Pos, Result, Span};

pub mod lexer;

pub mod xml;
pub use xml::{
    build_fragment, print, Attribute, Closing, Comment, Config, Content, Document, Quote, Tag,
    Text, MAX_DEPTH,
};

pub mod traverse;
pub use traverse::{from_fn, walk, walk_children, Ancestors, TagPath, Visit, Visitor};

pub mod recipe;
pub use recipe::{
    DisableParentRelativePath, InsertChild, Recipe, RecipeDescriptor, RecipeError,
};

/// Parse a document from a string
pub fn parse(text: &str) -> Result<Document> {
    xml::parse(text)
}

/// Parse a document from bytes, which must be UTF-8
pub fn parse_bytes(bytes: &[u8]) -> Result<Document> {
    xml::Parser::new(bytes).parse()
}

/// Parse a document with custom limits
pub fn parse_with_config(text: &str, config: Config) -> Result<Document> {
    xml::parse_with_config(text, config)
}
