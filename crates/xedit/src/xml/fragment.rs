//! Fragment builder: detached tags for insertion into an existing tree

use crate::error::Result;
use crate::xml::parser::{Config, Parser};
use crate::xml::tree::Tag;

/// Parse a single self-contained element such as `<relativePath/>`.
///
/// Leading and trailing whitespace is ignored and the returned tag has an
/// empty prefix; callers assign the prefix that fits the insertion site.
pub fn build_fragment(text: &str) -> Result<Tag> {
    build_fragment_with_config(text, Config::default())
}

/// Parse a single element with custom limits
pub fn build_fragment_with_config(text: &str, config: Config) -> Result<Tag> {
    Parser::with_config(text.as_bytes(), config).parse_fragment()
}
