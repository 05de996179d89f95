//! Ancestor context handed to visitors

use crate::traverse::path::TagPath;

/// Names of the tags enclosing the node being visited, outermost first.
///
/// The document root tag is visited with an empty chain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Ancestors<'a> {
    names: &'a [&'a str],
}

impl<'a> Ancestors<'a> {
    pub const fn new(names: &'a [&'a str]) -> Self {
        Self { names }
    }

    /// Number of enclosing tags
    pub const fn depth(&self) -> usize {
        self.names.len()
    }

    /// True while visiting the document's root tag (or top-level content)
    pub const fn is_top_level(&self) -> bool {
        self.names.is_empty()
    }

    /// Name of the immediately enclosing tag
    pub fn parent(&self) -> Option<&'a str> {
        self.names.last().copied()
    }

    /// Name of the document's root tag
    pub fn root(&self) -> Option<&'a str> {
        self.names.first().copied()
    }

    /// Enclosing tag names from the root inwards
    pub fn names(&self) -> impl DoubleEndedIterator<Item = &'a str> + ExactSizeIterator + 'a {
        self.names.iter().copied()
    }

    /// True when the enclosing chain is exactly the document root named `root`,
    /// i.e. the visited node is a direct child of that root.
    pub fn is_root_child_of(&self, root: &str) -> bool {
        matches!(self.names, [only] if *only == root)
    }

    /// Whether a tag named `name` at this position matches `path`
    pub fn matches(&self, path: &TagPath, name: &str) -> bool {
        path.matches(self, name)
    }
}
