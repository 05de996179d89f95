//! Conditional, anchored insertion of a child tag

use std::sync::Arc;

use tracing::trace;

use crate::recipe::{Recipe, RecipeError};
use crate::traverse::{from_fn, walk, Ancestors, TagPath, Visit};
use crate::xml::printer::print_tag;
use crate::xml::{build_fragment, Content, Document, Tag};

/// Appends a child tag to every tag selected by `target`, unless a child with
/// the same name is already there.
///
/// With an anchor, the new child copies the anchor child's prefix and nothing
/// is inserted into tags that lack the anchor. Without one it copies the
/// prefix of the last existing child tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InsertChild {
    target: TagPath,
    child: Tag,
    anchor: Option<String>,
    description: String,
}

impl InsertChild {
    /// Build from a path expression and the text of the tag to insert
    pub fn new(target: &str, fragment: &str) -> Result<Self, RecipeError> {
        let target = TagPath::parse(target)?;
        let child = build_fragment(fragment)?;
        Ok(Self::from_parts(target, child))
    }

    /// Build from an already parsed path and a detached tag
    pub fn from_parts(target: TagPath, child: Tag) -> Self {
        let child = child.with_prefix("");
        let description = format!("Adds `{}` to `{target}` when missing.", print_tag(&child));
        Self {
            target,
            child,
            anchor: None,
            description,
        }
    }

    /// Require a child tag named `anchor` and line the new child up with it
    pub fn with_anchor(mut self, anchor: impl Into<String>) -> Self {
        self.anchor = Some(anchor.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn target(&self) -> &TagPath {
        &self.target
    }

    pub fn child(&self) -> &Tag {
        &self.child
    }

    pub fn anchor(&self) -> Option<&str> {
        self.anchor.as_deref()
    }

    /// Decide the fate of a single tag
    pub fn decide(&self, tag: &Tag, ancestors: &Ancestors<'_>) -> Visit<Tag> {
        if !self.target.matches(ancestors, &tag.name) {
            return Visit::Unchanged;
        }
        if tag.has_child(&self.child.name) {
            trace!(tag = %tag.name, child = %self.child.name, "child already present");
            return Visit::Unchanged;
        }

        let prefix = match &self.anchor {
            Some(anchor) => match tag.child(anchor) {
                Some(anchor) => anchor.prefix.clone(),
                None => {
                    trace!(tag = %tag.name, %anchor, "anchor missing");
                    return Visit::Unchanged;
                }
            },
            None => tag
                .child_tags()
                .last()
                .map(|last| last.prefix.clone())
                .unwrap_or_default(),
        };

        trace!(tag = %tag.name, child = %self.child.name, "inserting child");
        let child = Content::Tag(Arc::new(self.child.with_prefix(prefix)));
        Visit::Replace(tag.with_appended_child(child))
    }
}

impl Recipe for InsertChild {
    fn name(&self) -> &str {
        "Insert child tag"
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn edit(&self, doc: &Document) -> Document {
        walk(doc, &mut from_fn(|tag, ancestors| self.decide(tag, ancestors)))
    }
}
