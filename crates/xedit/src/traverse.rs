//! Traversal engine
//!
//! A depth-first, pre-order walk over an immutable tree. Visitors decide per
//! node whether to leave it alone or replace it; the engine rebuilds only the
//! chain of tags above a replacement and shares every other subtree with the
//! input tree.

pub mod ancestors;
pub mod path;

use std::sync::Arc;

use crate::xml::tree::{Comment, Content, Document, Tag, Text};

pub use ancestors::Ancestors;
pub use path::{PathError, TagPath};

/// Outcome of visiting a single node
#[derive(Clone, Debug, PartialEq)]
pub enum Visit<T> {
    /// Keep the node and continue into its children
    Unchanged,
    /// Put this node in place of the visited one. Its children are not walked.
    Replace(T),
}

/// Per-node decision logic driven by [`walk`].
///
/// Every hook defaults to [`Visit::Unchanged`]. A hook that needs to see
/// edited children before deciding can call [`walk_children`] itself and
/// return the result as a replacement.
pub trait Visitor {
    fn visit_tag(&mut self, tag: &Arc<Tag>, ancestors: &Ancestors<'_>) -> Visit<Tag> {
        let _ = (tag, ancestors);
        Visit::Unchanged
    }

    fn visit_text(&mut self, text: &Text, ancestors: &Ancestors<'_>) -> Visit<Text> {
        let _ = (text, ancestors);
        Visit::Unchanged
    }

    fn visit_comment(&mut self, comment: &Comment, ancestors: &Ancestors<'_>) -> Visit<Comment> {
        let _ = (comment, ancestors);
        Visit::Unchanged
    }
}

/// Visitor built from a closure over tags, see [`from_fn`]
#[derive(Clone, Debug)]
pub struct FnVisitor<F>(F);

/// Use a closure as a tag visitor
pub fn from_fn<F>(f: F) -> FnVisitor<F>
where
    F: FnMut(&Tag, &Ancestors<'_>) -> Visit<Tag>,
{
    FnVisitor(f)
}

impl<F> Visitor for FnVisitor<F>
where
    F: FnMut(&Tag, &Ancestors<'_>) -> Visit<Tag>,
{
    fn visit_tag(&mut self, tag: &Arc<Tag>, ancestors: &Ancestors<'_>) -> Visit<Tag> {
        (self.0)(tag, ancestors)
    }
}

/// Walk a document, returning the edited copy.
///
/// The input is left as it was. When nothing is replaced the returned
/// document's root is the same allocation as the input's.
pub fn walk<V>(doc: &Document, visitor: &mut V) -> Document
where
    V: Visitor + ?Sized,
{
    let mut stack = Vec::new();
    match walk_content(&doc.content, &mut stack, visitor) {
        Some(content) => Document {
            bom: doc.bom,
            content,
            eof: doc.eof.clone(),
        },
        None => doc.clone(),
    }
}

/// Walk the children of `tag` as the default traversal would.
///
/// `ancestors` is the context `tag` itself was visited with. Returns `tag`
/// unchanged (same allocation) when no descendant was replaced.
pub fn walk_children<V>(tag: &Arc<Tag>, ancestors: &Ancestors<'_>, visitor: &mut V) -> Arc<Tag>
where
    V: Visitor + ?Sized,
{
    let mut stack: Vec<&str> = ancestors.names().collect();
    stack.push(&tag.name);
    match walk_content(&tag.content, &mut stack, visitor) {
        Some(content) => rebuild(tag, content),
        None => Arc::clone(tag),
    }
}

/// Returns the rebuilt sequence, or `None` when every node was kept.
fn walk_content<'a, V>(
    content: &'a [Content],
    stack: &mut Vec<&'a str>,
    visitor: &mut V,
) -> Option<Vec<Content>>
where
    V: Visitor + ?Sized,
{
    let mut rebuilt: Option<Vec<Content>> = None;

    for (index, node) in content.iter().enumerate() {
        let replacement = match node {
            Content::Tag(tag) => walk_tag(tag, stack, visitor).map(Content::Tag),
            leaf => visit_leaf(leaf, stack, visitor),
        };

        match (replacement, rebuilt.as_mut()) {
            (Some(new), Some(out)) => out.push(new),
            (Some(new), None) => {
                let mut out = Vec::with_capacity(content.len());
                out.extend(content.iter().take(index).cloned());
                out.push(new);
                rebuilt = Some(out);
            }
            (None, Some(out)) => out.push(node.clone()),
            (None, None) => {}
        }
    }

    rebuilt
}

fn walk_tag<'a, V>(tag: &'a Arc<Tag>, stack: &mut Vec<&'a str>, visitor: &mut V) -> Option<Arc<Tag>>
where
    V: Visitor + ?Sized,
{
    if let Some(new) = visit_tag(tag, stack, visitor) {
        return Some(new);
    }

    stack.push(&tag.name);
    let content = walk_content(&tag.content, stack, visitor);
    stack.pop();

    content.map(|content| rebuild(tag, content))
}

// The helpers below run outside the walk_tag/walk_content cycle, keeping the
// per-level stack frames small.

#[inline(never)]
fn visit_tag<V>(tag: &Arc<Tag>, stack: &[&str], visitor: &mut V) -> Option<Arc<Tag>>
where
    V: Visitor + ?Sized,
{
    match visitor.visit_tag(tag, &Ancestors::new(stack)) {
        Visit::Replace(new) => Some(Arc::new(new)),
        Visit::Unchanged => None,
    }
}

#[inline(never)]
fn visit_leaf<V>(node: &Content, stack: &[&str], visitor: &mut V) -> Option<Content>
where
    V: Visitor + ?Sized,
{
    let ancestors = Ancestors::new(stack);
    match node {
        Content::Text(text) => match visitor.visit_text(text, &ancestors) {
            Visit::Unchanged => None,
            Visit::Replace(text) => Some(Content::Text(text)),
        },
        Content::Comment(comment) => match visitor.visit_comment(comment, &ancestors) {
            Visit::Unchanged => None,
            Visit::Replace(comment) => Some(Content::Comment(comment)),
        },
        _ => None,
    }
}

#[inline(never)]
fn rebuild(tag: &Tag, content: Vec<Content>) -> Arc<Tag> {
    Arc::new(with_children(tag, content))
}

fn with_children(tag: &Tag, content: Vec<Content>) -> Tag {
    Tag {
        prefix: tag.prefix.clone(),
        name: tag.name.clone(),
        attributes: tag.attributes.clone(),
        before_end: tag.before_end.clone(),
        content,
        closing: tag.closing.clone(),
    }
}
