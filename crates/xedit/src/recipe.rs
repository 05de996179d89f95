//! Recipes: named, idempotent edits from text to text
//!
//! A recipe composes the parser, a visitor and the printer. When its
//! visitor leaves the tree alone, `apply` hands back the input verbatim.

pub mod insert_child;
pub mod parent_pom;

use thiserror::Error;
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::traverse::PathError;
use crate::xml::{parse_with_config, print, Config, Document};

pub use insert_child::InsertChild;
pub use parent_pom::DisableParentRelativePath;

/// Name and description of a recipe, compared by value
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RecipeDescriptor {
    pub name: String,
    pub description: String,
}

/// Errors raised while building a recipe, never while applying one
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecipeError {
    #[error("invalid target path: {0}")]
    Path(#[from] PathError),

    #[error("invalid fragment: {0}")]
    Fragment(#[from] Error),
}

pub trait Recipe {
    /// Human readable name
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn descriptor(&self) -> RecipeDescriptor {
        RecipeDescriptor {
            name: self.name().to_string(),
            description: self.description().to_string(),
        }
    }

    /// Produce the edited tree. Must be idempotent and must leave the input
    /// tree untouched.
    fn edit(&self, doc: &Document) -> Document;

    /// Apply to document text with the default parser limits
    fn apply(&self, text: &str) -> Result<String> {
        self.apply_with_config(text, Config::default())
    }

    /// Apply to document text.
    ///
    /// Returns the input unchanged when no edit applies. Malformed input is
    /// an error and nothing is printed for it.
    #[instrument(level = "debug", skip_all, fields(recipe = self.name()))]
    fn apply_with_config(&self, text: &str, config: Config) -> Result<String> {
        let doc = parse_with_config(text, config)?;
        let edited = self.edit(&doc);
        if edited == doc {
            debug!("no applicable edit");
            return Ok(text.to_string());
        }
        debug!("document changed");
        Ok(print(&edited))
    }
}
