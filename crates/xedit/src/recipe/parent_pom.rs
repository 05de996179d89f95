//! Disable local file resolution for the parent POM
//!
//! Maven resolves a parent POM from `../pom.xml` unless `<relativePath/>` is
//! set explicitly. Plugin projects should always resolve it from the
//! repository, so this recipe adds an empty `relativePath` to the
//! `project/parent` declaration, lined up with its `artifactId`.

use crate::recipe::{InsertChild, Recipe};
use crate::traverse::TagPath;
use crate::xml::{Document, Tag};

const NAME: &str = "Disables local file resolution for parent POM";
const DESCRIPTION: &str = "Explicitly sets `<relativePath/>` to disable file resolution, as \
    recommended in the [plugin development guide]\
    (https://www.jenkins.io/doc/developer/plugin-development/updating-parent/).";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisableParentRelativePath {
    policy: InsertChild,
}

impl DisableParentRelativePath {
    pub fn new() -> Self {
        let target = TagPath::absolute(["project", "parent"]);
        let policy = InsertChild::from_parts(target, Tag::new("relativePath"))
            .with_anchor("artifactId")
            .with_description(DESCRIPTION);
        Self { policy }
    }

    /// The underlying insertion policy
    pub fn policy(&self) -> &InsertChild {
        &self.policy
    }
}

impl Default for DisableParentRelativePath {
    fn default() -> Self {
        Self::new()
    }
}

impl Recipe for DisableParentRelativePath {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn edit(&self, doc: &Document) -> Document {
        self.policy.edit(doc)
    }
}
