//! Tag path matching
//!
//! A deliberately small subset of XPath location paths, enough to name the
//! place a policy applies to:
//!
//! - `/project/parent` matches `parent` directly under the root `project`
//! - `//dependency/artifactId` matches that pair at any depth
//! - `*` matches any single tag name, e.g. `/project/*/version`

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::traverse::ancestors::Ancestors;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("tag path is empty")]
    Empty,

    #[error("tag path must start with '/' or '//': {0}")]
    Relative(String),

    #[error("empty step in tag path: {0}")]
    EmptyStep(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Step {
    Name(String),
    Any,
}

impl Step {
    fn matches(&self, name: &str) -> bool {
        match self {
            Self::Name(expected) => expected == name,
            Self::Any => true,
        }
    }
}

/// Compiled tag path
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagPath {
    anchored: bool,
    steps: Vec<Step>,
}

impl TagPath {
    /// Parse a path expression
    pub fn parse(expr: &str) -> Result<Self, PathError> {
        expr.parse()
    }

    /// Absolute path from literal tag names, root first
    pub fn absolute<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            anchored: true,
            steps: names.into_iter().map(|name| Step::Name(name.into())).collect(),
        }
    }

    /// Whether a tag named `name` with the given ancestors is selected
    pub fn matches(&self, ancestors: &Ancestors<'_>, name: &str) -> bool {
        let Some((last, enclosing)) = self.steps.split_last() else {
            return false;
        };
        if !last.matches(name) {
            return false;
        }

        let depth = ancestors.depth();
        if depth < enclosing.len() || (self.anchored && depth != enclosing.len()) {
            return false;
        }
        ancestors
            .names()
            .skip(depth - enclosing.len())
            .zip(enclosing)
            .all(|(name, step)| step.matches(name))
    }
}

impl FromStr for TagPath {
    type Err = PathError;

    fn from_str(expr: &str) -> Result<Self, Self::Err> {
        let trimmed = expr.trim();
        if trimmed.is_empty() {
            return Err(PathError::Empty);
        }

        let (anchored, rest) = if let Some(rest) = trimmed.strip_prefix("//") {
            (false, rest)
        } else if let Some(rest) = trimmed.strip_prefix('/') {
            (true, rest)
        } else {
            return Err(PathError::Relative(expr.to_string()));
        };

        let steps = rest
            .split('/')
            .map(|step| match step {
                "" => Err(PathError::EmptyStep(expr.to_string())),
                "*" => Ok(Step::Any),
                name => Ok(Step::Name(name.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { anchored, steps })
    }
}

impl fmt::Display for TagPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.anchored { "/" } else { "//" })?;
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            match step {
                Step::Name(name) => f.write_str(name)?,
                Step::Any => f.write_str("*")?,
            }
        }
        Ok(())
    }
}
