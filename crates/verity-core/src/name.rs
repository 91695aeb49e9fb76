//! Hierarchical names for identities, keys, and certificates.
//!
//! A [`Name`] is an ordered list of path components, rendered in URI form as
//! `/component/component/...`. By convention a key name is its owning
//! identity name with one extra component appended (`/alice` owns
//! `/alice/KEY1`), and a certificate name extends a key name further.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A hierarchical, path-like identifier.
///
/// Names are ordered, hashable, and cheap to compare, so they serve as map
/// keys throughout the store and the validation engine. The empty name
/// renders as `/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Name {
    components: Vec<String>,
}

impl Name {
    /// The empty (root) name.
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a name from owned components.
    pub fn from_components(components: Vec<String>) -> Self {
        Self { components }
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// True for the root name `/`.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Component at `index`, if present.
    pub fn component(&self, index: usize) -> Option<&str> {
        self.components.get(index).map(String::as_str)
    }

    /// Iterate over the components in order.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.components.iter().map(String::as_str)
    }

    /// The name with the last component removed.
    ///
    /// The parent of a key name is its owning identity name. The parent of
    /// the root name is the root name.
    pub fn parent(&self) -> Name {
        let mut components = self.components.clone();
        components.pop();
        Name { components }
    }

    /// The first `count` components as a new name.
    ///
    /// `count` values past the end are clamped to the full name.
    pub fn prefix(&self, count: usize) -> Name {
        Name {
            components: self.components[..count.min(self.components.len())].to_vec(),
        }
    }

    /// A new name with `component` appended.
    pub fn join(&self, component: impl Into<String>) -> Name {
        let mut components = self.components.clone();
        components.push(component.into());
        Name { components }
    }

    /// True if `prefix` is a (non-strict) prefix of this name.
    pub fn starts_with(&self, prefix: &Name) -> bool {
        self.components.len() >= prefix.components.len()
            && self.components[..prefix.components.len()] == prefix.components[..]
    }

    /// Position of the first component equal to `marker`, if any.
    pub fn position_of(&self, marker: &str) -> Option<usize> {
        self.components.iter().position(|c| c == marker)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.components.is_empty() {
            return write!(f, "/");
        }
        for component in &self.components {
            write!(f, "/{component}")?;
        }
        Ok(())
    }
}

impl FromStr for Name {
    type Err = std::convert::Infallible;

    fn from_str(uri: &str) -> Result<Self, Self::Err> {
        Ok(Name {
            components: uri
                .split('/')
                .filter(|c| !c.is_empty())
                .map(str::to_owned)
                .collect(),
        })
    }
}

impl From<&str> for Name {
    fn from(uri: &str) -> Self {
        uri.parse().unwrap_or_default()
    }
}
