use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Entry display names the user marked "not interested". Exact string match.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IgnoredNames(BTreeSet<String>);

impl IgnoredNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// Returns `true` if the name was not present before.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.0.insert(name.into())
    }

    /// Returns `true` if the name was present.
    pub fn remove(&mut self, name: &str) -> bool {
        self.0.remove(name)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Names present in `self` but missing from `other`.
    pub fn difference(&self, other: &IgnoredNames) -> Vec<String> {
        self.0.difference(&other.0).cloned().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for IgnoredNames {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>> Extend<S> for IgnoredNames {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}
