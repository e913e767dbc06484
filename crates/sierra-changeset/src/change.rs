//! Parameter changes and change sets
//!
//! A [`ParamChange`] is one `(path, attribute, value)` edit of a template
//! document. A [`ChangeSet`] holds every edit needed to realise one
//! experiment's configuration relative to the template.

use crate::path::{ElementPath, PathError};
use serde::{Deserialize, Serialize};
use std::collections::btree_set;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Display, Formatter};

/// Single attribute edit of a template document
///
/// Immutable and value-comparable. Ordering is `(path, attr, value)`, which
/// fixes the order in which a [`ChangeSet`] is applied.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParamChange {
    path: ElementPath,
    attr: String,
    value: String,
}

impl ParamChange {
    /// Create new change
    #[inline]
    #[must_use]
    pub fn new(path: ElementPath, attr: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            path,
            attr: attr.into(),
            value: value.into(),
        }
    }

    /// Create change from a textual path
    ///
    /// # Errors
    /// Returns error if `path` is not a valid [`ElementPath`]
    pub fn parse(
        path: &str,
        attr: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, PathError> {
        Ok(Self::new(path.parse()?, attr, value))
    }

    /// Target element
    #[inline]
    #[must_use]
    pub fn path(&self) -> &ElementPath {
        &self.path
    }

    /// Attribute name
    #[inline]
    #[must_use]
    pub fn attr(&self) -> &str {
        &self.attr
    }

    /// New serialized value
    #[inline]
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// `(path, attr)` key used for conflict detection
    #[inline]
    #[must_use]
    pub fn key(&self) -> (&ElementPath, &str) {
        (&self.path, &self.attr)
    }
}

impl Display for ParamChange {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}={}", self.path, self.attr, self.value)
    }
}

/// Unordered collection of parameter changes for one experiment
///
/// Duplicate triples collapse. Two triples for the same `(path, attr)` with
/// different values are both retained; use [`ChangeSet::conflicts`] to find them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeSet(BTreeSet<ParamChange>);

impl ChangeSet {
    /// Create empty change set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Add a change; returns `false` if an identical triple was present
    #[inline]
    pub fn insert(&mut self, change: ParamChange) -> bool {
        self.0.insert(change)
    }

    /// Number of changes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check membership
    #[inline]
    #[must_use]
    pub fn contains(&self, change: &ParamChange) -> bool {
        self.0.contains(change)
    }

    /// Iterate changes in application order
    #[inline]
    pub fn iter(&self) -> btree_set::Iter<'_, ParamChange> {
        self.0.iter()
    }

    /// Set union, returning a new change set
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self(self.0.union(&other.0).cloned().collect())
    }

    /// Merge another set into this one
    pub fn extend_from(&mut self, other: &Self) {
        self.0.extend(other.0.iter().cloned());
    }

    /// First value assigned to `attr` at `path`, if any
    #[must_use]
    pub fn value_of(&self, path: &ElementPath, attr: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|c| c.path() == path && c.attr() == attr)
            .map(ParamChange::value)
    }

    /// Value `attr` at `path` holds once the set is applied in iteration order
    ///
    /// Differs from [`Self::value_of`] only when the key is in conflict: the
    /// last assignment wins.
    #[must_use]
    pub fn applied_value(&self, path: &ElementPath, attr: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|c| c.path() == path && c.attr() == attr)
            .map(ParamChange::value)
    }

    /// `(path, attr)` keys assigned more than one distinct value
    #[must_use]
    pub fn conflicts(&self) -> Vec<Conflict> {
        let mut by_key: BTreeMap<(&ElementPath, &str), Vec<&str>> = BTreeMap::new();
        for change in &self.0 {
            by_key.entry(change.key()).or_default().push(change.value());
        }

        by_key
            .into_iter()
            .filter(|(_, values)| values.len() > 1)
            .map(|((path, attr), values)| Conflict {
                path: path.clone(),
                attr: attr.to_string(),
                values: values.into_iter().map(str::to_string).collect(),
            })
            .collect()
    }
}

impl FromIterator<ParamChange> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = ParamChange>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ChangeSet {
    type Item = ParamChange;
    type IntoIter = btree_set::IntoIter<ParamChange>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = &'a ParamChange;
    type IntoIter = btree_set::Iter<'a, ParamChange>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Same `(path, attr)` assigned several values within one change set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    /// Target element
    pub path: ElementPath,
    /// Attribute name
    pub attr: String,
    /// Distinct values, in set order
    pub values: Vec<String>,
}

impl Display for Conflict {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} = {{{}}}", self.path, self.attr, self.values.join(", "))
    }
}

/// Builder for change sets sharing a common element prefix
#[derive(Debug, Default)]
pub struct ChangeSetBuilder {
    changes: ChangeSet,
}

impl ChangeSetBuilder {
    /// Create new builder
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a change
    #[must_use]
    pub fn set(mut self, path: &ElementPath, attr: &str, value: impl ToString) -> Self {
        self.changes
            .insert(ParamChange::new(path.clone(), attr, value.to_string()));
        self
    }

    /// Merge an existing set
    #[must_use]
    pub fn merge(mut self, other: &ChangeSet) -> Self {
        self.changes.extend_from(other);
        self
    }

    /// Build change set
    #[inline]
    #[must_use]
    pub fn build(self) -> ChangeSet {
        self.changes
    }
}
