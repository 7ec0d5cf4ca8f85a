//! The [`IndexPath`] type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{format_index_path, parse_index_path, IndexPathError};

/// A location in a tree of ordered containers.
///
/// Each element is the offset of a child within the container at that depth.
/// The empty path addresses the root container itself.
///
/// Paths order lexicographically, so a parent sorts before its children and
/// siblings sort by offset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexPath {
    indexes: Vec<usize>,
}

impl IndexPath {
    pub fn new(indexes: Vec<usize>) -> Self {
        Self { indexes }
    }

    /// The empty path, addressing the root container.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.indexes.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.indexes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, usize> {
        self.indexes.iter()
    }

    /// Offset at the given depth, if the path is that deep.
    pub fn get(&self, depth: usize) -> Option<usize> {
        self.indexes.get(depth).copied()
    }

    /// Offset within the innermost container.
    pub fn last(&self) -> Option<usize> {
        self.indexes.last().copied()
    }

    /// Path of the container holding the addressed element.
    ///
    /// # Errors
    ///
    /// Returns [`IndexPathError::NoParent`] for the root path.
    ///
    /// # Example
    ///
    /// ```
    /// use assemblage_index_path::IndexPath;
    ///
    /// let path = IndexPath::from([1, 4]);
    /// assert_eq!(path.parent().unwrap(), IndexPath::from([1]));
    /// assert!(IndexPath::root().parent().is_err());
    /// ```
    pub fn parent(&self) -> Result<IndexPath, IndexPathError> {
        match self.split_last() {
            Some((parent, _)) => Ok(IndexPath::from(parent)),
            None => Err(IndexPathError::NoParent),
        }
    }

    /// Splits into the parent slice and the final offset.
    pub fn split_last(&self) -> Option<(&[usize], usize)> {
        let (last, parent) = self.indexes.split_last()?;
        Some((parent, *last))
    }

    /// Path of the child at `index` inside the element this path addresses.
    pub fn child(&self, index: usize) -> IndexPath {
        let mut indexes = Vec::with_capacity(self.indexes.len() + 1);
        indexes.extend_from_slice(&self.indexes);
        indexes.push(index);
        IndexPath { indexes }
    }

    /// Same container, different final offset. `None` at the root.
    pub fn with_last(&self, index: usize) -> Option<IndexPath> {
        let mut indexes = self.indexes.clone();
        *indexes.last_mut()? = index;
        Some(IndexPath { indexes })
    }

    /// Re-expresses a path relative to `prefix` as a path from the outer root.
    pub fn prefixed_by(&self, prefix: &IndexPath) -> IndexPath {
        let mut indexes = Vec::with_capacity(prefix.len() + self.len());
        indexes.extend_from_slice(&prefix.indexes);
        indexes.extend_from_slice(&self.indexes);
        IndexPath { indexes }
    }

    /// True if `prefix` is a (not necessarily strict) prefix of this path.
    pub fn starts_with(&self, prefix: &IndexPath) -> bool {
        self.indexes.starts_with(&prefix.indexes)
    }

    /// True if this path addresses a strict ancestor of `other`.
    pub fn is_ancestor_of(&self, other: &IndexPath) -> bool {
        other.len() > self.len() && other.starts_with(self)
    }

    /// The part of this path below `prefix`, if it starts with it.
    pub fn strip_prefix(&self, prefix: &IndexPath) -> Option<IndexPath> {
        self.indexes
            .strip_prefix(prefix.indexes.as_slice())
            .map(IndexPath::from)
    }

    pub fn into_vec(self) -> Vec<usize> {
        self.indexes
    }
}

impl From<Vec<usize>> for IndexPath {
    fn from(indexes: Vec<usize>) -> Self {
        Self { indexes }
    }
}

impl From<&[usize]> for IndexPath {
    fn from(indexes: &[usize]) -> Self {
        Self {
            indexes: indexes.to_vec(),
        }
    }
}

impl<const N: usize> From<[usize; N]> for IndexPath {
    fn from(indexes: [usize; N]) -> Self {
        Self {
            indexes: indexes.to_vec(),
        }
    }
}

impl FromIterator<usize> for IndexPath {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self {
            indexes: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a IndexPath {
    type Item = &'a usize;
    type IntoIter = std::slice::Iter<'a, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.indexes.iter()
    }
}

impl AsRef<[usize]> for IndexPath {
    fn as_ref(&self) -> &[usize] {
        &self.indexes
    }
}

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_index_path(&self.indexes))
    }
}

impl FromStr for IndexPath {
    type Err = IndexPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_index_path(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_and_child() {
        let path = IndexPath::from([2, 0, 5]);
        assert_eq!(path.parent().unwrap(), IndexPath::from([2, 0]));
        assert_eq!(path.parent().unwrap().child(5), path);
        assert_eq!(IndexPath::from([3]).parent().unwrap(), IndexPath::root());
    }

    #[test]
    fn test_split_last() {
        let path = IndexPath::from([1, 2]);
        assert_eq!(path.split_last(), Some((&[1usize][..], 2)));
        assert_eq!(IndexPath::root().split_last(), None);
    }

    #[test]
    fn test_with_last() {
        assert_eq!(
            IndexPath::from([1, 2]).with_last(7),
            Some(IndexPath::from([1, 7]))
        );
        assert_eq!(IndexPath::root().with_last(0), None);
    }

    #[test]
    fn test_ancestry() {
        let a = IndexPath::from([1]);
        let b = IndexPath::from([1, 3]);
        let c = IndexPath::from([2, 3]);
        assert!(a.is_ancestor_of(&b));
        assert!(!b.is_ancestor_of(&a));
        assert!(!a.is_ancestor_of(&a));
        assert!(!a.is_ancestor_of(&c));
        assert!(IndexPath::root().is_ancestor_of(&a));
        assert!(a.starts_with(&a));
    }

    #[test]
    fn test_prefix_roundtrip() {
        let prefix = IndexPath::from([4, 1]);
        let local = IndexPath::from([0, 2]);
        let full = local.prefixed_by(&prefix);
        assert_eq!(full, IndexPath::from([4, 1, 0, 2]));
        assert_eq!(full.strip_prefix(&prefix), Some(local));
        assert_eq!(full.strip_prefix(&IndexPath::from([3])), None);
    }

    #[test]
    fn test_ordering() {
        let mut paths = vec![
            IndexPath::from([1]),
            IndexPath::from([0, 2]),
            IndexPath::from([0]),
            IndexPath::root(),
        ];
        paths.sort();
        assert_eq!(
            paths,
            vec![
                IndexPath::root(),
                IndexPath::from([0]),
                IndexPath::from([0, 2]),
                IndexPath::from([1]),
            ]
        );
    }

    #[test]
    fn test_serde_as_sequence() {
        let path = IndexPath::from([0, 3]);
        let json = serde_json::to_value(&path).unwrap();
        assert_eq!(json, serde_json::json!([0, 3]));
        let back: IndexPath = serde_json::from_value(json).unwrap();
        assert_eq!(back, path);
    }
}
