//! Children of an assemblage: leaf values or nested assemblages.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::change_set::ChangeKind;
use crate::node::Assemblage;

/// Which primitive edits a container accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mutability {
    /// Accepts every edit.
    #[default]
    Mutable,
    /// Keeps its count: accepts updates and reordering, rejects insert and remove.
    FixedSize,
    /// Rejects every edit.
    ReadOnly,
}

impl Mutability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mutability::Mutable => "mutable",
            Mutability::FixedSize => "fixed-size",
            Mutability::ReadOnly => "read-only",
        }
    }

    /// Whether a container with this mutability accepts `kind`.
    ///
    /// `Move` here means a reorder within the container; a move between two
    /// containers is a `Remove` on the source and an `Insert` on the target.
    pub fn allows(&self, kind: ChangeKind) -> bool {
        match self {
            Mutability::Mutable => true,
            Mutability::FixedSize => matches!(kind, ChangeKind::Update | ChangeKind::Move),
            Mutability::ReadOnly => false,
        }
    }
}

impl fmt::Display for Mutability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A child of an assemblage.
#[derive(Debug, Clone, PartialEq)]
pub enum Child<T> {
    Leaf(T),
    Assemblage(Assemblage<T>),
}

impl<T> Child<T> {
    pub fn leaf(value: T) -> Self {
        Child::Leaf(value)
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Child::Leaf(_))
    }

    pub fn is_assemblage(&self) -> bool {
        matches!(self, Child::Assemblage(_))
    }

    pub fn as_leaf(&self) -> Option<&T> {
        match self {
            Child::Leaf(value) => Some(value),
            Child::Assemblage(_) => None,
        }
    }

    pub fn as_assemblage(&self) -> Option<&Assemblage<T>> {
        match self {
            Child::Leaf(_) => None,
            Child::Assemblage(node) => Some(node),
        }
    }

    pub fn into_leaf(self) -> Option<T> {
        match self {
            Child::Leaf(value) => Some(value),
            Child::Assemblage(_) => None,
        }
    }

    pub fn into_assemblage(self) -> Option<Assemblage<T>> {
        match self {
            Child::Leaf(_) => None,
            Child::Assemblage(node) => Some(node),
        }
    }

    /// The value this child stands for: the leaf itself, or the
    /// represented object of a nested assemblage.
    pub fn object(&self) -> Option<&T> {
        match self {
            Child::Leaf(value) => Some(value),
            Child::Assemblage(node) => node.represented_object(),
        }
    }

    pub(crate) fn assemblage_mut(&mut self) -> Option<&mut Assemblage<T>> {
        match self {
            Child::Leaf(_) => None,
            Child::Assemblage(node) => Some(node),
        }
    }
}

impl<T> From<Assemblage<T>> for Child<T> {
    fn from(node: Assemblage<T>) -> Self {
        Child::Assemblage(node)
    }
}
