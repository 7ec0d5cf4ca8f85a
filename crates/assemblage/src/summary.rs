//! Net effect of a batch, for consumers that apply a whole batch at once.
//!
//! A table view with begin/end update semantics wants deletions against the
//! rows it shows *before* the batch and insertions against the rows it will
//! show *after* it. Each logged edit is carried backward through the edits
//! issued before it and forward through the edits issued after it. An edit
//! whose element did not exist before the batch, or no longer exists after
//! it, drops out of the side it cannot be expressed on.

use assemblage_index_path::transform::{
    shift_for_insert, shift_for_move, shift_for_remove, unshift_for_insert, unshift_for_move,
    unshift_for_remove,
};
use assemblage_index_path::IndexPath;
use serde::{Deserialize, Serialize};

use crate::change_set::Change;

/// Coalesced summary of one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetChanges {
    /// Removed elements, pre-batch paths, deepest-last-first so they can be
    /// deleted one after another.
    pub removed: Vec<IndexPath>,
    /// Inserted elements, post-batch paths, ascending.
    pub inserted: Vec<IndexPath>,
    /// Pre-existing elements replaced in place, pre-batch paths.
    pub updated: Vec<IndexPath>,
    /// `(pre-batch, post-batch)` pairs for pre-existing elements that moved.
    pub moved: Vec<(IndexPath, IndexPath)>,
}

impl NetChanges {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty()
            && self.inserted.is_empty()
            && self.updated.is_empty()
            && self.moved.is_empty()
    }

    pub fn len(&self) -> usize {
        self.removed.len() + self.inserted.len() + self.updated.len() + self.moved.len()
    }
}

/// Position-only view of a logged edit.
#[derive(Debug, Clone)]
enum Edit {
    Insert(IndexPath),
    Remove(IndexPath),
    Update(IndexPath),
    Move(IndexPath, IndexPath),
}

impl<T> From<&Change<T>> for Edit {
    fn from(change: &Change<T>) -> Self {
        match change {
            Change::Insert { path, .. } => Edit::Insert(path.clone()),
            Change::Remove { path, .. } => Edit::Remove(path.clone()),
            Change::Update { path, .. } => Edit::Update(path.clone()),
            Change::Move { from, to, .. } => Edit::Move(from.clone(), to.clone()),
        }
    }
}

/// Carries `path` back through `earlier`, newest first.
fn backward(path: &IndexPath, earlier: &[Edit]) -> Option<IndexPath> {
    let mut path = path.clone();
    for edit in earlier.iter().rev() {
        path = match edit {
            Edit::Insert(at) => unshift_for_insert(&path, at)?,
            Edit::Remove(at) => unshift_for_remove(&path, at),
            Edit::Update(at) if at.is_ancestor_of(&path) => return None,
            Edit::Update(_) => path,
            Edit::Move(from, to) => unshift_for_move(&path, from, to),
        };
    }
    Some(path)
}

/// Carries `path` forward through `later`, oldest first.
fn forward(path: &IndexPath, later: &[Edit]) -> Option<IndexPath> {
    let mut path = path.clone();
    for edit in later {
        path = match edit {
            Edit::Insert(at) => shift_for_insert(&path, at),
            Edit::Remove(at) => shift_for_remove(&path, at)?,
            Edit::Update(at) if at.is_ancestor_of(&path) => return None,
            Edit::Update(_) => path,
            Edit::Move(from, to) => shift_for_move(&path, from, to),
        };
    }
    Some(path)
}

/// True if some other entry of `paths` is a strict ancestor of `path`.
fn covered(path: &IndexPath, paths: &[IndexPath]) -> bool {
    paths.iter().any(|other| other.is_ancestor_of(path))
}

pub(crate) fn summarize<'a, T: 'a>(changes: impl IntoIterator<Item = &'a Change<T>>) -> NetChanges {
    let edits: Vec<Edit> = changes.into_iter().map(Edit::from).collect();
    let mut net = NetChanges::default();
    // Post-batch paths of the replaced elements, to match against `inserted`.
    let mut replaced = Vec::new();

    for (i, edit) in edits.iter().enumerate() {
        let (earlier, rest) = edits.split_at(i);
        let later = &rest[1..];
        match edit {
            Edit::Insert(path) => {
                if let Some(post) = forward(path, later) {
                    net.inserted.push(post);
                }
            }
            Edit::Remove(path) => {
                if let Some(pre) = backward(path, earlier) {
                    net.removed.push(pre);
                }
            }
            Edit::Update(path) => {
                if let (Some(pre), Some(post)) = (backward(path, earlier), forward(path, later)) {
                    net.updated.push(pre);
                    replaced.push(post);
                }
            }
            Edit::Move(from, to) => {
                match (backward(from, earlier), forward(to, later)) {
                    (Some(pre), Some(post)) if pre != post => net.moved.push((pre, post)),
                    _ => {}
                }
            }
        }
    }

    // Nested entries are implied by their removed, inserted or replaced ancestor.
    let removed = net.removed.clone();
    let updated = net.updated.clone();
    net.removed
        .retain(|p| !covered(p, &removed) && !covered(p, &updated));
    net.updated.retain(|p| !covered(p, &updated));
    let inserted = net.inserted.clone();
    net.inserted
        .retain(|p| !covered(p, &inserted) && !covered(p, &replaced));

    net.removed.sort_unstable_by(|a, b| b.cmp(a));
    net.removed.dedup();
    net.inserted.sort_unstable();
    net.inserted.dedup();
    net.updated.sort_unstable();
    net.updated.dedup();
    net.moved.sort_unstable();
    net.moved.dedup();
    net
}
