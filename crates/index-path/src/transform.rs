//! Offset transforms for index paths across structural edits.
//!
//! Each `shift_*` function takes a path expressed against the tree *before*
//! an edit and returns the same element's path *after* it. The `unshift_*`
//! functions go the other way. An edit only affects paths that pass through
//! the edited container, and only at the depth of the edited offset:
//!
//! - insert at `k`: offsets `>= k` move up by one;
//! - remove at `k`: offsets `> k` move down by one, the removed element and
//!   everything under it disappear;
//! - move `from -> to`: the moved subtree is carried to `to`, every other
//!   path is shifted as for a remove at `from` followed by an insert at `to`
//!   (`to` is expressed against the tree after the removal).
//!
//! Edits at the root path (empty) are not positional and leave paths alone.

use crate::IndexPath;

/// Depth and offset of the edit if `path` passes through the same container.
fn sibling_level(path: &IndexPath, at: &IndexPath) -> Option<(usize, usize, usize)> {
    let (parent, offset) = at.split_last()?;
    let depth = parent.len();
    if path.len() <= depth || !path.as_slice().starts_with(parent) {
        return None;
    }
    let step = path.get(depth)?;
    Some((depth, offset, step))
}

fn replace_step(path: &IndexPath, depth: usize, step: usize) -> IndexPath {
    let mut indexes = path.as_slice().to_vec();
    indexes[depth] = step;
    IndexPath::new(indexes)
}

/// Carries `path` from below `old_base` to below `new_base`.
fn rebase(path: &IndexPath, old_base: &IndexPath, new_base: &IndexPath) -> Option<IndexPath> {
    let rest = path.strip_prefix(old_base)?;
    Some(rest.prefixed_by(new_base))
}

/// Path after an element was inserted at `at`.
///
/// # Example
///
/// ```
/// use assemblage_index_path::{transform::shift_for_insert, IndexPath};
///
/// let at = IndexPath::from([0, 1]);
/// assert_eq!(shift_for_insert(&IndexPath::from([0, 1]), &at), IndexPath::from([0, 2]));
/// assert_eq!(shift_for_insert(&IndexPath::from([0, 0]), &at), IndexPath::from([0, 0]));
/// assert_eq!(shift_for_insert(&IndexPath::from([0, 3, 4]), &at), IndexPath::from([0, 4, 4]));
/// ```
pub fn shift_for_insert(path: &IndexPath, at: &IndexPath) -> IndexPath {
    match sibling_level(path, at) {
        Some((depth, offset, step)) if step >= offset => replace_step(path, depth, step + 1),
        _ => path.clone(),
    }
}

/// Path after the element at `at` was removed.
///
/// Returns `None` when `path` is `at` itself or lies below it.
///
/// # Example
///
/// ```
/// use assemblage_index_path::{transform::shift_for_remove, IndexPath};
///
/// let at = IndexPath::from([1]);
/// assert_eq!(shift_for_remove(&IndexPath::from([3]), &at), Some(IndexPath::from([2])));
/// assert_eq!(shift_for_remove(&IndexPath::from([0]), &at), Some(IndexPath::from([0])));
/// assert_eq!(shift_for_remove(&IndexPath::from([1, 0]), &at), None);
/// ```
pub fn shift_for_remove(path: &IndexPath, at: &IndexPath) -> Option<IndexPath> {
    if at.is_root() {
        return Some(path.clone());
    }
    if path.starts_with(at) {
        return None;
    }
    match sibling_level(path, at) {
        Some((depth, offset, step)) if step > offset => Some(replace_step(path, depth, step - 1)),
        _ => Some(path.clone()),
    }
}

/// Path after the element at `from` was moved to `to`.
pub fn shift_for_move(path: &IndexPath, from: &IndexPath, to: &IndexPath) -> IndexPath {
    if let Some(moved) = rebase(path, from, to) {
        return moved;
    }
    match shift_for_remove(path, from) {
        Some(p) => shift_for_insert(&p, to),
        None => path.clone(),
    }
}

/// Path before an element was inserted at `at`.
///
/// Returns `None` when `path` names the inserted element or lies below it:
/// such elements did not exist before the insert.
pub fn unshift_for_insert(path: &IndexPath, at: &IndexPath) -> Option<IndexPath> {
    if at.is_root() {
        return Some(path.clone());
    }
    if path.starts_with(at) {
        return None;
    }
    match sibling_level(path, at) {
        Some((depth, offset, step)) if step > offset => Some(replace_step(path, depth, step - 1)),
        _ => Some(path.clone()),
    }
}

/// Path before the element at `at` was removed.
pub fn unshift_for_remove(path: &IndexPath, at: &IndexPath) -> IndexPath {
    match sibling_level(path, at) {
        Some((depth, offset, step)) if step >= offset => replace_step(path, depth, step + 1),
        _ => path.clone(),
    }
}

/// Path before the element at `from` was moved to `to`.
pub fn unshift_for_move(path: &IndexPath, from: &IndexPath, to: &IndexPath) -> IndexPath {
    if let Some(moved) = rebase(path, to, from) {
        return moved;
    }
    match unshift_for_insert(path, to) {
        Some(p) => unshift_for_remove(&p, from),
        None => path.clone(),
    }
}
