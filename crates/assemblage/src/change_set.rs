//! Per-batch change log.
//!
//! Every edit made while a batch is open is appended to the root's
//! [`ChangeSet`] with its paths expressed against the tree as it was when the
//! edit was issued. Replaying the log in order therefore walks an observer
//! through exactly the intermediate states the tree went through.
//!
//! Before the log is delivered it is verified against a shape tracker: a map
//! from container path to the number of children that container must hold at
//! that point of the replay. The tracker is seeded from the counts each
//! record captured and re-keyed after every edit with the offset transforms
//! from [`assemblage_index_path::transform`]. A record that disagrees with the
//! tracker means the log no longer describes the tree, and the batch is
//! rejected as a whole.

use std::collections::BTreeMap;
use std::fmt;

use assemblage_index_path::transform::{shift_for_insert, shift_for_remove};
use assemblage_index_path::IndexPath;
use serde::{Deserialize, Serialize};

use crate::child::Child;
use crate::error::AssemblageError;
use crate::summary::{summarize, NetChanges};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Insert,
    Remove,
    Update,
    Move,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Insert => "insert",
            ChangeKind::Remove => "remove",
            ChangeKind::Update => "update",
            ChangeKind::Move => "move",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One structural edit, as delivered to a delegate.
///
/// `object` is a detached snapshot of the child involved: the inserted or
/// new child for `Insert`/`Update`, the removed child for `Remove`, the moved
/// child for `Move`.
#[derive(Debug, Clone, PartialEq)]
pub enum Change<T> {
    Insert {
        object: Child<T>,
        path: IndexPath,
    },
    Remove {
        object: Child<T>,
        path: IndexPath,
    },
    Update {
        object: Child<T>,
        path: IndexPath,
    },
    Move {
        object: Child<T>,
        from: IndexPath,
        to: IndexPath,
    },
}

impl<T> Change<T> {
    pub fn kind(&self) -> ChangeKind {
        match self {
            Change::Insert { .. } => ChangeKind::Insert,
            Change::Remove { .. } => ChangeKind::Remove,
            Change::Update { .. } => ChangeKind::Update,
            Change::Move { .. } => ChangeKind::Move,
        }
    }

    /// Path of the edited element; the destination for moves.
    pub fn path(&self) -> &IndexPath {
        match self {
            Change::Insert { path, .. } => path,
            Change::Remove { path, .. } => path,
            Change::Update { path, .. } => path,
            Change::Move { to, .. } => to,
        }
    }

    /// Source path of a move.
    pub fn from(&self) -> Option<&IndexPath> {
        match self {
            Change::Move { from, .. } => Some(from),
            _ => None,
        }
    }

    pub fn object(&self) -> &Child<T> {
        match self {
            Change::Insert { object, .. } => object,
            Change::Remove { object, .. } => object,
            Change::Update { object, .. } => object,
            Change::Move { object, .. } => object,
        }
    }
}

/// Child counts captured when an edit was issued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContainerCounts {
    /// Count of the edited container (the source container for moves)
    /// before the edit.
    pub before: usize,
    /// Count of the destination container before a move between two
    /// different containers.
    pub target_before: Option<usize>,
}

impl ContainerCounts {
    pub fn new(before: usize) -> Self {
        Self {
            before,
            target_before: None,
        }
    }

    pub fn with_target(before: usize, target_before: usize) -> Self {
        Self {
            before,
            target_before: Some(target_before),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Record<T> {
    change: Change<T>,
    counts: ContainerCounts,
}

/// Ordered log of the edits made during one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeSet<T> {
    records: Vec<Record<T>>,
}

impl<T> Default for ChangeSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ChangeSet<T> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Appends an edit in issue order.
    pub fn record(&mut self, change: Change<T>, counts: ContainerCounts) {
        self.records.push(Record { change, counts });
    }

    pub fn changes(&self) -> impl Iterator<Item = &Change<T>> + '_ {
        self.records.iter().map(|r| &r.change)
    }

    pub fn into_changes(self) -> Vec<Change<T>> {
        self.records.into_iter().map(|r| r.change).collect()
    }

    /// Coalesced view of the whole batch.
    pub fn summarize(&self) -> NetChanges {
        summarize(self.changes())
    }

    /// Replays the log against a shape tracker.
    ///
    /// # Errors
    ///
    /// [`AssemblageError::InconsistentChangeSet`] naming the first record
    /// whose offsets or container count do not match the replay.
    pub fn verify(&self) -> Result<(), AssemblageError> {
        let mut shape = ShapeTracker::default();
        for (position, record) in self.records.iter().enumerate() {
            let counts = record.counts;
            match &record.change {
                Change::Insert { path, .. } => {
                    let (container, offset) = split(position, path)?;
                    let count = shape.expect(position, &container, counts.before)?;
                    check_offset(position, offset, count + 1)?;
                    shape.rekey(|p| Some(shift_for_insert(p, path)));
                    shape.set(container, count + 1);
                }
                Change::Remove { path, .. } => {
                    let (container, offset) = split(position, path)?;
                    let count = shape.expect(position, &container, counts.before)?;
                    check_offset(position, offset, count)?;
                    shape.rekey(|p| shift_for_remove(p, path));
                    shape.set(container, count - 1);
                }
                Change::Update { path, .. } => {
                    let (container, offset) = split(position, path)?;
                    let count = shape.expect(position, &container, counts.before)?;
                    check_offset(position, offset, count)?;
                    // The replaced child and everything below it are unknown now.
                    shape.rekey(|p| (!p.starts_with(path)).then(|| p.clone()));
                    shape.set(container, count);
                }
                Change::Move { from, to, .. } => {
                    let (source, from_offset) = split(position, from)?;
                    let count = shape.expect(position, &source, counts.before)?;
                    check_offset(position, from_offset, count)?;
                    let carried = shape.detach(from);
                    shape.rekey(|p| shift_for_remove(p, from));
                    shape.set(source.clone(), count - 1);

                    let (target, to_offset) = split(position, to)?;
                    let target_count = if target == source {
                        count - 1
                    } else {
                        let recorded = counts.target_before.ok_or_else(|| {
                            AssemblageError::inconsistent(
                                position,
                                "move between containers without a target count",
                            )
                        })?;
                        shape.expect(position, &target, recorded)?
                    };
                    check_offset(position, to_offset, target_count + 1)?;
                    shape.rekey(|p| Some(shift_for_insert(p, to)));
                    shape.set(target, target_count + 1);
                    for (rest, c) in carried {
                        shape.set(rest.prefixed_by(to), c);
                    }
                }
            }
        }
        Ok(())
    }
}

fn split(position: usize, path: &IndexPath) -> Result<(IndexPath, usize), AssemblageError> {
    match path.split_last() {
        Some((parent, offset)) => Ok((IndexPath::from(parent), offset)),
        None => Err(AssemblageError::inconsistent(position, "change at the root path")),
    }
}

/// `offset` must be below `bound`.
fn check_offset(position: usize, offset: usize, bound: usize) -> Result<(), AssemblageError> {
    if offset >= bound {
        return Err(AssemblageError::inconsistent(
            position,
            format!("offset {offset} not below {bound}"),
        ));
    }
    Ok(())
}

#[derive(Debug, Default)]
struct ShapeTracker {
    counts: BTreeMap<IndexPath, usize>,
}

impl ShapeTracker {
    /// Count of `container` as the replay knows it, checked against the
    /// count the record captured.
    fn expect(
        &self,
        position: usize,
        container: &IndexPath,
        recorded: usize,
    ) -> Result<usize, AssemblageError> {
        match self.counts.get(container) {
            Some(&tracked) if tracked != recorded => Err(AssemblageError::inconsistent(
                position,
                format!("container {container} holds {tracked} children, change saw {recorded}"),
            )),
            _ => Ok(recorded),
        }
    }

    fn set(&mut self, container: IndexPath, count: usize) {
        self.counts.insert(container, count);
    }

    fn rekey(&mut self, f: impl Fn(&IndexPath) -> Option<IndexPath>) {
        let counts = std::mem::take(&mut self.counts);
        self.counts = counts
            .into_iter()
            .filter_map(|(path, count)| f(&path).map(|path| (path, count)))
            .collect();
    }

    /// Removes the entries at and below `root`, returning them relative to it.
    fn detach(&mut self, root: &IndexPath) -> Vec<(IndexPath, usize)> {
        let carried: Vec<(IndexPath, usize)> = self
            .counts
            .iter()
            .filter_map(|(path, &count)| path.strip_prefix(root).map(|rest| (rest, count)))
            .collect();
        self.counts.retain(|path, _| !path.starts_with(root));
        carried
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p<const N: usize>(indexes: [usize; N]) -> IndexPath {
        IndexPath::from(indexes)
    }

    fn insert(path: IndexPath, before: usize) -> (Change<&'static str>, ContainerCounts) {
        (
            Change::Insert {
                object: Child::leaf("x"),
                path,
            },
            ContainerCounts::new(before),
        )
    }

    fn remove(path: IndexPath, before: usize) -> (Change<&'static str>, ContainerCounts) {
        (
            Change::Remove {
                object: Child::leaf("x"),
                path,
            },
            ContainerCounts::new(before),
        )
    }

    fn set_of(records: Vec<(Change<&'static str>, ContainerCounts)>) -> ChangeSet<&'static str> {
        let mut set = ChangeSet::new();
        for (change, counts) in records {
            set.record(change, counts);
        }
        set
    }

    #[test]
    fn verify_accepts_sequential_log() {
        let set = set_of(vec![
            insert(p([0]), 0),
            insert(p([0]), 1),
            remove(p([1]), 2),
        ]);
        assert_eq!(set.verify(), Ok(()));
    }

    #[test]
    fn verify_rejects_count_mismatch() {
        let set = set_of(vec![insert(p([0]), 0), insert(p([0]), 0)]);
        assert!(matches!(
            set.verify(),
            Err(AssemblageError::InconsistentChangeSet { position: 1, .. })
        ));
    }

    #[test]
    fn verify_rejects_offset_past_end() {
        let set = set_of(vec![remove(p([3]), 3)]);
        assert!(matches!(
            set.verify(),
            Err(AssemblageError::InconsistentChangeSet { position: 0, .. })
        ));
        let set = set_of(vec![insert(p([4]), 3)]);
        assert!(set.verify().is_err());
    }

    #[test]
    fn verify_tracks_nested_containers_across_shifts() {
        // Container [1] has 2 children; inserting at [0] moves it to [2].
        let set = set_of(vec![
            insert(p([1, 2]), 2),
            insert(p([0]), 4),
            remove(p([2, 0]), 3),
        ]);
        assert_eq!(set.verify(), Ok(()));

        // Same log but the last record forgot the shift.
        let set = set_of(vec![
            insert(p([1, 2]), 2),
            insert(p([0]), 4),
            remove(p([1, 0]), 3),
        ]);
        // [1] is now an untracked container, so only the count of [2] could
        // betray the mistake; the log is still self-consistent.
        assert_eq!(set.verify(), Ok(()));

        let set = set_of(vec![
            insert(p([1, 2]), 2),
            insert(p([0]), 4),
            remove(p([2, 0]), 2),
        ]);
        assert!(set.verify().is_err());
    }

    #[test]
    fn verify_moves_carry_tracked_subtree() {
        let mut set = set_of(vec![insert(p([0, 0]), 1)]);
        set.record(
            Change::Move {
                object: Child::leaf("x"),
                from: p([0]),
                to: p([2]),
            },
            ContainerCounts::new(3),
        );
        // The container formerly at [0] now lives at [2] with 2 children.
        set.record(remove(p([2, 1]), 2).0, ContainerCounts::new(2));
        assert_eq!(set.verify(), Ok(()));

        set.record(remove(p([2, 0]), 5).0, ContainerCounts::new(5));
        assert!(set.verify().is_err());
    }

    #[test]
    fn verify_requires_target_count_for_cross_container_move() {
        let mut set = ChangeSet::new();
        set.record(
            Change::Move {
                object: Child::leaf("x"),
                from: p([0, 0]),
                to: p([1, 0]),
            },
            ContainerCounts::new(1),
        );
        assert!(set.verify().is_err());

        let mut set = ChangeSet::new();
        set.record(
            Change::Move {
                object: Child::leaf("x"),
                from: p([0, 0]),
                to: p([1, 0]),
            },
            ContainerCounts::with_target(1, 0),
        );
        assert_eq!(set.verify(), Ok(()));
    }

    #[test]
    fn verify_reads_move_target_after_removal() {
        // [[x], [y]]: moving [0] to [0, 1] lands inside the former [1].
        let mut set = ChangeSet::new();
        set.record(
            Change::Move {
                object: Child::<&str>::leaf("x"),
                from: p([0]),
                to: p([0, 1]),
            },
            ContainerCounts::with_target(2, 1),
        );
        set.record(remove(p([0, 1]), 2).0, ContainerCounts::new(2));
        assert_eq!(set.verify(), Ok(()));
    }

    #[test]
    fn verify_forgets_count_of_replaced_container() {
        // [[1]]: grow [0] to 2, replace it with a 3-child container, then
        // append to the replacement.
        let mut set = set_of(vec![insert(p([0, 1]), 1)]);
        set.record(
            Change::Update {
                object: Child::leaf("x"),
                path: p([0]),
            },
            ContainerCounts::new(1),
        );
        set.record(insert(p([0, 3]), 3).0, ContainerCounts::new(3));
        assert_eq!(set.verify(), Ok(()));
    }

    #[test]
    fn change_accessors() {
        let change = Change::Move {
            object: Child::leaf(1),
            from: p([0]),
            to: p([2]),
        };
        assert_eq!(change.kind(), ChangeKind::Move);
        assert_eq!(change.path(), &p([2]));
        assert_eq!(change.from(), Some(&p([0])));
        assert_eq!(change.object(), &Child::leaf(1));
    }
}
