//! The assemblage container and its batching protocol.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use assemblage_index_path::IndexPath;
use tracing::{debug, error, trace, warn};

use crate::change_set::{Change, ChangeSet, ContainerCounts};
use crate::child::{Child, Mutability};
use crate::delegate::AssemblageDelegate;
use crate::error::AssemblageError;
use crate::options::AssemblageOptions;

/// Result of a primitive edit before it is recorded: the value handed back
/// to the caller, the change to log, and the counts to verify it with.
pub(crate) type Edited<R, T> = (R, Change<T>, ContainerCounts);

/// An ordered, observable container of leaves and nested assemblages.
///
/// Edits made through the root, or through an
/// [`AssemblageMut`](crate::AssemblageMut) handle borrowed from it, are
/// logged with root-relative index paths and delivered to the root's
/// delegate when the outermost batch closes. A nested assemblage never
/// notifies on its own: inserting one adopts it.
pub struct Assemblage<T> {
    pub(crate) children: Vec<Child<T>>,
    pub(crate) represented: Option<T>,
    pub(crate) mutability: Mutability,
    pub(crate) options: AssemblageOptions,
    pub(crate) update_count: usize,
    pub(crate) change_set: Option<ChangeSet<T>>,
    pub(crate) delegate: Option<Weak<RefCell<dyn AssemblageDelegate<T>>>>,
}

impl<T> Assemblage<T> {
    /// Builds a container from its initial children. Initial population is
    /// not an edit and notifies nobody.
    pub fn new(children: impl IntoIterator<Item = Child<T>>) -> Self {
        Self::from_children(children.into_iter().collect())
    }

    pub fn from_children(mut children: Vec<Child<T>>) -> Self {
        children.iter_mut().for_each(Self::adopt);
        Self {
            children,
            represented: None,
            mutability: Mutability::Mutable,
            options: AssemblageOptions::default(),
            update_count: 0,
            change_set: None,
            delegate: None,
        }
    }

    pub fn from_leaves(leaves: impl IntoIterator<Item = T>) -> Self {
        Self::new(leaves.into_iter().map(Child::Leaf))
    }

    pub fn empty() -> Self {
        Self::from_children(Vec::new())
    }

    pub fn with_mutability(children: impl IntoIterator<Item = Child<T>>, mutability: Mutability) -> Self {
        let mut node = Self::new(children);
        node.mutability = mutability;
        node
    }

    pub fn with_represented_object(mut self, object: T) -> Self {
        self.represented = Some(object);
        self
    }

    pub fn with_options(mut self, options: AssemblageOptions) -> Self {
        self.options = options;
        self
    }

    pub fn count(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn child_at(&self, index: usize) -> Result<&Child<T>, AssemblageError> {
        self.children.get(index).ok_or(AssemblageError::IndexOutOfBounds {
            index,
            count: self.count(),
        })
    }

    /// The leaf, or the represented object of a nested assemblage.
    pub fn object_at(&self, index: usize) -> Result<Option<&T>, AssemblageError> {
        self.child_at(index).map(Child::object)
    }

    pub fn leaf_at(&self, index: usize) -> Option<&T> {
        self.children.get(index).and_then(Child::as_leaf)
    }

    pub fn assemblage_at(&self, index: usize) -> Option<&Assemblage<T>> {
        self.children.get(index).and_then(Child::as_assemblage)
    }

    pub fn children(&self) -> std::slice::Iter<'_, Child<T>> {
        self.children.iter()
    }

    pub fn into_children(self) -> Vec<Child<T>> {
        self.children
    }

    pub fn represented_object(&self) -> Option<&T> {
        self.represented.as_ref()
    }

    pub fn mutability(&self) -> Mutability {
        self.mutability
    }

    pub fn options(&self) -> &AssemblageOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: AssemblageOptions) {
        self.options = options;
    }

    /// Subscribes `delegate` without taking ownership of it.
    ///
    /// Replaces any previous delegate. Dropping the last strong reference
    /// silently unsubscribes it.
    pub fn set_delegate<D>(&mut self, delegate: &Rc<RefCell<D>>)
    where
        D: AssemblageDelegate<T> + 'static,
    {
        let delegate: Rc<RefCell<dyn AssemblageDelegate<T>>> = delegate.clone();
        self.delegate = Some(Rc::downgrade(&delegate));
    }

    pub fn clear_delegate(&mut self) {
        self.delegate = None;
    }

    /// True while a subscribed delegate is still alive.
    pub fn has_delegate(&self) -> bool {
        self.delegate
            .as_ref()
            .is_some_and(|delegate| delegate.strong_count() > 0)
    }

    /// Number of currently open batches.
    pub fn batch_depth(&self) -> usize {
        self.update_count
    }

    pub fn open_batch_update(&mut self) {
        self.update_count += 1;
        debug!(message = "batch opened", depth = self.update_count);
    }

    /// Closes one batch level. Closing the outermost level verifies the
    /// change log and delivers it to the delegate.
    ///
    /// # Errors
    ///
    /// - [`AssemblageError::UnbalancedBatch`] when no batch is open.
    /// - [`AssemblageError::InconsistentChangeSet`] when the log fails
    ///   verification; nothing is delivered and the log is discarded.
    pub fn close_batch_update(&mut self) -> Result<(), AssemblageError> {
        if self.update_count == 0 {
            return Err(AssemblageError::UnbalancedBatch);
        }
        self.update_count -= 1;
        debug!(message = "batch closed", depth = self.update_count);
        if self.update_count == 0 {
            self.flush()?;
        }
        Ok(())
    }

    /// Runs `f` inside one batch so all of its edits are delivered together.
    pub fn batch<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> Result<R, AssemblageError> {
        self.open_batch_update();
        let value = f(self);
        self.close_batch_update()?;
        Ok(value)
    }

    fn flush(&mut self) -> Result<(), AssemblageError> {
        let Some(change_set) = self.change_set.take() else {
            return Ok(());
        };
        if change_set.is_empty() {
            return Ok(());
        }
        debug!(message = "flushing change set", changes = change_set.len());
        if let Err(err) = change_set.verify() {
            error!(message = "change set failed verification", error = %err);
            return Err(err);
        }

        let Some(delegate) = self.delegate.as_ref().and_then(Weak::upgrade) else {
            trace!(message = "no delegate to notify");
            return Ok(());
        };
        let Ok(mut delegate) = delegate.try_borrow_mut() else {
            error!(message = "delegate already borrowed, notifications skipped");
            return Ok(());
        };

        let summary = self.options.coalesce.then(|| change_set.summarize());
        delegate.will_begin_updates(self);
        for change in change_set.changes() {
            match change {
                Change::Insert { object, path } => delegate.did_insert(object, path),
                Change::Remove { object, path } => delegate.did_remove(object, path),
                Change::Update { object, path } => delegate.did_update(object, path),
                Change::Move { object, from, to } => delegate.did_move(object, from, to),
            }
        }
        if let Some(summary) = &summary {
            delegate.did_coalesce_updates(summary);
        }
        delegate.did_end_updates(self);
        Ok(())
    }

    pub(crate) fn record(&mut self, change: Change<T>, counts: ContainerCounts) {
        trace!(message = "change recorded", kind = %change.kind(), path = %change.path());
        self.change_set
            .get_or_insert_with(ChangeSet::new)
            .record(change, counts);
    }

    /// Records a successful edit and closes the implicit batch opened for it.
    pub(crate) fn finish_edit<R>(
        &mut self,
        outcome: Result<Edited<R, T>, AssemblageError>,
    ) -> Result<R, AssemblageError> {
        let outcome = outcome.map(|(value, change, counts)| {
            self.record(change, counts);
            value
        });
        self.close_batch_update()?;
        outcome
    }

    /// Detaches an assemblage that is about to become part of another tree.
    pub(crate) fn adopt(child: &mut Child<T>) {
        let Some(node) = child.assemblage_mut() else {
            return;
        };
        if node.update_count > 0 {
            warn!(
                message = "adopting assemblage with an open batch, pending changes dropped",
                depth = node.update_count,
                pending = node.change_set.as_ref().map_or(0, ChangeSet::len),
            );
        }
        node.update_count = 0;
        node.change_set = None;
        node.delegate = None;
    }
}

impl<T: PartialEq> Assemblage<T> {
    /// Offset of the first direct leaf equal to `value`.
    pub fn index_of(&self, value: &T) -> Option<usize> {
        self.children.iter().position(|c| c.as_leaf() == Some(value))
    }

    /// Path of the first leaf equal to `value`, depth first.
    pub fn index_path_of(&self, value: &T) -> Option<IndexPath> {
        for (index, child) in self.children.iter().enumerate() {
            match child {
                Child::Leaf(leaf) if leaf == value => return Some(IndexPath::from([index])),
                Child::Leaf(_) => {}
                Child::Assemblage(node) => {
                    if let Some(rest) = node.index_path_of(value) {
                        return Some(rest.prefixed_by(&IndexPath::from([index])));
                    }
                }
            }
        }
        None
    }
}

impl<T: Clone> Assemblage<T> {
    pub fn insert(&mut self, child: Child<T>, index: usize) -> Result<(), AssemblageError> {
        self.insert_at_path(child, &IndexPath::from([index]))
    }

    pub fn push(&mut self, child: Child<T>) -> Result<(), AssemblageError> {
        let index = self.count();
        self.insert(child, index)
    }

    pub fn remove(&mut self, index: usize) -> Result<Child<T>, AssemblageError> {
        self.remove_at_path(&IndexPath::from([index]))
    }

    /// Removes the last child; `Ok(None)` and no notification when empty.
    pub fn pop(&mut self) -> Result<Option<Child<T>>, AssemblageError> {
        match self.count() {
            0 => Ok(None),
            count => self.remove(count - 1).map(Some),
        }
    }

    /// Replaces the child at `index`, returning the previous one.
    pub fn update(&mut self, child: Child<T>, index: usize) -> Result<Child<T>, AssemblageError> {
        self.update_at_path(child, &IndexPath::from([index]))
    }

    /// Moves the child at `from` so that it ends up at `to`.
    pub fn move_child(&mut self, from: usize, to: usize) -> Result<(), AssemblageError> {
        self.move_at_path(&IndexPath::from([from]), &IndexPath::from([to]))
    }
}

impl<T> Default for Assemblage<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Clones the content only: the copy has no delegate and no open batch.
impl<T: Clone> Clone for Assemblage<T> {
    fn clone(&self) -> Self {
        Self {
            children: self.children.clone(),
            represented: self.represented.clone(),
            mutability: self.mutability,
            options: self.options,
            update_count: 0,
            change_set: None,
            delegate: None,
        }
    }
}

impl<T: PartialEq> PartialEq for Assemblage<T> {
    fn eq(&self, other: &Self) -> bool {
        self.children == other.children
            && self.represented == other.represented
            && self.mutability == other.mutability
    }
}

impl<T: fmt::Debug> fmt::Debug for Assemblage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assemblage")
            .field("children", &self.children)
            .field("represented", &self.represented)
            .field("mutability", &self.mutability)
            .field("batch_depth", &self.update_count)
            .field("has_delegate", &self.has_delegate())
            .finish()
    }
}
