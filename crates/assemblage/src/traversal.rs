//! Index path resolution and path-addressed edits.
//!
//! Every edit resolves its path to `(container, offset)`, checks bounds and
//! the container's mutability, and only then mutates. A failed edit leaves
//! the tree untouched and records nothing.

use assemblage_index_path::transform::unshift_for_remove;
use assemblage_index_path::{is_sibling, validate_depth, IndexPath};

use crate::change_set::{Change, ChangeKind, ContainerCounts};
use crate::child::Child;
use crate::error::{AssemblageError, PathFault};
use crate::node::{Assemblage, Edited};

/// Splits an edit target into its container steps and final offset.
fn split_target(path: &IndexPath) -> Result<(&[usize], usize), AssemblageError> {
    path.split_last()
        .ok_or_else(|| AssemblageError::invalid_path(path, PathFault::Empty))
}

fn check_index(index: usize, count: usize) -> Result<(), AssemblageError> {
    if index >= count {
        return Err(AssemblageError::IndexOutOfBounds { index, count });
    }
    Ok(())
}

/// Inserting may also append, so `count` itself is a valid offset.
fn check_insert_index(index: usize, count: usize) -> Result<(), AssemblageError> {
    if index > count {
        return Err(AssemblageError::IndexOutOfBounds { index, count });
    }
    Ok(())
}

impl<T> Assemblage<T> {
    fn check_depth(&self, path: &IndexPath) -> Result<(), AssemblageError> {
        let max = self.options.max_depth;
        validate_depth(path, max)
            .map_err(|_| AssemblageError::invalid_path(path, PathFault::TooDeep { max }))
    }

    /// The container reached by following `steps`; `full` is reported in errors.
    fn descend(&self, steps: &[usize], full: &IndexPath) -> Result<&Assemblage<T>, AssemblageError> {
        let mut node = self;
        for (depth, &index) in steps.iter().enumerate() {
            node = node
                .child_at(index)?
                .as_assemblage()
                .ok_or_else(|| AssemblageError::invalid_path(full, PathFault::NotAContainer { depth }))?;
        }
        Ok(node)
    }

    fn descend_mut(
        &mut self,
        steps: &[usize],
        full: &IndexPath,
    ) -> Result<&mut Assemblage<T>, AssemblageError> {
        let mut node = self;
        for (depth, &index) in steps.iter().enumerate() {
            let count = node.children.len();
            node = node
                .children
                .get_mut(index)
                .ok_or(AssemblageError::IndexOutOfBounds { index, count })?
                .assemblage_mut()
                .ok_or_else(|| AssemblageError::invalid_path(full, PathFault::NotAContainer { depth }))?;
        }
        Ok(node)
    }

    fn check_allowed(&self, steps: &[usize], kind: ChangeKind) -> Result<(), AssemblageError> {
        if !self.mutability.allows(kind) {
            return Err(AssemblageError::unsupported(steps, self.mutability, kind));
        }
        Ok(())
    }

    /// Child addressed by a non-empty path.
    ///
    /// # Errors
    ///
    /// - `InvalidPath` when `path` is empty, too deep, or descends through a leaf.
    /// - `IndexOutOfBounds` when any step is past the end of its container.
    pub fn child_at_path(&self, path: &IndexPath) -> Result<&Child<T>, AssemblageError> {
        self.check_depth(path)?;
        let (steps, index) = split_target(path)?;
        self.descend(steps, path)?.child_at(index)
    }

    /// The leaf at `path`, or the represented object of the container there.
    /// The empty path yields the root's represented object.
    pub fn object_at_path(&self, path: &IndexPath) -> Result<Option<&T>, AssemblageError> {
        if path.is_root() {
            return Ok(self.represented_object());
        }
        self.child_at_path(path).map(Child::object)
    }

    /// The container at `path`; the empty path is the root itself.
    pub fn assemblage_at_path(&self, path: &IndexPath) -> Result<&Assemblage<T>, AssemblageError> {
        self.check_depth(path)?;
        self.descend(path.as_slice(), path)
    }

    pub fn number_of_children_at_path(&self, path: &IndexPath) -> Result<usize, AssemblageError> {
        self.assemblage_at_path(path).map(Assemblage::count)
    }
}

impl<T: Clone> Assemblage<T> {
    /// Inserts `child` so that it ends up at `path`.
    pub fn insert_at_path(&mut self, child: Child<T>, path: &IndexPath) -> Result<(), AssemblageError> {
        self.open_batch_update();
        let outcome = self.apply_insert(child, path);
        self.finish_edit(outcome)
    }

    /// Removes and returns the child at `path`.
    pub fn remove_at_path(&mut self, path: &IndexPath) -> Result<Child<T>, AssemblageError> {
        self.open_batch_update();
        let outcome = self.apply_remove(path);
        self.finish_edit(outcome)
    }

    /// Replaces the child at `path`, returning the previous one.
    pub fn update_at_path(&mut self, child: Child<T>, path: &IndexPath) -> Result<Child<T>, AssemblageError> {
        self.open_batch_update();
        let outcome = self.apply_update(child, path);
        self.finish_edit(outcome)
    }

    /// Moves the child at `from` to `to` as one edit.
    ///
    /// `to` is read against the tree after the child has been taken out, the
    /// way a remove followed by an insert would see it. Moving a child onto
    /// its own position is allowed and still recorded.
    pub fn move_at_path(&mut self, from: &IndexPath, to: &IndexPath) -> Result<(), AssemblageError> {
        self.open_batch_update();
        let outcome = self.apply_move(from, to);
        self.finish_edit(outcome)
    }

    fn apply_insert(&mut self, mut child: Child<T>, path: &IndexPath) -> Result<Edited<(), T>, AssemblageError> {
        self.check_depth(path)?;
        let (steps, index) = split_target(path)?;
        let container = self.descend_mut(steps, path)?;
        let count = container.count();
        check_insert_index(index, count)?;
        container.check_allowed(steps, ChangeKind::Insert)?;

        Self::adopt(&mut child);
        let object = child.clone();
        container.children.insert(index, child);
        let change = Change::Insert {
            object,
            path: path.clone(),
        };
        Ok(((), change, ContainerCounts::new(count)))
    }

    fn apply_remove(&mut self, path: &IndexPath) -> Result<Edited<Child<T>, T>, AssemblageError> {
        self.check_depth(path)?;
        let (steps, index) = split_target(path)?;
        let container = self.descend_mut(steps, path)?;
        let count = container.count();
        check_index(index, count)?;
        container.check_allowed(steps, ChangeKind::Remove)?;

        let child = container.children.remove(index);
        let change = Change::Remove {
            object: child.clone(),
            path: path.clone(),
        };
        Ok((child, change, ContainerCounts::new(count)))
    }

    fn apply_update(&mut self, mut child: Child<T>, path: &IndexPath) -> Result<Edited<Child<T>, T>, AssemblageError> {
        self.check_depth(path)?;
        let (steps, index) = split_target(path)?;
        let container = self.descend_mut(steps, path)?;
        let count = container.count();
        check_index(index, count)?;
        container.check_allowed(steps, ChangeKind::Update)?;

        Self::adopt(&mut child);
        let object = child.clone();
        let previous = std::mem::replace(&mut container.children[index], child);
        let change = Change::Update {
            object,
            path: path.clone(),
        };
        Ok((previous, change, ContainerCounts::new(count)))
    }

    fn apply_move(&mut self, from: &IndexPath, to: &IndexPath) -> Result<Edited<(), T>, AssemblageError> {
        self.check_depth(from)?;
        self.check_depth(to)?;
        let (source_steps, from_index) = split_target(from)?;
        let (target_steps, to_index) = split_target(to)?;

        if is_sibling(from, to) {
            let container = self.descend_mut(source_steps, from)?;
            let count = container.count();
            check_index(from_index, count)?;
            check_index(to_index, count)?;
            container.check_allowed(source_steps, ChangeKind::Move)?;

            let child = container.children.remove(from_index);
            let object = child.clone();
            container.children.insert(to_index, child);
            let change = Change::Move {
                object,
                from: from.clone(),
                to: to.clone(),
            };
            return Ok(((), change, ContainerCounts::new(count)));
        }

        let source = self.descend(source_steps, from)?;
        let count = source.count();
        check_index(from_index, count)?;
        source.check_allowed(source_steps, ChangeKind::Remove)?;

        // Validate the destination before anything is taken out.
        let target_before_removal = unshift_for_remove(&IndexPath::from(target_steps), from);
        let target = self.descend(target_before_removal.as_slice(), to)?;
        let target_count = target.count();
        check_insert_index(to_index, target_count)?;
        target.check_allowed(target_steps, ChangeKind::Insert)?;

        let child = self.descend_mut(source_steps, from)?.children.remove(from_index);
        let object = child.clone();
        let placed = match self.descend_mut(target_steps, to) {
            Ok(target) => {
                target.children.insert(to_index, child);
                Ok(())
            }
            Err(err) => Err((err, child)),
        };
        if let Err((err, child)) = placed {
            if let Ok(source) = self.descend_mut(source_steps, from) {
                source.children.insert(from_index, child);
            }
            return Err(err);
        }
        let change = Change::Move {
            object,
            from: from.clone(),
            to: to.clone(),
        };
        Ok(((), change, ContainerCounts::with_target(count, target_count)))
    }
}
