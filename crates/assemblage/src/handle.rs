//! Mutable handles to nested containers.

use assemblage_index_path::IndexPath;

use crate::child::Child;
use crate::error::AssemblageError;
use crate::node::Assemblage;

/// A nested container borrowed from its root.
///
/// Edits made through the handle are applied by the root, so they are
/// logged with full root-relative paths and batched with everything else
/// the root is doing.
///
/// ```
/// use assemblage::{Assemblage, Child, IndexPath};
///
/// let mut root = Assemblage::new([Child::from(Assemblage::from_leaves(["a"]))]);
/// let mut section = root.at_path_mut(&IndexPath::from([0])).unwrap();
/// section.push(Child::leaf("b")).unwrap();
/// assert_eq!(section.count(), 2);
/// ```
#[derive(Debug)]
pub struct AssemblageMut<'a, T> {
    root: &'a mut Assemblage<T>,
    path: IndexPath,
}

impl<T> Assemblage<T> {
    /// Handle to the container at `path`; the empty path is the root itself.
    ///
    /// # Errors
    ///
    /// Fails like [`Assemblage::assemblage_at_path`] when `path` does not
    /// address a container.
    pub fn at_path_mut(&mut self, path: &IndexPath) -> Result<AssemblageMut<'_, T>, AssemblageError> {
        self.assemblage_at_path(path)?;
        Ok(AssemblageMut {
            root: self,
            path: path.clone(),
        })
    }
}

impl<'a, T> AssemblageMut<'a, T> {
    /// Root-relative path of this container.
    pub fn path(&self) -> &IndexPath {
        &self.path
    }

    pub fn get(&self) -> Result<&Assemblage<T>, AssemblageError> {
        self.root.assemblage_at_path(&self.path)
    }

    pub fn count(&self) -> usize {
        self.get().map_or(0, Assemblage::count)
    }

    pub fn child_at(&self, index: usize) -> Result<&Child<T>, AssemblageError> {
        self.root.child_at_path(&self.path.child(index))
    }

    /// Handle to the nested container at `index`.
    pub fn at_mut(&mut self, index: usize) -> Result<AssemblageMut<'_, T>, AssemblageError> {
        let path = self.path.child(index);
        self.root.at_path_mut(&path)
    }

    pub fn open_batch_update(&mut self) {
        self.root.open_batch_update();
    }

    pub fn close_batch_update(&mut self) -> Result<(), AssemblageError> {
        self.root.close_batch_update()
    }
}

impl<'a, T: Clone> AssemblageMut<'a, T> {
    pub fn insert(&mut self, child: Child<T>, index: usize) -> Result<(), AssemblageError> {
        self.root.insert_at_path(child, &self.path.child(index))
    }

    pub fn push(&mut self, child: Child<T>) -> Result<(), AssemblageError> {
        let index = self.count();
        self.insert(child, index)
    }

    pub fn remove(&mut self, index: usize) -> Result<Child<T>, AssemblageError> {
        self.root.remove_at_path(&self.path.child(index))
    }

    pub fn pop(&mut self) -> Result<Option<Child<T>>, AssemblageError> {
        match self.count() {
            0 => Ok(None),
            count => self.remove(count - 1).map(Some),
        }
    }

    pub fn update(&mut self, child: Child<T>, index: usize) -> Result<Child<T>, AssemblageError> {
        self.root.update_at_path(child, &self.path.child(index))
    }

    pub fn move_child(&mut self, from: usize, to: usize) -> Result<(), AssemblageError> {
        self.root
            .move_at_path(&self.path.child(from), &self.path.child(to))
    }
}
