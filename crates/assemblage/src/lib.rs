//! Observable hierarchical collections.
//!
//! An [`Assemblage`] is an ordered container whose children are leaf values
//! or nested assemblages. Children are addressed with [`IndexPath`]s, one
//! offset per level, and every structural edit (insert, remove, update,
//! move) is reported to the root's [`AssemblageDelegate`] with paths that a
//! presentation layer can apply one after another.
//!
//! Edits are grouped into batches. An edit made outside an explicit batch is
//! delivered on its own; edits made between
//! [`open_batch_update`](Assemblage::open_batch_update) and the matching
//! [`close_batch_update`](Assemblage::close_batch_update) are delivered
//! together, bracketed by `will_begin_updates` / `did_end_updates` and
//! followed by a coalesced [`NetChanges`] summary.
//!
//! # Example
//!
//! ```
//! use assemblage::{Assemblage, Change, ChangeRecorder, Child, IndexPath};
//!
//! let recorder = ChangeRecorder::shared();
//! let mut list = Assemblage::from_leaves(["a", "b", "c", "d"]);
//! list.set_delegate(&recorder);
//!
//! list.move_child(0, 2).unwrap();
//!
//! assert_eq!(
//!     recorder.borrow().changes(),
//!     vec![Change::Move {
//!         object: Child::leaf("a"),
//!         from: IndexPath::from([0]),
//!         to: IndexPath::from([2]),
//!     }]
//! );
//! ```

pub mod change_set;
pub mod child;
pub mod delegate;
pub mod error;
pub mod handle;
pub mod json;
pub mod node;
pub mod options;
pub mod summary;
mod traversal;

pub use assemblage_index_path::{parse_index_path, IndexPath, IndexPathError};
pub use change_set::{Change, ChangeKind, ChangeSet, ContainerCounts};
pub use child::{Child, Mutability};
pub use delegate::{AssemblageDelegate, ChangeRecorder, DelegateEvent};
pub use error::{AssemblageError, PathFault};
pub use handle::AssemblageMut;
pub use json::changes_to_json_patch;
pub use node::Assemblage;
pub use options::AssemblageOptions;
pub use summary::NetChanges;
