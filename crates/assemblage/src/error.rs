//! Error type for assemblage operations.

use std::fmt;

use assemblage_index_path::IndexPath;
use thiserror::Error;

use crate::change_set::ChangeKind;
use crate::child::Mutability;

/// Why an index path does not fit the shape of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathFault {
    /// The operation needs a final offset but the path is empty.
    Empty,
    /// The step at `depth` addresses a leaf but the path continues below it.
    NotAContainer { depth: usize },
    /// The path is deeper than the configured maximum.
    TooDeep { max: usize },
}

impl fmt::Display for PathFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathFault::Empty => f.write_str("path is empty"),
            PathFault::NotAContainer { depth } => {
                write!(f, "step {depth} addresses a leaf, not a container")
            }
            PathFault::TooDeep { max } => write!(f, "path deeper than {max}"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssemblageError {
    #[error("INDEX_OUT_OF_BOUNDS: index {index}, count {count}")]
    IndexOutOfBounds { index: usize, count: usize },
    #[error("INVALID_PATH at {path:?}: {reason}")]
    InvalidPath { path: String, reason: PathFault },
    #[error("UNSUPPORTED_MUTATION: {operation} on {mutability} container at {path:?}")]
    UnsupportedMutation {
        path: String,
        mutability: Mutability,
        operation: ChangeKind,
    },
    #[error("UNBALANCED_BATCH")]
    UnbalancedBatch,
    #[error("INCONSISTENT_CHANGE_SET: change {position}: {reason}")]
    InconsistentChangeSet { position: usize, reason: String },
}

impl AssemblageError {
    pub(crate) fn invalid_path(path: &IndexPath, reason: PathFault) -> Self {
        AssemblageError::InvalidPath {
            path: path.to_string(),
            reason,
        }
    }

    pub(crate) fn unsupported(path: &[usize], mutability: Mutability, operation: ChangeKind) -> Self {
        AssemblageError::UnsupportedMutation {
            path: IndexPath::from(path).to_string(),
            mutability,
            operation,
        }
    }

    pub(crate) fn inconsistent(position: usize, reason: impl Into<String>) -> Self {
        AssemblageError::InconsistentChangeSet {
            position,
            reason: reason.into(),
        }
    }

    /// True for errors caused by the caller, false for internal defects.
    pub fn is_caller_error(&self) -> bool {
        !matches!(self, AssemblageError::InconsistentChangeSet { .. })
    }
}
