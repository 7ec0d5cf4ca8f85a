use assemblage_index_path::MAX_PATH_LENGTH;

/// Per-tree settings, read from the root assemblage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssemblageOptions {
    /// Paths deeper than this are rejected as invalid.
    pub max_depth: usize,
    /// Compute a [`NetChanges`](crate::NetChanges) summary on flush and hand
    /// it to the delegate before `did_end_updates`.
    pub coalesce: bool,
}

impl Default for AssemblageOptions {
    fn default() -> Self {
        Self {
            max_depth: MAX_PATH_LENGTH,
            coalesce: true,
        }
    }
}
