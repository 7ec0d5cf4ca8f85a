//! Index paths for hierarchical, ordered collections.
//!
//! An index path is an ordered list of offsets, one per tree level, locating
//! an element from the root container. This crate provides the path type,
//! a pointer-style text form (`/0/2/1`), validation, and the offset
//! transforms needed to keep paths valid while a tree is being edited.
//!
//! # Example
//!
//! ```
//! use assemblage_index_path::{format_index_path, parse_index_path, IndexPath};
//!
//! // Parse a pointer string into a path
//! let path = parse_index_path("/1/0").unwrap();
//! assert_eq!(path, IndexPath::from([1, 0]));
//!
//! // Format a path back to its pointer string
//! assert_eq!(format_index_path(path.as_slice()), "/1/0");
//! assert_eq!(path.to_string(), "/1/0");
//! ```

use thiserror::Error;

pub mod types;
pub use types::IndexPath;

pub mod validate;
pub use validate::{
    validate_depth, validate_index_path, validate_pointer, ValidationError, MAX_PATH_LENGTH,
    MAX_POINTER_LENGTH,
};

pub mod transform;

mod get;
pub use get::{get, get_mut};

/// Parse a pointer-form index path.
///
/// - Empty string is the root path
/// - Every step must be a non-negative integer without leading zeros
///
/// # Example
///
/// ```
/// use assemblage_index_path::{parse_index_path, IndexPath, IndexPathError};
///
/// assert_eq!(parse_index_path("").unwrap(), IndexPath::root());
/// assert_eq!(parse_index_path("/3/12").unwrap(), IndexPath::from([3, 12]));
/// assert!(matches!(parse_index_path("/01"), Err(IndexPathError::InvalidIndex(_))));
/// ```
pub fn parse_index_path(pointer: &str) -> Result<IndexPath, IndexPathError> {
    validate_pointer(pointer)?;
    if pointer.is_empty() {
        return Ok(IndexPath::root());
    }
    let path = pointer[1..]
        .split('/')
        .map(parse_step)
        .collect::<Result<IndexPath, _>>()?;
    validate_index_path(&path)?;
    Ok(path)
}

fn parse_step(step: &str) -> Result<usize, IndexPathError> {
    if !is_valid_index(step) {
        return Err(IndexPathError::InvalidIndex(step.to_string()));
    }
    step.parse()
        .map_err(|_| IndexPathError::InvalidIndex(step.to_string()))
}

/// Format offsets into a pointer-form string.
///
/// Returns an empty string for the root path.
///
/// # Example
///
/// ```
/// use assemblage_index_path::format_index_path;
///
/// assert_eq!(format_index_path(&[]), "");
/// assert_eq!(format_index_path(&[0]), "/0");
/// assert_eq!(format_index_path(&[4, 0, 2]), "/4/0/2");
/// ```
pub fn format_index_path(path: &[usize]) -> String {
    let mut out = String::with_capacity(path.len() * 3);
    for step in path {
        out.push('/');
        out.push_str(&step.to_string());
    }
    out
}

/// Check if `parent` path contains the `child` path.
///
/// # Example
///
/// ```
/// use assemblage_index_path::{is_child, IndexPath};
///
/// let parent = IndexPath::from([1]);
/// let child = IndexPath::from([1, 0]);
/// assert!(is_child(&parent, &child));
/// assert!(!is_child(&child, &parent));
/// ```
pub fn is_child(parent: &IndexPath, child: &IndexPath) -> bool {
    parent.is_ancestor_of(child)
}

/// Check if two paths address siblings in the same container.
pub fn is_sibling(p1: &IndexPath, p2: &IndexPath) -> bool {
    match (p1.split_last(), p2.split_last()) {
        (Some((a, _)), Some((b, _))) => a == b,
        _ => false,
    }
}

/// Check if a string represents a valid non-negative integer index.
///
/// # Example
///
/// ```
/// use assemblage_index_path::is_valid_index;
///
/// assert!(is_valid_index("0"));
/// assert!(is_valid_index("123"));
/// assert!(!is_valid_index("-1"));
/// assert!(!is_valid_index("01"));
/// assert!(!is_valid_index("abc"));
/// ```
pub fn is_valid_index(index: &str) -> bool {
    if index.is_empty() {
        return false;
    }
    let bytes = index.as_bytes();
    // First char can't be leading zero unless it's just "0"
    if bytes.len() > 1 && bytes[0] == b'0' {
        return false;
    }
    bytes.iter().all(|b| b.is_ascii_digit())
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IndexPathError {
    #[error("NO_PARENT")]
    NoParent,
    #[error("INVALID_INDEX: {0:?}")]
    InvalidIndex(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_index_path() {
        // Root
        assert_eq!(parse_index_path("").unwrap(), IndexPath::root());

        // Single step
        assert_eq!(parse_index_path("/0").unwrap(), IndexPath::from([0]));

        // Multiple steps
        assert_eq!(
            parse_index_path("/10/0/7").unwrap(),
            IndexPath::from([10, 0, 7])
        );
    }

    #[test]
    fn test_parse_rejects_bad_steps() {
        assert_eq!(
            parse_index_path("/"),
            Err(IndexPathError::InvalidIndex(String::new()))
        );
        assert_eq!(
            parse_index_path("/1//2"),
            Err(IndexPathError::InvalidIndex(String::new()))
        );
        assert_eq!(
            parse_index_path("/-"),
            Err(IndexPathError::InvalidIndex("-".to_string()))
        );
        assert_eq!(
            parse_index_path("/1.5"),
            Err(IndexPathError::InvalidIndex("1.5".to_string()))
        );
        assert_eq!(
            parse_index_path("/007"),
            Err(IndexPathError::InvalidIndex("007".to_string()))
        );
    }

    #[test]
    fn test_parse_rejects_relative_pointer() {
        assert_eq!(
            parse_index_path("0/1"),
            Err(IndexPathError::Validation(ValidationError::PointerInvalid))
        );
    }

    #[test]
    fn test_parse_rejects_deep_path() {
        let pointer = "/0".repeat(300);
        assert!(matches!(
            parse_index_path(&pointer),
            Err(IndexPathError::Validation(ValidationError::PathTooLong { .. }))
        ));
    }

    #[test]
    fn test_parse_rejects_overflow() {
        let pointer = format!("/{}0", usize::MAX);
        assert!(matches!(
            parse_index_path(&pointer),
            Err(IndexPathError::InvalidIndex(_))
        ));
    }

    #[test]
    fn test_format_index_path() {
        assert_eq!(format_index_path(&[]), "");
        assert_eq!(format_index_path(&[0]), "/0");
        assert_eq!(format_index_path(&[1, 22]), "/1/22");
    }

    #[test]
    fn test_is_child() {
        let parent = IndexPath::from([0]);
        let child = IndexPath::from([0, 1]);
        let sibling = IndexPath::from([1]);

        assert!(is_child(&parent, &child));
        assert!(!is_child(&child, &parent));
        assert!(!is_child(&parent, &sibling));
        assert!(!is_child(&parent, &parent));
    }

    #[test]
    fn test_is_sibling() {
        assert!(is_sibling(&IndexPath::from([0, 1]), &IndexPath::from([0, 5])));
        assert!(is_sibling(&IndexPath::from([0]), &IndexPath::from([3])));
        assert!(!is_sibling(&IndexPath::from([0, 1]), &IndexPath::from([1, 1])));
        assert!(!is_sibling(&IndexPath::root(), &IndexPath::root()));
    }

    #[test]
    fn test_roundtrip() {
        let pointers = vec!["", "/0", "/1/2", "/10/0/300"];

        for pointer in pointers {
            let path = parse_index_path(pointer).unwrap();
            let formatted = format_index_path(path.as_slice());
            assert_eq!(formatted, pointer, "Failed roundtrip for: {:?}", pointer);
        }
    }
}
