//! Validation functions for index paths and their pointer form.

use thiserror::Error;

use crate::IndexPath;

/// Maximum allowed pointer string length.
pub const MAX_POINTER_LENGTH: usize = 1024;

/// Maximum allowed path depth.
pub const MAX_PATH_LENGTH: usize = 256;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("POINTER_INVALID")]
    PointerInvalid,
    #[error("POINTER_TOO_LONG")]
    PointerTooLong,
    #[error("Path too long: depth {depth} exceeds {max}")]
    PathTooLong { depth: usize, max: usize },
}

/// Validate a pointer-form index path string.
///
/// # Errors
///
/// Returns an error if:
/// - The pointer is non-empty but doesn't start with `/`
/// - The pointer exceeds the maximum length (1024 characters)
///
/// # Example
///
/// ```
/// use assemblage_index_path::validate_pointer;
///
/// validate_pointer("").unwrap();  // Root is valid
/// validate_pointer("/0/3").unwrap();
/// validate_pointer("0/3").unwrap_err();  // Missing leading /
/// ```
pub fn validate_pointer(pointer: &str) -> Result<(), ValidationError> {
    if pointer.is_empty() {
        return Ok(());
    }
    if !pointer.starts_with('/') {
        return Err(ValidationError::PointerInvalid);
    }
    if pointer.len() > MAX_POINTER_LENGTH {
        return Err(ValidationError::PointerTooLong);
    }
    Ok(())
}

/// Validate a path against the default maximum depth (256 steps).
pub fn validate_index_path(path: &IndexPath) -> Result<(), ValidationError> {
    validate_depth(path, MAX_PATH_LENGTH)
}

/// Validate a path against an explicit maximum depth.
pub fn validate_depth(path: &IndexPath, max: usize) -> Result<(), ValidationError> {
    if path.len() > max {
        return Err(ValidationError::PathTooLong {
            depth: path.len(),
            max,
        });
    }
    Ok(())
}
