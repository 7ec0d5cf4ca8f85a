use serde_json::Value;

use crate::IndexPath;

/// Get a value from nested JSON arrays by index path.
///
/// Returns `None` if any step indexes past the end of an array or tries to
/// descend into a non-array value.
///
/// # Example
///
/// ```
/// use assemblage_index_path::{get, IndexPath};
/// use serde_json::json;
///
/// let doc = json!([["a", "b"], ["c"]]);
/// assert_eq!(get(&doc, &IndexPath::from([0, 1])), Some(&json!("b")));
/// assert_eq!(get(&doc, &IndexPath::from([1, 1])), None);
/// ```
pub fn get<'a>(val: &'a Value, path: &IndexPath) -> Option<&'a Value> {
    let mut current = val;
    for &step in path {
        match current {
            Value::Array(arr) => current = arr.get(step)?,
            _ => return None,
        }
    }
    Some(current)
}

/// Mutable counterpart of [`get`].
pub fn get_mut<'a>(val: &'a mut Value, path: &IndexPath) -> Option<&'a mut Value> {
    let mut current = val;
    for &step in path {
        match current {
            Value::Array(arr) => current = arr.get_mut(step)?,
            _ => return None,
        }
    }
    Some(current)
}
