//! JSON views of assemblages and their changes.
//!
//! A tree maps onto nested JSON arrays: containers become arrays, leaves are
//! serialized in place. Changes render as RFC 6902 operations whose paths
//! are index-path pointers (`/1/0`), so a notification stream can be
//! replayed against the array view by any JSON Patch applier.

use assemblage_index_path::format_index_path;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::change_set::Change;
use crate::child::Child;
use crate::node::Assemblage;

// ── Trees ─────────────────────────────────────────────────────────────────

impl Child<Value> {
    /// Arrays become nested assemblages, every other value a leaf.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Array(items) => Child::Assemblage(Assemblage::from_json_items(items)),
            other => Child::Leaf(other),
        }
    }
}

impl Assemblage<Value> {
    /// Builds a tree from nested arrays. A non-array value becomes a
    /// container holding that single leaf.
    ///
    /// ```
    /// use assemblage::{Assemblage, IndexPath};
    /// use serde_json::json;
    ///
    /// let tree = Assemblage::from_json(json!([1, [2, 3]]));
    /// assert_eq!(tree.number_of_children_at_path(&IndexPath::from([1])), Ok(2));
    /// assert_eq!(tree.to_json().unwrap(), json!([1, [2, 3]]));
    /// ```
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::from_json_items(items),
            other => Self::from_leaves([other]),
        }
    }

    fn from_json_items(items: Vec<Value>) -> Self {
        Self::new(items.into_iter().map(Child::from_json))
    }
}

impl<T: Serialize> Child<T> {
    pub fn to_json(&self) -> serde_json::Result<Value> {
        match self {
            Child::Leaf(value) => serde_json::to_value(value),
            Child::Assemblage(node) => node.to_json(),
        }
    }
}

impl<T: Serialize> Assemblage<T> {
    /// Nested-array view of the tree. Represented objects are not part of it.
    pub fn to_json(&self) -> serde_json::Result<Value> {
        self.children
            .iter()
            .map(Child::to_json)
            .collect::<serde_json::Result<Vec<_>>>()
            .map(Value::Array)
    }
}

// ── Changes ───────────────────────────────────────────────────────────────

impl<T: Serialize> Change<T> {
    /// The change as one JSON Patch operation against the array view.
    ///
    /// Removals carry the removed value as `oldValue`.
    pub fn to_json_patch(&self) -> serde_json::Result<Value> {
        Ok(match self {
            Change::Insert { object, path } => json!({
                "op": "add",
                "path": format_index_path(path.as_slice()),
                "value": object.to_json()?
            }),
            Change::Remove { object, path } => {
                let mut m = Map::new();
                m.insert("op".into(), json!("remove"));
                m.insert("path".into(), json!(format_index_path(path.as_slice())));
                m.insert("oldValue".into(), object.to_json()?);
                Value::Object(m)
            }
            Change::Update { object, path } => json!({
                "op": "replace",
                "path": format_index_path(path.as_slice()),
                "value": object.to_json()?
            }),
            Change::Move { from, to, .. } => json!({
                "op": "move",
                "path": format_index_path(to.as_slice()),
                "from": format_index_path(from.as_slice())
            }),
        })
    }
}

/// A sequence of changes as a JSON Patch document.
pub fn changes_to_json_patch<'a, T: Serialize + 'a>(
    changes: impl IntoIterator<Item = &'a Change<T>>,
) -> serde_json::Result<Value> {
    changes
        .into_iter()
        .map(Change::to_json_patch)
        .collect::<serde_json::Result<Vec<_>>>()
        .map(Value::Array)
}
