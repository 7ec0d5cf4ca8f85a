#![allow(dead_code)]

use assemblage::{parse_index_path, IndexPath};
use assemblage_index_path::get_mut;
use serde_json::Value;

fn array_at<'a>(doc: &'a mut Value, path: &[usize]) -> &'a mut Vec<Value> {
    get_mut(doc, &IndexPath::from(path))
        .and_then(Value::as_array_mut)
        .expect("pointer addresses an array")
}

fn split_pointer(op: &Value, key: &str) -> (Vec<usize>, usize) {
    let path = parse_index_path(op[key].as_str().expect("pointer string")).expect("index path");
    let (parent, last) = path.split_last().expect("non-root pointer");
    (parent.to_vec(), last)
}

/// Minimal RFC 6902 applier for index-path pointers over nested arrays.
pub fn apply_patch(doc: &mut Value, patch: &Value) {
    for op in patch.as_array().expect("patch is an array") {
        let (parent, index) = split_pointer(op, "path");
        match op["op"].as_str() {
            Some("add") => array_at(doc, &parent).insert(index, op["value"].clone()),
            Some("remove") => {
                array_at(doc, &parent).remove(index);
            }
            Some("replace") => array_at(doc, &parent)[index] = op["value"].clone(),
            Some("move") => {
                let (from_parent, from_index) = split_pointer(op, "from");
                let value = array_at(doc, &from_parent).remove(from_index);
                array_at(doc, &parent).insert(index, value);
            }
            other => panic!("unexpected op {other:?}"),
        }
    }
}
