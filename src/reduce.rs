//! Pure application of a single edit to a root value.

use crate::error::EditError;
use crate::node::{NodeKind, resolve, resolve_mut};
use crate::{Path, Segment, Value, statics};

/// A single atomic, path-addressed edit.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOp {
    /// Replace the primitive at `path`.
    SetValue { path: Path, value: Value },
    /// Append to a container. Objects need a key, arrays take none.
    AddEntry {
        parent: Path,
        key: Option<String>,
        value: Value,
    },
    RemoveEntry { path: Path },
    /// Rename an object key in place.
    RenameKey {
        parent: Path,
        old_key: String,
        new_key: String,
    },
}

impl EditOp {
    /// Short human-readable description, used for logging.
    pub fn describe(&self) -> String {
        match self {
            EditOp::SetValue { path, value } => {
                format!("set '{path}' to {}", value.to_json5_compact())
            }
            EditOp::AddEntry {
                parent,
                key: Some(key),
                ..
            } => format!("add '{key}' to '{parent}'"),
            EditOp::AddEntry { parent, key: None, .. } => format!("append to '{parent}'"),
            EditOp::RemoveEntry { path } => format!("remove '{path}'"),
            EditOp::RenameKey {
                parent,
                old_key,
                new_key,
            } => format!("rename '{old_key}' to '{new_key}' in '{parent}'"),
        }
    }
}

/// Applies `op` to `root` and returns the new root.
///
/// `root` is never modified; on error nothing is produced.
pub fn apply(root: &Value, op: &EditOp) -> Result<Value, EditError> {
    // Validate against the borrowed root first so failures never pay for a clone.
    check(root, op)?;
    let mut next = root.clone();
    write(&mut next, op)?;
    Ok(next)
}

fn check(root: &Value, op: &EditOp) -> Result<(), EditError> {
    match op {
        EditOp::SetValue { path, value } => {
            let target = resolve(root, path)?;
            if target.is_container() {
                return Err(mismatch(path, "a primitive value", target));
            }
            if value.is_container() {
                return Err(mismatch(path, "a primitive replacement", value));
            }
            Ok(())
        }
        EditOp::AddEntry { parent, key, .. } => match (resolve(root, parent)?, key) {
            (Value::Object(map), Some(key)) if map.contains_key(key) => {
                Err(EditError::DuplicateKey {
                    path: parent.clone(),
                    key: key.clone(),
                })
            }
            (Value::Object(_), Some(_)) | (Value::Array(_), None) => Ok(()),
            (Value::Object(_), None) => Err(EditError::MissingKey {
                path: parent.clone(),
            }),
            (Value::Array(_), Some(_)) => Err(EditError::UnexpectedKey {
                path: parent.clone(),
            }),
            (leaf, _) => Err(mismatch(parent, "a container", leaf)),
        },
        EditOp::RemoveEntry { path } => {
            if path.is_root() {
                return Err(EditError::RootEntry);
            }
            resolve(root, path).map(|_| ())
        }
        EditOp::RenameKey {
            parent,
            old_key,
            new_key,
        } => {
            let container = resolve(root, parent)?;
            let Value::Object(map) = container else {
                return Err(mismatch(parent, statics::EN_TYPE_OBJECT, container));
            };
            if !map.contains_key(old_key) {
                return Err(EditError::PathNotFound {
                    path: parent.child(old_key.as_str()),
                });
            }
            if old_key != new_key && map.contains_key(new_key) {
                return Err(EditError::DuplicateKey {
                    path: parent.clone(),
                    key: new_key.clone(),
                });
            }
            Ok(())
        }
    }
}

fn write(root: &mut Value, op: &EditOp) -> Result<(), EditError> {
    match op {
        EditOp::SetValue { path, value } => {
            *resolve_mut(root, path)? = value.clone();
        }
        EditOp::AddEntry { parent, key, value } => match (resolve_mut(root, parent)?, key) {
            (Value::Object(map), Some(key)) => {
                map.insert(key.clone(), value.clone());
            }
            (Value::Array(values), None) => values.push(value.clone()),
            _ => unreachable!("checked before writing"),
        },
        EditOp::RemoveEntry { path } => {
            let (parent, last) = path.split_last().ok_or(EditError::RootEntry)?;
            match (resolve_mut(root, &parent)?, last) {
                (Value::Object(map), Segment::Key(k)) => {
                    map.shift_remove(k);
                }
                (Value::Array(values), Segment::Index(i)) => {
                    values.remove(*i);
                }
                _ => unreachable!("checked before writing"),
            }
        }
        EditOp::RenameKey {
            parent,
            old_key,
            new_key,
        } => {
            let Value::Object(map) = resolve_mut(root, parent)? else {
                unreachable!("checked before writing");
            };
            if old_key != new_key
                && let Some(index) = map.get_index_of(old_key)
            {
                // Same slot, new key: swap the entry out and put it back at its old index.
                let (_, value) = map
                    .shift_remove_index(index)
                    .ok_or_else(|| EditError::PathNotFound {
                        path: parent.child(old_key.as_str()),
                    })?;
                map.shift_insert(index, new_key.clone(), value);
            }
        }
    }
    Ok(())
}

pub(crate) fn mismatch(path: &Path, expected: &'static str, found: &Value) -> EditError {
    EditError::TypeMismatch {
        path: path.clone(),
        expected,
        found: NodeKind::of(found).name(),
    }
}

#[cfg(test)]
mod tests {
    use super::{EditOp, apply};
    use crate::error::EditError;
    use crate::node::resolve;
    use crate::{Path, Value};

    fn v(text: &str) -> Value {
        Value::parse_json5(text).unwrap()
    }

    #[test]
    fn set_value_replaces_leaf_only() {
        let root = v("{ a: 1, b: { c: true } }");
        let next = apply(
            &root,
            &EditOp::SetValue {
                path: path!["b", "c"],
                value: Value::from("x"),
            },
        )
        .unwrap();
        assert_eq!(resolve(&next, &path!["b", "c"]).unwrap(), &Value::from("x"));
        assert_eq!(resolve(&next, &path!["a"]).unwrap(), &Value::from(1_i64));
        // Caller's root is untouched.
        assert_eq!(root, v("{ a: 1, b: { c: true } }"));
    }

    #[test]
    fn set_value_on_container_is_type_mismatch() {
        let root = v("{ b: [1] }");
        let err = apply(
            &root,
            &EditOp::SetValue {
                path: path!["b"],
                value: Value::Null,
            },
        )
        .unwrap_err();
        assert!(matches!(err, EditError::TypeMismatch { found: "array", .. }));

        let err = apply(
            &root,
            &EditOp::SetValue {
                path: path!["b", 0usize],
                value: v("{}"),
            },
        )
        .unwrap_err();
        assert!(matches!(
            err,
            EditError::TypeMismatch { found: "object", .. }
        ));
    }

    #[test]
    fn add_entry_appends_to_objects_and_arrays() {
        let root = v("{ a: 1, b: [2, 3] }");
        let next = apply(
            &root,
            &EditOp::AddEntry {
                parent: path!["b"],
                key: None,
                value: Value::from(4_i64),
            },
        )
        .unwrap();
        assert_eq!(next, v("{ a: 1, b: [2, 3, 4] }"));

        let next = apply(
            &next,
            &EditOp::AddEntry {
                parent: Path::root(),
                key: Some("z".to_string()),
                value: Value::from(""),
            },
        )
        .unwrap();
        let keys: Vec<&String> = next.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["a", "b", "z"]);
    }

    #[test]
    fn add_entry_key_rules() {
        let root = v("{ a: 1, b: [] }");
        let dup = EditOp::AddEntry {
            parent: Path::root(),
            key: Some("a".to_string()),
            value: Value::Null,
        };
        assert_eq!(
            apply(&root, &dup),
            Err(EditError::DuplicateKey {
                path: Path::root(),
                key: "a".to_string()
            })
        );
        let missing = EditOp::AddEntry {
            parent: Path::root(),
            key: None,
            value: Value::Null,
        };
        assert_eq!(
            apply(&root, &missing),
            Err(EditError::MissingKey { path: Path::root() })
        );
        let unexpected = EditOp::AddEntry {
            parent: path!["b"],
            key: Some("k".to_string()),
            value: Value::Null,
        };
        assert_eq!(
            apply(&root, &unexpected),
            Err(EditError::UnexpectedKey { path: path!["b"] })
        );
        let into_leaf = EditOp::AddEntry {
            parent: path!["a"],
            key: Some("k".to_string()),
            value: Value::Null,
        };
        assert!(matches!(
            apply(&root, &into_leaf),
            Err(EditError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn remove_entry_keeps_container() {
        let root = v("{ a: { only: 1 }, b: [1, 2, 3] }");
        let next = apply(
            &root,
            &EditOp::RemoveEntry {
                path: path!["a", "only"],
            },
        )
        .unwrap();
        assert_eq!(next, v("{ a: {}, b: [1, 2, 3] }"));

        let next = apply(
            &next,
            &EditOp::RemoveEntry {
                path: path!["b", 1usize],
            },
        )
        .unwrap();
        assert_eq!(next, v("{ a: {}, b: [1, 3] }"));
    }

    #[test]
    fn remove_entry_rejects_missing_and_root() {
        let root = v("{ a: 1 }");
        assert_eq!(
            apply(&root, &EditOp::RemoveEntry { path: path!["x"] }),
            Err(EditError::PathNotFound { path: path!["x"] })
        );
        assert_eq!(
            apply(&root, &EditOp::RemoveEntry { path: Path::root() }),
            Err(EditError::RootEntry)
        );
    }

    #[test]
    fn rename_key_preserves_position() {
        let root = v("{ a: 1, b: 2, c: 3 }");
        let next = apply(
            &root,
            &EditOp::RenameKey {
                parent: Path::root(),
                old_key: "b".to_string(),
                new_key: "B".to_string(),
            },
        )
        .unwrap();
        let entries: Vec<(&String, &Value)> = next.as_object().unwrap().iter().collect();
        assert_eq!(entries[1], (&"B".to_string(), &Value::from(2_i64)));
        assert_eq!(entries.len(), 3);
    }

    #[test]
    fn rename_key_rejects_collisions_but_allows_self() {
        let root = v("{ a: 1, b: 2 }");
        let clash = EditOp::RenameKey {
            parent: Path::root(),
            old_key: "a".to_string(),
            new_key: "b".to_string(),
        };
        assert!(matches!(
            apply(&root, &clash),
            Err(EditError::DuplicateKey { .. })
        ));
        let same = EditOp::RenameKey {
            parent: Path::root(),
            old_key: "a".to_string(),
            new_key: "a".to_string(),
        };
        assert_eq!(apply(&root, &same).unwrap(), root);
        let gone = EditOp::RenameKey {
            parent: Path::root(),
            old_key: "zz".to_string(),
            new_key: "y".to_string(),
        };
        assert_eq!(
            apply(&root, &gone),
            Err(EditError::PathNotFound { path: path!["zz"] })
        );
    }

    #[test]
    fn worked_example_sequence() {
        let mut root = v(r#"{ "a": 1, "b": [2, 3] }"#);
        for op in [
            EditOp::AddEntry {
                parent: path!["b"],
                key: None,
                value: Value::from(4_i64),
            },
            EditOp::RemoveEntry { path: path!["a"] },
            EditOp::RenameKey {
                parent: Path::root(),
                old_key: "b".to_string(),
                new_key: "c".to_string(),
            },
        ] {
            root = apply(&root, &op).unwrap();
        }
        assert_eq!(root, v(r#"{ "c": [2, 3, 4] }"#));
    }
}
