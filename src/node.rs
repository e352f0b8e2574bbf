//! Read-only tree view over a [`Value`].
//!
//! A [`Node`] pairs a borrowed value with the path that reaches it. Children are
//! produced on demand by [`Node::children`], so building the root of a large
//! document costs nothing until the render adapter walks into it.

use crate::error::EditError;
use crate::{Path, Segment, Value, statics};

/// Kind of a node, always derived from the variant of its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl NodeKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => NodeKind::Null,
            Value::Bool(_) => NodeKind::Bool,
            Value::Number(_) => NodeKind::Number,
            Value::String(_) => NodeKind::String,
            Value::Array(_) => NodeKind::Array,
            Value::Object(_) => NodeKind::Object,
        }
    }

    pub fn is_container(self) -> bool {
        matches!(self, NodeKind::Array | NodeKind::Object)
    }

    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Null => statics::EN_TYPE_NULL,
            NodeKind::Bool => statics::EN_TYPE_BOOL,
            NodeKind::Number => statics::EN_TYPE_NUMBER,
            NodeKind::String => statics::EN_TYPE_STRING,
            NodeKind::Array => statics::EN_TYPE_ARRAY,
            NodeKind::Object => statics::EN_TYPE_OBJECT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node<'a> {
    path: Path,
    value: &'a Value,
}

/// Wraps `value` as the root node (empty path).
pub fn build_tree(value: &Value) -> Node<'_> {
    Node {
        path: Path::root(),
        value,
    }
}

impl<'a> Node<'a> {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> NodeKind {
        NodeKind::of(self.value)
    }

    pub fn is_container(&self) -> bool {
        self.value.is_container()
    }

    /// The leaf value, or `None` for arrays and objects.
    pub fn value(&self) -> Option<&'a Value> {
        (!self.value.is_container()).then_some(self.value)
    }

    /// The whole subtree, leaf or container.
    pub fn raw(&self) -> &'a Value {
        self.value
    }

    /// Last path segment; `None` for the root.
    pub fn segment(&self) -> Option<&Segment> {
        self.path.last()
    }

    /// True for entries of an object, the only nodes whose key can be renamed.
    pub fn is_object_entry(&self) -> bool {
        matches!(self.segment(), Some(Segment::Key(_)))
    }

    pub fn len(&self) -> usize {
        match self.value {
            Value::Array(values) => values.len(),
            Value::Object(map) => map.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn children(&self) -> Children<'a> {
        let inner = match self.value {
            Value::Array(values) => ChildIter::Array(values.iter().enumerate()),
            Value::Object(map) => ChildIter::Object(map.iter()),
            _ => ChildIter::Leaf,
        };
        Children {
            parent: self.path.clone(),
            inner,
        }
    }

    pub fn child(&self, segment: &Segment) -> Option<Node<'a>> {
        let value = child_of(self.value, segment)?;
        Some(Node {
            path: self.path.child(segment.clone()),
            value,
        })
    }

    /// Short preview: `{n}` for objects, `[n]` for arrays, the compact literal for leaves.
    pub fn summary(&self) -> String {
        match self.value {
            Value::Array(values) => format!("[{}]", values.len()),
            Value::Object(map) => format!("{{{}}}", map.len()),
            leaf => leaf.to_json5_compact(),
        }
    }
}

/// Lazily materialized children of a node, in index or insertion order.
pub struct Children<'a> {
    parent: Path,
    inner: ChildIter<'a>,
}

enum ChildIter<'a> {
    Array(std::iter::Enumerate<std::slice::Iter<'a, Value>>),
    Object(indexmap::map::Iter<'a, String, Value>),
    Leaf,
}

impl<'a> Iterator for Children<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (segment, value) = match &mut self.inner {
            ChildIter::Array(it) => {
                let (i, v) = it.next()?;
                (Segment::Index(i), v)
            }
            ChildIter::Object(it) => {
                let (k, v) = it.next()?;
                (Segment::Key(k.clone()), v)
            }
            ChildIter::Leaf => return None,
        };
        Some(Node {
            path: self.parent.child(segment),
            value,
        })
    }
}

fn child_of<'a>(value: &'a Value, segment: &Segment) -> Option<&'a Value> {
    match (value, segment) {
        (Value::Array(values), Segment::Index(i)) => values.get(*i),
        (Value::Object(map), Segment::Key(k)) => map.get(k),
        _ => None,
    }
}

fn child_of_mut<'a>(value: &'a mut Value, segment: &Segment) -> Option<&'a mut Value> {
    match (value, segment) {
        (Value::Array(values), Segment::Index(i)) => values.get_mut(*i),
        (Value::Object(map), Segment::Key(k)) => map.get_mut(k),
        _ => None,
    }
}

/// Returns the sub-value at `path`.
///
/// Every segment must match the shape it is applied to: an index only addresses
/// an array element, a key only addresses an object entry.
pub fn resolve<'a>(root: &'a Value, path: &Path) -> Result<&'a Value, EditError> {
    path.segments()
        .iter()
        .try_fold(root, |current, segment| child_of(current, segment))
        .ok_or_else(|| EditError::PathNotFound { path: path.clone() })
}

pub(crate) fn resolve_mut<'a>(
    root: &'a mut Value,
    path: &Path,
) -> Result<&'a mut Value, EditError> {
    let mut current = root;
    for segment in path.segments() {
        current = child_of_mut(current, segment)
            .ok_or_else(|| EditError::PathNotFound { path: path.clone() })?;
    }
    Ok(current)
}
