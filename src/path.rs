//! Paths address a position inside a root value as a sequence of keys and indices.
//!
//! Paths format as RFC 6901 JSON Pointers for display and error messages.

use std::fmt;

/// One step from a container to a child.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(k) => f.write_str(k),
            Segment::Index(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for Segment {
    fn from(key: &str) -> Self {
        Segment::Key(key.to_owned())
    }
}

impl From<String> for Segment {
    fn from(key: String) -> Self {
        Segment::Key(key)
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Segment::Index(index)
    }
}

/// Ordered segments from the root. The root path is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path(Vec<Segment>);

impl Path {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    /// Number of segments; the root has depth 0.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn last(&self) -> Option<&Segment> {
        self.0.last()
    }

    pub fn parent(&self) -> Option<Path> {
        let (_, init) = self.0.split_last()?;
        Some(Self(init.to_vec()))
    }

    /// Splits into the parent path and the final segment.
    pub fn split_last(&self) -> Option<(Path, &Segment)> {
        let (last, init) = self.0.split_last()?;
        Some((Self(init.to_vec()), last))
    }

    pub fn child(&self, segment: impl Into<Segment>) -> Path {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    pub fn starts_with(&self, prefix: &Path) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Replaces the `from` prefix with `to`. Returns `None` when `from` is not a prefix.
    pub fn rebase(&self, from: &Path, to: &Path) -> Option<Path> {
        let rest = self.0.strip_prefix(from.0.as_slice())?;
        let mut segments = to.0.clone();
        segments.extend_from_slice(rest);
        Some(Self(segments))
    }

    /// Where this path lands after element `removed` of array `parent` is taken out.
    ///
    /// Paths inside the removed element have nowhere to go and yield `None`; paths
    /// under later siblings move down one index; everything else is unchanged.
    pub fn after_removal(&self, parent: &Path, removed: usize) -> Option<Path> {
        let Some(rest) = self.0.strip_prefix(parent.0.as_slice()) else {
            return Some(self.clone());
        };
        match rest.first() {
            Some(Segment::Index(i)) if *i == removed => None,
            Some(Segment::Index(i)) if *i > removed => {
                let mut segments = self.0.clone();
                segments[parent.depth()] = Segment::Index(i - 1);
                Some(Self(segments))
            }
            _ => Some(self.clone()),
        }
    }

    /// RFC 6901 pointer, e.g. `/a~1b/0`.
    pub fn to_pointer(&self) -> String {
        let mut out = String::new();
        for segment in &self.0 {
            out.push('/');
            match segment {
                Segment::Key(k) => out.push_str(&escape_component(k)),
                Segment::Index(i) => out.push_str(&i.to_string()),
            }
        }
        out
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_pointer())
    }
}

impl From<Vec<Segment>> for Path {
    fn from(segments: Vec<Segment>) -> Self {
        Self(segments)
    }
}

impl FromIterator<Segment> for Path {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn escape_component(component: &str) -> String {
    if !component.contains('/') && !component.contains('~') {
        return component.to_string();
    }
    component.replace('~', "~0").replace('/', "~1")
}

/// Builds a [`Path`] from keys (`&str`) and indices (`usize`).
///
/// ```
/// use treeform::{path, Path};
/// let p: Path = path!["b", 0usize];
/// assert_eq!(p.to_pointer(), "/b/0");
/// ```
#[macro_export]
macro_rules! path {
    () => { $crate::Path::root() };
    ($($seg:expr),+ $(,)?) => {
        $crate::Path::from(vec![$($crate::Segment::from($seg)),+])
    };
}
