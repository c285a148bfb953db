//! Inclusive path ranges

/// An inclusive `[lower, upper]` range over nibble paths
///
/// An empty `lower` is the start of the keyspace and `upper == None` is the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathRange {
    /// First path in range
    pub lower: Vec<u8>,
    /// Last path in range, `None` for unbounded
    pub upper: Option<Vec<u8>>,
}

impl PathRange {
    /// Create a new range
    ///
    /// An empty upper path is treated as unbounded, matching how the recovery
    /// file stores a missing bound.
    pub fn new(lower: impl Into<Vec<u8>>, upper: Option<Vec<u8>>) -> Self {
        Self {
            lower: lower.into(),
            upper: upper.filter(|u| !u.is_empty()),
        }
    }

    /// Range covering the whole keyspace
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Range from `lower` to the end of the keyspace
    pub fn from_lower(lower: impl Into<Vec<u8>>) -> Self {
        Self::new(lower, None)
    }

    /// Upper bound as a slice
    pub fn upper(&self) -> Option<&[u8]> {
        self.upper.as_deref()
    }

    /// Whether `path` lies past the upper bound
    pub fn exceeds_upper(&self, path: &[u8]) -> bool {
        self.upper().is_some_and(|upper| path > upper)
    }

    /// Whether `path` lies within the range
    pub fn contains(&self, path: &[u8]) -> bool {
        path >= self.lower.as_slice() && !self.exceeds_upper(path)
    }

    /// Whether the range is empty because `lower > upper`
    pub fn is_inverted(&self) -> bool {
        self.exceeds_upper(&self.lower)
    }
}
