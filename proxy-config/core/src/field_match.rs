use std::fmt;

/// Matches a single filter field.
///
/// `Any` accepts every value, so a filter with all fields set to `Any` matches every entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Match<T> {
    Any,
    Exact(T),
}

// === impl Match ===

impl<T> Match<T> {
    #[inline]
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    pub fn as_exact(&self) -> Option<&T> {
        match self {
            Self::Any => None,
            Self::Exact(value) => Some(value),
        }
    }

    /// Returns true if the field is `Any` or is exactly equal to `value`.
    pub fn matches<U>(&self, value: &U) -> bool
    where
        T: PartialEq<U>,
        U: ?Sized,
    {
        match self {
            Self::Any => true,
            Self::Exact(expected) => expected.eq(value),
        }
    }

    /// Like [`Match::matches`], ignoring ASCII case.
    pub fn matches_ignore_ascii_case(&self, value: &str) -> bool
    where
        T: AsRef<str>,
    {
        match self {
            Self::Any => true,
            Self::Exact(expected) => expected.as_ref().eq_ignore_ascii_case(value),
        }
    }
}

impl<T> Default for Match<T> {
    fn default() -> Self {
        Self::Any
    }
}

impl<T> From<Option<T>> for Match<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            None => Self::Any,
            Some(value) => Self::Exact(value),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Match<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("*"),
            Self::Exact(value) => value.fmt(f),
        }
    }
}
