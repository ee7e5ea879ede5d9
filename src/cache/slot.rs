//! Row slots and cache generations

/// What the cache knows about one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowSlot<T> {
    /// Never requested, or its request failed or went stale
    Absent,
    /// A fetch covering this row is in flight
    Pending,
    /// Data present and current
    Resolved(T),
}

impl<T> RowSlot<T> {
    /// Check if the row has never been requested
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Check if a fetch for the row is in flight
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Check if the row holds data
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    /// The resolved item, if any
    pub fn resolved(self) -> Option<T> {
        match self {
            Self::Resolved(item) => Some(item),
            _ => None,
        }
    }
}

/// Monotonic counter bumped on every cache reset
///
/// Fetches carry the generation they were issued under; outcomes whose
/// generation no longer matches are discarded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    /// The following generation
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// Raw counter value
    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// Row value rendered for indices that hold no data yet
pub trait Placeholder {
    /// The loading placeholder
    fn placeholder() -> Self;
}
