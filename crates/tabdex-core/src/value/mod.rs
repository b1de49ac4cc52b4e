mod compare;
mod rank;
mod tag;


use crate::types::{Date, Timestamp};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};

// re-exports
pub use compare::canonical_cmp;
pub use tag::ValueTag;

///
/// Value
///
/// Scalar key value for one index level.
///
/// The set of variants is closed on purpose: every variant participates in
/// the canonical total order, so heterogeneous keys inside one exact-match
/// level stay deterministic instead of panicking or reordering.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Value {
    Bool(bool),
    Date(Date),
    Int(i64),
    Text(String),
    Timestamp(Timestamp),
    Uint(u64),
}

impl Value {
    /// Stable human-readable kind label for diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        self.tag().label()
    }

    #[must_use]
    pub(crate) const fn tag(&self) -> ValueTag {
        tag::canonical_tag(self)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Date(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
            Self::Timestamp(v) => write!(f, "{v}"),
            Self::Uint(v) => write!(f, "{v}"),
        }
    }
}

// The canonical comparator IS the Ord implementation; exact-match and
// range-match levels both rely on it for BTreeMap placement.
impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        canonical_cmp(self, other)
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<Date> for Value {
    fn from(v: Date) -> Self {
        Self::Date(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Timestamp> for Value {
    fn from(v: Timestamp) -> Self {
        Self::Timestamp(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::Uint(v)
    }
}
