//! Module: index::range
//! Responsibility: range-key identity, ordering, overlap, and containment.
//! Does not own: which child a range maps to (see index::node).

use crate::{
    index::bound::{Bound, Cut},
    value::Value,
};
use serde::{Deserialize, Serialize};
use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};

///
/// RangeKey
///
/// Interval key for one range-match index level.
///
/// Identity is the LOWER BOUND ONLY: ordering, equality, and hashing all
/// ignore the upper bound. The index is built by folding rows one at a
/// time, and a later row whose range starts at an already-present lower
/// bound merges into that entry instead of creating a second entry at the
/// same sort position. Callers that need upper-bound comparison use
/// [`RangeKey::cmp_upper_bound`].
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RangeKey {
    lower: Bound,
    upper: Bound,
}

impl RangeKey {
    /// Closed range; `None` on either side means unbounded.
    #[must_use]
    pub fn new(lower: Option<Value>, upper: Option<Value>) -> Self {
        Self::with_inclusivity(lower, upper, true, true)
    }

    /// Range with explicit edge inclusivity. Inclusivity flags are ignored
    /// for unbounded sides; infinity is never "included".
    #[must_use]
    pub fn with_inclusivity(
        lower: Option<Value>,
        upper: Option<Value>,
        lower_inclusive: bool,
        upper_inclusive: bool,
    ) -> Self {
        Self {
            lower: lower.map_or(Bound::NegInf, |v| Bound::lower(v, lower_inclusive)),
            upper: upper.map_or(Bound::PosInf, |v| Bound::upper(v, upper_inclusive)),
        }
    }

    /// Degenerate `[v, v]` used as the ordered-map search key for a scalar
    /// lookup.
    #[must_use]
    pub(crate) fn probe(value: &Value) -> Self {
        Self {
            lower: Bound::probe(value),
            upper: Bound::upper(value.clone(), true),
        }
    }

    #[must_use]
    pub const fn lower_bound(&self) -> &Bound {
        &self.lower
    }

    #[must_use]
    pub const fn upper_bound(&self) -> &Bound {
        &self.upper
    }

    #[must_use]
    pub const fn is_lower_inclusive(&self) -> bool {
        matches!(
            self.lower,
            Bound::At {
                cut: Cut::Below,
                ..
            }
        )
    }

    #[must_use]
    pub const fn is_upper_inclusive(&self) -> bool {
        matches!(
            self.upper,
            Bound::At {
                cut: Cut::Above,
                ..
            }
        )
    }

    /// Secondary comparator over upper bounds, used for overlap detection
    /// and upper-bound-driven diagnostics.
    #[must_use]
    pub fn cmp_upper_bound(&self, other: &Self) -> Ordering {
        self.upper.cmp(&other.upper)
    }

    /// Strict overlap: the edge cuts already encode inclusivity, so
    /// `[3, 5]` and `[5, 8]` overlap while `[3, 5)` and `[5, 8]` do not.
    #[must_use]
    pub fn is_overlapping(&self, other: &Self) -> bool {
        self.lower < other.upper && self.upper > other.lower
    }

    /// Whether the interval contains a scalar value:
    /// `lower <= probe(v) < upper`.
    #[must_use]
    pub fn contains(&self, value: &Value) -> bool {
        self.lower.cmp_probe(value) != Ordering::Greater
            && self.upper.cmp_probe(value) == Ordering::Greater
    }

    /// A range is inverted when its lower edge sits past its upper edge.
    /// The builder rejects these before they reach a node.
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.lower > self.upper
    }
}

// Identity by lower bound only. See the type-level note.
impl PartialEq for RangeKey {
    fn eq(&self, other: &Self) -> bool {
        self.lower == other.lower
    }
}

impl Eq for RangeKey {}

impl Hash for RangeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.lower.hash(state);
    }
}

impl Ord for RangeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.lower.cmp(&other.lower)
    }
}

impl PartialOrd for RangeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for RangeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.lower {
            Bound::NegInf => write!(f, "(-inf")?,
            Bound::PosInf => write!(f, "(+inf")?,
            Bound::At { value, cut } => match cut {
                Cut::Below => write!(f, "[{value}")?,
                Cut::Above => write!(f, "({value}")?,
            },
        }
        write!(f, ", ")?;
        match &self.upper {
            Bound::NegInf => write!(f, "-inf)"),
            Bound::PosInf => write!(f, "+inf)"),
            Bound::At { value, cut } => match cut {
                Cut::Above => write!(f, "{value}]"),
                Cut::Below => write!(f, "{value})"),
            },
        }
    }
}

///
/// TESTS
///
