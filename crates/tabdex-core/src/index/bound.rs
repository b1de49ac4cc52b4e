//! Module: index::bound
//! Responsibility: interval edges with a single total order.
//! Does not own: range identity or containment policy (see index::range).

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// Cut
///
/// Which side of its value a finite bound sits on.
///
/// This is the asymmetric inclusivity encoding: an inclusive lower bound
/// and an exclusive upper bound both cut just below the value, while an
/// inclusive upper bound and an exclusive lower bound both cut just above
/// it. One lexicographic order over `(value, cut)` then serves lower
/// bounds, upper bounds, and scalar probes alike, and makes a closed edge
/// touch an adjacent closed edge while an open edge does not.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Cut {
    Below,
    Above,
}

///
/// Bound
///
/// One edge of an interval: a finite value with a [`Cut`], or an infinity.
/// Variant order is load-bearing: the derived ordering places `NegInf`
/// below every finite bound and `PosInf` above, and compares finite bounds
/// by `(value, cut)`.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Bound {
    NegInf,
    At { value: Value, cut: Cut },
    PosInf,
}

impl Bound {
    /// Lower-edge constructor: `[v` cuts below the value, `(v` cuts above.
    #[must_use]
    pub fn lower(value: impl Into<Value>, inclusive: bool) -> Self {
        Self::At {
            value: value.into(),
            cut: if inclusive { Cut::Below } else { Cut::Above },
        }
    }

    /// Upper-edge constructor: `v]` cuts above the value, `v)` cuts below.
    #[must_use]
    pub fn upper(value: impl Into<Value>, inclusive: bool) -> Self {
        Self::At {
            value: value.into(),
            cut: if inclusive { Cut::Above } else { Cut::Below },
        }
    }

    /// Edge of the degenerate probe interval for a scalar lookup value.
    ///
    /// A stored range contains `v` exactly when
    /// `lower <= probe(v) < upper`.
    #[must_use]
    pub(crate) fn probe(value: &Value) -> Self {
        Self::At {
            value: value.clone(),
            cut: Cut::Below,
        }
    }

    #[must_use]
    pub const fn is_finite(&self) -> bool {
        matches!(self, Self::At { .. })
    }

    #[must_use]
    pub const fn value(&self) -> Option<&Value> {
        match self {
            Self::At { value, .. } => Some(value),
            Self::NegInf | Self::PosInf => None,
        }
    }

    /// Compare this bound against the probe cut of a scalar value without
    /// cloning the value.
    #[must_use]
    pub(crate) fn cmp_probe(&self, value: &Value) -> std::cmp::Ordering {
        match self {
            Self::NegInf => std::cmp::Ordering::Less,
            Self::PosInf => std::cmp::Ordering::Greater,
            Self::At { value: at, cut } => at.cmp(value).then(match cut {
                Cut::Below => std::cmp::Ordering::Equal,
                Cut::Above => std::cmp::Ordering::Greater,
            }),
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegInf => write!(f, "-inf"),
            Self::PosInf => write!(f, "+inf"),
            Self::At { value, cut } => match cut {
                Cut::Below => write!(f, "{value}^-"),
                Cut::Above => write!(f, "{value}^+"),
            },
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;

    #[test]
    fn infinities_are_extremes() {
        let finite = Bound::lower(5i64, true);
        assert!(Bound::NegInf < finite);
        assert!(finite < Bound::PosInf);
        assert!(Bound::NegInf < Bound::PosInf);
        assert_eq!(Bound::NegInf, Bound::NegInf);
        assert_eq!(Bound::PosInf, Bound::PosInf);
    }

    #[test]
    fn equal_value_orders_by_cut() {
        // [5 sorts below 5] at the same value, so a closed lower edge
        // touches a closed upper edge.
        let inclusive_lower = Bound::lower(5i64, true);
        let inclusive_upper = Bound::upper(5i64, true);
        assert!(inclusive_lower < inclusive_upper);
    }

    #[test]
    fn exclusive_edges_swap_sides() {
        // (5 sits above 5), so an open lower edge clears an open upper one.
        let exclusive_lower = Bound::lower(5i64, false);
        let exclusive_upper = Bound::upper(5i64, false);
        assert!(exclusive_upper < exclusive_lower);
        // An exclusive upper edge coincides with an inclusive lower edge.
        assert_eq!(exclusive_upper, Bound::lower(5i64, true));
    }

    #[test]
    fn different_values_order_numerically() {
        assert!(Bound::lower(3i64, false) < Bound::lower(4i64, true));
        assert!(Bound::upper(10i64, true) < Bound::lower(11i64, true));
    }

    #[test]
    fn probe_comparison_matches_containment_rule() {
        let inclusive_upper = Bound::upper(5i64, true);
        let exclusive_upper = Bound::upper(5i64, false);
        let probe = Value::Int(5);

        // v] > probe(v): 5 is inside; v) == probe(v): 5 is outside.
        assert_eq!(inclusive_upper.cmp_probe(&probe), Ordering::Greater);
        assert_eq!(exclusive_upper.cmp_probe(&probe), Ordering::Equal);
    }
}
