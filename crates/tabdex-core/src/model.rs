use crate::{index::RangeKey, value::Value};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

///
/// IndexPlan
/// Runtime descriptor for one table index: the ordered key levels and the
/// terminal cardinality. Keeps the core decoupled from whatever schema
/// shape the table loader uses.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct IndexPlan {
    pub name: &'static str,
    pub levels: Vec<LevelKind>,
    pub cardinality: Cardinality,
}

impl IndexPlan {
    #[must_use]
    pub fn new(name: &'static str, levels: Vec<LevelKind>, cardinality: Cardinality) -> Self {
        Self {
            name,
            levels,
            cardinality,
        }
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    #[must_use]
    pub const fn is_unique(&self) -> bool {
        matches!(self.cardinality, Cardinality::Unique)
    }
}

impl Display for IndexPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let levels = self
            .levels
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");

        if self.is_unique() {
            write!(f, "UNIQUE {}({levels})", self.name)
        } else {
            write!(f, "{}({levels})", self.name)
        }
    }
}

///
/// LevelKind
///
/// What one index level dispatches on. Range levels fix their edge
/// inclusivity in the plan; per-row key material only supplies the edge
/// values.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum LevelKind {
    Exact,
    Range {
        lower_inclusive: bool,
        upper_inclusive: bool,
    },
}

impl Display for LevelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => write!(f, "key"),
            Self::Range {
                lower_inclusive,
                upper_inclusive,
            } => {
                let open = if *lower_inclusive { '[' } else { '(' };
                let close = if *upper_inclusive { ']' } else { ')' };
                write!(f, "range{open}{close}")
            }
        }
    }
}

///
/// Cardinality
///
/// Whether a full key path maps to exactly one row or to a row group.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Cardinality {
    Unique,
    Multi,
}

///
/// RowKey
///
/// Per-row key material for one level: a discrete value for an exact
/// level, or the edge values of a span for a range level. `None` edges
/// are unbounded.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum RowKey {
    Exact(Value),
    Span {
        lower: Option<Value>,
        upper: Option<Value>,
    },
}

impl RowKey {
    /// Stable kind label for plan-mismatch diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Exact(_) => "exact",
            Self::Span { .. } => "span",
        }
    }

    /// Render this key the way the owning level sees it, for error paths.
    pub(crate) fn display_for(&self, level: LevelKind) -> String {
        match (self, level) {
            (
                Self::Span { lower, upper },
                LevelKind::Range {
                    lower_inclusive,
                    upper_inclusive,
                },
            ) => RangeKey::with_inclusivity(
                lower.clone(),
                upper.clone(),
                lower_inclusive,
                upper_inclusive,
            )
            .to_string(),
            (Self::Exact(value), _) => value.to_string(),
            (Self::Span { lower, upper }, LevelKind::Exact) => {
                RangeKey::new(lower.clone(), upper.clone()).to_string()
            }
        }
    }
}

impl From<Value> for RowKey {
    fn from(value: Value) -> Self {
        Self::Exact(value)
    }
}

///
/// TESTS
///
