//! Module: index::frozen
//! Responsibility: the immutable, reader-facing view of a built index.
//! Does not own: construction (see index::builder).

use crate::{index::node::SearchNode, model::IndexPlan};
use derive_more::Deref;
use std::fmt::{self, Display};

///
/// TableIndex
///
/// A frozen table index. Produced by `TableIndexBuilder::build` and
/// immutable from then on: the only surfaces are the node read API
/// (reachable through `Deref`) and a few diagnostics. Because nothing
/// mutates post-build, the index may be shared across any number of
/// concurrent readers without synchronization.
///

#[derive(Clone, Debug, Deref)]
pub struct TableIndex<R> {
    plan: IndexPlan,
    #[deref]
    root: SearchNode<R>,
    rows: u64,
}

impl<R: Clone + Ord> TableIndex<R> {
    pub(crate) const fn new(plan: IndexPlan, root: SearchNode<R>, rows: u64) -> Self {
        Self { plan, root, rows }
    }

    #[must_use]
    pub const fn plan(&self) -> &IndexPlan {
        &self.plan
    }

    /// Entry point for chained lookups; equivalent to the `Deref` surface.
    #[must_use]
    pub const fn root(&self) -> &SearchNode<R> {
        &self.root
    }

    /// Number of rows folded into the index.
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.rows
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows == 0
    }
}

impl<R> Display for TableIndex<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{} rows]", self.plan, self.rows)
    }
}
