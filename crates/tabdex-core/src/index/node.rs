//! Module: index::node
//! Responsibility: the nested search structure and its merge algebra.
//! Does not own: key-plan validation or freezing (see index::builder).

use crate::{
    error::InternalError,
    index::range::RangeKey,
    value::Value,
};
use std::collections::{BTreeMap, BTreeSet, btree_map::Entry};

///
/// SearchNode
///
/// One node of the composite lookup tree. Terminals hold results; interior
/// nodes dispatch one key level to a child. Every variant answers the same
/// read surface, so generated lookup code chains
/// `root.get(k1).get(k2).unique()` without null checks: a missed lookup
/// returns the shared [`SearchNode::EMPTY`] terminal, which absorbs every
/// further `get`.
///
/// Cloning a node deep-copies its entire subtree; the build path relies on
/// this when it needs an isolated branch.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SearchNode<R> {
    /// Absorbing null-object terminal; holds nothing.
    Empty,
    /// Terminal holding exactly one result; merging into it always fails.
    Unique(R),
    /// Terminal holding any number of results; merge is set union.
    Many(BTreeSet<R>),
    /// Interior level dispatching on exact key equality.
    Exact(BTreeMap<Value, SearchNode<R>>),
    /// Interior level dispatching a scalar to the containing range.
    Range(BTreeMap<RangeKey, SearchNode<R>>),
}

///
/// UniqueProbe
///
/// Reachable-result census that stops counting at two.
///

enum UniqueProbe<'a, R> {
    Zero,
    One(&'a R),
    Ambiguous,
}

impl<R: Clone + Ord + 'static> SearchNode<R> {
    /// Shared terminal handed out for every missed lookup.
    pub const EMPTY: &'static Self = &Self::Empty;

    /// Descend one key level. Never fails: interior nodes return the child
    /// for `key` or [`SearchNode::EMPTY`], terminals return themselves.
    ///
    /// A range level locates the nearest stored range at or below the key
    /// and confirms containment. Ranges are disjoint by builder contract;
    /// for overlapping ranges some containing range may be missed and the
    /// result is unspecified beyond "a stored range or empty".
    #[must_use]
    pub fn get(&self, key: &Value) -> &Self {
        match self {
            Self::Exact(children) => children.get(key).unwrap_or(Self::EMPTY),
            Self::Range(children) => {
                match children.range(..=RangeKey::probe(key)).next_back() {
                    Some((range, child)) if range.contains(key) => child,
                    _ => Self::EMPTY,
                }
            }
            Self::Empty | Self::Unique(_) | Self::Many(_) => self,
        }
    }

    /// Every result reachable from this node, as an ordered set.
    ///
    /// Cost is linear in subtree size; this is an introspection and
    /// testing surface, not a hot-path lookup.
    #[must_use]
    pub fn results(&self) -> BTreeSet<R> {
        let mut out = BTreeSet::new();
        self.collect_results(&mut out);
        out
    }

    /// The exactly-one reachable result.
    ///
    /// Fails with a not-found error for zero results and an invariant
    /// violation for more than one. Short-circuits at the second
    /// reachable result instead of materializing the subtree.
    pub fn unique(&self) -> Result<R, InternalError> {
        match self.probe_unique() {
            UniqueProbe::One(result) => Ok(result.clone()),
            UniqueProbe::Zero => Err(InternalError::index_no_result()),
            UniqueProbe::Ambiguous => Err(InternalError::index_ambiguous_result()),
        }
    }

    /// Like [`SearchNode::unique`], but zero results yield `default`.
    /// More than one result is still an invariant violation; a unique
    /// terminal returns its value even when a default is supplied.
    pub fn unique_or(&self, default: R) -> Result<R, InternalError> {
        match self.probe_unique() {
            UniqueProbe::One(result) => Ok(result.clone()),
            UniqueProbe::Zero => Ok(default),
            UniqueProbe::Ambiguous => Err(InternalError::index_ambiguous_result()),
        }
    }

    /// Number of results reachable from this node. Linear in subtree size.
    #[must_use]
    pub fn result_count(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Unique(_) => 1,
            Self::Many(results) => results.len(),
            Self::Exact(children) => children.values().map(Self::result_count).sum(),
            Self::Range(children) => children.values().map(Self::result_count).sum(),
        }
    }

    /// Stable node-kind label for diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Unique(_) => "unique",
            Self::Many(_) => "many",
            Self::Exact(_) => "exact",
            Self::Range(_) => "range",
        }
    }

    /// Insert a child under a discrete key, merging on collision.
    pub(crate) fn put(&mut self, key: Value, child: Self) -> Result<(), InternalError> {
        let kind = self.kind();
        let Self::Exact(children) = self else {
            return Err(InternalError::index_unsupported(format!(
                "put with a discrete key on a {kind} node"
            )));
        };

        match children.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(child);
                Ok(())
            }
            Entry::Occupied(slot) => slot.into_mut().merge(child),
        }
    }

    /// Insert a child under a range key, merging on collision.
    ///
    /// Collision is range-key equality, which is lower-bound-only: a new
    /// range starting at an existing entry's lower bound merges into that
    /// entry regardless of its upper bound.
    pub(crate) fn put_range(&mut self, key: RangeKey, child: Self) -> Result<(), InternalError> {
        let kind = self.kind();
        let Self::Range(children) = self else {
            return Err(InternalError::index_unsupported(format!(
                "put with a range key on a {kind} node"
            )));
        };

        match children.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(child);
                Ok(())
            }
            Entry::Occupied(slot) => slot.into_mut().merge(child),
        }
    }

    /// Fold another node of the same shape into this one, preserving all
    /// reachable results. Merging into a unique terminal always fails;
    /// that failure is how duplicate rows under a unique key plan surface
    /// at build time instead of silently overwriting.
    pub(crate) fn merge(&mut self, other: Self) -> Result<(), InternalError> {
        if matches!(self, Self::Unique(_)) {
            return Err(InternalError::unique_merge_conflict());
        }
        if matches!(other, Self::Empty) {
            return Ok(());
        }
        if matches!(self, Self::Empty) {
            *self = other;
            return Ok(());
        }

        match (self, other) {
            (Self::Many(results), Self::Many(incoming)) => {
                results.extend(incoming);
                Ok(())
            }
            (Self::Exact(children), Self::Exact(incoming)) => {
                for (key, child) in incoming {
                    match children.entry(key) {
                        Entry::Vacant(slot) => {
                            slot.insert(child);
                        }
                        Entry::Occupied(slot) => slot.into_mut().merge(child)?,
                    }
                }
                Ok(())
            }
            (Self::Range(children), Self::Range(incoming)) => {
                for (key, child) in incoming {
                    match children.entry(key) {
                        Entry::Vacant(slot) => {
                            slot.insert(child);
                        }
                        Entry::Occupied(slot) => slot.into_mut().merge(child)?,
                    }
                }
                Ok(())
            }
            (left, right) => Err(InternalError::index_invariant(format!(
                "merge kind mismatch: {} vs {}",
                left.kind(),
                right.kind()
            ))),
        }
    }

    fn collect_results(&self, out: &mut BTreeSet<R>) {
        match self {
            Self::Empty => {}
            Self::Unique(result) => {
                out.insert(result.clone());
            }
            Self::Many(results) => out.extend(results.iter().cloned()),
            Self::Exact(children) => {
                for child in children.values() {
                    child.collect_results(out);
                }
            }
            Self::Range(children) => {
                for child in children.values() {
                    child.collect_results(out);
                }
            }
        }
    }

    fn probe_unique(&self) -> UniqueProbe<'_, R> {
        match self {
            Self::Empty => UniqueProbe::Zero,
            Self::Unique(result) => UniqueProbe::One(result),
            Self::Many(results) => match results.len() {
                0 => UniqueProbe::Zero,
                1 => results.first().map_or(UniqueProbe::Zero, UniqueProbe::One),
                _ => UniqueProbe::Ambiguous,
            },
            Self::Exact(children) => Self::probe_children(children.values()),
            Self::Range(children) => Self::probe_children(children.values()),
        }
    }

    fn probe_children<'a>(children: impl Iterator<Item = &'a Self>) -> UniqueProbe<'a, R>
    where
        R: 'a,
    {
        let mut seen = None;
        for child in children {
            match child.probe_unique() {
                UniqueProbe::Zero => {}
                UniqueProbe::One(result) => {
                    if seen.is_some() {
                        return UniqueProbe::Ambiguous;
                    }
                    seen = Some(result);
                }
                UniqueProbe::Ambiguous => return UniqueProbe::Ambiguous,
            }
        }

        seen.map_or(UniqueProbe::Zero, UniqueProbe::One)
    }
}

///
/// TESTS
///
