//! Module: index::builder
//! Responsibility: fold table rows into a search tree per the key plan,
//! then freeze it. Owns the only mutation surface of the tree.
//! Does not own: node merge semantics (see index::node).

use crate::{
    MAX_INDEX_LEVELS,
    error::{ErrorClass, InternalError},
    index::{frozen::TableIndex, node::SearchNode, range::RangeKey},
    model::{Cardinality, IndexPlan, LevelKind, RowKey},
    obs::{MetricsEvent, sink},
    value::Value,
};
use std::collections::{BTreeMap, BTreeSet};

///
/// LevelKey
///
/// A row's key material for one level, resolved against the plan.
///

enum LevelKey {
    Exact(Value),
    Range(RangeKey),
}

///
/// TableIndexBuilder
///
/// Mutable build phase of a table index. Rows are folded in one at a
/// time; `build` freezes the tree into a read-only [`TableIndex`].
///
/// A row insert either fully applies or leaves the tree unchanged: each
/// row contributes a single path, so the recursive merge can only fail at
/// the path's terminal, before any structural change.
///

#[derive(Debug)]
pub struct TableIndexBuilder<R> {
    plan: IndexPlan,
    root: SearchNode<R>,
    rows: u64,
}

impl<R: Clone + Ord + 'static> TableIndexBuilder<R> {
    /// Start an empty build for the given key plan.
    pub fn new(plan: IndexPlan) -> Result<Self, InternalError> {
        if plan.depth() > MAX_INDEX_LEVELS {
            return Err(InternalError::plan_unsupported(format!(
                "plan depth {} exceeds the {MAX_INDEX_LEVELS}-level limit",
                plan.depth()
            )));
        }

        let root = plan
            .levels
            .first()
            .map_or(SearchNode::Empty, Self::interior_for);

        Ok(Self {
            plan,
            root,
            rows: 0,
        })
    }

    #[must_use]
    pub const fn plan(&self) -> &IndexPlan {
        &self.plan
    }

    /// Rows folded in so far.
    #[must_use]
    pub const fn rows(&self) -> u64 {
        self.rows
    }

    /// Fold one row into the tree.
    ///
    /// `keys` supplies one entry per plan level, in level order. A second
    /// row landing on an already-present full key path merges into it;
    /// under a unique plan that collision aborts the build with a
    /// conflict naming the colliding path.
    pub fn insert_row(&mut self, keys: &[RowKey], result: R) -> Result<(), InternalError> {
        if keys.len() != self.plan.depth() {
            return Err(InternalError::builder_unsupported(format!(
                "row key arity {} does not match plan depth {} for {}",
                keys.len(),
                self.plan.depth(),
                self.plan
            )));
        }

        let resolved = self.resolve_keys(keys)?;
        let folds_existing_path = self.path_exists(&resolved);

        let mut node = self.leaf(result);
        for key in resolved.into_iter().rev() {
            let mut parent = match &key {
                LevelKey::Exact(_) => SearchNode::Exact(BTreeMap::new()),
                LevelKey::Range(_) => SearchNode::Range(BTreeMap::new()),
            };
            match key {
                LevelKey::Exact(value) => parent.put(value, node)?,
                LevelKey::Range(range) => parent.put_range(range, node)?,
            }
            node = parent;
        }

        if let Err(err) = self.root.merge(node) {
            if err.class == ErrorClass::Conflict {
                sink::record(MetricsEvent::UniqueViolation {
                    table: self.plan.name,
                });
                return Err(InternalError::duplicate_unique_key(&self.path_label(keys)));
            }
            return Err(err);
        }

        self.rows = self.rows.saturating_add(1);
        sink::record(MetricsEvent::RowIndexed {
            table: self.plan.name,
        });
        if folds_existing_path {
            sink::record(MetricsEvent::MergeFold {
                table: self.plan.name,
            });
        }

        Ok(())
    }

    /// Optional diagnostic: verify that no range level holds overlapping
    /// ranges.
    ///
    /// Disjointness is the table loader's contract and is NOT checked on
    /// insert; lookups over overlapping ranges resolve to whichever
    /// stored range the floor search lands on. Table authoring tools can
    /// call this explicitly; neither `insert_row` nor `build` does.
    pub fn check_disjoint_ranges(&self) -> Result<(), InternalError> {
        Self::check_node_disjoint(&self.root, self.plan.name)
    }

    /// Freeze the tree. The returned index exposes only the read surface.
    #[must_use]
    pub fn build(self) -> TableIndex<R> {
        sink::record(MetricsEvent::BuildFinished {
            table: self.plan.name,
            rows: self.rows,
        });

        TableIndex::new(self.plan, self.root, self.rows)
    }

    fn interior_for(level: &LevelKind) -> SearchNode<R> {
        match level {
            LevelKind::Exact => SearchNode::Exact(BTreeMap::new()),
            LevelKind::Range { .. } => SearchNode::Range(BTreeMap::new()),
        }
    }

    fn leaf(&self, result: R) -> SearchNode<R> {
        match self.plan.cardinality {
            Cardinality::Unique => SearchNode::Unique(result),
            Cardinality::Multi => SearchNode::Many(BTreeSet::from([result])),
        }
    }

    /// Resolve row keys against the plan, rejecting kind mismatches and
    /// inverted ranges before anything touches the tree.
    fn resolve_keys(&self, keys: &[RowKey]) -> Result<Vec<LevelKey>, InternalError> {
        let mut resolved = Vec::with_capacity(keys.len());

        for (position, (level, key)) in self.plan.levels.iter().zip(keys).enumerate() {
            let resolved_key = match (level, key) {
                (LevelKind::Exact, RowKey::Exact(value)) => LevelKey::Exact(value.clone()),
                (
                    LevelKind::Range {
                        lower_inclusive,
                        upper_inclusive,
                    },
                    RowKey::Span { lower, upper },
                ) => {
                    let range = RangeKey::with_inclusivity(
                        lower.clone(),
                        upper.clone(),
                        *lower_inclusive,
                        *upper_inclusive,
                    );
                    if range.is_inverted() {
                        return Err(InternalError::builder_invariant(format!(
                            "range lower bound exceeds upper bound at level {position} of {}: {range}",
                            self.plan
                        )));
                    }
                    LevelKey::Range(range)
                }
                (level, key) => {
                    return Err(InternalError::builder_unsupported(format!(
                        "level {position} of {} is {level} but the row supplied a {} key",
                        self.plan,
                        key.kind()
                    )));
                }
            };
            resolved.push(resolved_key);
        }

        Ok(resolved)
    }

    /// Whether the full key path is already present, under the same
    /// collision rule `put` uses (range identity is lower-bound-only).
    fn path_exists(&self, keys: &[LevelKey]) -> bool {
        let mut node = &self.root;
        for key in keys {
            let child = match (node, key) {
                (SearchNode::Exact(children), LevelKey::Exact(value)) => children.get(value),
                (SearchNode::Range(children), LevelKey::Range(range)) => children.get(range),
                _ => None,
            };
            match child {
                Some(child) => node = child,
                None => return false,
            }
        }

        !matches!(node, SearchNode::Empty)
    }

    fn path_label(&self, keys: &[RowKey]) -> String {
        let rendered = self
            .plan
            .levels
            .iter()
            .zip(keys)
            .map(|(level, key)| key.display_for(*level))
            .collect::<Vec<_>>()
            .join(", ");

        format!("{}({rendered})", self.plan.name)
    }

    fn check_node_disjoint(node: &SearchNode<R>, table: &str) -> Result<(), InternalError> {
        match node {
            SearchNode::Range(children) => {
                let ranges: Vec<&RangeKey> = children.keys().collect();
                for pair in ranges.windows(2) {
                    if pair[0].is_overlapping(pair[1]) {
                        return Err(InternalError::index_invariant(format!(
                            "overlapping ranges {} and {} in {table}",
                            pair[0], pair[1]
                        )));
                    }
                }
                for child in children.values() {
                    Self::check_node_disjoint(child, table)?;
                }
                Ok(())
            }
            SearchNode::Exact(children) => {
                for child in children.values() {
                    Self::check_node_disjoint(child, table)?;
                }
                Ok(())
            }
            SearchNode::Empty | SearchNode::Unique(_) | SearchNode::Many(_) => Ok(()),
        }
    }
}
