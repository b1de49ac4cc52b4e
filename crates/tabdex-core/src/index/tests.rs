use crate::{
    MAX_INDEX_LEVELS,
    error::ErrorClass,
    index::{RangeKey, SearchNode, TableIndex, TableIndexBuilder},
    model::{Cardinality, IndexPlan, LevelKind, RowKey},
    obs,
    value::Value,
};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn company_age_plan(cardinality: Cardinality) -> IndexPlan {
    IndexPlan::new(
        "premium_rates",
        vec![
            LevelKind::Exact,
            LevelKind::Range {
                lower_inclusive: true,
                upper_inclusive: false,
            },
        ],
        cardinality,
    )
}

fn span(lower: i64, upper: i64) -> RowKey {
    RowKey::Span {
        lower: Some(Value::Int(lower)),
        upper: Some(Value::Int(upper)),
    }
}

fn company(code: &str) -> RowKey {
    RowKey::Exact(Value::from(code))
}

fn build_premium_rates(cardinality: Cardinality) -> TableIndex<u32> {
    let mut builder = TableIndexBuilder::new(company_age_plan(cardinality)).unwrap();
    builder
        .insert_row(&[company("A"), span(0, 18)], 10)
        .unwrap();
    builder
        .insert_row(&[company("A"), span(18, 200)], 20)
        .unwrap();
    builder
        .insert_row(&[company("B"), span(0, 200)], 99)
        .unwrap();
    builder.build()
}

#[test]
fn round_trip_build_and_query() {
    let index = build_premium_rates(Cardinality::Unique);

    assert_eq!(
        index
            .get(&Value::from("A"))
            .get(&Value::Int(10))
            .unique()
            .unwrap(),
        10
    );
    assert_eq!(
        index
            .get(&Value::from("A"))
            .get(&Value::Int(18))
            .unique()
            .unwrap(),
        20
    );
    assert_eq!(
        index
            .get(&Value::from("B"))
            .get(&Value::Int(5))
            .unique()
            .unwrap(),
        99
    );

    let miss = index
        .get(&Value::from("C"))
        .get(&Value::Int(5))
        .unique()
        .unwrap_err();
    assert!(miss.is_not_found());
}

#[test]
fn empty_absorption_over_missing_paths() {
    let builder = TableIndexBuilder::<u32>::new(company_age_plan(Cardinality::Unique)).unwrap();
    let index = builder.build();

    let node = index.get(&Value::from("A")).get(&Value::Int(5));
    assert!(matches!(node, SearchNode::Empty));
    assert!(node.results().is_empty());
    assert!(node.unique().unwrap_err().is_not_found());
    assert_eq!(node.unique_or(42).unwrap(), 42);
    assert!(index.is_empty());
}

#[test]
fn unique_plan_rejects_duplicate_key_paths() {
    let mut builder = TableIndexBuilder::new(company_age_plan(Cardinality::Unique)).unwrap();
    builder
        .insert_row(&[company("A"), span(0, 18)], 10u32)
        .unwrap();

    let err = builder
        .insert_row(&[company("A"), span(0, 18)], 11)
        .unwrap_err();
    assert!(err.is_duplicate_unique_key());
    assert_eq!(err.class, ErrorClass::Conflict);
    assert!(err.message.contains("premium_rates(A, [0, 18))"));

    // The failed insert left the tree unchanged.
    assert_eq!(builder.rows(), 1);
    let index = builder.build();
    assert_eq!(
        index
            .get(&Value::from("A"))
            .get(&Value::Int(5))
            .unique()
            .unwrap(),
        10
    );
}

#[test]
fn duplicate_lower_bound_under_unique_plan_collides() {
    // Range identity is lower-bound-only, so [0, 18) and [0, 99) are the
    // same key path even though their upper bounds differ.
    let mut builder = TableIndexBuilder::new(company_age_plan(Cardinality::Unique)).unwrap();
    builder
        .insert_row(&[company("A"), span(0, 18)], 10u32)
        .unwrap();

    let err = builder
        .insert_row(&[company("A"), span(0, 99)], 11)
        .unwrap_err();
    assert!(err.is_duplicate_unique_key());
}

#[test]
fn multi_plan_unions_duplicate_key_paths() {
    let mut builder = TableIndexBuilder::new(company_age_plan(Cardinality::Multi)).unwrap();
    builder
        .insert_row(&[company("A"), span(0, 18)], 10u32)
        .unwrap();
    builder
        .insert_row(&[company("A"), span(0, 18)], 11)
        .unwrap();
    let index = builder.build();

    let node = index.get(&Value::from("A")).get(&Value::Int(7));
    assert_eq!(node.results(), BTreeSet::from([10, 11]));

    let err = node.unique().unwrap_err();
    assert_eq!(err.class, ErrorClass::InvariantViolation);
    assert!(node.unique_or(0).is_err());
    assert_eq!(index.len(), 2);
}

#[test]
fn row_key_arity_is_checked_against_the_plan() {
    let mut builder = TableIndexBuilder::new(company_age_plan(Cardinality::Unique)).unwrap();
    let err = builder.insert_row(&[company("A")], 1u32).unwrap_err();
    assert_eq!(err.class, ErrorClass::Unsupported);
    assert!(err.message.contains("arity"));
}

#[test]
fn row_key_kind_is_checked_against_the_plan() {
    let mut builder = TableIndexBuilder::new(company_age_plan(Cardinality::Unique)).unwrap();
    let err = builder
        .insert_row(&[company("A"), company("B")], 1u32)
        .unwrap_err();
    assert_eq!(err.class, ErrorClass::Unsupported);
    assert!(err.message.contains("exact"));
}

#[test]
fn inverted_range_is_rejected_before_mutation() {
    let mut builder = TableIndexBuilder::new(company_age_plan(Cardinality::Unique)).unwrap();
    let err = builder
        .insert_row(&[company("A"), span(10, 0)], 1u32)
        .unwrap_err();
    assert_eq!(err.class, ErrorClass::InvariantViolation);
    assert_eq!(builder.rows(), 0);
}

#[test]
fn plan_depth_limit_is_enforced() {
    let levels = vec![LevelKind::Exact; MAX_INDEX_LEVELS + 1];
    let err =
        TableIndexBuilder::<u32>::new(IndexPlan::new("deep", levels, Cardinality::Unique))
            .unwrap_err();
    assert_eq!(err.class, ErrorClass::Unsupported);
}

#[test]
fn unbounded_validity_ranges_resolve() {
    let plan = IndexPlan::new(
        "validity",
        vec![LevelKind::Range {
            lower_inclusive: true,
            upper_inclusive: true,
        }],
        Cardinality::Unique,
    );
    let mut builder = TableIndexBuilder::new(plan).unwrap();
    builder
        .insert_row(
            &[RowKey::Span {
                lower: None,
                upper: Some(Value::Int(9)),
            }],
            1u32,
        )
        .unwrap();
    builder
        .insert_row(
            &[RowKey::Span {
                lower: Some(Value::Int(10)),
                upper: None,
            }],
            2,
        )
        .unwrap();
    let index = builder.build();

    assert_eq!(index.get(&Value::Int(i64::MIN)).unique().unwrap(), 1);
    assert_eq!(index.get(&Value::Int(9)).unique().unwrap(), 1);
    assert_eq!(index.get(&Value::Int(10)).unique().unwrap(), 2);
    assert_eq!(index.get(&Value::Int(i64::MAX)).unique().unwrap(), 2);
}

#[test]
fn disjointness_diagnostic_flags_overlaps_only_when_asked() {
    let plan = IndexPlan::new(
        "overlapping",
        vec![LevelKind::Range {
            lower_inclusive: true,
            upper_inclusive: true,
        }],
        Cardinality::Multi,
    );
    let mut builder = TableIndexBuilder::new(plan).unwrap();

    // Overlapping ranges insert without complaint; lookups stay
    // deterministic-but-unspecified per the loader contract.
    builder.insert_row(&[span(0, 10)], 1u32).unwrap();
    builder.insert_row(&[span(5, 20)], 2).unwrap();

    let err = builder.check_disjoint_ranges().unwrap_err();
    assert_eq!(err.class, ErrorClass::InvariantViolation);
    assert!(err.message.contains("overlapping"));
}

#[test]
fn disjointness_diagnostic_accepts_touching_open_edges() {
    let index_plan = IndexPlan::new(
        "rates",
        vec![LevelKind::Range {
            lower_inclusive: true,
            upper_inclusive: false,
        }],
        Cardinality::Unique,
    );
    let mut builder = TableIndexBuilder::new(index_plan).unwrap();
    builder.insert_row(&[span(0, 10)], 1u32).unwrap();
    builder.insert_row(&[span(10, 20)], 2).unwrap();

    builder.check_disjoint_ranges().unwrap();
}

#[test]
fn frozen_index_clone_is_independent() {
    let index = build_premium_rates(Cardinality::Unique);
    let copy = index.clone();

    assert_eq!(copy.root().results(), index.root().results());
    assert_eq!(copy.to_string(), index.to_string());
}

#[test]
fn build_emits_metrics_through_the_sink() {
    obs::metrics_reset_all();

    let _ = build_premium_rates(Cardinality::Unique);

    let report = obs::metrics_report();
    assert_eq!(report.rows_indexed, 3);
    assert_eq!(report.builds_completed, 1);
    assert_eq!(report.tables["premium_rates"].rows_indexed, 3);

    obs::metrics_reset_all();
}

#[test]
fn merge_folds_are_counted_for_shared_paths() {
    obs::metrics_reset_all();

    let mut builder = TableIndexBuilder::new(company_age_plan(Cardinality::Multi)).unwrap();
    builder
        .insert_row(&[company("A"), span(0, 18)], 1u32)
        .unwrap();
    builder
        .insert_row(&[company("A"), span(0, 18)], 2)
        .unwrap();
    builder
        .insert_row(&[company("B"), span(0, 18)], 3)
        .unwrap();

    let report = obs::metrics_report();
    assert_eq!(report.merge_folds, 1);

    obs::metrics_reset_all();
}

prop_compose! {
    /// Sorted, deduplicated cut points defining a run of adjacent
    /// half-open ranges.
    fn arb_cuts()(raw in prop::collection::btree_set(-1000i64..1000, 2..12)) -> Vec<i64> {
        raw.into_iter().collect()
    }
}

proptest! {
    #[test]
    fn adjacent_half_open_ranges_partition_their_domain(cuts in arb_cuts(), probe in -1100i64..1100) {
        let plan = IndexPlan::new(
            "partition",
            vec![LevelKind::Range { lower_inclusive: true, upper_inclusive: false }],
            Cardinality::Unique,
        );
        let mut builder = TableIndexBuilder::new(plan).unwrap();

        for (payload, pair) in cuts.windows(2).enumerate() {
            builder.insert_row(&[span(pair[0], pair[1])], payload).unwrap();
        }
        builder.check_disjoint_ranges().unwrap();
        let index = builder.build();

        let expected = cuts
            .windows(2)
            .position(|pair| pair[0] <= probe && probe < pair[1]);
        let looked_up = index.get(&Value::Int(probe));

        match expected {
            Some(payload) => prop_assert_eq!(looked_up.unique().unwrap(), payload),
            None => prop_assert!(looked_up.unique().unwrap_err().is_not_found()),
        }
    }

    #[test]
    fn containment_implies_overlap_with_probe_range(
        lower in -100i64..100,
        width in 0i64..50,
        probe in -120i64..120,
    ) {
        let range = RangeKey::new(Some(Value::Int(lower)), Some(Value::Int(lower + width)));
        let degenerate = RangeKey::new(Some(Value::Int(probe)), Some(Value::Int(probe)));

        if range.contains(&Value::Int(probe)) {
            prop_assert!(range.is_overlapping(&degenerate));
            prop_assert!(degenerate.is_overlapping(&range));
        }
    }
}
