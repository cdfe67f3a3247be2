//! Property-based tests for filter and aggregate invariants.
//!
//! These tests verify key properties that should always hold:
//! - Period counts sum to the row count, decomposed or not
//! - Event rates stay within [0, 1]
//! - Filtering is idempotent and monotone in the criteria
//! - Rows without a default reason survive every reason filter
//! - Period bounds are half-open

use std::collections::BTreeSet;
use std::sync::Arc;

use loanwatch_portfolio::prelude::*;
use proptest::prelude::*;

// =============================================================================
// TEST DATA GENERATORS
// =============================================================================

const PRODUCTS: [&str; 4] = ["Overdraft", "Term loan", "Mortgage", "Credit card"];
const REASONS: [&str; 3] = ["Bankruptcy", "Overdue 90+", "Restructuring"];

/// Generates a table of N rows spread over twelve monthly snapshots.
fn generate_rows(n: usize, seed: u64) -> Vec<SnapshotRow> {
    let mut rows = Vec::with_capacity(n);

    for i in 0..n {
        let hash = simple_hash(seed, i as u64);

        let month = (hash % 12) as u32 + 1;
        let period = ReportPeriod::month_end(2019, month).unwrap();
        let product = PRODUCTS[(hash >> 8) as usize % PRODUCTS.len()];
        let rating = ((hash >> 16) % 10) as i32 + 1;

        let mut row = SnapshotRow::new(period, product, rating)
            .with_contract_id(format!("C{:05}", i))
            .with_forward_default((hash >> 24) % 7 == 0);

        match (hash >> 32) % 10 {
            0 => row = row.defaulted(None),
            1 | 2 => {
                let reason = REASONS[(hash >> 40) as usize % REASONS.len()];
                row = row.defaulted(Some(reason));
            }
            _ => {}
        }

        rows.push(row);
    }

    rows
}

/// Simple deterministic hash for test data generation.
fn simple_hash(seed: u64, i: u64) -> u64 {
    let mut x = seed.wrapping_add(i).wrapping_mul(0x517cc1b727220a95);
    x ^= x >> 32;
    x = x.wrapping_mul(0x517cc1b727220a95);
    x ^= x >> 32;
    x
}

/// Generated tables may miss some products or reasons, so catalog checks
/// are off.
fn engine_for(rows: Vec<SnapshotRow>) -> FilterEngine {
    FilterEngine::with_config(
        Arc::new(PortfolioStore::from_rows(rows)),
        EngineConfig::sequential().with_catalog_validation(false),
    )
}

fn month(m: u32) -> ReportPeriod {
    ReportPeriod::month_end(2019, m).unwrap()
}

// =============================================================================
// PROPERTY: PERIOD COUNTS COVER THE SELECTION
// =============================================================================

#[test]
fn property_period_counts_sum_to_count() {
    for seed in 0..10 {
        for size in [1, 10, 50, 200] {
            let engine = engine_for(generate_rows(size, seed));
            let criteria = FilterCriteria::new().with_product_types(["Overdraft", "Mortgage"]);

            let count = engine.count_stat(&criteria).unwrap();
            let plain = engine.counts_by_period(&criteria, false).unwrap();
            let split = engine.counts_by_period(&criteria, true).unwrap();

            assert_eq!(plain.total(), count, "size={size}, seed={seed}");
            assert_eq!(split.total(), count, "size={size}, seed={seed}");
            assert_eq!(plain.periods(), split.periods());
        }
    }
}

#[test]
fn property_rating_histogram_covers_all() {
    for seed in 0..10 {
        let engine = engine_for(generate_rows(100, seed));
        let criteria = FilterCriteria::new().with_default_states([DefaultState::Healthy]);

        let count = engine.count_stat(&criteria).unwrap();
        let dist = engine.rating_histogram(&criteria).unwrap();

        assert_eq!(dist.total, count);
        assert_eq!(dist.by_rating.values().sum::<usize>(), count);
    }
}

// =============================================================================
// PROPERTY: RATES ARE PROPORTIONS
// =============================================================================

#[test]
fn property_event_rate_within_bounds() {
    for seed in 0..10 {
        let engine = engine_for(generate_rows(100, seed));

        for product in PRODUCTS {
            let criteria = FilterCriteria::new().with_product_types([product]);
            match engine.event_rate_stat(&criteria) {
                Ok(rate) => assert!((0.0..=1.0).contains(&rate), "rate={rate}"),
                Err(err) => assert!(err.is_empty_result()),
            }
        }
    }
}

#[test]
fn property_default_rates_within_bounds() {
    for seed in 0..10 {
        let engine = engine_for(generate_rows(150, seed));

        for decompose in [false, true] {
            let series = engine
                .default_rate_by_period(&FilterCriteria::new(), decompose)
                .unwrap();
            assert!(series.iter().all(|p| (0.0..=1.0).contains(&p.value)));
        }
    }
}

#[test]
fn property_defaults_never_exceed_count() {
    for seed in 0..10 {
        let engine = engine_for(generate_rows(80, seed));
        let criteria = FilterCriteria::new().with_default_reasons(["Bankruptcy"]);

        let summary = engine.summary(&criteria).unwrap();
        assert!(summary.defaults_count <= summary.count);
        assert!(summary.forward_defaults <= summary.count);
    }
}

// =============================================================================
// PROPERTY: REASON FILTER NEVER HIDES ROWS WITHOUT A REASON
// =============================================================================

#[test]
fn property_rows_without_reason_survive_reason_filter() {
    for seed in 0..10 {
        let rows = generate_rows(120, seed);
        let without_reason = rows.iter().filter(|r| r.default_reason.is_none()).count();
        let engine = engine_for(rows);

        for reason in engine.store().default_reasons().to_vec() {
            let criteria = FilterCriteria::new().with_default_reasons([reason]);
            let rows = engine.filter(&criteria).unwrap();
            let kept = rows.iter().filter(|r| r.default_reason.is_none()).count();
            assert_eq!(kept, without_reason);
        }
    }
}

// =============================================================================
// PROPERTY: PERIOD BOUNDS ARE HALF-OPEN
// =============================================================================

#[test]
fn property_adjacent_ranges_partition() {
    for seed in 0..10 {
        let engine = engine_for(generate_rows(100, seed));
        let all = engine.count_stat(&FilterCriteria::new()).unwrap();

        let split = month(6);
        let before = FilterCriteria::new().with_end(split);
        let after = FilterCriteria::new().with_start(split);

        let total = engine.count_stat(&before).unwrap() + engine.count_stat(&after).unwrap();
        assert_eq!(total, all, "seed={seed}");
    }
}

// =============================================================================
// PROPTEST
// =============================================================================

fn arb_criteria() -> impl Strategy<Value = FilterCriteria> {
    (
        proptest::option::of(proptest::collection::btree_set(any::<bool>(), 0..=2)),
        proptest::option::of(1u32..=12),
        proptest::option::of(1u32..=12),
        proptest::option::of(proptest::sample::subsequence(REASONS.to_vec(), 0..=3)),
        proptest::option::of(proptest::sample::subsequence(PRODUCTS.to_vec(), 0..=4)),
    )
        .prop_map(|(flags, start, end, reasons, products)| {
            let (start, end) = match (start, end) {
                (Some(a), Some(b)) if a > b => (Some(b), Some(a)),
                other => other,
            };
            FilterCriteria {
                default_state: flags,
                start_period: start.map(month),
                end_period: end.map(month),
                default_reasons: reasons.map(|r| r.into_iter().map(String::from).collect()),
                product_types: products.map(|p| p.into_iter().map(String::from).collect()),
            }
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn proptest_filter_matches_predicate(seed in 0u64..1000, criteria in arb_criteria()) {
        let rows = generate_rows(60, seed);
        let expected: Vec<SnapshotRow> = rows.iter().filter(|r| criteria.matches(r)).cloned().collect();
        let engine = engine_for(rows);

        let filtered: Vec<SnapshotRow> = engine.filter(&criteria).unwrap().into_iter().cloned().collect();
        prop_assert_eq!(filtered, expected);
    }

    #[test]
    fn proptest_filter_is_idempotent(seed in 0u64..1000, criteria in arb_criteria()) {
        let engine = engine_for(generate_rows(60, seed));
        let first: Vec<SnapshotRow> = engine.filter(&criteria).unwrap().into_iter().cloned().collect();

        let again = engine_for(first.clone());
        let second: Vec<SnapshotRow> = again.filter(&criteria).unwrap().into_iter().cloned().collect();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn proptest_narrowing_products_never_grows(seed in 0u64..1000, keep in 1usize..=4) {
        let engine = engine_for(generate_rows(60, seed));
        let all: BTreeSet<&str> = PRODUCTS.iter().copied().collect();
        let narrow: BTreeSet<&str> = PRODUCTS.iter().copied().take(keep).collect();

        let wide_count = engine
            .count_stat(&FilterCriteria::new().with_product_types(all))
            .unwrap();
        let narrow_count = engine
            .count_stat(&FilterCriteria::new().with_product_types(narrow))
            .unwrap();
        prop_assert!(narrow_count <= wide_count);
    }

    #[test]
    fn proptest_decomposed_counts_match(seed in 0u64..1000, criteria in arb_criteria()) {
        let engine = engine_for(generate_rows(60, seed));
        let count = engine.count_stat(&criteria).unwrap();
        prop_assert_eq!(engine.counts_by_period(&criteria, true).unwrap().total(), count);
        prop_assert_eq!(engine.counts_by_period(&criteria, false).unwrap().total(), count);
    }
}
