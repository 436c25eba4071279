// Copyright 2021 Datafuse Labs
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use skewjoin_common_exception::codes;
use skewjoin_query_expression::Row;
use skewjoin_query_expression::Scalar;
use skewjoin_query_join::estimate;
use skewjoin_query_join::JoinPlanner;
use skewjoin_query_join::JoinStrategy;
use skewjoin_query_join::SkewEstimator;
use skewjoin_query_join::SkewReport;

use crate::common::key_rows;
use crate::common::skewed_trip_rows;
use crate::common::uniform_trip_rows;
use crate::common::TRIP_KEY;

#[test]
fn test_estimate_hot_key() {
    let rows = key_rows("age", &[
        Some(16),
        Some(16),
        Some(16),
        Some(16),
        Some(17),
        Some(18),
    ]);
    let report = estimate(&rows, "age").unwrap();

    assert_eq!(report.total_rows, 6);
    assert_eq!(report.distinct_keys, 3);
    assert_eq!(report.skew_ratio, 4.0);
    assert!((report.top1_share - 4.0 / 6.0).abs() < 1e-12);
    assert_eq!(report.per_key_counts, vec![
        (Scalar::Int(16), 4),
        (Scalar::Int(17), 1),
        (Scalar::Int(18), 1),
    ]);
    assert_eq!(report.max_count(), 4);
    assert_eq!(report.median_count(), 1.0);

    // top1_share 0.667 >= 0.20, whatever the memory.
    let planner = JoinPlanner::default();
    assert!(planner.is_high_skew(&report));
    assert_eq!(planner.choose(&report, u64::MAX), JoinStrategy::SortMerge);
    assert_eq!(planner.choose(&report, 0), JoinStrategy::SortMerge);
}

#[test]
fn test_estimate_empty_input() {
    let report = SkewEstimator::estimate(&[], "id").unwrap();
    assert_eq!(report, SkewReport::empty());
    assert!(report.is_empty());
    assert!(!JoinPlanner::default().is_high_skew(&report));
}

#[test]
fn test_estimate_even_median() {
    let mut values = vec![Some(1); 5];
    values.extend([Some(2); 3]);
    values.extend([Some(3), Some(4)]);
    let report = estimate(&key_rows("k", &values), "k").unwrap();

    // counts [5, 3, 1, 1], median (1 + 3) / 2
    assert_eq!(report.median_count(), 2.0);
    assert_eq!(report.skew_ratio, 2.5);
    assert_eq!(report.top1_share, 0.5);
    assert_eq!(report.distinct_keys, 4);
}

#[test]
fn test_estimate_ties_ordered_by_key() {
    let rows = key_rows("k", &[Some(9), Some(3), Some(5), Some(3), Some(9)]);
    let report = estimate(&rows, "k").unwrap();

    assert_eq!(report.per_key_counts, vec![
        (Scalar::Int(3), 2),
        (Scalar::Int(9), 2),
        (Scalar::Int(5), 1),
    ]);
    assert_eq!(report.skew_ratio, 1.0);
}

#[test]
fn test_estimate_null_keys() {
    let rows = key_rows("k", &[Some(1), None, None, Some(2)]);
    let report = estimate(&rows, "k").unwrap();
    assert_eq!(report.total_rows, 4);
    assert_eq!(report.distinct_keys, 2);
    assert_eq!(report.skew_ratio, 1.0);
    assert_eq!(report.top1_share, 0.25);

    let rows = key_rows("k", &[None, None]);
    let report = estimate(&rows, "k").unwrap();
    assert_eq!(report.total_rows, 2);
    assert_eq!(report.distinct_keys, 0);
    assert_eq!(report.skew_ratio, 0.0);
    assert_eq!(report.top1_share, 0.0);
    assert!(report.per_key_counts.is_empty());
}

#[test]
fn test_estimate_missing_key_column() {
    let rows = vec![
        Row::new().with_column("id", 1),
        Row::new().with_column("name", "x"),
    ];
    let err = estimate(&rows, "id").unwrap_err();
    assert_eq!(err.code(), codes::MissingKeyColumn);
    assert_eq!(err.message(), "row 1 has no join key column 'id'");
}

#[test]
fn test_estimate_is_deterministic() {
    let mut rng = StdRng::seed_from_u64(7);
    let rows = skewed_trip_rows(&mut rng, 1000);

    let first = estimate(&rows, TRIP_KEY).unwrap();
    let second = estimate(&rows, TRIP_KEY).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first.per_key_counts.iter().map(|(_, c)| c).sum::<usize>(),
        1000
    );
}

#[test]
fn test_generated_distributions() {
    let mut rng = StdRng::seed_from_u64(0);
    let planner = JoinPlanner::default();

    let skewed = estimate(&skewed_trip_rows(&mut rng, 2000), TRIP_KEY).unwrap();
    assert_eq!(skewed.per_key_counts[0].0, Scalar::Int(16));
    assert!(skewed.top1_share >= 0.20);
    assert!(planner.is_high_skew(&skewed));

    let uniform = estimate(&uniform_trip_rows(&mut rng, 2000), TRIP_KEY).unwrap();
    assert!(uniform.top1_share < 0.20);
    assert!(uniform.skew_ratio < 10.0);
    assert!(!planner.is_high_skew(&uniform));
}
