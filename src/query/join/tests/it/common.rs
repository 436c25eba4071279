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

use rand::distributions::Distribution;
use rand::distributions::WeightedIndex;
use rand::rngs::StdRng;
use rand::seq::index;
use rand::seq::SliceRandom;
use rand::Rng;
use skewjoin_query_expression::Row;
use skewjoin_query_expression::Scalar;

pub const TRIP_KEY: &str = "PULocationID";

/// Left `{id, gender}` and right `{id, age}` from the three-row example.
pub fn gender_age_rows() -> (Vec<Row>, Vec<Row>) {
    let left = vec![
        Row::new().with_column("id", 1).with_column("gender", "M"),
        Row::new().with_column("id", 1).with_column("gender", "F"),
        Row::new().with_column("id", 2).with_column("gender", "M"),
    ];
    let right = vec![
        Row::new().with_column("id", 1).with_column("age", 10),
        Row::new().with_column("id", 2).with_column("age", 20),
        Row::new().with_column("id", 3).with_column("age", 30),
    ];
    (left, right)
}

pub fn key_rows(key: &str, values: &[Option<i64>]) -> Vec<Row> {
    values
        .iter()
        .map(|value| Row::new().with_column(key, Scalar::from(*value)))
        .collect()
}

/// 95% of the pickup ids drawn from 16..=20 (id 16 holds half of those),
/// the rest distinct ids from 1000..9999, shuffled.
pub fn skewed_trip_rows(rng: &mut StdRng, num_rows: usize) -> Vec<Row> {
    let num_common = num_rows * 95 / 100;
    let num_rare = num_rows - num_common;

    let weights = WeightedIndex::new([0.5, 0.2, 0.1, 0.1, 0.1]).unwrap();
    let mut ids = (0..num_common)
        .map(|_| 16 + weights.sample(rng) as i64)
        .collect::<Vec<_>>();
    ids.extend(
        index::sample(rng, 8999, num_rare)
            .into_iter()
            .map(|i| 1000 + i as i64),
    );
    ids.shuffle(rng);

    trip_rows(rng, ids)
}

/// Pickup ids drawn uniformly from 10..6000.
pub fn uniform_trip_rows(rng: &mut StdRng, num_rows: usize) -> Vec<Row> {
    let ids = (0..num_rows)
        .map(|_| rng.gen_range(10..6000))
        .collect::<Vec<i64>>();
    trip_rows(rng, ids)
}

fn trip_rows(rng: &mut StdRng, ids: Vec<i64>) -> Vec<Row> {
    ids.into_iter()
        .map(|id| {
            Row::new()
                .with_column(TRIP_KEY, id)
                .with_column("fare_amount", rng.gen_range(10.0..100.0))
        })
        .collect()
}

/// Rows `{key, payload}` with keys in `0..num_keys`, roughly one in
/// `null_every` keys null, and `payload` numbering the rows.
pub fn random_rows(
    rng: &mut StdRng,
    num_rows: usize,
    num_keys: i64,
    null_every: u32,
    payload: &str,
) -> Vec<Row> {
    (0..num_rows)
        .map(|i| {
            let key = if rng.gen_ratio(1, null_every) {
                Scalar::Null
            } else {
                Scalar::Int(rng.gen_range(0..num_keys))
            };
            Row::new()
                .with_column("k", key)
                .with_column(payload, i as i64)
        })
        .collect()
}

/// Rows as name-sorted column lists, the rows themselves sorted, so two
/// results can be compared as multisets regardless of column order.
pub fn normalized(rows: &[Row]) -> Vec<Vec<(String, Scalar)>> {
    let mut rows = rows
        .iter()
        .map(|row| {
            let mut columns = row
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect::<Vec<_>>();
            columns.sort();
            columns
        })
        .collect::<Vec<_>>();
    rows.sort();
    rows
}

/// Reference row count: nested loops over both inputs.
pub fn nested_loop_count(left: &[Row], right: &[Row], key: &str) -> usize {
    left.iter()
        .map(|l| {
            right
                .iter()
                .filter(|r| match (l.get(key), r.get(key)) {
                    (Some(a), Some(b)) => a.join_eq(b),
                    _ => false,
                })
                .count()
        })
        .sum()
}
