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

use std::collections::HashMap;

use itertools::Itertools;
use log::debug;
use serde::Serialize;
use skewjoin_common_exception::ErrorCode;
use skewjoin_common_exception::Result;
use skewjoin_query_expression::Row;
use skewjoin_query_expression::Scalar;

/// Key distribution statistics of one join input.
///
/// Computed fresh for every planning decision and never cached.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SkewReport {
    /// All rows of the input, null keys included.
    pub total_rows: usize,
    /// Number of distinct non-null key values.
    pub distinct_keys: usize,
    /// Largest per-key count over `max(1, median per-key count)`.
    pub skew_ratio: f64,
    /// Largest per-key count over `total_rows`.
    pub top1_share: f64,
    /// Per-key row counts, largest first; equal counts ordered by key.
    pub per_key_counts: Vec<(Scalar, usize)>,
}

impl SkewReport {
    pub fn empty() -> SkewReport {
        SkewReport {
            total_rows: 0,
            distinct_keys: 0,
            skew_ratio: 0.0,
            top1_share: 0.0,
            per_key_counts: vec![],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_rows == 0
    }

    pub fn max_count(&self) -> usize {
        self.per_key_counts.first().map_or(0, |(_, count)| *count)
    }

    pub fn median_count(&self) -> f64 {
        // per_key_counts is descending, the reverse is ascending.
        let counts = self
            .per_key_counts
            .iter()
            .rev()
            .map(|(_, count)| *count)
            .collect::<Vec<_>>();
        median(&counts)
    }
}

pub struct SkewEstimator;

impl SkewEstimator {
    /// Profiles the `key` column of `rows`.
    ///
    /// Null keys count toward `total_rows` but never form a key group. A row
    /// without the `key` column fails with `MissingKeyColumn`.
    pub fn estimate(rows: &[Row], key: &str) -> Result<SkewReport> {
        if rows.is_empty() {
            return Ok(SkewReport::empty());
        }

        let mut counts: HashMap<&Scalar, usize> = HashMap::new();
        for (row_index, row) in rows.iter().enumerate() {
            let value = row.get(key).ok_or_else(|| {
                ErrorCode::MissingKeyColumn(format!(
                    "row {} has no join key column '{}'",
                    row_index, key
                ))
            })?;
            if !value.is_null() {
                *counts.entry(value).or_insert(0) += 1;
            }
        }

        let per_key_counts = counts
            .into_iter()
            .map(|(value, count)| (value.clone(), count))
            .sorted_by(|(a_key, a_count), (b_key, b_count)| {
                b_count.cmp(a_count).then_with(|| a_key.cmp(b_key))
            })
            .collect::<Vec<_>>();

        let total_rows = rows.len();
        let mut report = SkewReport {
            total_rows,
            distinct_keys: per_key_counts.len(),
            skew_ratio: 0.0,
            top1_share: 0.0,
            per_key_counts,
        };

        if report.distinct_keys > 0 {
            let max_count = report.max_count() as f64;
            report.skew_ratio = max_count / report.median_count().max(1.0);
            report.top1_share = max_count / total_rows as f64;
        }

        debug!(
            "skew estimate on '{}': total_rows={}, distinct_keys={}, skew_ratio={:.3}, top1_share={:.3}",
            key, report.total_rows, report.distinct_keys, report.skew_ratio, report.top1_share
        );
        Ok(report)
    }
}

/// Profiles the `key` column of `rows`, see [`SkewEstimator::estimate`].
pub fn estimate(rows: &[Row], key: &str) -> Result<SkewReport> {
    SkewEstimator::estimate(rows, key)
}

// Median of ascending counts; even lengths average the two middle values.
fn median(sorted: &[usize]) -> f64 {
    let len = sorted.len();
    match len {
        0 => 0.0,
        _ if len % 2 == 1 => sorted[len / 2] as f64,
        _ => (sorted[len / 2 - 1] + sorted[len / 2]) as f64 / 2.0,
    }
}
