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

mod merge_state;
mod sort;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use log::debug;
pub use merge_state::MergeScan;
pub use merge_state::MergeState;
use skewjoin_common_exception::Result;
use skewjoin_query_expression::key_column;
use skewjoin_query_expression::JoinSide;
use skewjoin_query_expression::Row;
use skewjoin_query_expression::RowSet;
use skewjoin_query_expression::Scalar;
pub use sort::stable_sort_indices;

use crate::engine::check_interrupt;
use crate::JoinEngine;
use crate::JoinStrategy;

/// Appended to every right-side column except the join key.
pub const RIGHT_SUFFIX: &str = ".right";

/// Sort both inputs by key, then merge-scan them.
///
/// Output rows carry every left column unchanged and every right column but
/// the key renamed with [`RIGHT_SUFFIX`], so no column is lost on a name
/// collision. An empty input yields an empty result.
#[derive(Default)]
pub struct SortMergeJoin {
    interrupt: Arc<AtomicBool>,
}

impl SortMergeJoin {
    pub fn create() -> Self {
        SortMergeJoin::default()
    }

    pub fn with_interrupt(interrupt: Arc<AtomicBool>) -> Self {
        SortMergeJoin { interrupt }
    }
}

impl JoinEngine for SortMergeJoin {
    fn strategy(&self) -> JoinStrategy {
        JoinStrategy::SortMerge
    }

    fn join(&self, left: &[Row], right: &[Row], key: &str) -> Result<RowSet> {
        let left_keys = key_column(left, key, JoinSide::Left)?;
        let right_keys = key_column(right, key, JoinSide::Right)?;

        if left.is_empty() || right.is_empty() {
            return Ok(vec![]);
        }

        check_interrupt(&self.interrupt, "sort")?;
        let left_order = stable_sort_indices(&left_keys);
        let right_order = stable_sort_indices(&right_keys);
        let left_sorted = left_order
            .iter()
            .map(|&index| left_keys[index])
            .collect::<Vec<&Scalar>>();
        let right_sorted = right_order
            .iter()
            .map(|&index| right_keys[index])
            .collect::<Vec<&Scalar>>();

        check_interrupt(&self.interrupt, "merge")?;
        let mut result = Vec::new();
        for (left_pos, right_pos) in MergeScan::new(&left_sorted, &right_sorted) {
            let left_row = &left[left_order[left_pos]];
            let right_row = &right[right_order[right_pos]];
            result.push(left_row.concat_suffixed(right_row, key, RIGHT_SUFFIX));
        }

        debug!(
            "sort-merge join merged {} left rows with {} right rows, produced {} rows",
            left.len(),
            right.len(),
            result.len()
        );
        Ok(result)
    }
}

/// Joins with a one-off [`SortMergeJoin`].
pub fn sort_merge_join(left: &[Row], right: &[Row], key: &str) -> Result<RowSet> {
    SortMergeJoin::create().join(left, right, key)
}
