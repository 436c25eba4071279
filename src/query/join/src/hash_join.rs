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
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use log::debug;
use skewjoin_common_exception::Result;
use skewjoin_query_expression::key_column;
use skewjoin_query_expression::JoinSide;
use skewjoin_query_expression::Row;
use skewjoin_query_expression::RowSet;
use skewjoin_query_expression::Scalar;

use crate::engine::check_interrupt;
use crate::JoinEngine;
use crate::JoinStrategy;

/// Key value to the positions of every build row holding it, in input order.
///
/// Null keys are never inserted.
pub struct HashJoinHashTable<'a> {
    buckets: HashMap<&'a Scalar, Vec<usize>>,
    build_num_rows: usize,
}

impl<'a> HashJoinHashTable<'a> {
    pub fn with_build_row_num(build_num_rows: usize) -> Self {
        HashJoinHashTable {
            buckets: HashMap::with_capacity(build_num_rows),
            build_num_rows: 0,
        }
    }

    pub fn build(keys: &[&'a Scalar]) -> Self {
        let mut table = Self::with_build_row_num(keys.len());
        for (row_index, key) in keys.iter().enumerate() {
            table.insert(*key, row_index);
        }
        table
    }

    pub fn insert(&mut self, key: &'a Scalar, row_index: usize) {
        if key.is_null() {
            return;
        }
        self.buckets.entry(key).or_default().push(row_index);
        self.build_num_rows += 1;
    }

    /// Build rows matching `key`; empty for a null or unknown key.
    pub fn probe(&self, key: &Scalar) -> &[usize] {
        if key.is_null() {
            return &[];
        }
        match self.buckets.get(key) {
            Some(rows) => rows.as_slice(),
            None => &[],
        }
    }

    pub fn num_keys(&self) -> usize {
        self.buckets.len()
    }

    pub fn num_rows(&self) -> usize {
        self.build_num_rows
    }
}

/// Build/probe inner equi-join.
///
/// The smaller input is hashed (the left one on a tie) and the other is
/// scanned once. Output follows probe order, then build insertion order.
/// Every output row is `{**left, **right}` whichever side was built, so a
/// right column always wins a name collision.
#[derive(Default)]
pub struct HashJoin {
    interrupt: Arc<AtomicBool>,
}

impl HashJoin {
    pub fn create() -> Self {
        HashJoin::default()
    }

    pub fn with_interrupt(interrupt: Arc<AtomicBool>) -> Self {
        HashJoin { interrupt }
    }
}

impl JoinEngine for HashJoin {
    fn strategy(&self) -> JoinStrategy {
        JoinStrategy::Hash
    }

    fn join(&self, left: &[Row], right: &[Row], key: &str) -> Result<RowSet> {
        let left_keys = key_column(left, key, JoinSide::Left)?;
        let right_keys = key_column(right, key, JoinSide::Right)?;

        let build_side = if left.len() <= right.len() {
            JoinSide::Left
        } else {
            JoinSide::Right
        };
        let (build_rows, build_keys, probe_rows, probe_keys) = match build_side {
            JoinSide::Left => (left, &left_keys, right, &right_keys),
            JoinSide::Right => (right, &right_keys, left, &left_keys),
        };

        check_interrupt(&self.interrupt, "build")?;
        let hash_table = HashJoinHashTable::build(build_keys);
        debug!(
            "hash join built {} side: {} rows, {} distinct keys",
            build_side,
            hash_table.num_rows(),
            hash_table.num_keys()
        );

        check_interrupt(&self.interrupt, "probe")?;
        let mut result = Vec::with_capacity(probe_rows.len());
        for (probe_index, probe_key) in probe_keys.iter().enumerate() {
            let probe_row = &probe_rows[probe_index];
            for &build_index in hash_table.probe(probe_key) {
                let build_row = &build_rows[build_index];
                let joined = match build_side {
                    JoinSide::Left => build_row.overlay(probe_row),
                    JoinSide::Right => probe_row.overlay(build_row),
                };
                result.push(joined);
            }
        }

        debug!(
            "hash join probed {} rows, produced {} rows",
            probe_rows.len(),
            result.len()
        );
        Ok(result)
    }
}

/// Joins with a one-off [`HashJoin`].
pub fn hash_join(left: &[Row], right: &[Row], key: &str) -> Result<RowSet> {
    HashJoin::create().join(left, right, key)
}
