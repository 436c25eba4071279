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

//! Skew-aware inner equi-join over in-memory row sets.
//!
//! [`SkewEstimator`] profiles the key column of one input, [`JoinPlanner`]
//! turns the [`SkewReport`] and a memory hint into a [`JoinStrategy`], and
//! [`JoinExecutor`] runs the chosen engine: [`HashJoin`] or [`SortMergeJoin`].

#![allow(clippy::uninlined_format_args)]

mod engine;
mod executor;
mod hash_join;
mod planner;
mod skew_estimator;
mod sort_merge_join;
mod strategy;

pub use engine::JoinEngine;
pub use executor::JoinExecutor;
pub use executor::JoinOutcome;
pub use hash_join::hash_join;
pub use hash_join::HashJoin;
pub use hash_join::HashJoinHashTable;
pub use planner::choose;
pub use planner::JoinPlanner;
pub use skew_estimator::estimate;
pub use skew_estimator::SkewEstimator;
pub use skew_estimator::SkewReport;
pub use sort_merge_join::sort_merge_join;
pub use sort_merge_join::stable_sort_indices;
pub use sort_merge_join::MergeScan;
pub use sort_merge_join::MergeState;
pub use sort_merge_join::SortMergeJoin;
pub use sort_merge_join::RIGHT_SUFFIX;
pub use strategy::JoinStrategy;
