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

use log::info;
use skewjoin_common_exception::Result;
use skewjoin_query_settings::JoinSettings;

use crate::JoinStrategy;
use crate::SkewReport;

/// Picks a join algorithm from key skew and available memory.
///
/// The policy is conservative: a skewed input always goes to sort-merge,
/// because a few hot keys make hash buckets long and the build side
/// unbalanced. An unskewed input gets a hash join only when the memory hint
/// reaches `memory_threshold`.
#[derive(Clone, Debug, PartialEq)]
pub struct JoinPlanner {
    skew_threshold: f64,
    top1_threshold: f64,
    memory_threshold: u64,
}

impl Default for JoinPlanner {
    fn default() -> Self {
        let settings = JoinSettings::default();
        JoinPlanner {
            skew_threshold: settings.skew_threshold,
            top1_threshold: settings.top1_threshold,
            memory_threshold: settings.memory_threshold,
        }
    }
}

impl JoinPlanner {
    /// Fails with `InvalidThreshold` before any data is looked at.
    pub fn create(settings: &JoinSettings) -> Result<Self> {
        settings.validate()?;
        Ok(JoinPlanner {
            skew_threshold: settings.skew_threshold,
            top1_threshold: settings.top1_threshold,
            memory_threshold: settings.memory_threshold,
        })
    }

    pub fn is_high_skew(&self, report: &SkewReport) -> bool {
        if report.is_empty() {
            return false;
        }
        report.skew_ratio >= self.skew_threshold || report.top1_share >= self.top1_threshold
    }

    pub fn choose(&self, report: &SkewReport, available_memory_bytes: u64) -> JoinStrategy {
        let strategy = if self.is_high_skew(report) {
            JoinStrategy::SortMerge
        } else if available_memory_bytes >= self.memory_threshold {
            JoinStrategy::Hash
        } else {
            JoinStrategy::SortMerge
        };

        info!(
            "Choose {} join: skew_ratio={:.3}, top1_share={:.3}, available_memory={}, memory_threshold={}",
            strategy,
            report.skew_ratio,
            report.top1_share,
            available_memory_bytes,
            self.memory_threshold
        );
        strategy
    }
}

/// [`JoinPlanner::choose`] with the default thresholds.
pub fn choose(report: &SkewReport, available_memory_bytes: u64) -> JoinStrategy {
    JoinPlanner::default().choose(report, available_memory_bytes)
}
