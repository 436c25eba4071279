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

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

use log::debug;
use log::info;
use skewjoin_common_exception::ErrorCodeResultExt;
use skewjoin_common_exception::Result;
use skewjoin_query_expression::JoinSide;
use skewjoin_query_expression::Row;
use skewjoin_query_expression::RowSet;
use skewjoin_query_settings::JoinSettings;

use crate::HashJoin;
use crate::JoinEngine;
use crate::JoinPlanner;
use crate::JoinStrategy;
use crate::SkewEstimator;
use crate::SkewReport;
use crate::SortMergeJoin;

#[derive(Clone, Debug)]
pub struct JoinOutcome {
    pub strategy: JoinStrategy,
    /// Profile of the input named by `JoinSettings::profile_side`.
    pub report: SkewReport,
    pub rows: RowSet,
}

/// Estimate, plan, then run the chosen engine.
pub struct JoinExecutor {
    settings: JoinSettings,
    planner: JoinPlanner,
    interrupt: Arc<AtomicBool>,
}

impl JoinExecutor {
    pub fn create(settings: JoinSettings) -> Result<Self> {
        let planner = JoinPlanner::create(&settings)?;
        Ok(JoinExecutor {
            settings,
            planner,
            interrupt: Arc::new(AtomicBool::new(false)),
        })
    }

    #[must_use]
    pub fn with_interrupt(mut self, interrupt: Arc<AtomicBool>) -> Self {
        self.interrupt = interrupt;
        self
    }

    /// Flag that aborts a running join at its next phase boundary when set.
    pub fn interrupt(&self) -> Arc<AtomicBool> {
        self.interrupt.clone()
    }

    pub fn settings(&self) -> &JoinSettings {
        &self.settings
    }

    pub fn plan(
        &self,
        left: &[Row],
        right: &[Row],
        key: &str,
        available_memory_bytes: u64,
    ) -> Result<(JoinStrategy, SkewReport)> {
        let side = self.settings.profile_side;
        let profiled = match side {
            JoinSide::Left => left,
            JoinSide::Right => right,
        };

        let report = SkewEstimator::estimate(profiled, key)
            .with_context(|| format!("Failed to profile the {} join input", side))?;
        let strategy = self.planner.choose(&report, available_memory_bytes);
        Ok((strategy, report))
    }

    pub fn execute(
        &self,
        left: &[Row],
        right: &[Row],
        key: &str,
        available_memory_bytes: u64,
    ) -> Result<JoinOutcome> {
        let start = Instant::now();
        let (strategy, report) = self.plan(left, right, key, available_memory_bytes)?;

        let rows = self
            .engine(strategy)
            .join(left, right, key)
            .with_context(|| format!("Failed to run {} join on '{}'", strategy, key))?;

        info!(
            "{} join on '{}': {} left rows, {} right rows, {} output rows",
            strategy,
            key,
            left.len(),
            right.len(),
            rows.len()
        );
        debug!("{} join took {:?}", strategy, start.elapsed());

        Ok(JoinOutcome {
            strategy,
            report,
            rows,
        })
    }

    fn engine(&self, strategy: JoinStrategy) -> Box<dyn JoinEngine> {
        match strategy {
            JoinStrategy::Hash => Box::new(HashJoin::with_interrupt(self.interrupt.clone())),
            JoinStrategy::SortMerge => {
                Box::new(SortMergeJoin::with_interrupt(self.interrupt.clone()))
            }
        }
    }
}
