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
use std::sync::atomic::Ordering;

use skewjoin_common_exception::ErrorCode;
use skewjoin_common_exception::Result;
use skewjoin_query_expression::Row;
use skewjoin_query_expression::RowSet;

use crate::JoinStrategy;

/// An inner equi-join algorithm over two in-memory inputs.
///
/// Engines keep no state between calls; every table, sorted copy and output
/// buffer belongs to one `join` call, so one engine may serve many threads.
pub trait JoinEngine: Send + Sync {
    fn strategy(&self) -> JoinStrategy;

    /// Joins `left` and `right` on the column `key`.
    ///
    /// Fails with `MissingKeyColumn` if any row of either input lacks `key`,
    /// and with `AbortedQuery` if the interrupt flag is raised between two
    /// phases. A failed call never returns partial output.
    fn join(&self, left: &[Row], right: &[Row], key: &str) -> Result<RowSet>;
}

pub(crate) fn check_interrupt(interrupt: &AtomicBool, phase: &str) -> Result<()> {
    if interrupt.load(Ordering::Relaxed) {
        return Err(ErrorCode::AbortedQuery(format!(
            "Aborted query before the {} phase, because the join was interrupted.",
            phase
        )));
    }
    Ok(())
}
