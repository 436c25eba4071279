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

use std::cmp::Ordering;

use skewjoin_query_expression::Scalar;

/// Phase of the merge scan over two key-sorted inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergeState {
    /// Advance the cursor under the smaller key until both keys are equal.
    Seeking,
    /// Pair the current right row with each left row of the group starting
    /// at `mark`.
    Emitting { mark: usize },
    /// Step the right cursor; replay the left group if the key repeats.
    Rewinding { mark: usize },
    Done,
}

/// Merge scan producing every `(left, right)` pair of positions with equal,
/// non-null keys, duplicates on both sides included.
///
/// Positions index the sorted key slices. Pairs come out grouped by right
/// position, then by left position.
pub struct MergeScan<'a> {
    left: &'a [&'a Scalar],
    right: &'a [&'a Scalar],
    left_cursor: usize,
    right_cursor: usize,
    state: MergeState,
}

impl<'a> MergeScan<'a> {
    pub fn new(left: &'a [&'a Scalar], right: &'a [&'a Scalar]) -> Self {
        MergeScan {
            left,
            right,
            left_cursor: 0,
            right_cursor: 0,
            state: MergeState::Seeking,
        }
    }

    pub fn state(&self) -> MergeState {
        self.state
    }

    fn seek(&mut self) -> MergeState {
        if self.left_cursor >= self.left.len() || self.right_cursor >= self.right.len() {
            return MergeState::Done;
        }

        let left_key = self.left[self.left_cursor];
        let right_key = self.right[self.right_cursor];
        if left_key.is_null() {
            self.left_cursor += 1;
            return MergeState::Seeking;
        }
        if right_key.is_null() {
            self.right_cursor += 1;
            return MergeState::Seeking;
        }

        match left_key.cmp(right_key) {
            Ordering::Less => {
                self.left_cursor += 1;
                MergeState::Seeking
            }
            Ordering::Greater => {
                self.right_cursor += 1;
                MergeState::Seeking
            }
            Ordering::Equal => MergeState::Emitting {
                mark: self.left_cursor,
            },
        }
    }

    fn rewind(&mut self, mark: usize) -> MergeState {
        self.right_cursor += 1;
        if self.right_cursor >= self.right.len() {
            return MergeState::Done;
        }

        if self.right[self.right_cursor].join_eq(self.left[mark]) {
            self.left_cursor = mark;
            MergeState::Emitting { mark }
        } else {
            MergeState::Seeking
        }
    }
}

impl<'a> Iterator for MergeScan<'a> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.state {
                MergeState::Seeking => self.state = self.seek(),
                MergeState::Emitting { mark } => {
                    if self.left_cursor < self.left.len()
                        && self.left[self.left_cursor].join_eq(self.right[self.right_cursor])
                    {
                        let pair = (self.left_cursor, self.right_cursor);
                        self.left_cursor += 1;
                        return Some(pair);
                    }
                    self.state = MergeState::Rewinding { mark };
                }
                MergeState::Rewinding { mark } => self.state = self.rewind(mark),
                MergeState::Done => return None,
            }
        }
    }
}
