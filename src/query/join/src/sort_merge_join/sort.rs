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

use skewjoin_query_expression::Scalar;

/// Returns the positions of `keys` in stable ascending order.
///
/// Bottom-up merge sort over indices: runs of width 1, 2, 4, ... are merged
/// back and forth between two buffers allocated once, so equal keys keep
/// their input order and no run is copied out of the buffers.
pub fn stable_sort_indices(keys: &[&Scalar]) -> Vec<usize> {
    let len = keys.len();
    let mut order: Vec<usize> = (0..len).collect();
    let mut scratch: Vec<usize> = vec![0; len];

    let mut width = 1;
    while width < len {
        for start in (0..len).step_by(2 * width) {
            let mid = (start + width).min(len);
            let end = (start + 2 * width).min(len);
            merge_runs(
                keys,
                &order[start..mid],
                &order[mid..end],
                &mut scratch[start..end],
            );
        }
        std::mem::swap(&mut order, &mut scratch);
        width *= 2;
    }
    order
}

fn merge_runs(keys: &[&Scalar], lhs: &[usize], rhs: &[usize], out: &mut [usize]) {
    let (mut i, mut j) = (0, 0);
    for slot in out.iter_mut() {
        // Ties take from lhs, which holds the earlier input positions.
        if j >= rhs.len() || (i < lhs.len() && keys[lhs[i]] <= keys[rhs[j]]) {
            *slot = lhs[i];
            i += 1;
        } else {
            *slot = rhs[j];
            j += 1;
        }
    }
}
