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

use std::fmt::Display;
use std::fmt::Formatter;

use itertools::Itertools;
use serde::Deserialize;
use serde::Serialize;
use skewjoin_common_exception::ErrorCode;
use skewjoin_common_exception::Result;

use crate::JoinSide;
use crate::Scalar;

/// A finite, ordered sequence of rows handed to the join core by its caller.
pub type RowSet = Vec<Row>;

/// An ordered mapping from column name to value.
///
/// Column order is the insertion order. Writing an existing column replaces
/// its value in place and keeps its position.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Row {
    columns: Vec<(String, Scalar)>,
}

impl Row {
    pub fn new() -> Self {
        Row::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Row {
            columns: Vec::with_capacity(capacity),
        }
    }

    #[must_use]
    pub fn with_column(mut self, name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Scalar>) {
        let name = name.into();
        let value = value.into();
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value,
            None => self.columns.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Scalar> {
        self.columns
            .iter()
            .find_map(|(n, v)| if n == name { Some(v) } else { None })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.columns.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    /// Fetches the join key of a row that is known to come from `side` at
    /// position `row_index` of its input.
    ///
    /// A present null is returned as `Scalar::Null`; only a missing column
    /// is an error.
    pub fn key(&self, key: &str, side: JoinSide, row_index: usize) -> Result<&Scalar> {
        self.get(key).ok_or_else(|| {
            ErrorCode::MissingKeyColumn(format!(
                "{} row {} has no join key column '{}'",
                side, row_index, key
            ))
        })
    }

    /// `{**self, **other}`: every column of `self`, then the columns of
    /// `other`, whose values win on a name collision.
    pub fn overlay(&self, other: &Row) -> Row {
        let mut joined = Row::with_capacity(self.len() + other.len());
        joined.columns.extend(self.columns.iter().cloned());
        for (name, value) in other.columns.iter() {
            joined.insert(name.clone(), value.clone());
        }
        joined
    }

    /// Every column of `self` unchanged, then every column of `other` except
    /// `key`, renamed with `suffix` appended.
    pub fn concat_suffixed(&self, other: &Row, key: &str, suffix: &str) -> Row {
        let mut joined = Row::with_capacity(self.len() + other.len());
        joined.columns.extend(self.columns.iter().cloned());
        for (name, value) in other.columns.iter() {
            if name != key {
                joined.insert(format!("{}{}", name, suffix), value.clone());
            }
        }
        joined
    }
}

impl<K: Into<String>, V: Into<Scalar>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (name, value) in iter {
            row.insert(name, value);
        }
        row
    }
}

impl Display for Row {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.columns
                .iter()
                .map(|(name, value)| format!("{}: {}", name, value))
                .join(", ")
        )
    }
}

/// Extracts the join key of every row of one input, failing on the first
/// row that lacks the column.
pub fn key_column<'a>(rows: &'a [Row], key: &str, side: JoinSide) -> Result<Vec<&'a Scalar>> {
    rows.iter()
        .enumerate()
        .map(|(row_index, row)| row.key(key, side, row_index))
        .collect()
}
