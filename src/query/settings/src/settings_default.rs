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
use std::fmt::Display;
use std::ops::RangeInclusive;
use std::sync::Arc;

use itertools::Itertools;
use once_cell::sync::OnceCell;
use skewjoin_common_exception::ErrorCode;
use skewjoin_common_exception::Result;

static DEFAULT_SETTINGS: OnceCell<Arc<DefaultSettings>> = OnceCell::new();

/// Max/median key-count ratio at or above which a key column is skewed.
pub const DEFAULT_SKEW_THRESHOLD: f64 = 10.0;
/// Share of rows held by the hottest key at or above which a key column is skewed.
pub const DEFAULT_TOP1_THRESHOLD: f64 = 0.20;
/// Memory needed before an in-memory hash table is considered, 2 GiB.
pub const DEFAULT_MEMORY_THRESHOLD: u64 = 2 * 1024 * 1024 * 1024;

#[derive(Clone, Debug, PartialEq)]
pub enum SettingValue {
    UInt64(u64),
    Float64(f64),
    String(String),
}

impl Display for SettingValue {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            SettingValue::UInt64(v) => write!(f, "{}", v),
            SettingValue::Float64(v) => write!(f, "{}", v),
            SettingValue::String(v) => write!(f, "{}", v),
        }
    }
}

#[derive(Clone, Debug)]
pub enum SettingRange {
    Numeric(RangeInclusive<u64>),
    Float(RangeInclusive<f64>),
    String(Vec<String>),
}

impl Display for SettingRange {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            SettingRange::Numeric(range) => write!(f, "[{}, {}]", range.start(), range.end()),
            SettingRange::Float(range) => write!(f, "[{}, {}]", range.start(), range.end()),
            SettingRange::String(values) => write!(f, "{:?}", values),
        }
    }
}

impl SettingRange {
    /// Checks if an integer value is within the numeric range.
    pub fn is_within_numeric_range(&self, value: u64) -> Result<()> {
        match self {
            SettingRange::Numeric(range) => {
                if range.contains(&value) {
                    Ok(())
                } else {
                    Err(ErrorCode::WrongValueForVariable(format!(
                        "Value {} is not within the range {}",
                        value, self
                    )))
                }
            }
            _ => Err(ErrorCode::BadArguments(
                "Expected numeric range".to_string(),
            )),
        }
    }

    /// Checks if a float value is within the float range. NaN never is.
    pub fn is_within_float_range(&self, value: f64) -> Result<()> {
        match self {
            SettingRange::Float(range) => {
                if range.contains(&value) {
                    Ok(())
                } else {
                    Err(ErrorCode::WrongValueForVariable(format!(
                        "Value {} is not within the range {}",
                        value, self
                    )))
                }
            }
            _ => Err(ErrorCode::BadArguments("Expected float range".to_string())),
        }
    }

    /// Checks if a string value is within the string range.
    pub fn is_within_string_range(&self, value: &str) -> Result<String> {
        match self {
            SettingRange::String(values) => {
                match values.iter().find(|&s| s.eq_ignore_ascii_case(value)) {
                    Some(s) => Ok(s.to_string()),
                    None => Err(ErrorCode::WrongValueForVariable(format!(
                        "Value {} is not within the allowed values {:}",
                        value, self
                    ))),
                }
            }
            _ => Err(ErrorCode::BadArguments("Expected string range".to_string())),
        }
    }
}

#[derive(Clone, Debug)]
pub struct DefaultSettingValue {
    pub(crate) value: SettingValue,
    pub(crate) desc: &'static str,
    pub(crate) range: Option<SettingRange>,
}

impl DefaultSettingValue {
    pub fn value(&self) -> &SettingValue {
        &self.value
    }

    pub fn desc(&self) -> &'static str {
        self.desc
    }

    pub fn range(&self) -> Option<&SettingRange> {
        self.range.as_ref()
    }
}

#[derive(Clone)]
pub struct DefaultSettings {
    pub(crate) settings: HashMap<String, DefaultSettingValue>,
}

impl DefaultSettings {
    pub fn instance() -> Arc<DefaultSettings> {
        Arc::clone(DEFAULT_SETTINGS.get_or_init(|| {
            let default_settings = HashMap::from([
                ("join_skew_threshold", DefaultSettingValue {
                    value: SettingValue::Float64(DEFAULT_SKEW_THRESHOLD),
                    desc: "Max/median per-key count ratio at or above which the build input counts as skewed.",
                    range: Some(SettingRange::Float(0.0..=f64::MAX)),
                }),
                ("join_top1_threshold", DefaultSettingValue {
                    value: SettingValue::Float64(DEFAULT_TOP1_THRESHOLD),
                    desc: "Share of rows under the hottest key at or above which the input counts as skewed.",
                    range: Some(SettingRange::Float(0.0..=1.0)),
                }),
                ("join_memory_threshold", DefaultSettingValue {
                    value: SettingValue::UInt64(DEFAULT_MEMORY_THRESHOLD),
                    desc: "Available memory in bytes required to pick a hash join for unskewed inputs.",
                    range: Some(SettingRange::Numeric(0..=u64::MAX)),
                }),
                ("join_profile_side", DefaultSettingValue {
                    value: SettingValue::String("right".to_string()),
                    desc: "Which join input the skew estimator profiles.",
                    range: Some(SettingRange::String(vec!["left".into(), "right".into()])),
                }),
            ]);

            Arc::new(DefaultSettings {
                settings: default_settings
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v))
                    .collect(),
            })
        }))
    }

    pub fn has_setting(key: &str) -> bool {
        Self::instance().settings.contains_key(key)
    }

    pub fn get(key: &str) -> Result<DefaultSettingValue> {
        Self::instance()
            .settings
            .get(key)
            .cloned()
            .ok_or_else(|| ErrorCode::UnknownSetting(format!("Unknown setting: {}", key)))
    }

    /// All setting names in alphabetical order.
    pub fn names() -> Vec<String> {
        Self::instance().settings.keys().cloned().sorted().collect()
    }

    /// Parses `value` as the type of `key`'s default and checks it against
    /// the setting's range.
    pub fn convert_value(key: &str, value: &str) -> Result<SettingValue> {
        let setting = Self::get(key)?;
        let value = value.trim();

        match setting.value {
            SettingValue::UInt64(_) => {
                let u64_val = value.parse::<u64>().map_err(|e| {
                    ErrorCode::from(e).add_message(format!("Setting {} expects an integer", key))
                })?;
                if let Some(range) = &setting.range {
                    range.is_within_numeric_range(u64_val)?;
                }
                Ok(SettingValue::UInt64(u64_val))
            }
            SettingValue::Float64(_) => {
                let f64_val = value.parse::<f64>().map_err(|e| {
                    ErrorCode::from(e).add_message(format!("Setting {} expects a number", key))
                })?;
                if let Some(range) = &setting.range {
                    range.is_within_float_range(f64_val)?;
                }
                Ok(SettingValue::Float64(f64_val))
            }
            SettingValue::String(_) => match &setting.range {
                Some(range) => Ok(SettingValue::String(range.is_within_string_range(value)?)),
                None => Ok(SettingValue::String(value.to_string())),
            },
        }
    }
}
