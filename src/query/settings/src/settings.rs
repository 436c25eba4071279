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
use serde::Deserialize;
use serde::Serialize;
use skewjoin_common_exception::ErrorCode;
use skewjoin_common_exception::Result;
use skewjoin_query_expression::JoinSide;

use crate::settings_default::DefaultSettings;
use crate::settings_default::SettingValue;
use crate::DEFAULT_MEMORY_THRESHOLD;
use crate::DEFAULT_SKEW_THRESHOLD;
use crate::DEFAULT_TOP1_THRESHOLD;

/// Policy inputs of the join planner.
///
/// Everything is supplied by the caller; the join core never reads the
/// environment or a file on its own.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JoinSettings {
    pub skew_threshold: f64,
    pub top1_threshold: f64,
    pub memory_threshold: u64,
    pub profile_side: JoinSide,
}

impl Default for JoinSettings {
    fn default() -> Self {
        JoinSettings {
            skew_threshold: DEFAULT_SKEW_THRESHOLD,
            top1_threshold: DEFAULT_TOP1_THRESHOLD,
            memory_threshold: DEFAULT_MEMORY_THRESHOLD,
            profile_side: JoinSide::Right,
        }
    }
}

impl JoinSettings {
    #[must_use]
    pub fn with_skew_threshold(mut self, threshold: f64) -> Self {
        self.skew_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_top1_threshold(mut self, threshold: f64) -> Self {
        self.top1_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_memory_threshold(mut self, threshold: u64) -> Self {
        self.memory_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_profile_side(mut self, side: JoinSide) -> Self {
        self.profile_side = side;
        self
    }

    /// Rejects negative or non-finite thresholds.
    pub fn validate(&self) -> Result<()> {
        check_threshold("skew_threshold", self.skew_threshold)?;
        check_threshold("top1_threshold", self.top1_threshold)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let settings: JoinSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn set_setting(&mut self, key: &str, value: &str) -> Result<()> {
        let converted = DefaultSettings::convert_value(key, value)?;

        match (key, &converted) {
            ("join_skew_threshold", SettingValue::Float64(v)) => self.skew_threshold = *v,
            ("join_top1_threshold", SettingValue::Float64(v)) => self.top1_threshold = *v,
            ("join_memory_threshold", SettingValue::UInt64(v)) => self.memory_threshold = *v,
            ("join_profile_side", SettingValue::String(v)) => {
                self.profile_side = match v.as_str() {
                    "left" => JoinSide::Left,
                    _ => JoinSide::Right,
                }
            }
            _ => {
                return Err(ErrorCode::Internal(format!(
                    "Setting {} has unexpected value type: {:?}",
                    key, converted
                )));
            }
        }

        info!("Set join setting {} to {}", key, converted);
        Ok(())
    }

    pub fn get_setting(&self, key: &str) -> Result<SettingValue> {
        match key {
            "join_skew_threshold" => Ok(SettingValue::Float64(self.skew_threshold)),
            "join_top1_threshold" => Ok(SettingValue::Float64(self.top1_threshold)),
            "join_memory_threshold" => Ok(SettingValue::UInt64(self.memory_threshold)),
            "join_profile_side" => Ok(SettingValue::String(self.profile_side.to_string())),
            _ => Err(ErrorCode::UnknownSetting(format!("Unknown setting: {}", key))),
        }
    }
}

fn check_threshold(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ErrorCode::InvalidThreshold(format!(
            "{} must be a finite, non-negative number, got {}",
            name, value
        )));
    }
    Ok(())
}
