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

use pretty_assertions::assert_eq;
use skewjoin_common_exception::codes;
use skewjoin_query_expression::JoinSide;
use skewjoin_query_settings::DefaultSettings;
use skewjoin_query_settings::JoinSettings;
use skewjoin_query_settings::SettingValue;
use skewjoin_query_settings::DEFAULT_MEMORY_THRESHOLD;

#[test]
fn test_defaults() {
    let settings = JoinSettings::default();
    assert_eq!(settings.skew_threshold, 10.0);
    assert_eq!(settings.top1_threshold, 0.20);
    assert_eq!(settings.memory_threshold, 2 * 1024 * 1024 * 1024);
    assert_eq!(settings.memory_threshold, DEFAULT_MEMORY_THRESHOLD);
    assert_eq!(settings.profile_side, JoinSide::Right);
    assert!(settings.validate().is_ok());

    assert_eq!(DefaultSettings::names(), vec![
        "join_memory_threshold",
        "join_profile_side",
        "join_skew_threshold",
        "join_top1_threshold",
    ]);
    let default = DefaultSettings::get("join_top1_threshold").unwrap();
    assert_eq!(default.value(), &SettingValue::Float64(0.20));
    assert!(!default.desc().is_empty());
}

#[test]
fn test_validate_rejects_bad_thresholds() {
    for settings in [
        JoinSettings::default().with_skew_threshold(-1.0),
        JoinSettings::default().with_skew_threshold(f64::NAN),
        JoinSettings::default().with_skew_threshold(f64::INFINITY),
        JoinSettings::default().with_top1_threshold(-0.1),
        JoinSettings::default().with_top1_threshold(f64::NEG_INFINITY),
    ] {
        let err = settings.validate().unwrap_err();
        assert_eq!(err.code(), codes::InvalidThreshold);
    }

    let zero = JoinSettings::default()
        .with_skew_threshold(0.0)
        .with_top1_threshold(0.0)
        .with_memory_threshold(0);
    assert!(zero.validate().is_ok());
}

#[test]
fn test_set_setting() {
    let mut settings = JoinSettings::default();

    settings.set_setting("join_skew_threshold", "4.5").unwrap();
    settings.set_setting("join_top1_threshold", " 0.5 ").unwrap();
    settings.set_setting("join_memory_threshold", "1024").unwrap();
    settings.set_setting("join_profile_side", "LEFT").unwrap();

    assert_eq!(settings, JoinSettings {
        skew_threshold: 4.5,
        top1_threshold: 0.5,
        memory_threshold: 1024,
        profile_side: JoinSide::Left,
    });
    assert_eq!(
        settings.get_setting("join_profile_side").unwrap(),
        SettingValue::String("left".to_string())
    );
    assert_eq!(
        settings.get_setting("join_memory_threshold").unwrap(),
        SettingValue::UInt64(1024)
    );
}

#[test]
fn test_set_setting_errors() {
    let mut settings = JoinSettings::default();

    let err = settings.set_setting("join_nothing", "1").unwrap_err();
    assert_eq!(err.code(), codes::UnknownSetting);

    let err = settings.set_setting("join_top1_threshold", "1.5").unwrap_err();
    assert_eq!(err.code(), codes::WrongValueForVariable);

    let err = settings.set_setting("join_skew_threshold", "-3").unwrap_err();
    assert_eq!(err.code(), codes::WrongValueForVariable);

    let err = settings.set_setting("join_skew_threshold", "NaN").unwrap_err();
    assert_eq!(err.code(), codes::WrongValueForVariable);

    let err = settings.set_setting("join_memory_threshold", "lots").unwrap_err();
    assert_eq!(err.code(), codes::BadArguments);

    let err = settings.set_setting("join_profile_side", "middle").unwrap_err();
    assert_eq!(err.code(), codes::WrongValueForVariable);

    let err = settings.get_setting("join_nothing").unwrap_err();
    assert_eq!(err.code(), codes::UnknownSetting);

    // Failed updates leave the settings untouched.
    assert_eq!(settings, JoinSettings::default());
}

#[test]
fn test_from_json() {
    let settings = JoinSettings::from_json(r#"{"skew_threshold": 5.0, "profile_side": "left"}"#)
        .unwrap();
    assert_eq!(settings.skew_threshold, 5.0);
    assert_eq!(settings.top1_threshold, 0.20);
    assert_eq!(settings.profile_side, JoinSide::Left);

    let err = JoinSettings::from_json(r#"{"top1_threshold": -0.5}"#).unwrap_err();
    assert_eq!(err.code(), codes::InvalidThreshold);

    let err = JoinSettings::from_json("{not json").unwrap_err();
    assert_eq!(err.code(), codes::BadArguments);
}
