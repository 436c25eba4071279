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

use std::num::ParseFloatError;
use std::num::ParseIntError;

use crate::ErrorCode;

impl From<serde_json::Error> for ErrorCode {
    fn from(error: serde_json::Error) -> Self {
        ErrorCode::BadArguments(format!("Invalid JSON: {}", error))
    }
}

impl From<ParseIntError> for ErrorCode {
    fn from(error: ParseIntError) -> Self {
        ErrorCode::BadArguments(format!("Invalid integer value: {}", error))
    }
}

impl From<ParseFloatError> for ErrorCode {
    fn from(error: ParseFloatError) -> Self {
        ErrorCode::BadArguments(format!("Invalid float value: {}", error))
    }
}

impl From<std::fmt::Error> for ErrorCode {
    fn from(error: std::fmt::Error) -> Self {
        ErrorCode::Internal(format!("Format error: {}", error))
    }
}
