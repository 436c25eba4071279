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

#![allow(non_snake_case)]

use crate::exception::ErrorCode;

macro_rules! build_exceptions {
    ($($(#[$meta:meta])* $body:ident($code:expr)),*$(,)*) => {
        impl ErrorCode {
            $(

                $(
                    #[$meta]
                )*
                pub fn $body(display_text: impl Into<String>) -> ErrorCode {
                    ErrorCode::create(
                        $code,
                        stringify!($body),
                        display_text.into(),
                        String::new(),
                    )
                }
            )*
        }

        /// Numeric codes, one constant per constructor.
        pub mod codes {
            $(
                #[allow(non_upper_case_globals)]
                pub const $body: u16 = $code;
            )*
        }
    }
}

build_exceptions! {
    // Internal errors [0, 1100].
    Ok(0),
    /// Invariant broken inside the join core.
    Internal(1001),
    BadArguments(1006),
    /// The interrupt flag was raised between two phases of a join.
    AbortedQuery(1043),

    // Join errors [2100, 2200].
    /// A row lacks the join key column entirely.
    MissingKeyColumn(2101),
    /// Planner threshold is negative or not finite.
    InvalidThreshold(2102),
    WrongValueForVariable(2103),
    UnknownSetting(2104),
}
