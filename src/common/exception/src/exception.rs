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

use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;

pub type Result<T, E = ErrorCode> = std::result::Result<T, E>;

/// Error type shared by every crate of the join core.
///
/// Each failure carries a numeric code and a name, both generated by
/// `build_exceptions!` in `exception_code.rs`. Context is prepended with
/// [`ErrorCode::add_message`] while the error travels up the call stack.
#[derive(Clone, PartialEq, Eq)]
pub struct ErrorCode {
    code: u16,
    name: String,
    display_text: String,
    detail: String,
}

impl ErrorCode {
    pub fn create(code: u16, name: impl ToString, display_text: String, detail: String) -> Self {
        ErrorCode {
            code,
            name: name.to_string(),
            display_text,
            detail,
        }
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn name(&self) -> String {
        self.name.clone()
    }

    pub fn message(&self) -> String {
        if self.detail.is_empty() {
            self.display_text.clone()
        } else {
            format!("{}\n{}", self.display_text, self.detail)
        }
    }

    pub fn detail(&self) -> String {
        self.detail.clone()
    }

    #[must_use]
    pub fn add_message(self, msg: impl AsRef<str>) -> Self {
        Self {
            display_text: format!("{}\n{}", msg.as_ref(), self.display_text),
            ..self
        }
    }

    #[must_use]
    pub fn add_message_back(self, msg: impl AsRef<str>) -> Self {
        Self {
            display_text: format!("{}{}", self.display_text, msg.as_ref()),
            ..self
        }
    }

    #[must_use]
    pub fn set_detail(self, detail: impl ToString) -> Self {
        Self {
            detail: detail.to_string(),
            ..self
        }
    }
}

impl Debug for ErrorCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}. Code: {}, Text = {}.",
            self.name,
            self.code(),
            self.message(),
        )
    }
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}. Code: {}, Text = {}.",
            self.name,
            self.code(),
            self.message(),
        )
    }
}

impl std::error::Error for ErrorCode {}

pub trait ErrorCodeResultExt<T> {
    /// Prepends `msg` to the error message, evaluated lazily.
    fn with_context<F, M>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> M,
        M: AsRef<str>;

    /// Turns an error with the given code into `Ok(None)`.
    fn or_error_code(self, code: u16) -> Result<Option<T>>;
}

impl<T> ErrorCodeResultExt<T> for Result<T> {
    fn with_context<F, M>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> M,
        M: AsRef<str>,
    {
        self.map_err(|e| e.add_message(f()))
    }

    fn or_error_code(self, code: u16) -> Result<Option<T>> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(e) if e.code() == code => Ok(None),
            Err(e) => Err(e),
        }
    }
}
