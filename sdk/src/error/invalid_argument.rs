// Copyright 2018-2020 Cargill Incorporated
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

use std::error;
use std::fmt;

/// Returned when a caller supplied an argument that cannot be accepted.
#[derive(Debug)]
pub struct InvalidArgumentError {
    argument: String,
    message: String,
}

impl InvalidArgumentError {
    /// Constructs a new `InvalidArgumentError`.
    ///
    /// `argument` is the name of the offending argument and `message` is the reason it was
    /// rejected. Display combines both as `"{message} ({argument})"`.
    ///
    /// ```
    /// use herald_sdk::error::InvalidArgumentError;
    ///
    /// let err = InvalidArgumentError::new("title".to_string(), "must not be empty".to_string());
    /// assert_eq!(format!("{}", err), "must not be empty (title)");
    /// ```
    pub fn new(argument: String, message: String) -> Self {
        Self { argument, message }
    }

    pub fn argument(&self) -> String {
        self.argument.clone()
    }

    pub fn message(&self) -> String {
        self.message.clone()
    }
}

impl error::Error for InvalidArgumentError {}

impl fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", &self.message, &self.argument)
    }
}
