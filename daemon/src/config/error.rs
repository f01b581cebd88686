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

#[derive(Debug)]
/// General error type used when constructing a heraldd configuration object
pub enum HeraldConfigError {
    InvalidArgument(String),
    MissingValue(String),
    ReadError { file: String, err: Box<dyn error::Error> },
}

impl error::Error for HeraldConfigError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            HeraldConfigError::InvalidArgument(_) => None,
            HeraldConfigError::MissingValue(_) => None,
            HeraldConfigError::ReadError { err, .. } => Some(&**err),
        }
    }
}

impl fmt::Display for HeraldConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            HeraldConfigError::InvalidArgument(msg) => {
                write!(f, "Unable to parse argument: {}", msg)
            }
            HeraldConfigError::MissingValue(msg) => {
                write!(f, "Configuration value must be set: {}", msg)
            }
            HeraldConfigError::ReadError { file, err } => {
                write!(f, "Unable to read config file {}: {}", file, err)
            }
        }
    }
}
