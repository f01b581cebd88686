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

use std::error::Error;
use std::fmt;

use herald_sdk::error::{InternalError, InvalidArgumentError};

use crate::config::error::HeraldConfigError;

#[derive(Debug)]
pub enum DaemonError {
    LoggingInitializationError(Box<flexi_logger::FlexiLoggerError>),
    ConfigurationError(Box<HeraldConfigError>),
    StartUpError(Box<dyn Error>),
    RestApiError(InternalError),
    ShutdownError(String),
}

impl Error for DaemonError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DaemonError::LoggingInitializationError(err) => Some(err),
            DaemonError::ConfigurationError(err) => Some(err),
            DaemonError::StartUpError(err) => Some(&**err),
            DaemonError::RestApiError(err) => Some(err),
            DaemonError::ShutdownError(_) => None,
        }
    }
}

impl fmt::Display for DaemonError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DaemonError::LoggingInitializationError(e) => {
                write!(f, "Logging initialization error: {}", e)
            }
            DaemonError::ConfigurationError(e) => write!(f, "Configuration error: {}", e),
            DaemonError::StartUpError(e) => write!(f, "Start-up error: {}", e),
            DaemonError::RestApiError(e) => write!(f, "Rest API error: {}", e),
            DaemonError::ShutdownError(msg) => write!(f, "Unable to cleanly shutdown: {}", msg),
        }
    }
}

impl From<flexi_logger::FlexiLoggerError> for DaemonError {
    fn from(err: flexi_logger::FlexiLoggerError) -> DaemonError {
        DaemonError::LoggingInitializationError(Box::new(err))
    }
}

impl From<HeraldConfigError> for DaemonError {
    fn from(err: HeraldConfigError) -> Self {
        DaemonError::ConfigurationError(Box::new(err))
    }
}

impl From<InvalidArgumentError> for DaemonError {
    fn from(err: InvalidArgumentError) -> Self {
        DaemonError::StartUpError(Box::new(err))
    }
}
