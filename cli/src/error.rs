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
use std::io;

#[derive(Debug)]
pub enum CliError {
    LoggingInitializationError(Box<flexi_logger::FlexiLoggerError>),
    /// The command was used incorrectly
    UserError(String),
    /// The daemon rejected the request
    DaemonError(String),
    /// No session is stored, or the daemon no longer accepts it
    SessionError(String),
    IoError(io::Error),
    ReqwestError(reqwest::Error),
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CliError::LoggingInitializationError(err) => Some(err),
            CliError::UserError(_) => None,
            CliError::DaemonError(_) => None,
            CliError::SessionError(_) => None,
            CliError::IoError(err) => Some(err),
            CliError::ReqwestError(err) => Some(err),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CliError::LoggingInitializationError(err) => {
                write!(f, "LoggingInitializationError: {}", err)
            }
            CliError::UserError(msg) => write!(f, "Error: {}", msg),
            CliError::DaemonError(msg) => write!(f, "Daemon error: {}", msg),
            CliError::SessionError(msg) => write!(f, "Session error: {}", msg),
            CliError::IoError(err) => write!(f, "IoError: {}", err),
            CliError::ReqwestError(err) => write!(f, "Request failed: {}", err),
        }
    }
}

impl From<flexi_logger::FlexiLoggerError> for CliError {
    fn from(err: flexi_logger::FlexiLoggerError) -> Self {
        CliError::LoggingInitializationError(Box::new(err))
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::IoError(err)
    }
}

impl From<reqwest::Error> for CliError {
    fn from(err: reqwest::Error) -> Self {
        CliError::ReqwestError(err)
    }
}
