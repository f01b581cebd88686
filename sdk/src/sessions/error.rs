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

#[derive(Debug)]
pub enum ClaimsBuildError {
    /// Returned if a required field is missing
    MissingRequiredField(String),
    /// Returned if a invalid value was provided to the builder
    InvalidValue(String),
}

impl Error for ClaimsBuildError {}

impl fmt::Display for ClaimsBuildError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ClaimsBuildError::MissingRequiredField(ref s) => {
                write!(f, "failed to build claim: {}", s)
            }
            ClaimsBuildError::InvalidValue(ref s) => write!(f, "failed to build claim: {}", s),
        }
    }
}

#[derive(Debug)]
pub enum TokenIssuerError {
    EncodingError(Box<dyn Error>),
}

impl Error for TokenIssuerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TokenIssuerError::EncodingError(err) => Some(&**err),
        }
    }
}

impl fmt::Display for TokenIssuerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenIssuerError::EncodingError(err) => write!(f, "failed to issue token: {}", err),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenIssuerError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        TokenIssuerError::EncodingError(Box::new(err))
    }
}

#[derive(Debug)]
pub enum TokenValidationError {
    /// The token could not be decoded, or its signature, issuer or expiration was rejected
    ValidationError(Box<dyn Error>),
    /// The claims did not pass the caller's extra validation
    InvalidClaim(String),
}

impl Error for TokenValidationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TokenValidationError::ValidationError(err) => Some(&**err),
            TokenValidationError::InvalidClaim(_) => None,
        }
    }
}

impl fmt::Display for TokenValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenValidationError::ValidationError(err) => {
                write!(f, "failed to validate claim: {}", err)
            }
            TokenValidationError::InvalidClaim(msg) => write!(f, "invalid claim: {}", msg),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenValidationError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        TokenValidationError::ValidationError(Box::new(err))
    }
}
