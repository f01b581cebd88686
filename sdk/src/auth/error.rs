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

use crate::credentials::{
    CredentialsStoreError, UserCredentialsBuilderError, UserCredentialsError,
};
use crate::error::{InternalError, InvalidArgumentError, ResourceTemporarilyUnavailableError};
use crate::sessions::{ClaimsBuildError, TokenIssuerError};
use crate::users::{UserBuilderError, UserStoreError};

#[derive(Debug)]
pub enum AuthServiceError {
    InternalError(InternalError),
    InvalidArgumentError(InvalidArgumentError),
    /// Returned when an email and password pair does not match a user
    InvalidCredentialsError,
    /// Returned when a bearer token is malformed, expired or names an unknown user
    InvalidTokenError(String),
    PermissionDeniedError(String),
    /// Returned when registering an email that is already in use
    ConflictError(String),
    NotFoundError(String),
    ResourceTemporarilyUnavailableError(ResourceTemporarilyUnavailableError),
}

impl Error for AuthServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AuthServiceError::InternalError(err) => Some(err),
            AuthServiceError::InvalidArgumentError(err) => Some(err),
            AuthServiceError::ResourceTemporarilyUnavailableError(err) => Some(err),
            AuthServiceError::InvalidCredentialsError
            | AuthServiceError::InvalidTokenError(_)
            | AuthServiceError::PermissionDeniedError(_)
            | AuthServiceError::ConflictError(_)
            | AuthServiceError::NotFoundError(_) => None,
        }
    }
}

impl fmt::Display for AuthServiceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AuthServiceError::InternalError(err) => err.fmt(f),
            AuthServiceError::InvalidArgumentError(err) => err.fmt(f),
            AuthServiceError::InvalidCredentialsError => f.write_str("invalid email or password"),
            AuthServiceError::InvalidTokenError(msg) => write!(f, "invalid token: {}", msg),
            AuthServiceError::PermissionDeniedError(msg) => f.write_str(msg),
            AuthServiceError::ConflictError(msg) => f.write_str(msg),
            AuthServiceError::NotFoundError(msg) => f.write_str(msg),
            AuthServiceError::ResourceTemporarilyUnavailableError(err) => err.fmt(f),
        }
    }
}

impl From<UserStoreError> for AuthServiceError {
    fn from(err: UserStoreError) -> Self {
        match err {
            UserStoreError::InternalError(err) => AuthServiceError::InternalError(err),
            UserStoreError::ConstraintViolationError(_) => {
                AuthServiceError::ConflictError("A user with that email already exists".into())
            }
            UserStoreError::ResourceTemporarilyUnavailableError(err) => {
                AuthServiceError::ResourceTemporarilyUnavailableError(err)
            }
            UserStoreError::NotFoundError(uid) => {
                AuthServiceError::NotFoundError(format!("No user with id {}", uid))
            }
        }
    }
}

impl From<CredentialsStoreError> for AuthServiceError {
    fn from(err: CredentialsStoreError) -> Self {
        match err {
            CredentialsStoreError::InternalError(err) => AuthServiceError::InternalError(err),
            CredentialsStoreError::ConstraintViolationError(_) => {
                AuthServiceError::ConflictError("A user with that email already exists".into())
            }
            CredentialsStoreError::ResourceTemporarilyUnavailableError(err) => {
                AuthServiceError::ResourceTemporarilyUnavailableError(err)
            }
            CredentialsStoreError::NotFoundError(_) => AuthServiceError::InvalidCredentialsError,
        }
    }
}

impl From<UserCredentialsBuilderError> for AuthServiceError {
    fn from(err: UserCredentialsBuilderError) -> Self {
        AuthServiceError::InternalError(InternalError::from_source(Box::new(err)))
    }
}

impl From<UserCredentialsError> for AuthServiceError {
    fn from(err: UserCredentialsError) -> Self {
        AuthServiceError::InternalError(InternalError::from_source(Box::new(err)))
    }
}

impl From<UserBuilderError> for AuthServiceError {
    fn from(err: UserBuilderError) -> Self {
        AuthServiceError::InternalError(InternalError::from_source(Box::new(err)))
    }
}

impl From<ClaimsBuildError> for AuthServiceError {
    fn from(err: ClaimsBuildError) -> Self {
        AuthServiceError::InternalError(InternalError::from_source(Box::new(err)))
    }
}

impl From<TokenIssuerError> for AuthServiceError {
    fn from(err: TokenIssuerError) -> Self {
        AuthServiceError::InternalError(InternalError::from_source(Box::new(err)))
    }
}
