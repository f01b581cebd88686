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

#[cfg(feature = "sqlite")]
use crate::error::ConstraintViolationType;
use crate::error::{ConstraintViolationError, InternalError, ResourceTemporarilyUnavailableError};

#[derive(Debug)]
pub enum NotificationStoreError {
    InternalError(InternalError),
    ConstraintViolationError(ConstraintViolationError),
    ResourceTemporarilyUnavailableError(ResourceTemporarilyUnavailableError),
    NotFoundError(String),
}

impl Error for NotificationStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            NotificationStoreError::InternalError(err) => Some(err),
            NotificationStoreError::ConstraintViolationError(err) => Some(err),
            NotificationStoreError::ResourceTemporarilyUnavailableError(err) => Some(err),
            NotificationStoreError::NotFoundError(_) => None,
        }
    }
}

impl fmt::Display for NotificationStoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NotificationStoreError::InternalError(err) => err.fmt(f),
            NotificationStoreError::ConstraintViolationError(err) => err.fmt(f),
            NotificationStoreError::ResourceTemporarilyUnavailableError(err) => err.fmt(f),
            NotificationStoreError::NotFoundError(ref s) => {
                write!(f, "Notification not found: {}", s)
            }
        }
    }
}

#[cfg(feature = "sqlite")]
impl From<diesel::result::Error> for NotificationStoreError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _,
            ) => NotificationStoreError::ConstraintViolationError(
                ConstraintViolationError::from_source_with_violation_type(
                    ConstraintViolationType::Unique,
                    Box::new(err),
                ),
            ),
            _ => NotificationStoreError::InternalError(InternalError::from_source(Box::new(err))),
        }
    }
}

#[cfg(feature = "sqlite")]
impl From<diesel::r2d2::PoolError> for NotificationStoreError {
    fn from(err: diesel::r2d2::PoolError) -> NotificationStoreError {
        NotificationStoreError::ResourceTemporarilyUnavailableError(
            ResourceTemporarilyUnavailableError::from_source(Box::new(err)),
        )
    }
}
