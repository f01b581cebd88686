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

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{CredentialsStore, CredentialsStoreError};
use crate::credentials::UserCredentials;
use crate::error::{ConstraintViolationError, ConstraintViolationType, InternalError};

/// Keeps credentials keyed by email.
#[derive(Clone, Default)]
pub struct MemoryCredentialsStore {
    inner: Arc<Mutex<HashMap<String, UserCredentials>>>,
}

impl MemoryCredentialsStore {
    pub fn new() -> Self {
        MemoryCredentialsStore::default()
    }
}

impl CredentialsStore for MemoryCredentialsStore {
    fn add_credentials(&self, credentials: UserCredentials) -> Result<(), CredentialsStoreError> {
        let mut inner = self.inner.lock().map_err(|_| {
            CredentialsStoreError::InternalError(InternalError::with_message(
                "Cannot access credentials: mutex lock poisoned".to_string(),
            ))
        })?;

        if inner.contains_key(&credentials.email)
            || inner.values().any(|c| c.user_id == credentials.user_id)
        {
            return Err(CredentialsStoreError::ConstraintViolationError(
                ConstraintViolationError::with_violation_type(ConstraintViolationType::Unique),
            ));
        }

        inner.insert(credentials.email.clone(), credentials);
        Ok(())
    }

    fn fetch_credential_by_email(
        &self,
        email: &str,
    ) -> Result<UserCredentials, CredentialsStoreError> {
        let inner = self.inner.lock().map_err(|_| {
            CredentialsStoreError::InternalError(InternalError::with_message(
                "Cannot access credentials: mutex lock poisoned".to_string(),
            ))
        })?;

        inner
            .get(email)
            .cloned()
            .ok_or_else(|| CredentialsStoreError::NotFoundError(email.to_string()))
    }

    fn clone_box(&self) -> Box<dyn CredentialsStore> {
        Box::new(self.clone())
    }
}
