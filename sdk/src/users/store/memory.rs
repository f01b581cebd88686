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
use std::sync::{Arc, Mutex, MutexGuard};

use super::{UserStore, UserStoreError};
use crate::error::{ConstraintViolationError, ConstraintViolationType, InternalError};
use crate::users::User;

#[derive(Clone, Default)]
pub struct MemoryUserStore {
    inner: Arc<Mutex<HashMap<String, User>>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        MemoryUserStore {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn lock(&self) -> Result<MutexGuard<HashMap<String, User>>, UserStoreError> {
        self.inner.lock().map_err(|_| {
            UserStoreError::InternalError(InternalError::with_message(
                "Cannot access users: mutex lock poisoned".to_string(),
            ))
        })
    }
}

impl UserStore for MemoryUserStore {
    fn add_user(&self, user: User) -> Result<(), UserStoreError> {
        let mut inner = self.lock()?;
        if inner.contains_key(user.uid()) || inner.values().any(|u| u.email() == user.email()) {
            return Err(UserStoreError::ConstraintViolationError(
                ConstraintViolationError::with_violation_type(ConstraintViolationType::Unique),
            ));
        }
        inner.insert(user.uid().to_string(), user);
        Ok(())
    }

    fn get_user(&self, uid: &str) -> Result<Option<User>, UserStoreError> {
        Ok(self.lock()?.get(uid).cloned())
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>, UserStoreError> {
        Ok(self
            .lock()?
            .values()
            .find(|user| user.email() == email)
            .cloned())
    }

    fn list_users(&self) -> Result<Vec<User>, UserStoreError> {
        let mut users: Vec<User> = self.lock()?.values().cloned().collect();
        users.sort_by(|a, b| a.name().cmp(b.name()).then_with(|| a.uid().cmp(b.uid())));
        Ok(users)
    }

    fn update_push_token(&self, uid: &str, push_token: &str) -> Result<(), UserStoreError> {
        let mut inner = self.lock()?;
        let user = inner
            .get_mut(uid)
            .ok_or_else(|| UserStoreError::NotFoundError(uid.to_string()))?;
        user.set_push_token(push_token);
        Ok(())
    }

    fn remove_user(&self, uid: &str) -> Result<(), UserStoreError> {
        self.lock()?.remove(uid);
        Ok(())
    }

    fn list_push_tokens(&self) -> Result<Vec<String>, UserStoreError> {
        let mut tokens: Vec<String> = self
            .lock()?
            .values()
            .filter_map(|user| user.device_token().map(String::from))
            .collect();
        tokens.sort();
        Ok(tokens)
    }

    fn clone_box(&self) -> Box<dyn UserStore> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::users::UserBuilder;

    fn user(uid: &str, email: &str, name: &str, token: &str) -> User {
        UserBuilder::new()
            .with_uid(uid)
            .with_email(email)
            .with_name(name)
            .with_push_token(token)
            .build()
            .expect("Unable to build user")
    }

    #[test]
    fn test_add_duplicate_email() {
        let store = MemoryUserStore::new();
        store
            .add_user(user("u1", "ana@example.com", "Ana", ""))
            .expect("Unable to add user");

        match store.add_user(user("u2", "ana@example.com", "Other Ana", "")) {
            Err(UserStoreError::ConstraintViolationError(err)) => {
                assert_eq!(err.violation_type(), &ConstraintViolationType::Unique)
            }
            other => panic!("Expected a unique violation, got {:?}", other),
        }
    }

    #[test]
    fn test_push_token_lifecycle() {
        let store = MemoryUserStore::new();
        store
            .add_user(user("u1", "ana@example.com", "Ana", "tok-a"))
            .expect("Unable to add user");
        store
            .add_user(user("u2", "bo@example.com", "Bo", ""))
            .expect("Unable to add user");

        assert_eq!(
            store.list_push_tokens().expect("Unable to list tokens"),
            vec!["tok-a".to_string()]
        );

        store
            .update_push_token("u2", "tok-b")
            .expect("Unable to update token");
        store
            .update_push_token("u1", "")
            .expect("Unable to clear token");

        assert_eq!(
            store.list_push_tokens().expect("Unable to list tokens"),
            vec!["tok-b".to_string()]
        );
    }

    #[test]
    fn test_update_token_for_unknown_user() {
        let store = MemoryUserStore::new();
        assert!(matches!(
            store.update_push_token("ghost", "tok"),
            Err(UserStoreError::NotFoundError(_))
        ));
    }

    #[test]
    fn test_list_users_sorted_by_name() {
        let store = MemoryUserStore::new();
        store
            .add_user(user("u1", "zed@example.com", "Zed", ""))
            .expect("Unable to add user");
        store
            .add_user(user("u2", "ana@example.com", "Ana", ""))
            .expect("Unable to add user");

        let names: Vec<String> = store
            .list_users()
            .expect("Unable to list users")
            .iter()
            .map(|u| u.name().to_string())
            .collect();
        assert_eq!(names, vec!["Ana".to_string(), "Zed".to_string()]);
    }

    #[test]
    fn test_remove_user_frees_email() {
        let store = MemoryUserStore::new();
        store
            .add_user(user("u1", "ana@example.com", "Ana", ""))
            .expect("Unable to add user");

        store.remove_user("u1").expect("Unable to remove user");
        store.remove_user("u1").expect("Removing twice should be a no-op");

        assert_eq!(store.get_user("u1").expect("Unable to fetch user"), None);
        store
            .add_user(user("u2", "ana@example.com", "Ana", ""))
            .expect("Email should be free again");
    }
}
