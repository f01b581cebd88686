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

#[cfg(feature = "sqlite")]
pub(crate) mod diesel;
mod error;
mod memory;

pub use error::UserStoreError;
pub use memory::MemoryUserStore;
#[cfg(feature = "sqlite")]
pub use self::diesel::DieselUserStore;

use super::User;

/// Persists users and their device push tokens.
pub trait UserStore: Send + Sync {
    /// Adds a user.
    ///
    /// Returns a `Unique` constraint violation if either the uid or the email is already taken.
    fn add_user(&self, user: User) -> Result<(), UserStoreError>;

    /// Fetches a user by uid.
    fn get_user(&self, uid: &str) -> Result<Option<User>, UserStoreError>;

    /// Fetches a user by email.
    fn get_user_by_email(&self, email: &str) -> Result<Option<User>, UserStoreError>;

    /// Lists every user, ordered by name then uid.
    fn list_users(&self) -> Result<Vec<User>, UserStoreError>;

    /// Replaces the push token of a user. An empty token clears it.
    fn update_push_token(&self, uid: &str, push_token: &str) -> Result<(), UserStoreError>;

    /// Removes a user. Removing an unknown uid is a no-op.
    fn remove_user(&self, uid: &str) -> Result<(), UserStoreError>;

    /// Lists every non-empty push token.
    fn list_push_tokens(&self) -> Result<Vec<String>, UserStoreError>;

    fn clone_box(&self) -> Box<dyn UserStore>;
}

impl Clone for Box<dyn UserStore> {
    fn clone(&self) -> Box<dyn UserStore> {
        self.clone_box()
    }
}
