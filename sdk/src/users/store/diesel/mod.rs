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

pub(crate) mod models;
mod operations;
pub(crate) mod schema;

use diesel::r2d2::{ConnectionManager, Pool};

use super::{UserStore, UserStoreError};
use crate::users::User;
use operations::add_user::UserStoreAddUserOperation as _;
use operations::get_user::UserStoreGetUserOperation as _;
use operations::list_push_tokens::UserStoreListPushTokensOperation as _;
use operations::list_users::UserStoreListUsersOperation as _;
use operations::remove_user::UserStoreRemoveUserOperation as _;
use operations::update_push_token::UserStoreUpdatePushTokenOperation as _;
use operations::UserStoreOperations;

pub struct DieselUserStore<C: diesel::Connection + 'static> {
    connection_pool: Pool<ConnectionManager<C>>,
}

// connection types are not `Clone`, so this is not derived
impl<C: diesel::Connection> Clone for DieselUserStore<C> {
    fn clone(&self) -> Self {
        DieselUserStore {
            connection_pool: self.connection_pool.clone(),
        }
    }
}

impl<C: diesel::Connection> DieselUserStore<C> {
    /// Creates a new `DieselUserStore`
    ///
    /// # Arguments
    ///
    ///  * `connection_pool`: connection pool to the database
    pub fn new(connection_pool: Pool<ConnectionManager<C>>) -> Self {
        DieselUserStore { connection_pool }
    }
}

impl UserStore for DieselUserStore<diesel::sqlite::SqliteConnection> {
    fn add_user(&self, user: User) -> Result<(), UserStoreError> {
        UserStoreOperations::new(&*self.connection_pool.get()?).add_user(user.into())
    }

    fn get_user(&self, uid: &str) -> Result<Option<User>, UserStoreError> {
        UserStoreOperations::new(&*self.connection_pool.get()?).get_user(uid)
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>, UserStoreError> {
        UserStoreOperations::new(&*self.connection_pool.get()?).get_user_by_email(email)
    }

    fn list_users(&self) -> Result<Vec<User>, UserStoreError> {
        UserStoreOperations::new(&*self.connection_pool.get()?).list_users()
    }

    fn update_push_token(&self, uid: &str, push_token: &str) -> Result<(), UserStoreError> {
        UserStoreOperations::new(&*self.connection_pool.get()?).update_push_token(uid, push_token)
    }

    fn remove_user(&self, uid: &str) -> Result<(), UserStoreError> {
        UserStoreOperations::new(&*self.connection_pool.get()?).remove_user(uid)
    }

    fn list_push_tokens(&self) -> Result<Vec<String>, UserStoreError> {
        UserStoreOperations::new(&*self.connection_pool.get()?).list_push_tokens()
    }

    fn clone_box(&self) -> Box<dyn UserStore> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use diesel::sqlite::SqliteConnection;

    use crate::error::ConstraintViolationType;
    use crate::migrations::run_sqlite_migrations;
    use crate::users::UserBuilder;

    fn create_connection_pool_and_migrate() -> Pool<ConnectionManager<SqliteConnection>> {
        let connection_manager = ConnectionManager::<SqliteConnection>::new(":memory:");
        let pool = Pool::builder()
            .max_size(1)
            .build(connection_manager)
            .expect("Failed to build connection pool");

        run_sqlite_migrations(&*pool.get().expect("Failed to get connection for migrations"))
            .expect("Failed to run migrations");

        pool
    }

    fn user(uid: &str, email: &str, token: &str) -> User {
        UserBuilder::new()
            .with_uid(uid)
            .with_email(email)
            .with_name(uid)
            .with_push_token(token)
            .build()
            .expect("Unable to build user")
    }

    #[test]
    fn test_sqlite_add_and_fetch_user() {
        let store = DieselUserStore::new(create_connection_pool_and_migrate());

        store
            .add_user(user("u1", "ana@example.com", "tok"))
            .expect("Unable to add user");

        let fetched = store
            .get_user_by_email("ana@example.com")
            .expect("Unable to fetch user")
            .expect("User not found");
        assert_eq!(fetched, user("u1", "ana@example.com", "tok"));
        assert_eq!(store.get_user("nobody").expect("Unable to fetch user"), None);
    }

    #[test]
    fn test_sqlite_duplicate_email() {
        let store = DieselUserStore::new(create_connection_pool_and_migrate());

        store
            .add_user(user("u1", "ana@example.com", ""))
            .expect("Unable to add user");

        match store.add_user(user("u2", "ana@example.com", "")) {
            Err(UserStoreError::ConstraintViolationError(err)) => {
                assert_eq!(err.violation_type(), &ConstraintViolationType::Unique)
            }
            other => panic!("Expected a unique violation, got {:?}", other),
        }
    }

    #[test]
    fn test_sqlite_push_tokens() {
        let store = DieselUserStore::new(create_connection_pool_and_migrate());

        store
            .add_user(user("u1", "ana@example.com", "tok-a"))
            .expect("Unable to add user");
        store
            .add_user(user("u2", "bo@example.com", ""))
            .expect("Unable to add user");
        store
            .update_push_token("u1", "")
            .expect("Unable to clear token");
        store
            .update_push_token("u2", "tok-b")
            .expect("Unable to set token");

        assert_eq!(
            store.list_push_tokens().expect("Unable to list tokens"),
            vec!["tok-b".to_string()]
        );
        assert!(matches!(
            store.update_push_token("ghost", "tok"),
            Err(UserStoreError::NotFoundError(_))
        ));
    }

    /// A boxed clone shares the connection pool with the original store.
    #[test]
    fn test_sqlite_clone_box_shares_pool() {
        let store = DieselUserStore::new(create_connection_pool_and_migrate());
        let boxed: Box<dyn UserStore> = store.clone_box();

        boxed
            .add_user(user("u1", "ana@example.com", ""))
            .expect("Unable to add user");

        assert!(store
            .get_user("u1")
            .expect("Unable to fetch user")
            .is_some());
    }

    #[test]
    fn test_sqlite_remove_user() {
        let store = DieselUserStore::new(create_connection_pool_and_migrate());
        store
            .add_user(user("u1", "ana@example.com", ""))
            .expect("Unable to add user");

        store.remove_user("u1").expect("Unable to remove user");
        store.remove_user("u1").expect("Removing twice should be a no-op");

        assert_eq!(store.get_user("u1").expect("Unable to fetch user"), None);
        store
            .add_user(user("u2", "ana@example.com", ""))
            .expect("Email should be free again");
    }
}
