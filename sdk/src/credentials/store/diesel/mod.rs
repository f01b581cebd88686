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

use super::{CredentialsStore, CredentialsStoreError};
use crate::credentials::UserCredentials;
use operations::add_credentials::CredentialsStoreAddCredentialsOperation as _;
use operations::fetch_credential_by_email::CredentialsStoreFetchCredentialByEmailOperation as _;
use operations::CredentialsStoreOperations;

pub struct DieselCredentialsStore<C: diesel::Connection + 'static> {
    connection_pool: Pool<ConnectionManager<C>>,
}

// connection types are not `Clone`, so this is not derived
impl<C: diesel::Connection> Clone for DieselCredentialsStore<C> {
    fn clone(&self) -> Self {
        DieselCredentialsStore {
            connection_pool: self.connection_pool.clone(),
        }
    }
}

impl<C: diesel::Connection> DieselCredentialsStore<C> {
    /// Creates a new `DieselCredentialsStore`
    ///
    /// # Arguments
    ///
    ///  * `connection_pool`: connection pool to the database
    pub fn new(connection_pool: Pool<ConnectionManager<C>>) -> Self {
        DieselCredentialsStore { connection_pool }
    }
}

impl CredentialsStore for DieselCredentialsStore<diesel::sqlite::SqliteConnection> {
    fn add_credentials(&self, credentials: UserCredentials) -> Result<(), CredentialsStoreError> {
        CredentialsStoreOperations::new(&*self.connection_pool.get()?)
            .add_credentials(credentials.into())
    }

    fn fetch_credential_by_email(
        &self,
        email: &str,
    ) -> Result<UserCredentials, CredentialsStoreError> {
        CredentialsStoreOperations::new(&*self.connection_pool.get()?)
            .fetch_credential_by_email(email)
    }

    fn clone_box(&self) -> Box<dyn CredentialsStore> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use diesel::sqlite::SqliteConnection;

    use crate::credentials::{PasswordEncryptionCost, UserCredentialsBuilder};
    use crate::migrations::run_sqlite_migrations;
    use crate::users::{DieselUserStore, UserBuilder, UserStore};

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

    #[test]
    fn test_sqlite_add_and_verify_credentials() {
        let pool = create_connection_pool_and_migrate();
        DieselUserStore::new(pool.clone())
            .add_user(
                UserBuilder::new()
                    .with_uid("u1")
                    .with_email("ana@example.com")
                    .with_name("Ana")
                    .build()
                    .expect("Unable to build user"),
            )
            .expect("Unable to add user");

        let store = DieselCredentialsStore::new(pool);
        store
            .add_credentials(
                UserCredentialsBuilder::default()
                    .with_user_id("u1")
                    .with_email("ana@example.com")
                    .with_password("s3cret")
                    .with_password_encryption_cost(PasswordEncryptionCost::Low)
                    .build()
                    .expect("Unable to build credentials"),
            )
            .expect("Unable to add credentials");

        let fetched = store
            .fetch_credential_by_email("ana@example.com")
            .expect("Unable to fetch credentials");
        assert_eq!(fetched.user_id, "u1");
        assert!(fetched
            .verify_password("s3cret")
            .expect("Unable to verify password"));

        assert!(matches!(
            store.fetch_credential_by_email("nobody@example.com"),
            Err(CredentialsStoreError::NotFoundError(_))
        ));
    }

    #[test]
    fn test_sqlite_clone_box_shares_pool() {
        let pool = create_connection_pool_and_migrate();
        DieselUserStore::new(pool.clone())
            .add_user(
                UserBuilder::new()
                    .with_uid("u1")
                    .with_email("ana@example.com")
                    .with_name("Ana")
                    .build()
                    .expect("Unable to build user"),
            )
            .expect("Unable to add user");

        let store = DieselCredentialsStore::new(pool);
        let boxed: Box<dyn CredentialsStore> = store.clone_box();

        boxed
            .add_credentials(
                UserCredentialsBuilder::default()
                    .with_user_id("u1")
                    .with_email("ana@example.com")
                    .with_password("s3cret")
                    .with_password_encryption_cost(PasswordEncryptionCost::Low)
                    .build()
                    .expect("Unable to build credentials"),
            )
            .expect("Unable to add credentials");

        assert_eq!(
            store
                .fetch_credential_by_email("ana@example.com")
                .expect("Unable to fetch credentials")
                .user_id,
            "u1"
        );
    }
}
