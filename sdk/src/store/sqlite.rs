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

use diesel::{
    r2d2::{ConnectionManager, Pool},
    sqlite::SqliteConnection,
};

use super::StoreFactory;
use crate::credentials::{CredentialsStore, DieselCredentialsStore};
use crate::error::InternalError;
use crate::migrations::run_sqlite_migrations;
use crate::notifications::{DieselNotificationStore, NotificationStore};
use crate::users::{DieselUserStore, UserStore};

/// A `StoreFactory` backed by a SQLite database.
pub struct SqliteStoreFactory {
    pool: Pool<ConnectionManager<SqliteConnection>>,
}

impl SqliteStoreFactory {
    /// Wraps `pool`, bringing the database schema up to date first.
    pub fn new(pool: Pool<ConnectionManager<SqliteConnection>>) -> Result<Self, InternalError> {
        let conn = pool.get().map_err(|err| {
            InternalError::from_source_with_prefix(
                Box::new(err),
                "Unable to connect to database".to_string(),
            )
        })?;
        run_sqlite_migrations(&*conn)?;

        Ok(Self { pool })
    }
}

impl StoreFactory for SqliteStoreFactory {
    fn get_user_store(&self) -> Box<dyn UserStore> {
        Box::new(DieselUserStore::new(self.pool.clone()))
    }

    fn get_credentials_store(&self) -> Box<dyn CredentialsStore> {
        Box::new(DieselCredentialsStore::new(self.pool.clone()))
    }

    fn get_notification_store(&self) -> Box<dyn NotificationStore> {
        Box::new(DieselNotificationStore::new(self.pool.clone()))
    }
}
