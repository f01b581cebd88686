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

//! Construction of the herald stores over one shared backend.

mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "sqlite")]
use diesel::r2d2::{ConnectionManager, Pool};

use crate::credentials::CredentialsStore;
use crate::error::{InternalError, InvalidArgumentError};
use crate::notifications::NotificationStore;
use crate::users::UserStore;

pub use memory::MemoryStoreFactory;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStoreFactory;

/// An abstract factory for herald stores backed by the same storage.
pub trait StoreFactory: Send + Sync {
    fn get_user_store(&self) -> Box<dyn UserStore>;

    fn get_credentials_store(&self) -> Box<dyn CredentialsStore>;

    fn get_notification_store(&self) -> Box<dyn NotificationStore>;
}

/// Creates a `StoreFactory` backed by the given connection
///
/// # Arguments
///
/// * `connection_uri` - The identifier of the storage connection that will be used by all stores
///   created by the resulting factory
pub fn create_store_factory(
    connection_uri: &ConnectionUri,
) -> Result<Box<dyn StoreFactory>, InternalError> {
    match connection_uri {
        ConnectionUri::Memory => Ok(Box::new(MemoryStoreFactory::new())),
        #[cfg(feature = "sqlite")]
        ConnectionUri::Sqlite(conn_str) => {
            let connection_manager =
                ConnectionManager::<diesel::sqlite::SqliteConnection>::new(conn_str);
            let mut pool_builder = Pool::builder();
            // A new database is created for each connection to the in-memory SQLite
            // implementation; to ensure that the resulting stores will operate on the same
            // database, only one connection is allowed.
            if conn_str == ":memory:" {
                pool_builder = pool_builder.max_size(1);
            }
            let pool = pool_builder.build(connection_manager).map_err(|err| {
                InternalError::from_source_with_prefix(
                    Box::new(err),
                    "Failed to build connection pool".to_string(),
                )
            })?;
            Ok(Box::new(SqliteStoreFactory::new(pool)?))
        }
    }
}

/// The possible connection types and identifiers for a `StoreFactory`
#[derive(Clone, Debug, PartialEq)]
pub enum ConnectionUri {
    Memory,
    #[cfg(feature = "sqlite")]
    Sqlite(String),
}

impl fmt::Display for ConnectionUri {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConnectionUri::Memory => f.write_str("memory"),
            #[cfg(feature = "sqlite")]
            ConnectionUri::Sqlite(path) => write!(f, "sqlite://{}", path),
        }
    }
}

impl FromStr for ConnectionUri {
    type Err = InvalidArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "memory" => Ok(ConnectionUri::Memory),
            #[cfg(feature = "sqlite")]
            _ if s.starts_with("sqlite://") => {
                Ok(ConnectionUri::Sqlite(s["sqlite://".len()..].to_string()))
            }
            #[cfg(feature = "sqlite")]
            _ if s == ":memory:" || s.ends_with(".db") => Ok(ConnectionUri::Sqlite(s.into())),
            _ => Err(InvalidArgumentError::new(
                "database_url".to_string(),
                format!("No compatible connection type: {}", s),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_connection_uri() {
        assert_eq!("memory".parse::<ConnectionUri>().ok(), Some(ConnectionUri::Memory));
        assert!("postgres://localhost/herald".parse::<ConnectionUri>().is_err());
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn test_parse_sqlite_uri() {
        assert_eq!(
            "sqlite:///var/lib/herald/herald.db".parse::<ConnectionUri>().ok(),
            Some(ConnectionUri::Sqlite("/var/lib/herald/herald.db".to_string()))
        );
        assert_eq!(
            "herald.db".parse::<ConnectionUri>().ok(),
            Some(ConnectionUri::Sqlite("herald.db".to_string()))
        );
        assert_eq!(
            ":memory:".parse::<ConnectionUri>().ok(),
            Some(ConnectionUri::Sqlite(":memory:".to_string()))
        );
    }

    /// Stores from one factory share state.
    #[test]
    fn test_memory_factory_shares_state() {
        use crate::users::UserBuilder;

        let factory =
            create_store_factory(&ConnectionUri::Memory).expect("Unable to create factory");
        let user = UserBuilder::new()
            .with_uid("u1")
            .with_email("u1@example.com")
            .with_name("U1")
            .build()
            .expect("Unable to build user");

        factory
            .get_user_store()
            .add_user(user.clone())
            .expect("Unable to add user");

        assert_eq!(
            factory.get_user_store().get_user("u1").expect("Unable to get user"),
            Some(user)
        );
    }

    /// The sqlite factory applies migrations, so its stores work immediately.
    #[cfg(feature = "sqlite")]
    #[test]
    fn test_sqlite_factory_migrates() {
        let factory = create_store_factory(&ConnectionUri::Sqlite(":memory:".to_string()))
            .expect("Unable to create factory");

        assert!(factory
            .get_notification_store()
            .list_global()
            .expect("Unable to list notifications")
            .is_empty());
    }
}
