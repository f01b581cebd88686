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

use std::collections::HashSet;

use diesel::r2d2::{ConnectionManager, Pool};

use super::{NotificationStore, NotificationStoreError};
use crate::notifications::{Notification, ReadUpdate};
use operations::add_notification::NotificationStoreAddNotificationOperation as _;
use operations::apply_read_updates::NotificationStoreApplyReadUpdatesOperation as _;
use operations::list_notifications::NotificationStoreListNotificationsOperation as _;
use operations::list_read_markers::NotificationStoreListReadMarkersOperation as _;
use operations::NotificationStoreOperations;

pub struct DieselNotificationStore<C: diesel::Connection + 'static> {
    connection_pool: Pool<ConnectionManager<C>>,
}

// connection types are not `Clone`, so this is not derived
impl<C: diesel::Connection> Clone for DieselNotificationStore<C> {
    fn clone(&self) -> Self {
        DieselNotificationStore {
            connection_pool: self.connection_pool.clone(),
        }
    }
}

impl<C: diesel::Connection> DieselNotificationStore<C> {
    /// Creates a new `DieselNotificationStore`
    ///
    /// # Arguments
    ///
    ///  * `connection_pool`: connection pool to the database
    pub fn new(connection_pool: Pool<ConnectionManager<C>>) -> Self {
        DieselNotificationStore { connection_pool }
    }
}

impl NotificationStore for DieselNotificationStore<diesel::sqlite::SqliteConnection> {
    fn add_notification(&self, notification: Notification) -> Result<(), NotificationStoreError> {
        NotificationStoreOperations::new(&*self.connection_pool.get()?)
            .add_notification(notification.into())
    }

    fn list_direct(&self, uid: &str) -> Result<Vec<Notification>, NotificationStoreError> {
        NotificationStoreOperations::new(&*self.connection_pool.get()?).list_direct(uid)
    }

    fn list_global(&self) -> Result<Vec<Notification>, NotificationStoreError> {
        NotificationStoreOperations::new(&*self.connection_pool.get()?).list_global()
    }

    fn list_read_markers(&self, uid: &str) -> Result<HashSet<String>, NotificationStoreError> {
        NotificationStoreOperations::new(&*self.connection_pool.get()?).list_read_markers(uid)
    }

    fn get_direct(
        &self,
        uid: &str,
        id: &str,
    ) -> Result<Option<Notification>, NotificationStoreError> {
        NotificationStoreOperations::new(&*self.connection_pool.get()?).get_direct(uid, id)
    }

    fn get_global(&self, id: &str) -> Result<Option<Notification>, NotificationStoreError> {
        NotificationStoreOperations::new(&*self.connection_pool.get()?).get_global(id)
    }

    fn apply_read_updates(
        &self,
        uid: &str,
        updates: &[ReadUpdate],
    ) -> Result<(), NotificationStoreError> {
        NotificationStoreOperations::new(&*self.connection_pool.get()?)
            .apply_read_updates(uid, updates)
    }

    fn clone_box(&self) -> Box<dyn NotificationStore> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use diesel::sqlite::SqliteConnection;

    use crate::migrations::run_sqlite_migrations;
    use crate::notifications::{NotificationBuilder, NotificationType};

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

    fn notification(id: &str, recipient: Option<&str>) -> Notification {
        let mut builder = NotificationBuilder::new()
            .with_id(id)
            .with_title(id)
            .with_message("body")
            .with_sender_uid("admin")
            .with_timestamp(42)
            .with_notification_type(NotificationType::Alert);
        if let Some(recipient) = recipient {
            builder = builder.with_recipient_uid(recipient);
        }
        builder.build().expect("Unable to build notification")
    }

    #[test]
    fn test_sqlite_add_and_list() {
        let store = DieselNotificationStore::new(create_connection_pool_and_migrate());

        store
            .add_notification(notification("d1", Some("u1")))
            .expect("Unable to add notification");
        store
            .add_notification(notification("g1", None))
            .expect("Unable to add notification");

        assert_eq!(
            store.list_direct("u1").expect("Unable to list direct"),
            vec![notification("d1", Some("u1"))]
        );
        assert_eq!(
            store.list_global().expect("Unable to list global"),
            vec![notification("g1", None)]
        );
        assert!(matches!(
            store.add_notification(notification("g1", None)),
            Err(NotificationStoreError::ConstraintViolationError(_))
        ));
    }

    #[test]
    fn test_sqlite_apply_read_updates() {
        let store = DieselNotificationStore::new(create_connection_pool_and_migrate());

        store
            .add_notification(notification("d1", Some("u1")))
            .expect("Unable to add notification");
        store
            .add_notification(notification("g1", None))
            .expect("Unable to add notification");

        let updates = vec![
            ReadUpdate::Direct("d1".to_string()),
            ReadUpdate::Global("g1".to_string()),
        ];
        store
            .apply_read_updates("u1", &updates)
            .expect("Unable to apply updates");
        store
            .apply_read_updates("u1", &updates)
            .expect("Unable to apply updates twice");

        assert!(store
            .get_direct("u1", "d1")
            .expect("Unable to fetch")
            .expect("d1 missing")
            .is_read());
        assert!(!store
            .get_global("g1")
            .expect("Unable to fetch")
            .expect("g1 missing")
            .is_read());
        assert!(store
            .list_read_markers("u1")
            .expect("Unable to list markers")
            .contains("g1"));
    }

    #[test]
    fn test_sqlite_failed_batch_rolls_back() {
        let store = DieselNotificationStore::new(create_connection_pool_and_migrate());

        store
            .add_notification(notification("g1", None))
            .expect("Unable to add notification");

        let result = store.apply_read_updates(
            "u1",
            &[
                ReadUpdate::Global("g1".to_string()),
                ReadUpdate::Direct("missing".to_string()),
            ],
        );

        assert!(matches!(result, Err(NotificationStoreError::NotFoundError(_))));
        assert!(store
            .list_read_markers("u1")
            .expect("Unable to list markers")
            .is_empty());
    }

    #[test]
    fn test_sqlite_clone_box_shares_pool() {
        let store = DieselNotificationStore::new(create_connection_pool_and_migrate());
        let boxed: Box<dyn NotificationStore> = store.clone_box();

        boxed
            .add_notification(notification("g1", None))
            .expect("Unable to add notification");

        assert_eq!(
            store.list_global().expect("Unable to list global"),
            vec![notification("g1", None)]
        );
    }
}
